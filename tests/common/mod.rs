//! Shared helpers for integration tests.

#![allow(dead_code)]

use chanstat::Stats;
use chanstat::proto::MessageKind;
use chrono::{DateTime, TimeZone, Utc};

/// A fixed timestamp `secs` seconds after an arbitrary epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Record a PRIVMSG-style message.
pub fn say(stats: &mut Stats, network: &str, channel: &str, hostmask: &str, text: &str) -> u64 {
    stats.add_message(MessageKind::Message, network, channel, hostmask, at(0), text)
}

/// A small graph spanning two networks with URLs, words, kicks and actions.
pub fn sample_graph() -> Stats {
    let mut stats = Stats::new();
    let lines = [
        (MessageKind::Message, "libera", "#rust", "alice!a@host", "hello world https://rust-lang.org"),
        (MessageKind::Message, "libera", "#rust", "bob!b@host", "Hello again docs.rs"),
        (MessageKind::Action, "libera", "#rust", "alice!a@host", "waves hello"),
        (MessageKind::Message, "libera", "#tokio", "bob!b@host", "WHY?"),
        (MessageKind::Kick, "libera", "#tokio", "op!o@host", "bob flooding"),
        (MessageKind::Quit, "libera", "", "carol!c@host", "bye world"),
        (MessageKind::Message, "oftc", "#debian", "alice!a@elsewhere", "apt update! https://debian.org"),
    ];
    for (i, (kind, network, channel, hostmask, text)) in lines.into_iter().enumerate() {
        stats.add_message(kind, network, channel, hostmask, at(i as i64), text);
    }
    stats
}
