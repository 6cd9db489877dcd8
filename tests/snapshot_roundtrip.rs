//! Save/load round-trips through the gzip snapshot.

mod common;

use chanstat::Stats;
use chanstat::proto::CaseMapping;
use common::{sample_graph, say};
use flate2::Compression;
use std::collections::HashMap;
use tempfile::tempdir;

fn assert_same_graph(before: &Stats, after: &Stats) {
    assert_eq!(before.casemapping(), after.casemapping());
    assert_eq!(before.network_count(), after.network_count());
    assert_eq!(before.channel_count(), after.channel_count());
    assert_eq!(before.user_count(), after.user_count());
    assert_eq!(before.message_count(), after.message_count());

    let network_names: HashMap<u64, &str> =
        before.networks().map(|n| (n.id, n.name.as_str())).collect();
    let channel_names: HashMap<u64, &str> =
        before.channels().map(|c| (c.id, c.name.as_str())).collect();

    for network in before.networks() {
        let loaded = after.network(&network.name).expect("network lookup");
        assert_eq!(loaded.id, network.id);
        assert_eq!(loaded.text, network.text);
        assert_eq!(loaded.message_ids, network.message_ids);
        assert_eq!(loaded.top_urls(10), network.top_urls(10));
        assert_eq!(loaded.top_words(10), network.top_words(10));

        for id in &network.message_ids {
            assert_eq!(after.message(*id), before.message(*id), "message {id}");
        }
    }
    for channel in before.channels() {
        let network = network_names[&channel.network_id];
        let loaded = after.channel(network, &channel.name).expect("channel lookup");
        assert_eq!(loaded.id, channel.id);
        assert_eq!(loaded.text, channel.text);
        assert_eq!(loaded.message_ids, channel.message_ids);
        assert_eq!(loaded.kicks, channel.kicks);
        assert_eq!(loaded.actions, channel.actions);
        assert_eq!(loaded.top_urls(10), channel.top_urls(10));
        assert_eq!(loaded.top_words(10), channel.top_words(10));
    }
    for user in before.users() {
        let network = network_names[&user.network_id];
        let loaded = after.user(network, &user.nick).expect("user lookup");
        assert_eq!(loaded.id, user.id);
        assert_eq!(loaded.text, user.text);
        assert_eq!(loaded.message_ids, user.message_ids);
        assert_eq!(loaded.channel_users.len(), user.channel_users.len());

        for channel_user in user.channel_users.values() {
            let channel = channel_names[&channel_user.channel_id];
            let loaded = after
                .channel_user(network, &user.nick, channel)
                .expect("channel user lookup");
            assert_eq!(loaded.channel_id, channel_user.channel_id);
            assert_eq!(loaded.text, channel_user.text);
            assert_eq!(loaded.message_ids, channel_user.message_ids);
        }
    }
}

#[test]
fn test_roundtrip_preserves_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");

    let stats = sample_graph();
    stats.save(&path).unwrap();
    let loaded = Stats::load(&path).unwrap();

    assert_same_graph(&stats, &loaded);
}

#[test]
fn test_loaded_graph_continues_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");

    let mut stats = sample_graph();
    stats.save_with(&path, Compression::best()).unwrap();
    let mut loaded = Stats::load(&path).unwrap();

    let expected = say(&mut stats, "libera", "#new", "dave!d@h", "late arrival");
    let actual = say(&mut loaded, "libera", "#new", "dave!d@h", "late arrival");
    assert_eq!(actual, expected);
    assert_eq!(
        loaded.channel("libera", "#new").unwrap().id,
        stats.channel("libera", "#new").unwrap().id
    );

    // Existing names still resolve to existing entities.
    say(&mut loaded, "LIBERA", "#RUST", "ALICE!a@host", "back");
    assert_eq!(loaded.network_count(), 2);
    assert_eq!(loaded.user("libera", "alice").unwrap().message_count(), 3);
}

#[test]
fn test_casemapping_survives_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");

    let mut stats = Stats::with_casemapping(CaseMapping::Ascii);
    say(&mut stats, "net", "#c", "[x]!u@h", "hi");
    stats.save(&path).unwrap();

    let loaded = Stats::load(&path).unwrap();
    assert_eq!(loaded.casemapping(), CaseMapping::Ascii);
    assert!(loaded.user("net", "{x}").is_none());
    assert!(loaded.user("net", "[X]").is_some());
}

#[test]
fn test_truncated_snapshot_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");

    sample_graph().save(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let err = Stats::load(&path).unwrap_err();
    assert!(err.is_corrupt(), "unexpected error: {err}");
}
