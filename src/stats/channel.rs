//! Channel aggregate.

use chanstat_proto::MessageKind;
use serde::{Deserialize, Serialize};

use super::counters::TextStats;
use super::message::Message;
use super::tokens::{TokenCounter, TopToken};
use super::{ChannelId, MessageId, NetworkId};

/// Everything observed in one channel of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub network_id: NetworkId,
    /// Name as first seen; lookups are case-insensitive.
    pub name: String,
    pub message_ids: Vec<MessageId>,
    pub text: TextStats,
    pub kicks: u64,
    pub actions: u64,
    pub urls: TokenCounter,
    pub words: TokenCounter,
}

impl Channel {
    pub(super) fn new(id: ChannelId, network_id: NetworkId, name: &str) -> Self {
        Self {
            id,
            network_id,
            name: name.to_owned(),
            message_ids: Vec::new(),
            text: TextStats::default(),
            kicks: 0,
            actions: 0,
            urls: TokenCounter::urls(),
            words: TokenCounter::words(),
        }
    }

    pub(super) fn add_message(&mut self, message: &Message) {
        self.message_ids.push(message.id);
        self.text.add_message(message);
        self.urls.add_text(&message.text);
        self.words.add_text(&message.text);

        match message.kind {
            MessageKind::Kick => self.kicks += 1,
            MessageKind::Action => self.actions += 1,
            _ => {}
        }
    }

    pub fn message_count(&self) -> usize {
        self.message_ids.len()
    }

    pub fn top_urls(&self, n: usize) -> Vec<TopToken> {
        self.urls.top(n)
    }

    pub fn top_words(&self, n: usize) -> Vec<TopToken> {
        self.words.top(n)
    }
}
