//! User and per-channel user aggregates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::counters::TextStats;
use super::message::Message;
use super::{ChannelId, MessageId, NetworkId, UserId};

/// One identity on one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub network_id: NetworkId,
    /// Nick as first seen; lookups are case-insensitive.
    pub nick: String,
    pub message_ids: Vec<MessageId>,
    pub text: TextStats,
    /// Per-channel aggregates keyed by folded channel name.
    pub channel_users: BTreeMap<String, ChannelUser>,
}

/// A user's activity scoped to a single channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelUser {
    pub channel_id: ChannelId,
    pub message_ids: Vec<MessageId>,
    pub text: TextStats,
}

impl User {
    pub(super) fn new(id: UserId, network_id: NetworkId, nick: &str) -> Self {
        Self {
            id,
            network_id,
            nick: nick.to_owned(),
            message_ids: Vec::new(),
            text: TextStats::default(),
            channel_users: BTreeMap::new(),
        }
    }

    /// Get or create the aggregate for a channel.
    pub(super) fn channel_user_mut(&mut self, key: &str, channel_id: ChannelId) -> &mut ChannelUser {
        self.channel_users
            .entry(key.to_owned())
            .or_insert_with(|| ChannelUser::new(channel_id))
    }

    /// The aggregate for a folded channel name, if this user spoke there.
    pub fn channel_user(&self, key: &str) -> Option<&ChannelUser> {
        self.channel_users.get(key)
    }

    pub(super) fn add_message(&mut self, message: &Message) {
        self.message_ids.push(message.id);
        self.text.add_message(message);
    }

    pub fn message_count(&self) -> usize {
        self.message_ids.len()
    }
}

impl ChannelUser {
    fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            message_ids: Vec::new(),
            text: TextStats::default(),
        }
    }

    pub(super) fn add_message(&mut self, message: &Message) {
        self.message_ids.push(message.id);
        self.text.add_message(message);
    }

    pub fn message_count(&self) -> usize {
        self.message_ids.len()
    }
}
