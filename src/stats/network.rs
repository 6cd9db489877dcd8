//! Network aggregate: the top-level scope for one chat network.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::counters::TextStats;
use super::message::Message;
use super::tokens::{TokenCounter, TopToken};
use super::{ChannelId, MessageId, NetworkId, UserId};

/// Everything observed on one network.
///
/// The network resolves channel and user names to ids; the entities
/// themselves live in the [`Stats`](super::Stats) tables. The name maps are
/// derived from those tables and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub channel_ids: Vec<ChannelId>,
    pub user_ids: Vec<UserId>,
    pub message_ids: Vec<MessageId>,
    pub text: TextStats,
    pub urls: TokenCounter,
    pub words: TokenCounter,

    /// Folded channel name -> channel id.
    #[serde(skip)]
    channels: HashMap<String, ChannelId>,
    /// Folded nick -> user id.
    #[serde(skip)]
    users: HashMap<String, UserId>,
}

impl Network {
    pub(super) fn new(id: NetworkId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            channel_ids: Vec::new(),
            user_ids: Vec::new(),
            message_ids: Vec::new(),
            text: TextStats::default(),
            urls: TokenCounter::urls(),
            words: TokenCounter::words(),
            channels: HashMap::new(),
            users: HashMap::new(),
        }
    }

    /// Look up a channel id by its folded name.
    pub fn channel_id(&self, key: &str) -> Option<ChannelId> {
        self.channels.get(key).copied()
    }

    /// Look up a user id by folded nick.
    pub fn user_id(&self, key: &str) -> Option<UserId> {
        self.users.get(key).copied()
    }

    pub(super) fn add_channel(&mut self, key: String, id: ChannelId) {
        self.channels.insert(key, id);
        self.channel_ids.push(id);
    }

    pub(super) fn add_user(&mut self, key: String, id: UserId) {
        self.users.insert(key, id);
        self.user_ids.push(id);
    }

    /// Re-register a channel name after a snapshot load. Returns `false` if
    /// the name was already taken by another channel.
    pub(super) fn index_channel(&mut self, key: String, id: ChannelId) -> bool {
        self.channels.insert(key, id).is_none_or(|prev| prev == id)
    }

    /// Re-register a nick after a snapshot load. Returns `false` if the
    /// nick was already taken by another user.
    pub(super) fn index_user(&mut self, key: String, id: UserId) -> bool {
        self.users.insert(key, id).is_none_or(|prev| prev == id)
    }

    pub(super) fn clear_indexes(&mut self) {
        self.channels.clear();
        self.users.clear();
    }

    pub(super) fn add_message(&mut self, message: &Message) {
        self.message_ids.push(message.id);
        self.text.add_message(message);
        self.urls.add_text(&message.text);
        self.words.add_text(&message.text);
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
