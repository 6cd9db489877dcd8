//! The aggregate graph: networks, channels, users and messages.
//!
//! [`Stats`] is the root. It owns the authoritative id-indexed tables and
//! the id counters; each [`Network`] resolves channel and user names to ids
//! within its scope. Name indexes are derived state: they are skipped when
//! serializing and rebuilt from the tables by [`Stats::rebuild_indexes`].
//!
//! `Stats` has no internal locking. Share it as [`SharedStats`] and pick the
//! lock scope at the call site: hold one write guard across a batch of
//! [`Stats::add_message`] calls, and any guard while saving.

mod channel;
mod counters;
mod message;
mod network;
mod snapshot;
mod tokens;
mod user;

pub use channel::Channel;
pub use counters::{BasicTextCounters, TextStats};
pub use message::Message;
pub use network::Network;
pub use tokens::{TokenCounter, TokenKind, TopToken, is_url};
pub use user::{ChannelUser, User};

use chanstat_proto::{CaseMapping, MessageKind, nick_of};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::error::SnapshotError;

pub type NetworkId = u64;
pub type ChannelId = u64;
pub type UserId = u64;
pub type MessageId = u64;

/// The aggregate root, shared between ingestion and persistence.
pub type SharedStats = Arc<RwLock<Stats>>;

/// Root of the aggregate graph.
#[derive(Debug, Serialize, Deserialize)]
pub struct Stats {
    casemapping: CaseMapping,

    networks: BTreeMap<NetworkId, Network>,
    channels: BTreeMap<ChannelId, Channel>,
    users: BTreeMap<UserId, User>,
    messages: BTreeMap<MessageId, Message>,

    network_id_count: NetworkId,
    channel_id_count: ChannelId,
    user_id_count: UserId,
    message_id_count: MessageId,

    /// Folded network name -> network id.
    #[serde(skip)]
    network_by_name: HashMap<String, NetworkId>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    /// An empty graph with every id counter seeded at 1.
    pub fn new() -> Self {
        Self::with_casemapping(CaseMapping::default())
    }

    pub fn with_casemapping(casemapping: CaseMapping) -> Self {
        Self {
            casemapping,
            networks: BTreeMap::new(),
            channels: BTreeMap::new(),
            users: BTreeMap::new(),
            messages: BTreeMap::new(),
            network_id_count: 1,
            channel_id_count: 1,
            user_id_count: 1,
            message_id_count: 1,
            network_by_name: HashMap::new(),
        }
    }

    /// Wrap in the shared lock.
    pub fn into_shared(self) -> SharedStats {
        Arc::new(RwLock::new(self))
    }

    pub fn casemapping(&self) -> CaseMapping {
        self.casemapping
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Record one observed event.
    ///
    /// Resolves (creating on first sight) the network, the user behind
    /// `hostmask`, and, when `channel` is non-empty, the channel and the
    /// user's per-channel aggregate. The message then fans out to every
    /// aggregate that observes it. An empty `channel` touches only the
    /// network and the user.
    pub fn add_message(
        &mut self,
        kind: MessageKind,
        network: &str,
        channel: &str,
        hostmask: &str,
        timestamp: DateTime<Utc>,
        text: &str,
    ) -> MessageId {
        let network_id = self.resolve_network(network);
        let user_id = self.resolve_user(network_id, nick_of(hostmask));
        let channel = if channel.is_empty() {
            None
        } else {
            let channel_id = self.resolve_channel(network_id, channel);
            Some((channel_id, self.casemapping.fold(channel)))
        };

        let id = self.message_id_count;
        self.message_id_count += 1;

        let message = Message {
            id,
            timestamp,
            user_id,
            channel_id: channel.as_ref().map(|(channel_id, _)| *channel_id),
            kind,
            text: text.to_owned(),
        };

        if let Some((channel_id, key)) = &channel {
            if let Some(c) = self.channels.get_mut(channel_id) {
                c.add_message(&message);
            }
            if let Some(u) = self.users.get_mut(&user_id) {
                u.channel_user_mut(key, *channel_id).add_message(&message);
            }
        }
        if let Some(n) = self.networks.get_mut(&network_id) {
            n.add_message(&message);
        }
        if let Some(u) = self.users.get_mut(&user_id) {
            u.add_message(&message);
        }

        self.messages.insert(id, message);
        id
    }

    fn resolve_network(&mut self, name: &str) -> NetworkId {
        let key = self.casemapping.fold(name);
        if let Some(id) = self.network_by_name.get(&key) {
            return *id;
        }

        let id = self.network_id_count;
        self.network_id_count += 1;
        self.networks.insert(id, Network::new(id, name));
        self.network_by_name.insert(key, id);
        debug!(network = %name, id, "New network");
        id
    }

    fn resolve_user(&mut self, network_id: NetworkId, nick: &str) -> UserId {
        let key = self.casemapping.fold(nick);
        let Some(network) = self.networks.get_mut(&network_id) else {
            return 0;
        };
        if let Some(id) = network.user_id(&key) {
            return id;
        }

        let id = self.user_id_count;
        self.user_id_count += 1;
        network.add_user(key, id);
        self.users.insert(id, User::new(id, network_id, nick));
        debug!(network = %network.name, nick = %nick, id, "New user");
        id
    }

    fn resolve_channel(&mut self, network_id: NetworkId, name: &str) -> ChannelId {
        let key = self.casemapping.fold(name);
        let Some(network) = self.networks.get_mut(&network_id) else {
            return 0;
        };
        if let Some(id) = network.channel_id(&key) {
            return id;
        }

        let id = self.channel_id_count;
        self.channel_id_count += 1;
        network.add_channel(key, id);
        self.channels.insert(id, Channel::new(id, network_id, name));
        debug!(network = %network.name, channel = %name, id, "New channel");
        id
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a network by name (case-insensitive).
    pub fn network(&self, name: &str) -> Option<&Network> {
        let id = self.network_by_name.get(&self.casemapping.fold(name))?;
        self.networks.get(id)
    }

    /// Look up a channel of a network by name.
    pub fn channel(&self, network: &str, channel: &str) -> Option<&Channel> {
        let id = self
            .network(network)?
            .channel_id(&self.casemapping.fold(channel))?;
        self.channels.get(&id)
    }

    /// Look up a user of a network by nick.
    pub fn user(&self, network: &str, nick: &str) -> Option<&User> {
        let id = self
            .network(network)?
            .user_id(&self.casemapping.fold(nick))?;
        self.users.get(&id)
    }

    /// Look up a user's aggregate for one channel.
    pub fn channel_user(&self, network: &str, nick: &str, channel: &str) -> Option<&ChannelUser> {
        self.user(network, nick)?
            .channel_user(&self.casemapping.fold(channel))
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(&id)
    }

    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    // ========================================================================
    // Derived indexes
    // ========================================================================

    /// Rebuild every name index from the authoritative tables.
    ///
    /// Fails if an entity references a network that does not exist, two
    /// entities fold to the same name in one scope, or an id counter would
    /// hand out an id that is already taken.
    pub fn rebuild_indexes(&mut self) -> Result<(), SnapshotError> {
        self.network_by_name.clear();

        for (id, network) in &mut self.networks {
            if network.id != *id {
                return Err(integrity(format!(
                    "network {} stored under id {id}",
                    network.id
                )));
            }
            network.clear_indexes();
            let key = self.casemapping.fold(&network.name);
            if self.network_by_name.insert(key, *id).is_some() {
                return Err(integrity(format!("duplicate network name {}", network.name)));
            }
        }

        for (id, channel) in &self.channels {
            let network = self.networks.get_mut(&channel.network_id).ok_or_else(|| {
                integrity(format!(
                    "channel {id} references missing network {}",
                    channel.network_id
                ))
            })?;
            if !network.index_channel(self.casemapping.fold(&channel.name), *id) {
                return Err(integrity(format!(
                    "duplicate channel {} on network {}",
                    channel.name, network.name
                )));
            }
        }

        for (id, user) in &self.users {
            let network = self.networks.get_mut(&user.network_id).ok_or_else(|| {
                integrity(format!(
                    "user {id} references missing network {}",
                    user.network_id
                ))
            })?;
            if !network.index_user(self.casemapping.fold(&user.nick), *id) {
                return Err(integrity(format!(
                    "duplicate nick {} on network {}",
                    user.nick, network.name
                )));
            }
        }

        let counters = [
            ("network", self.network_id_count, self.networks.keys().next_back()),
            ("channel", self.channel_id_count, self.channels.keys().next_back()),
            ("user", self.user_id_count, self.users.keys().next_back()),
            ("message", self.message_id_count, self.messages.keys().next_back()),
        ];
        for (kind, next, max) in counters {
            if let Some(max) = max
                && next <= *max
            {
                return Err(integrity(format!(
                    "next {kind} id {next} is not above highest stored id {max}"
                )));
            }
        }

        Ok(())
    }
}

fn integrity(msg: String) -> SnapshotError {
    SnapshotError::Integrity(msg)
}
