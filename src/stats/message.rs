//! The immutable message record.

use chanstat_proto::MessageKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChannelId, MessageId, UserId};

/// One observed chat event. Created once by [`Stats::add_message`] and
/// never modified afterwards.
///
/// [`Stats::add_message`]: super::Stats::add_message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    /// `None` for network-wide events such as `QUIT`.
    pub channel_id: Option<ChannelId>,
    pub kind: MessageKind,
    pub text: String,
}
