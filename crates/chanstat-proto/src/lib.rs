//! # chanstat-proto
//!
//! The chat-protocol side of chanstat: turning raw IRC lines into the
//! `(kind, channel, hostmask, time, text)` events the aggregator ingests.
//!
//! ```rust
//! use chanstat_proto::{Event, MessageKind};
//!
//! let event = Event::parse(":alice!a@example.org PRIVMSG #rust :hello").unwrap();
//! assert_eq!(event.kind, MessageKind::Message);
//! assert_eq!(event.channel, "#rust");
//! assert_eq!(chanstat_proto::nick_of(&event.hostmask), "alice");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod error;
pub mod event;
pub mod hostmask;
pub mod kind;

pub use self::casemap::CaseMapping;
pub use self::error::ParseError;
pub use self::event::{ctcp_action, is_channel_name, Event};
pub use self::hostmask::nick_of;
pub use self::kind::MessageKind;
