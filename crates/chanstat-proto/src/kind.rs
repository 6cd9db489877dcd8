//! Kinds of chat events the aggregator observes.

use std::fmt;

/// The kind of an observed chat event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// A regular `PRIVMSG`.
    Message,
    /// A CTCP `ACTION` (`/me`) carried inside a `PRIVMSG`.
    Action,
    /// A `NOTICE`.
    Notice,
    /// A `JOIN`.
    Join,
    /// A `PART`.
    Part,
    /// A `QUIT`. Never carries a channel.
    Quit,
    /// A `KICK`.
    Kick,
    /// A `MODE` change.
    Mode,
    /// A `NICK` change. Never carries a channel.
    Nick,
    /// A `TOPIC` change.
    Topic,
}

impl MessageKind {
    /// Map an IRC command word to the kind it produces.
    ///
    /// `PRIVMSG` maps to [`MessageKind::Message`]; whether it is really an
    /// action is decided by looking at the body.
    pub fn from_command(command: &str) -> Option<Self> {
        let kind = match command.to_ascii_uppercase().as_str() {
            "PRIVMSG" => Self::Message,
            "NOTICE" => Self::Notice,
            "JOIN" => Self::Join,
            "PART" => Self::Part,
            "QUIT" => Self::Quit,
            "KICK" => Self::Kick,
            "MODE" => Self::Mode,
            "NICK" => Self::Nick,
            "TOPIC" => Self::Topic,
            _ => return None,
        };
        Some(kind)
    }

    /// A static label, used for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Action => "action",
            Self::Notice => "notice",
            Self::Join => "join",
            Self::Part => "part",
            Self::Quit => "quit",
            Self::Kick => "kick",
            Self::Mode => "mode",
            Self::Nick => "nick",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_command_is_case_insensitive() {
        assert_eq!(MessageKind::from_command("privmsg"), Some(MessageKind::Message));
        assert_eq!(MessageKind::from_command("Kick"), Some(MessageKind::Kick));
        assert_eq!(MessageKind::from_command("PING"), None);
    }

    #[test]
    fn action_has_no_command_word() {
        assert_eq!(MessageKind::from_command("ACTION"), None);
    }

}
