//! Raw IRC lines to ingestion events.
//!
//! Only the shape the aggregator needs is extracted: who sent the event,
//! which channel (if any) it happened in, what kind it was, and its text.
//!
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```

use chrono::{DateTime, Utc};
use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::ParseError;
use crate::kind::MessageKind;

const CTCP_DELIM: char = '\x01';

/// One observed chat event, ready for ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: MessageKind,
    /// Channel the event happened in; empty for network-wide events.
    pub channel: String,
    /// Sender hostmask (`nick!user@host`).
    pub hostmask: String,
    /// Event text with any CTCP framing removed.
    pub text: String,
    /// Server time from the IRCv3 `time` tag, if the line carried one.
    pub time: Option<DateTime<Utc>>,
}

impl Event {
    /// Parse a single raw line (trailing CR/LF allowed).
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(ParseError::EmptyLine);
        }

        let parsed = match parse_line(line) {
            Ok((_, parsed)) => parsed,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(ParseError::Malformed {
                    line: line.to_owned(),
                    position: line.len() - e.input.len(),
                });
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(ParseError::Malformed {
                    line: line.to_owned(),
                    position: line.len(),
                });
            }
        };

        let hostmask = parsed.prefix.ok_or(ParseError::MissingPrefix)?;
        let kind = MessageKind::from_command(parsed.command)
            .ok_or_else(|| ParseError::UnsupportedCommand(parsed.command.to_owned()))?;
        let time = parsed.tags.and_then(server_time);
        let params = &parsed.params;

        let (kind, channel, text) = match kind {
            MessageKind::Message | MessageKind::Action | MessageKind::Notice => {
                let command = if kind == MessageKind::Notice { "NOTICE" } else { "PRIVMSG" };
                let target = required(params, 0, command, "target")?;
                let text = required(params, 1, command, "text")?;
                match ctcp_action(text) {
                    Some(action) if kind != MessageKind::Notice => {
                        (MessageKind::Action, channel_or_empty(target), action.to_owned())
                    }
                    _ => (kind, channel_or_empty(target), text.to_owned()),
                }
            }
            MessageKind::Join => {
                let channels = required(params, 0, "JOIN", "channel")?;
                let first = channels.split(',').next().unwrap_or(channels);
                (kind, first, String::new())
            }
            MessageKind::Part | MessageKind::Topic => {
                let command = if kind == MessageKind::Part { "PART" } else { "TOPIC" };
                let channel = required(params, 0, command, "channel")?;
                (kind, channel, optional(params, 1).to_owned())
            }
            MessageKind::Kick => {
                let channel = required(params, 0, "KICK", "channel")?;
                let victim = required(params, 1, "KICK", "user")?;
                let text = match optional(params, 2) {
                    "" => victim.to_owned(),
                    reason => format!("{victim} {reason}"),
                };
                (kind, channel, text)
            }
            MessageKind::Mode => {
                let target = required(params, 0, "MODE", "target")?;
                let text = params.get(1..).map(|p| p.join(" ")).unwrap_or_default();
                (kind, channel_or_empty(target), text)
            }
            MessageKind::Quit => (kind, "", optional(params, 0).to_owned()),
            MessageKind::Nick => {
                let nick = required(params, 0, "NICK", "nickname")?;
                (kind, "", nick.to_owned())
            }
        };

        Ok(Self {
            kind,
            channel: channel.to_owned(),
            hostmask: hostmask.to_owned(),
            text,
            time,
        })
    }
}

/// Whether a message target names a channel rather than a nick.
#[inline]
pub fn is_channel_name(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

fn channel_or_empty(target: &str) -> &str {
    if is_channel_name(target) {
        target
    } else {
        ""
    }
}

fn required<'a>(
    params: &[&'a str],
    index: usize,
    command: &'static str,
    param: &'static str,
) -> Result<&'a str, ParseError> {
    params
        .get(index)
        .copied()
        .ok_or(ParseError::MissingParameter { command, param })
}

fn optional<'a>(params: &[&'a str], index: usize) -> &'a str {
    params.get(index).copied().unwrap_or("")
}

/// Extract the body of a CTCP `ACTION`, if `text` is one.
pub fn ctcp_action(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(CTCP_DELIM)?;
    let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
    let (command, rest) = match inner.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (inner, ""),
    };
    command.eq_ignore_ascii_case("ACTION").then_some(rest)
}

fn server_time(tags: &str) -> Option<DateTime<Utc>> {
    tags.split(';')
        .find_map(|tag| tag.strip_prefix("time="))
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug)]
struct ParsedLine<'a> {
    tags: Option<&'a str>,
    prefix: Option<&'a str>,
    command: &'a str,
    params: SmallVec<[&'a str; 15]>,
}

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_word = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_numeric = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    if is_word || is_numeric {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Space-separated parameters, the last one optionally `:`-prefixed.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; 15]>) {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') && params.len() < 15 {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            rest = "";
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params)
}

fn parse_line(input: &str) -> IResult<&str, ParsedLine<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input);

    Ok((
        rest,
        ParsedLine {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_handles_trailing() {
        let (rest, params) = parse_params(" #chan  :hello there");
        assert!(rest.is_empty());
        assert_eq!(params.as_slice(), &["#chan", "hello there"]);
    }

    #[test]
    fn parse_params_empty_trailing() {
        let (_, params) = parse_params(" #chan :");
        assert_eq!(params.as_slice(), &["#chan", ""]);
    }

    #[test]
    fn ctcp_action_variants() {
        assert_eq!(ctcp_action("\x01ACTION waves\x01"), Some("waves"));
        assert_eq!(ctcp_action("\x01action waves"), Some("waves"));
        assert_eq!(ctcp_action("\x01ACTION\x01"), Some(""));
        assert_eq!(ctcp_action("\x01VERSION\x01"), None);
        assert_eq!(ctcp_action("ACTION waves"), None);
    }

    #[test]
    fn server_time_tag() {
        let time = server_time("msgid=abc;time=2024-01-02T03:04:05.000Z").unwrap();
        assert_eq!(time.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert!(server_time("msgid=abc").is_none());
        assert!(server_time("time=yesterday").is_none());
    }

    #[test]
    fn channel_names() {
        assert!(is_channel_name("#rust"));
        assert!(is_channel_name("&local"));
        assert!(!is_channel_name("nick"));
        assert!(!is_channel_name(""));
    }
}
