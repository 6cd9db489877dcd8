//! Per-message scalar counters.
//!
//! Every aggregate (network, channel, user, channel user) owns one
//! [`TextStats`] bundle and feeds it each message it observes.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// Word, letter and line tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicTextCounters {
    pub words: u64,
    pub letters: u64,
    pub lines: u64,
}

impl BasicTextCounters {
    pub fn add_message(&mut self, text: &str) {
        self.words += text.split_whitespace().count() as u64;
        self.letters += text.chars().filter(|c| !c.is_whitespace()).count() as u64;
        self.lines += 1;
    }

    /// Average words per line, 0 when nothing has been counted.
    pub fn words_per_line(&self) -> f64 {
        if self.lines == 0 {
            return 0.0;
        }
        self.words as f64 / self.lines as f64
    }

    /// Average letters per line, 0 when nothing has been counted.
    pub fn letters_per_line(&self) -> f64 {
        if self.lines == 0 {
            return 0.0;
        }
        self.letters as f64 / self.lines as f64
    }
}

/// The full scalar-counter bundle an aggregate owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub basic: BasicTextCounters,
    /// Words ending in `?`.
    pub questions: u64,
    /// Words ending in `!`.
    pub exclamations: u64,
    /// Messages with uppercase letters and no lowercase ones.
    pub all_caps: u64,
}

impl TextStats {
    pub fn add_message(&mut self, message: &Message) {
        let text = message.text.as_str();
        self.basic.add_message(text);
        self.questions += count_suffixes(text, '?');
        self.exclamations += count_suffixes(text, '!');
        if is_all_caps(text) {
            self.all_caps += 1;
        }
    }

    #[inline]
    pub fn words(&self) -> u64 {
        self.basic.words
    }

    #[inline]
    pub fn lines(&self) -> u64 {
        self.basic.lines
    }
}

fn count_suffixes(text: &str, suffix: char) -> u64 {
    text.split_whitespace()
        .filter(|word| word.ends_with(suffix))
        .count() as u64
}

fn is_all_caps(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        has_upper |= c.is_uppercase();
    }
    has_upper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::message::Message;
    use chanstat_proto::MessageKind;
    use chrono::Utc;

    fn msg(text: &str) -> Message {
        Message {
            id: 1,
            timestamp: Utc::now(),
            user_id: 1,
            channel_id: None,
            kind: MessageKind::Message,
            text: text.to_string(),
        }
    }

    #[test]
    fn basic_counters() {
        let mut c = BasicTextCounters::default();
        c.add_message("hello  there world");
        c.add_message("x");
        assert_eq!(c.words, 4);
        assert_eq!(c.letters, 16);
        assert_eq!(c.lines, 2);
        assert_eq!(c.words_per_line(), 2.0);
        assert_eq!(c.letters_per_line(), 8.0);
    }

    #[test]
    fn per_line_ratios_without_lines() {
        let c = BasicTextCounters::default();
        assert_eq!(c.words_per_line(), 0.0);
        assert_eq!(c.letters_per_line(), 0.0);
    }

    #[test]
    fn suffix_counts() {
        let mut stats = TextStats::default();
        stats.add_message(&msg("what? really?? no!"));
        stats.add_message(&msg("m3 !!"));
        assert_eq!(stats.questions, 2);
        assert_eq!(stats.exclamations, 2);
    }

    #[test]
    fn all_caps_detection() {
        let mut stats = TextStats::default();
        stats.add_message(&msg("STOP SHOUTING!"));
        stats.add_message(&msg("Not shouting"));
        stats.add_message(&msg("1234 !!"));
        stats.add_message(&msg("ZERO"));
        assert_eq!(stats.all_caps, 2);
    }

    #[test]
    fn empty_text_still_counts_a_line() {
        let mut stats = TextStats::default();
        stats.add_message(&msg(""));
        assert_eq!(stats.lines(), 1);
        assert_eq!(stats.words(), 0);
        assert_eq!(stats.all_caps, 0);
    }
}
