//! IRC case mapping.
//!
//! Networks, channels and nicks are looked up case-insensitively. Which
//! characters count as "the same letter" depends on the network's
//! advertised `CASEMAPPING`: plain `ascii`, or the traditional `rfc1459`
//! where `[]\~` are the lowercase forms of `{}|^`. Non-ASCII letters fold
//! to their Unicode lowercase form under either mapping.

use std::fmt;

/// The case mapping used to fold names into lookup keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CaseMapping {
    /// `A-Z` fold to `a-z`.
    Ascii,
    /// ASCII folding plus `[` → `{`, `]` → `}`, `\` → `|`, `~` → `^`.
    #[default]
    Rfc1459,
}

impl CaseMapping {
    /// Fold a single ASCII character. Anything else is returned unchanged.
    #[inline]
    const fn fold_ascii(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (CaseMapping::Rfc1459, '[') => '{',
            (CaseMapping::Rfc1459, ']') => '}',
            (CaseMapping::Rfc1459, '\\') => '|',
            (CaseMapping::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Fold a name into its lookup key.
    pub fn fold(self, s: &str) -> String {
        let mut folded = String::with_capacity(s.len());
        for c in s.chars() {
            if c.is_ascii() {
                folded.push(self.fold_ascii(c));
            } else {
                folded.extend(c.to_lowercase());
            }
        }
        folded
    }

    /// The `CASEMAPPING` token for this mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMapping::Ascii => "ascii",
            CaseMapping::Rfc1459 => "rfc1459",
        }
    }
}

impl fmt::Display for CaseMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
