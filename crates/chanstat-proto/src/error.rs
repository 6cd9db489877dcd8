//! Error types for event parsing.

use thiserror::Error;

/// Errors produced when a raw line cannot become an ingestion event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The line was empty (or only whitespace).
    #[error("empty line")]
    EmptyLine,

    /// The line did not follow `[@tags] [:prefix] COMMAND params`.
    #[error("malformed line at position {position}: {line}")]
    Malformed {
        /// The offending line.
        line: String,
        /// Byte offset where parsing stopped.
        position: usize,
    },

    /// Events must carry a sender prefix.
    #[error("missing sender prefix")]
    MissingPrefix,

    /// The command is valid IRC but not something the aggregator counts.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// A required parameter was missing.
    #[error("{command} is missing its {param} parameter")]
    MissingParameter {
        /// The command being parsed.
        command: &'static str,
        /// Name of the missing parameter.
        param: &'static str,
    },
}
