//! Hostmask handling.
//!
//! A hostmask identifies the sender of an event as `nick!user@host`. Event
//! sources are not always strict about the format, so only the nick is
//! extracted and a bare nick is accepted.

/// Borrow the nick portion of a hostmask without allocating.
///
/// Everything before the first `!` or `@` is the nick; an empty hostmask
/// yields an empty nick.
#[inline]
pub fn nick_of(hostmask: &str) -> &str {
    let end = hostmask.find(['!', '@']).unwrap_or(hostmask.len());
    &hostmask[..end]
}
