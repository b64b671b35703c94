/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The message was blocked by content moderation.
    Moderated,
    /// The backend is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}
