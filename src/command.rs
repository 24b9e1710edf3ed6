use crate::error::RconError;

/// A command with a typed response, run through
/// [`Client::execute_typed`](crate::client::Client::execute_typed).
///
/// The client treats both halves as opaque: whatever `build` returns is sent
/// verbatim and the raw response body is handed to `parse`.
pub trait Command {
    type Output;
    /// Anything `parse` can fail with. Must absorb transport failures too.
    type Error: From<RconError>;

    fn build(&self) -> String;

    fn parse(&self, response: &str) -> Result<Self::Output, Self::Error>;
}

/// Rejects blank identifiers before they reach a server.
pub(crate) fn require_name(value: &str, what: &str) -> Result<(), RconError> {
    if value.trim().is_empty() {
        return Err(RconError::Validation(format!("{what} cannot be empty")));
    }
    Ok(())
}

/// Case-insensitive substring search, the way servers' free-text replies
/// are matched.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
