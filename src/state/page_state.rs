/// Page state definitions for tracking crawl progress
///
/// Every URL the crawler takes off the frontier ends in exactly one terminal
/// state; the counts per state make up the crawl statistics.
use serde::Serialize;
use std::fmt;

/// Represents how the crawl finished with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Terminal Success States =====
    /// Page was successfully fetched and its content collected
    Processed,

    // ===== Terminal Skip States =====
    /// Page is excluded by the site's robots.txt - never fetched
    Disallowed,

    /// Page redirected to a URL that was already visited - not collected again
    Duplicate,

    // ===== Terminal Error States =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned another non-2xx status
    HttpError,

    /// Page could not be reached (timeout, connection refused, DNS, TLS)
    Unreachable,

    /// Page Content-Type is not textual
    ContentMismatch,

    /// Page fetch failed for other reasons (body decoding, redirect limit, etc.)
    Failed,
}

impl PageState {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the page was skipped without being collected
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Disallowed | Self::Duplicate)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DeadLink
                | Self::HttpError
                | Self::Unreachable
                | Self::ContentMismatch
                | Self::Failed
        )
    }

    /// Stable lowercase name used in logs and statistics output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Disallowed => "disallowed",
            Self::Duplicate => "duplicate",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [PageState; 8] = [
        PageState::Processed,
        PageState::Disallowed,
        PageState::Duplicate,
        PageState::DeadLink,
        PageState::HttpError,
        PageState::Unreachable,
        PageState::ContentMismatch,
        PageState::Failed,
    ];

    #[test]
    fn test_terminal_states_partition() {
        // Every terminal state is exactly one of success, skip or error
        for state in ALL_STATES {
            let kinds = [state.is_success(), state.is_skipped(), state.is_error()];
            assert_eq!(
                kinds.iter().filter(|k| **k).count(),
                1,
                "{:?} must have exactly one kind",
                state
            );
        }
    }

    #[test]
    fn test_disallowed_is_not_an_error() {
        assert!(PageState::Disallowed.is_skipped());
        assert!(!PageState::Disallowed.is_error());
        assert!(PageState::Duplicate.is_skipped());
        assert!(!PageState::Duplicate.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Processed), "processed");
        assert_eq!(format!("{}", PageState::DeadLink), "dead_link");
        assert_eq!(format!("{}", PageState::ContentMismatch), "content_mismatch");
    }

    #[test]
    fn test_serialize_matches_display() {
        for state in ALL_STATES {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }
}
