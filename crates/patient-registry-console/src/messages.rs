//! Friendly messages for failed console queries.
//!
//! Classification is plain substring matching on the engine's message. It
//! exists for display only; nothing branches on it.

use patient_registry_core::QueryResult;

/// Shown when the engine's message looks like a parse failure.
pub const MALFORMED_QUERY_MESSAGE: &str = "Please write a proper SQL query.";

/// Shown for every other failure.
pub const INVALID_QUERY_MESSAGE: &str = "Query not valid";

const SYNTAX_MARKERS: &[&str] = &["syntax error", "unexpected", "parse error"];

/// Coarse category of a console failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFailure {
    Syntax,
    Other,
}

impl QueryFailure {
    pub fn classify(error: &str) -> Self {
        if SYNTAX_MARKERS.iter().any(|marker| error.contains(marker)) {
            QueryFailure::Syntax
        } else {
            QueryFailure::Other
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            QueryFailure::Syntax => MALFORMED_QUERY_MESSAGE,
            QueryFailure::Other => INVALID_QUERY_MESSAGE,
        }
    }
}

/// Replace a failed envelope's error with its friendly message.
/// Successful envelopes pass through untouched.
pub fn present(result: QueryResult) -> QueryResult {
    match result.error.as_deref() {
        Some(error) if !result.success => {
            QueryResult::failed(QueryFailure::classify(error).message())
        }
        _ => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            QueryFailure::classify("near \"SELEC\": syntax error"),
            QueryFailure::Syntax
        );
        assert_eq!(
            QueryFailure::classify("unexpected end of input"),
            QueryFailure::Syntax
        );
        assert_eq!(
            QueryFailure::classify("no such table: visits"),
            QueryFailure::Other
        );
        // Case-sensitive, as the markers are matched verbatim
        assert_eq!(QueryFailure::classify("SYNTAX ERROR"), QueryFailure::Other);
    }

    #[test]
    fn test_present_failed() {
        let presented = present(QueryResult::failed("near \"SELEC\": syntax error"));
        assert!(!presented.success);
        assert_eq!(presented.error.as_deref(), Some(MALFORMED_QUERY_MESSAGE));

        let presented = present(QueryResult::failed("no such table: visits"));
        assert_eq!(presented.error.as_deref(), Some(INVALID_QUERY_MESSAGE));
    }

    #[test]
    fn test_present_success_untouched() {
        let ok = QueryResult::ok(Vec::new());
        assert_eq!(present(ok.clone()), ok);
    }
}
