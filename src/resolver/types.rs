//! Wire types for the owner resolution service

use serde::{Deserialize, Serialize};

/// Request body for one batch
#[derive(Debug, Serialize)]
pub struct ResolveRequest<'a> {
    pub email_contexts: &'a [String],
}

/// Response body for one batch
#[derive(Debug, Deserialize)]
pub struct ResolveResponse {
    pub results: Vec<ResolvedEntry>,
}

/// One entry of a batch response
///
/// The echoed context is accepted but never trusted; results are matched to
/// the submitted contexts by position.
#[derive(Debug, Deserialize)]
pub struct ResolvedEntry {
    #[serde(default)]
    pub email_context: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,
}

impl ResolvedEntry {
    /// Trimmed owner name, `None` when absent or blank
    pub fn owner_name(&self) -> Option<String> {
        self.owner
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

/// Owner resolution for a single email context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerResult {
    /// The context exactly as submitted
    #[serde(rename = "email_context")]
    pub context: String,

    /// Resolved owner, `None` when unknown
    pub owner: Option<String>,
}

impl OwnerResult {
    pub fn new(context: impl Into<String>, owner: Option<String>) -> Self {
        Self {
            context: context.into(),
            owner,
        }
    }

    /// A result with an unknown owner
    pub fn unknown(context: impl Into<String>) -> Self {
        Self::new(context, None)
    }

    pub fn is_known(&self) -> bool {
        self.owner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let contexts = vec!["a ctx".to_string(), "b ctx".to_string()];
        let json = serde_json::to_value(ResolveRequest {
            email_contexts: &contexts,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"email_contexts": ["a ctx", "b ctx"]}));
    }

    #[test]
    fn test_response_with_null_and_missing_owner() {
        let body = r#"{"results": [
            {"email_context": "x", "owner": "Jane Doe"},
            {"email_context": "y", "owner": null},
            {"email_context": "z"}
        ]}"#;
        let parsed: ResolveResponse = serde_json::from_str(body).unwrap();
        let owners: Vec<Option<String>> = parsed.results.iter().map(|e| e.owner_name()).collect();
        assert_eq!(owners, vec![Some("Jane Doe".to_string()), None, None]);
    }

    #[test]
    fn test_owner_is_trimmed_and_blank_is_unknown() {
        let entry = ResolvedEntry {
            email_context: None,
            owner: Some("  Acme Support \n".to_string()),
        };
        assert_eq!(entry.owner_name().as_deref(), Some("Acme Support"));

        let blank = ResolvedEntry {
            email_context: None,
            owner: Some("   ".to_string()),
        };
        assert_eq!(blank.owner_name(), None);
    }

    #[test]
    fn test_response_without_results_is_rejected() {
        assert!(serde_json::from_str::<ResolveResponse>(r#"{"data": []}"#).is_err());
    }

    #[test]
    fn test_owner_result_serialization() {
        let result = OwnerResult::unknown("ctx");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"email_context": "ctx", "owner": null}));
        assert!(!result.is_known());
    }
}
