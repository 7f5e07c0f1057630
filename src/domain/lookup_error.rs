use serde_json::{json, Map, Value};

pub const RAW_EXCERPT_CHAR_LIMIT: usize = 500;

const UNSTRUCTURED_HINT: &str =
    "Check that the company exists and that the API key still has quota remaining.";

/// Everything that can stop a lookup from producing a [`super::CompanyRecord`].
///
/// Only `ClientInput` is reported with a non-200 status; every other kind is
/// rendered into the response body by [`LookupError::to_payload`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{0}")]
    ClientInput(String),
    #[error("provider is not configured: {0}")]
    Configuration(String),
    #[error("provider call failed: {0}")]
    ProviderCall(String),
    #[error("provider call timed out: {0}")]
    Timeout(String),
    #[error("no structured record in provider response")]
    UnstructuredResponse { excerpt: String },
    #[error("provider returned an empty response")]
    EmptyResponse { reason: Option<String> },
}

impl LookupError {
    pub fn unstructured(raw: &str) -> Self {
        LookupError::UnstructuredResponse {
            excerpt: raw.chars().take(RAW_EXCERPT_CHAR_LIMIT).collect(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, LookupError::ClientInput(_))
    }

    pub fn to_payload(&self) -> Value {
        let (error, details, reason) = match self {
            LookupError::ClientInput(message) => (message.as_str(), None, None),
            LookupError::Configuration(missing) => {
                ("Provider is not configured", Some(missing.as_str()), None)
            }
            LookupError::ProviderCall(cause) => {
                ("Provider call failed", Some(cause.as_str()), None)
            }
            LookupError::Timeout(cause) => ("Provider call timed out", Some(cause.as_str()), None),
            LookupError::UnstructuredResponse { excerpt } => (
                "Could not extract structured company data",
                Some(excerpt.as_str()),
                Some(UNSTRUCTURED_HINT),
            ),
            LookupError::EmptyResponse { reason } => (
                "Provider returned an empty response",
                None,
                reason.as_deref(),
            ),
        };

        let mut payload = Map::new();
        payload.insert("error".to_string(), json!(error));
        if let Some(details) = details {
            payload.insert("details".to_string(), json!(details));
        }
        if let Some(reason) = reason {
            payload.insert("reason".to_string(), json!(reason));
        }
        Value::Object(payload)
    }
}

/// The request URL is dropped: it can carry credentials as query parameters.
impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            LookupError::Timeout(e.to_string())
        } else {
            LookupError::ProviderCall(e.to_string())
        }
    }
}
