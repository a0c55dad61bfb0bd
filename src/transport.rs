//! Transport seam for the wrapped LUIS SDK.
//!
//! The facade never talks to the network itself. Everything below the
//! callback contract (HTTP, authentication, retries, the LUIS URL scheme)
//! belongs to the transport implementation supplied by the caller.

use serde_json::Value;
use thiserror::Error;

use crate::response::LuisResponse;

/// Success completion callback. Receives the parsed recognition result.
pub type OnSuccess = Box<dyn FnOnce(LuisResponse) + Send>;

/// Failure completion callback. Receives the service's failure payload.
pub type OnFailure = Box<dyn FnOnce(TransportError) + Send>;

/// The external collaborator performing the actual recognition call.
///
/// Contract (inherited from the wrapped SDK, not enforced here): each call
/// invokes exactly one of the two callbacks, exactly once, eventually or
/// never. There is no completion deadline; a transport that never completes
/// leaves the caller's await pending indefinitely.
pub trait Transport: Send + Sync {
    /// Submit `text` for intent recognition.
    fn predict(&self, text: &str, on_success: OnSuccess, on_failure: OnFailure);

    /// Continue a multi-turn dialog.
    ///
    /// `prior` carries the continuation state of the running dialog (the
    /// transport extracts what it needs, e.g. `dialog.contextId`).
    /// `force_set_parameter_name` sets the `forceset` parameter in the LUIS
    /// URL; it is forwarded verbatim and otherwise uninterpreted.
    fn reply(
        &self,
        text: &str,
        prior: &LuisResponse,
        on_success: OnSuccess,
        on_failure: OnFailure,
        force_set_parameter_name: Option<&str>,
    );
}

/// Failure payload delivered by a transport's `on_failure` callback.
///
/// Forwarded unchanged to whoever awaited the submission. `payload` holds
/// whatever document the service returned alongside the failure, if any.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub payload: Option<Value>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(message: impl Into<String>, payload: Value) -> Self {
        Self {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_uses_message() {
        let err = TransportError::new("LUIS returned 401");
        assert_eq!(err.to_string(), "LUIS returned 401");
        assert!(err.payload.is_none());
    }

    #[test]
    fn test_payload_is_carried_verbatim() {
        let err = TransportError::with_payload(
            "LUIS returned 429",
            json!({ "statusCode": 429, "message": "quota exceeded" }),
        );
        assert_eq!(
            err.payload,
            Some(json!({ "statusCode": 429, "message": "quota exceeded" }))
        );
    }
}
