//! Async facade over the callback-based LUIS SDK.
//!
//! The SDK completes each request by invoking exactly one of two callbacks
//! exactly once. [`LuisClient`] adapts that into awaitable calls by parking
//! a oneshot sender in a take-once slot shared by both callback branches,
//! then retains the most recent recognition result for the synchronous
//! [`intent`](LuisClient::intent) / [`entity`](LuisClient::entity)
//! accessors.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::{LuisError, Result};
use crate::response::LuisResponse;
use crate::transport::{OnFailure, OnSuccess, Transport, TransportError};

/// Configuration for a LUIS application. Immutable after construction.
#[derive(Debug, Clone)]
pub struct LuisConfig {
    app_id: String,
    app_key: String,
    verbose: bool,
}

impl LuisConfig {
    /// Create a config for the given LUIS app.
    ///
    /// `app_id` is the GUID of the app (obtained at luis.ai), `app_key` the
    /// subscription key from the Azure portal. The verbose flag defaults to
    /// `true`; leave it there unless you have a reason not to.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            verbose: true,
        }
    }

    /// Override the verbose flag. Verbose queries return the full ranked
    /// intent list and enable the transport's diagnostic logging; the flag
    /// has no effect on the facade's own behavior.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Create from the `LUIS_APP_ID` and `LUIS_APP_KEY` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        let app_id = std::env::var("LUIS_APP_ID")
            .map_err(|_| LuisError::Config("LUIS_APP_ID environment variable not set".into()))?;
        let app_key = std::env::var("LUIS_APP_KEY")
            .map_err(|_| LuisError::Config("LUIS_APP_KEY environment variable not set".into()))?;
        Ok(Self::new(app_id, app_key))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Async LUIS client.
///
/// Cheap to clone; clones share the retained response. Only
/// [`send`](Self::send) touches that shared state. Overlapping `send`
/// calls on one instance race, and the final stored result is whichever
/// completes last. Serialize `send` calls if order matters.
#[derive(Clone)]
pub struct LuisClient {
    config: LuisConfig,
    transport: Arc<dyn Transport>,
    response: Arc<Mutex<Option<LuisResponse>>>,
}

impl LuisClient {
    /// Create a client from a config and a transport. No network activity
    /// happens here.
    pub fn new(config: LuisConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            response: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &LuisConfig {
        &self.config
    }

    pub fn app_id(&self) -> &str {
        self.config.app_id()
    }

    pub fn app_key(&self) -> &str {
        self.config.app_key()
    }

    pub fn verbose(&self) -> bool {
        self.config.verbose()
    }

    /// Send `text` to LUIS and await the recognition result.
    ///
    /// The text is passed to the transport unvalidated and unnormalized.
    /// Resolves with the success payload or fails with the transport's
    /// failure payload unchanged. There is no retry or timeout: a transport
    /// that never completes leaves this future pending indefinitely.
    pub async fn predict(&self, text: &str) -> Result<LuisResponse> {
        tracing::debug!(utterance = %text, "sending utterance to LUIS");
        let (on_success, on_failure, done) = completion_pair();
        self.transport.predict(text, on_success, on_failure);
        finish(done).await
    }

    /// Continue a multi-turn dialog.
    ///
    /// `prior` is a previous response carrying the dialog's continuation
    /// state; `force_set_parameter_name` sets the `forceset` parameter in
    /// the LUIS URL and is forwarded verbatim.
    pub async fn reply(
        &self,
        text: &str,
        prior: &LuisResponse,
        force_set_parameter_name: Option<&str>,
    ) -> Result<LuisResponse> {
        tracing::debug!(utterance = %text, "continuing LUIS dialog");
        let (on_success, on_failure, done) = completion_pair();
        self.transport
            .reply(text, prior, on_success, on_failure, force_set_parameter_name);
        finish(done).await
    }

    /// Send `text` to LUIS and retain the response inside this instance for
    /// [`intent`](Self::intent) and [`entity`](Self::entity).
    ///
    /// The previously retained response is erased as soon as the new
    /// submission starts. If the submission fails, the error propagates and
    /// the retained state stays empty; the old response is not restored.
    pub async fn send(&self, text: &str) -> Result<()> {
        // Erase the previous response and re-query the server.
        *self.response.lock().unwrap() = None;
        let response = self.predict(text).await?;
        *self.response.lock().unwrap() = Some(response);
        Ok(())
    }

    /// Name of the top scoring intent from the retained response, e.g.
    /// `"None"`.
    ///
    /// Fails with [`LuisError::NoResponse`] until a `send` has completed
    /// successfully.
    pub fn intent(&self) -> Result<String> {
        let response = self.response.lock().unwrap();
        response
            .as_ref()
            .and_then(|r| r.top_scoring_intent.as_ref())
            .map(|top| top.intent.clone())
            .ok_or(LuisError::NoResponse)
    }

    /// Value of the first entity of the given type from the retained
    /// response, or `None` if no such entity was recognized.
    ///
    /// If there are multiple entities of that type, only the first is
    /// returned. The canonical resolution takes precedence over the raw
    /// recognized span. Same precondition as [`intent`](Self::intent).
    pub fn entity(&self, entity_type: &str) -> Result<Option<String>> {
        let response = self.response.lock().unwrap();
        let response = response
            .as_ref()
            .filter(|r| r.top_scoring_intent.is_some())
            .ok_or(LuisError::NoResponse)?;
        Ok(response
            .first_entity(entity_type)
            .map(|entity| entity.value().to_string()))
    }

    /// The retained response, if any. `None` while a `send` is in flight or
    /// after one has failed.
    pub fn last_response(&self) -> Option<LuisResponse> {
        self.response.lock().unwrap().clone()
    }
}

type Completion = oneshot::Receiver<std::result::Result<LuisResponse, TransportError>>;

/// Bridge the SDK's two-branch callback contract into a single oneshot.
///
/// The sender lives in a take-once slot shared by both branches, so a
/// transport that violates the exactly-once contract resolves nothing
/// twice: the late branch finds the slot empty and is dropped with a
/// warning.
fn completion_pair() -> (OnSuccess, OnFailure, Completion) {
    let (tx, rx) = oneshot::channel();
    let slot = Arc::new(Mutex::new(Some(tx)));
    let failure_slot = Arc::clone(&slot);

    let on_success: OnSuccess = Box::new(move |response| {
        match slot.lock().unwrap().take() {
            // The receiver may already be gone if the caller stopped
            // waiting; that is fine.
            Some(tx) => {
                let _ = tx.send(Ok(response));
            }
            None => tracing::warn!("LUIS transport invoked a second completion callback; ignored"),
        }
    });

    let on_failure: OnFailure = Box::new(move |failure| {
        match failure_slot.lock().unwrap().take() {
            Some(tx) => {
                let _ = tx.send(Err(failure));
            }
            None => tracing::warn!("LUIS transport invoked a second completion callback; ignored"),
        }
    });

    (on_success, on_failure, rx)
}

async fn finish(done: Completion) -> Result<LuisResponse> {
    match done.await {
        Ok(Ok(response)) => {
            tracing::debug!(
                intent = response
                    .top_scoring_intent
                    .as_ref()
                    .map(|top| top.intent.as_str()),
                "LUIS responded"
            );
            Ok(response)
        }
        Ok(Err(failure)) => Err(LuisError::Transport(failure)),
        // Both callbacks were dropped without firing.
        Err(_) => Err(LuisError::Disconnected),
    }
}
