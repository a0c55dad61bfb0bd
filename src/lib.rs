//! Async client facade for the Microsoft LUIS natural-language service.
//!
//! The LUIS SDK completes every request through a pair of callbacks
//! (`onSuccess` / `onFailure`), exactly one of which fires exactly once.
//! This crate adapts that contract into ordinary awaitable calls: submit an
//! utterance, await the structured recognition result, then read the top
//! intent and entity values off the retained response.
//!
//! ## Architecture
//!
//! ```text
//! send(text) → Transport (callback SDK) → oneshot → retained LuisResponse
//!                                                    ├─ intent()
//!                                                    └─ entity(type)
//! ```
//!
//! The transport is an injected collaborator behind the [`Transport`] trait;
//! this crate performs no network I/O of its own and adds no retry, timeout,
//! or cancellation logic on top of what the transport provides.

pub mod client;
pub mod error;
pub mod response;
pub mod transport;


// Re-exports for convenience
pub use client::{LuisClient, LuisConfig};
pub use error::{LuisError, Result};
pub use response::{
    DialogState, Entity, EntityResolution, IntentScore, LuisResponse, TopScoringIntent,
};
pub use transport::{OnFailure, OnSuccess, Transport, TransportError};
