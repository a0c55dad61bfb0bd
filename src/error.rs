//! Error taxonomy for the facade.

use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, LuisError>;

#[derive(Debug, Error)]
pub enum LuisError {
    /// The transport's failure callback fired; the payload is forwarded
    /// unchanged.
    #[error("LUIS transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The transport dropped both completion callbacks without invoking
    /// either, violating the exactly-once contract.
    #[error("LUIS transport dropped the request without completing it")]
    Disconnected,

    /// An accessor was called before any successful submission.
    #[error("no LUIS response yet; make sure to await send(text) first")]
    NoResponse,

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
