//! Simbridge library crate (used by the server binary and integration tests).
//!
//! Simbridge sits between web clients and a hosted Gradio Space that scores
//! the similarity of two texts (Kannada or English). The interesting part is
//! the remote-call resilience layer in [`space`]: session establishment with
//! retry, linear backoff around every prediction, and normalization of the
//! Space's varying return shapes into one numeric score.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - server configuration
//! - [`SpaceClient`], [`SpaceConfig`], [`SpaceError`] - the retrying client
//! - [`SpaceTransport`], [`GradioTransport`], [`SessionHandle`],
//!   [`TransportError`] - the wire seam
//! - [`ComparisonRequest`], [`Language`], [`decode_similarity`] - request
//!   model and response normalization
//! - [`extract_text`], [`DetectedType`], [`ExtractError`] - document text
//!   extraction
//! - [`clean_text`] - input normalization
//! - [`gateway`] - the HTTP surface
//!
//! A scripted [`MockTransport`] is available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod extract;
pub mod gateway;
pub mod normalize;
pub mod space;

pub use config::{Config, ConfigError, DEFAULT_API_NAME, DEFAULT_SPACE_URL};
pub use extract::{DetectedType, ExtractError, extract_text};
pub use gateway::{HandlerState, create_router_with_state};
pub use normalize::clean_text;
#[cfg(any(test, feature = "mock"))]
pub use space::MockTransport;
pub use space::{
    ComparisonRequest, GradioTransport, Language, SessionHandle, SpaceClient, SpaceConfig,
    SpaceError, SpaceTransport, TransportError, decode_similarity,
};
