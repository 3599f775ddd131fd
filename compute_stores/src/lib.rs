//! KV store and config store clients for edge compute guests.
//!
//! - [`kvstore`]: durable key/value storage with streamed values
//! - [`configstore`]: read-only string configuration
//! - [`Body`]: host byte stream shared by both
//!
//! Every operation is one host call (or a short series for streaming) and
//! turns the host status into a typed error. Failures that carry no host
//! status are returned unchanged.
//!
//! # Features
//!
//! - `logging`: emit `tracing` events; consumers provide the subscriber.

pub mod body;
pub mod configstore;
mod error_mapping;
pub mod kvstore;
#[macro_use]
pub(crate) mod logging;

pub use body::Body;
pub use error_mapping::{host_error_to_io, status_to_error_kind};
