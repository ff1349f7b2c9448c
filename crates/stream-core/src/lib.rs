//! # stream-core
//!
//! Core types and utilities for working with the Stream REST API.
//!
//! This crate provides the shared error type, client configuration, and the
//! request/response plumbing used by the individual Stream API clients.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy shared by every client
//! - [`auth`] - Opaque credential token passed per call
//! - [`config`] - Configuration structures for Stream clients
//! - [`client`] - HTTP transport abstraction and connection settings
//! - [`routes`] - Endpoint URL construction
//! - [`request`] - Authenticated request builders
//! - [`serialization`] - Response and error envelope decoding
//! - [`query`] - Query parameter builder
//! - [`enrichment`] - Reference identifiers for enriched activities

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod query;
pub mod request;
pub mod routes;
pub mod serialization;

// Re-export commonly used types
pub use auth::Token;
pub use error::{Error, Result};
