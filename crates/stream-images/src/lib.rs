//! Images client for the Stream API.
//!
//! Upload, delete and transform images hosted by Stream. Every operation
//! validates its arguments synchronously and hands back a [`Pending`] future
//! that performs the single HTTP call and decodes the response.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ImagesClient, ImagesClientBuilder, Pending};
pub use models::{Crop, CropAnchor, ProcessOptions, Resize, ResizeMode};

/// Convenient result alias using the shared Stream error type.
pub type Result<T> = stream_core::Result<T>;
