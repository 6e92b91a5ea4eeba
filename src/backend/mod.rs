//! Notes backend access.
//!
//! [`BackendRequest`] describes one REST call; [`BackendClient`] sends it.

pub mod client;
pub mod request;

pub use client::{BackendClient, PING_SENTINEL, REQUEST_TIMEOUT};
pub use request::{BackendRequest, HttpMethod};
