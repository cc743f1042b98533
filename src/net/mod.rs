//! Network layer: HTTP transport, request lifecycle, typed API surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves bytes, `controller` wraps each call in a reactive
//! lifecycle, `error` classifies failures, and `api` names the server's routes
//! and payloads.

pub mod api;
pub mod controller;
pub mod error;
pub mod transport;
