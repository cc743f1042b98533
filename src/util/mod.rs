//! Shared helpers for routing, persistence and forms.

pub mod auth;
pub mod credential_store;
pub mod form;
