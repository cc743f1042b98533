//! Client-side state owned outside any single view.

pub mod request;
pub mod session;
