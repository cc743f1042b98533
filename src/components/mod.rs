//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard pieces and feedback surfaces. Those that talk to
//! the API take their controllers from the `Api` handle in context.

pub mod banner;
pub mod shipment_form;
pub mod shipment_list;
pub mod tracking_form;
