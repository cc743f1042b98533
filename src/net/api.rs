//! Typed surface of the shipment API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never format paths or bodies themselves: they take a controller from
//! [`Api`], pick a route constant and an options builder from here, and
//! `invoke`. The wire types mirror the server's camelCase JSON.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::controller::{RequestController, RequestOptions};
use super::transport::{GlooTransport, Transport};
use crate::config::ClientConfig;
use crate::state::session::SessionManager;
use crate::util::credential_store::CookieStore;

pub const LOGIN: &str = "/auth/login";
pub const SIGNUP: &str = "/auth/signup";
pub const LOGOUT: &str = "/auth/logout";
pub const SHIPMENTS: &str = "/shipment/all";
pub const CREATE_SHIPMENT: &str = "/shipment/create";
pub const TRACK: &str = "/track";
pub const UPDATE_TRACKING: &str = "/tracking/update";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Body returned by login and signup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub sender_name: String,
    pub sender_address: String,
    pub recipient_name: String,
    pub recipient_address: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    Completed,
    Pending,
    Cancelled,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl TrackingStatus {
    pub const SELECTABLE: [Self; 3] = [Self::Completed, Self::Pending, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracking event attached to a shipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: TrackingStatus,
    pub tracking_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_name: String,
    pub sender_address: String,
    pub recipient_name: String,
    pub recipient_address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub tracking_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub tracking_details: Vec<TrackingDetail>,
}

impl Shipment {
    /// The tracking record the server keeps current (the first entry).
    pub fn tracking(&self) -> Option<&TrackingDetail> {
        self.tracking_details.first()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingUpdate {
    pub tracking_details_id: String,
    pub status: TrackingStatus,
    pub description: String,
}

/// Public tracking lookup result.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSummary {
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_name: String,
}

// =============================================================================
// REQUEST OPTIONS
// =============================================================================

pub fn login(credentials: &Credentials) -> RequestOptions {
    RequestOptions::post().json(credentials)
}

pub fn signup(signup: &Signup) -> RequestOptions {
    RequestOptions::post().json(signup)
}

pub fn logout() -> RequestOptions {
    RequestOptions::post()
}

pub fn list_shipments() -> RequestOptions {
    RequestOptions::get()
}

pub fn create_shipment(shipment: &NewShipment) -> RequestOptions {
    RequestOptions::post().json(shipment)
}

pub fn track(tracking_code: &str) -> RequestOptions {
    RequestOptions::get().query("trackingCode", tracking_code.trim())
}

pub fn update_tracking(update: &TrackingUpdate) -> RequestOptions {
    RequestOptions::post().json(update)
}

// =============================================================================
// API HANDLE
// =============================================================================

/// Root-level handle provided through context. Every controller minted from
/// it shares one session, transport and endpoint.
#[derive(Clone)]
pub struct Api {
    config: Arc<ClientConfig>,
    session: SessionManager,
    transport: Arc<dyn Transport>,
}

impl Api {
    pub fn new(config: ClientConfig, session: SessionManager, transport: Arc<dyn Transport>) -> Self {
        Self { config: Arc::new(config), session, transport }
    }

    /// Cookie-backed session over `fetch`.
    pub fn browser(config: ClientConfig) -> Self {
        let session = SessionManager::new(Arc::new(CookieStore::new(config.cookie_name.clone())));
        Self::new(config, session, Arc::new(GlooTransport))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fresh controller for one call site.
    pub fn controller<T>(&self) -> RequestController<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        RequestController::new(&self.config, self.session.clone(), Arc::clone(&self.transport))
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.config.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
