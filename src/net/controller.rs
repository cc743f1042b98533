//! Request lifecycle controller: one instance per call site.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages create a controller for each logical call (login, list shipments,
//! ...), fire `invoke`, and render from `state()`. The controller reads the
//! session credential when the call starts and attaches it as a bearer header.
//!
//! DESIGN
//! ======
//! State moves `Idle -> Loading -> Success | Error`. Every invocation bumps a
//! generation counter and resets state to `Loading` before anything else, so a
//! new call never shows the previous call's data or error.
//!
//! TRADE-OFFS
//! ==========
//! In-flight exchanges are not aborted. When a newer invocation has started,
//! the older response is dropped on arrival instead of overwriting state.
//!
//! ERROR HANDLING
//! ==============
//! Encoding, transport, status and decoding failures all end as
//! `RequestState::Error`. Nothing is returned to or raised at the caller.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::{ArcReadSignal, ArcRwSignal, Get, GetUntracked, Set};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::RequestError;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::config::ClientConfig;
use crate::state::request::{ErrorInfo, RequestState};
use crate::state::session::SessionManager;

// =============================================================================
// OPTIONS
// =============================================================================

/// Method, optional JSON body and query parameters for one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOptions {
    method: HttpMethod,
    body: Option<Result<String, String>>,
    query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self { method, body: None, query: Vec::new() }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// Attach a JSON body. A serialization failure surfaces as an
    /// `Encoding` error when the request runs.
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_string(body).map_err(|e| e.to_string()));
        self
    }

    /// Append a query parameter. Order is preserved in the final URL.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Join base endpoint, path and a percent-encoded query string.
pub fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = base_url.trim_end_matches('/').to_owned();
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&encode_query(query));
    }
    url
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Wraps one logical outbound call with a uniform lifecycle.
pub struct RequestController<T> {
    base_url: Arc<str>,
    session: SessionManager,
    transport: Arc<dyn Transport>,
    state: ArcRwSignal<RequestState<T>>,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for RequestController<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: Arc::clone(&self.base_url),
            session: self.session.clone(),
            transport: Arc::clone(&self.transport),
            state: self.state.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<T> fmt::Debug for RequestController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestController")
            .field("base_url", &self.base_url)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T> RequestController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(config: &ClientConfig, session: SessionManager, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: Arc::from(config.base_url.as_str()),
            session,
            transport,
            state: ArcRwSignal::new(RequestState::Idle),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current state. Tracked when read inside a reactive scope.
    pub fn state(&self) -> RequestState<T> {
        self.state.get()
    }

    /// Current state without subscribing the caller.
    pub fn state_untracked(&self) -> RequestState<T> {
        self.state.get_untracked()
    }

    pub fn signal(&self) -> ArcReadSignal<RequestState<T>> {
        self.state.read_only()
    }

    /// Start a call and return immediately. State is `Loading` when this
    /// returns; the outcome lands in `state()` later.
    ///
    /// The exchange is spawned on the global `any_spawner` executor. Mounting
    /// the app installs the browser one; host callers must initialize an
    /// executor first (spawning without one panics in debug builds) or use
    /// [`Self::run`].
    pub fn invoke(&self, path: &str, options: RequestOptions) {
        let (generation, request) = self.start(path, options);
        let controller = self.clone();
        leptos::task::spawn_local(async move {
            controller.finish(generation, request).await;
        });
    }

    /// Same lifecycle as [`Self::invoke`], resolved when the state is terminal
    /// (or the response was superseded).
    pub async fn run(&self, path: &str, options: RequestOptions) {
        let (generation, request) = self.start(path, options);
        self.finish(generation, request).await;
    }

    fn start(&self, path: &str, options: RequestOptions) -> (u64, Result<HttpRequest, RequestError>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.set(RequestState::Loading);
        (generation, self.build_request(path, options))
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> Result<HttpRequest, RequestError> {
        let RequestOptions { method, body, query } = options;
        let body = body.transpose().map_err(RequestError::Encoding)?;
        let mut headers = Vec::new();
        if let Some(token) = self.session.credential() {
            headers.push(("Authorization".to_owned(), bearer(&token)));
        }
        Ok(HttpRequest { method, url: build_url(&self.base_url, path, &query), headers, body })
    }

    async fn finish(&self, generation: u64, request: Result<HttpRequest, RequestError>) {
        let target = request
            .as_ref()
            .map(|r| format!("{} {}", r.method.as_str(), r.url))
            .unwrap_or_default();
        let result = match request {
            Ok(request) => self.exchange(request).await,
            Err(err) => Err(err),
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("request: dropping superseded response for {target}");
            return;
        }
        if let Err(err) = &result {
            log::warn!("request: {target} failed: {err}");
        }
        self.state.set(RequestState::from_result(result.map_err(ErrorInfo::from)));
    }

    async fn exchange(&self, request: HttpRequest) -> Result<T, RequestError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(RequestError::from_status(&response));
        }
        decode_body(&response)
    }
}

/// Decode a 2xx body. An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, RequestError> {
    let text = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(text).map_err(|source| RequestError::Decoding {
        status: response.status,
        source,
        body: response.body.clone(),
    })
}
