use std::collections::VecDeque;
use std::sync::Mutex;

use any_spawner::Executor;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::block_on;
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;
use crate::net::transport::TransportError;
use crate::state::request::{FailureKind, RequestStatus};
use crate::util::credential_store::MemoryStore;

type Reply = Result<HttpResponse, TransportError>;
type Probe = Box<dyn Fn() + Send + Sync>;

/// Transport that records requests and answers from a script.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    gated: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    sent: Mutex<Vec<HttpRequest>>,
    probe: Mutex<Option<Probe>>,
}

impl ScriptedTransport {
    fn replying(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        let transport = Self::default();
        transport.replies.lock().unwrap().extend(replies);
        Arc::new(transport)
    }

    fn gated(count: usize) -> (Arc<Self>, Vec<oneshot::Sender<Reply>>) {
        let transport = Self::default();
        let mut senders = Vec::new();
        for _ in 0..count {
            let (tx, rx) = oneshot::channel();
            transport.gated.lock().unwrap().push_back(rx);
            senders.push(tx);
        }
        (Arc::new(transport), senders)
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(probe) = self.probe.lock().unwrap().as_ref() {
            probe();
        }
        self.sent.lock().unwrap().push(request);
        let gate = self.gated.lock().unwrap().pop_front();
        if let Some(rx) = gate {
            return rx.await.unwrap_or(Err(TransportError::Network("gate dropped".to_owned())));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Network("no scripted reply".to_owned())))
    }
}

fn ok(status: u16, body: &str) -> Reply {
    Ok(HttpResponse::new(status, body))
}

fn session() -> SessionManager {
    SessionManager::new(Arc::new(MemoryStore::new()))
}

fn controller<T>(session: &SessionManager, transport: Arc<ScriptedTransport>) -> RequestController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    RequestController::new(&ClientConfig::default(), session.clone(), transport)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Token {
    token: String,
}

// =============================================================
// URL building
// =============================================================

#[test]
fn build_url_joins_base_and_path() {
    assert_eq!(build_url("http://localhost:3000", "/shipment/all", &[]), "http://localhost:3000/shipment/all");
    assert_eq!(build_url("http://localhost:3000/", "track", &[]), "http://localhost:3000/track");
}

#[test]
fn build_url_encodes_query_in_order() {
    let query = vec![
        ("trackingCode".to_owned(), "TRK 001&x".to_owned()),
        ("page".to_owned(), "2".to_owned()),
    ];
    assert_eq!(
        build_url("http://localhost:3000", "/track", &query),
        "http://localhost:3000/track?trackingCode=TRK%20001%26x&page=2"
    );
}

#[test]
fn options_builders_set_method_body_and_query() {
    let options = RequestOptions::post().json(&json!({ "a": 1 })).query("k", "v");
    assert_eq!(options.method(), HttpMethod::Post);
    assert_eq!(options.body, Some(Ok(r#"{"a":1}"#.to_owned())));
    assert_eq!(options.query, vec![("k".to_owned(), "v".to_owned())]);
    assert_eq!(RequestOptions::default().method(), HttpMethod::Get);
}

// =============================================================
// Credential attachment
// =============================================================

#[test]
fn attaches_bearer_header_when_credential_present() {
    let session = session();
    session.set_credential("abc123");
    assert!(session.is_authenticated());
    let transport = ScriptedTransport::replying([ok(200, "[]")]);
    let shipments = controller::<Vec<Value>>(&session, transport.clone());

    block_on(shipments.run("/shipment/all", RequestOptions::get()));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "http://localhost:3000/shipment/all");
    assert_eq!(sent[0].header("Authorization"), Some("Bearer abc123"));
}

#[test]
fn omits_header_without_credential() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, "{}")]);
    let track = controller::<Value>(&session, transport.clone());

    block_on(track.run("/track", RequestOptions::get().query("trackingCode", "T1")));

    let sent = transport.sent();
    assert_eq!(sent[0].header("Authorization"), None);
    assert_eq!(sent[0].url, "http://localhost:3000/track?trackingCode=T1");
}

#[test]
fn reads_credential_at_call_time_not_construction_time() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, "null"), ok(200, "null")]);
    let logout = controller::<Value>(&session, transport.clone());

    block_on(logout.run("/auth/logout", RequestOptions::post()));
    session.set_credential("late-token");
    block_on(logout.run("/auth/logout", RequestOptions::post()));
    session.clear_credential();

    let sent = transport.sent();
    assert_eq!(sent[0].header("Authorization"), None);
    assert_eq!(sent[1].header("Authorization"), Some("Bearer late-token"));
}

#[test]
fn sends_serialized_json_body() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, r#"{"token":"t"}"#)]);
    let login = controller::<Token>(&session, transport.clone());

    let body = json!({ "email": "a@b.com", "password": "pw" });
    block_on(login.run("/auth/login", RequestOptions::post().json(&body)));

    let sent = transport.sent();
    assert_eq!(sent[0].method, HttpMethod::Post);
    let sent_body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent_body, body);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn status_sequence_is_idle_loading_terminal() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, r#"{"token":"xyz"}"#)]);
    let login = controller::<Token>(&session, transport.clone());

    let seen = Arc::new(Mutex::new(vec![login.state_untracked().status()]));
    let sink = seen.clone();
    let signal = login.signal();
    *transport.probe.lock().unwrap() = Some(Box::new(move || {
        sink.lock().unwrap().push(signal.get_untracked().status());
    }));

    block_on(login.run("/auth/login", RequestOptions::post()));
    seen.lock().unwrap().push(login.state_untracked().status());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![RequestStatus::Idle, RequestStatus::Loading, RequestStatus::Success]
    );
}

#[test]
fn success_then_set_credential_authenticates() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, r#"{"token":"xyz"}"#)]);
    let login = controller::<Token>(&session, transport);

    block_on(login.run("/auth/login", RequestOptions::post()));

    let state = login.state_untracked();
    assert_eq!(state, RequestState::Success(Token { token: "xyz".to_owned() }));
    assert!(state.error().is_none());

    let token = state.data().map(|t| t.token.clone()).unwrap();
    session.set_credential(&token);
    assert!(session.is_authenticated());
}

#[test]
fn unauthorized_response_becomes_error_with_status() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(401, r#"{"message":"invalid token"}"#)]);
    let shipments = controller::<Vec<Value>>(&session, transport);

    block_on(shipments.run("/shipment/all", RequestOptions::get()));

    let state = shipments.state_untracked();
    assert_eq!(state.status(), RequestStatus::Error);
    assert!(state.data().is_none());
    let error = state.error().unwrap();
    assert_eq!(error.message, "invalid token");
    assert_eq!(error.status_code, Some(401));
    assert_eq!(error.kind, FailureKind::Application);
}

#[test]
fn transport_failure_becomes_error() {
    let session = session();
    let transport = ScriptedTransport::replying([Err(TransportError::Network("offline".to_owned()))]);
    let track = controller::<Value>(&session, transport);

    block_on(track.run("/track", RequestOptions::get()));

    let error = track.state_untracked().error().cloned().unwrap();
    assert_eq!(error.kind, FailureKind::Transport);
    assert_eq!(error.status_code, None);
}

#[test]
fn mismatched_body_becomes_decoding_error() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, r#"{"unexpected":true}"#)]);
    let login = controller::<Token>(&session, transport);

    block_on(login.run("/auth/login", RequestOptions::post()));

    let error = login.state_untracked().error().cloned().unwrap();
    assert_eq!(error.kind, FailureKind::Decoding);
    assert_eq!(error.status_code, Some(200));
}

#[test]
fn empty_success_body_decodes_as_null() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(204, "")]);
    let logout = controller::<Option<Value>>(&session, transport);

    block_on(logout.run("/auth/logout", RequestOptions::post()));

    assert_eq!(logout.state_untracked(), RequestState::Success(None));
}

#[test]
fn reinvocation_clears_previous_terminal_state() {
    let session = session();
    let transport = ScriptedTransport::replying([ok(500, r#"{"message":"down"}"#)]);
    let shipments = controller::<Vec<Value>>(&session, transport.clone());

    block_on(shipments.run("/shipment/all", RequestOptions::get()));
    assert_eq!(shipments.state_untracked().status(), RequestStatus::Error);

    let (reply, gate) = oneshot::channel();
    transport.gated.lock().unwrap().push_back(gate);
    block_on(async {
        let run = shipments.run("/shipment/all", RequestOptions::get());
        futures::pin_mut!(run);
        // First poll starts the call and parks inside the transport.
        assert!(futures::poll!(run.as_mut()).is_pending());
        assert_eq!(shipments.state_untracked(), RequestState::Loading);
        reply.send(ok(200, "[]")).unwrap();
        run.await;
    });

    assert_eq!(shipments.state_untracked(), RequestState::Success(Vec::new()));
}

#[test]
fn superseded_response_is_dropped() {
    let session = session();
    let (transport, mut gates) = ScriptedTransport::gated(2);
    let track = controller::<Value>(&session, transport);
    let second_gate = gates.pop().unwrap();
    let first_gate = gates.pop().unwrap();

    let first = track.run("/track", RequestOptions::get().query("trackingCode", "old"));
    let second = track.run("/track", RequestOptions::get().query("trackingCode", "new"));
    let release = async move {
        second_gate.send(ok(200, r#"{"code":"new"}"#)).unwrap();
        first_gate.send(ok(200, r#"{"code":"old"}"#)).unwrap();
    };
    block_on(async {
        futures::join!(first, second, release);
    });

    assert_eq!(track.state_untracked(), RequestState::Success(json!({ "code": "new" })));
}

#[test]
fn encoding_failure_never_reaches_transport() {
    use std::collections::HashMap;

    let session = session();
    let transport = ScriptedTransport::replying([]);
    let create = controller::<Value>(&session, transport.clone());

    // Non-string map keys cannot be represented as JSON object keys.
    let mut bad = HashMap::new();
    bad.insert(vec![1_u8], "x");
    block_on(create.run("/shipment/create", RequestOptions::post().json(&bad)));

    assert!(transport.sent().is_empty());
    let error = create.state_untracked().error().cloned().unwrap();
    assert_eq!(error.kind, FailureKind::Encoding);
}

// =============================================================
// Fire-and-forget invoke
// =============================================================

/// Install the futures executor. Local tasks queue on a per-thread pool and
/// run on `Executor::poll_local`, so each test drives its own tasks.
fn with_executor() {
    // Another test may have installed it already.
    let _ = Executor::init_futures_executor();
}

#[test]
fn invoke_is_loading_on_return_then_settles() {
    with_executor();
    let session = session();
    let transport = ScriptedTransport::replying([ok(200, r#"{"token":"xyz"}"#)]);
    let login = controller::<Token>(&session, transport.clone());

    login.invoke("/auth/login", RequestOptions::post());
    assert_eq!(login.state_untracked(), RequestState::Loading);
    assert!(transport.sent().is_empty());

    Executor::poll_local();
    assert_eq!(login.state_untracked(), RequestState::Success(Token { token: "xyz".to_owned() }));
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn invoke_captures_credential_before_returning() {
    with_executor();
    let session = session();
    session.set_credential("abc123");
    let transport = ScriptedTransport::replying([ok(200, "null")]);
    let logout = controller::<Value>(&session, transport.clone());

    logout.invoke("/auth/logout", RequestOptions::post());
    session.clear_credential();
    Executor::poll_local();

    assert_eq!(transport.sent()[0].header("Authorization"), Some("Bearer abc123"));
    assert_eq!(logout.state_untracked(), RequestState::Success(Value::Null));
}

#[test]
fn invoke_error_lands_in_state() {
    with_executor();
    let transport = ScriptedTransport::replying([ok(401, r#"{"message":"invalid token"}"#)]);
    let shipments = controller::<Vec<Value>>(&session(), transport);

    shipments.invoke("/shipment/all", RequestOptions::get());
    Executor::poll_local();

    let error = shipments.state_untracked().error().cloned().unwrap();
    assert_eq!(error.message, "invalid token");
    assert_eq!(error.status_code, Some(401));
}

#[test]
fn repeated_invoke_keeps_latest_outcome() {
    with_executor();
    let (transport, mut gates) = ScriptedTransport::gated(2);
    let track = controller::<Value>(&session(), transport);
    let second_gate = gates.pop().unwrap();
    let first_gate = gates.pop().unwrap();

    track.invoke("/track", RequestOptions::get().query("trackingCode", "old"));
    Executor::poll_local();
    track.invoke("/track", RequestOptions::get().query("trackingCode", "new"));
    assert_eq!(track.state_untracked(), RequestState::Loading);
    Executor::poll_local();

    second_gate.send(ok(200, r#"{"code":"new"}"#)).unwrap();
    Executor::poll_local();
    first_gate.send(ok(200, r#"{"code":"old"}"#)).unwrap();
    Executor::poll_local();

    assert_eq!(track.state_untracked(), RequestState::Success(json!({ "code": "new" })));
}
