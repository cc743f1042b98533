//! Route guard: pick the protected view or its fallback from auth state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated behavior. The
//! decision is a pure function; `Protected` wraps it in a reactive closure so a
//! logout while a protected page is open swaps to the fallback at once.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::api::Api;
use crate::state::session::SessionManager;

/// Which branch a guarded route renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Protected,
    Fallback,
}

pub fn decide(authenticated: bool) -> Branch {
    if authenticated { Branch::Protected } else { Branch::Fallback }
}

/// Return `protected` when authenticated, `fallback` otherwise.
pub fn guard<V>(authenticated: bool, protected: V, fallback: V) -> V {
    match decide(authenticated) {
        Branch::Protected => protected,
        Branch::Fallback => fallback,
    }
}

/// Branch for the current session, recomputed when the auth flag changes.
pub fn branch_memo(session: &SessionManager) -> ArcMemo<Branch> {
    let auth = session.auth_signal();
    ArcMemo::new(move |_| decide(auth.get()))
}

/// Render `view` for signed-in users and `fallback` for everyone else,
/// re-deciding whenever the session changes.
///
/// Each mount first re-reads storage, so a credential that expired or was
/// removed between navigations is noticed before anything renders.
#[component]
pub fn Protected(#[prop(into)] view: ViewFn, #[prop(into)] fallback: ViewFn) -> impl IntoView {
    let api = expect_context::<Api>();
    api.session().refresh();
    let branch = branch_memo(api.session());
    move || guard(branch.get() == Branch::Protected, &view, &fallback).run()
}
