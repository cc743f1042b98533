//! Dismissable status banner pinned to the bottom of the viewport.
//!
//! DESIGN
//! ======
//! Each banner owns its visibility. Pages mount a fresh banner per failure
//! (keyed off controller state), so the dismiss timer restarts for every new
//! message without any shared bookkeeping.

#[cfg(test)]
#[path = "banner_test.rs"]
mod banner_test;

use std::time::Duration;

use leptos::prelude::*;

/// How long a banner stays up unless closed sooner.
pub const DEFAULT_DURATION_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Info,
}

impl BannerKind {
    pub fn class(self) -> &'static str {
        match self {
            Self::Error => "banner banner--error",
            Self::Info => "banner banner--info",
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            Self::Error => "alert",
            Self::Info => "status",
        }
    }
}

/// Time a banner stays up before dismissing itself.
pub fn dismiss_delay(duration_ms: u32) -> Duration {
    Duration::from_millis(u64::from(duration_ms))
}

#[component]
pub fn Banner(
    kind: BannerKind,
    #[prop(into)] message: String,
    #[prop(default = DEFAULT_DURATION_MS)] duration_ms: u32,
) -> impl IntoView {
    let visible = RwSignal::new(true);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(dismiss_delay(duration_ms)).await;
        // The owning page may already be gone.
        let _ = visible.try_set(false);
    });
    #[cfg(not(feature = "csr"))]
    let _ = duration_ms;

    view! {
        <Show when=move || visible.get()>
            <div class=kind.class() role=kind.role()>
                <p class="banner__message">{message.clone()}</p>
                <button class="banner__close" on:click=move |_| visible.set(false)>
                    "Close"
                </button>
            </div>
        </Show>
    }
}
