//! Persistent storage backends for the bearer credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session manager owns *what* is stored; these backends own *where*.
//! `CookieStore` writes a `SameSite=Strict` session cookie in the browser and
//! reports itself unavailable everywhere else. `MemoryStore` keeps the value in
//! process for non-browser builds and tests.
//!
//! TRADE-OFFS
//! ==========
//! No `Max-Age`/`Expires` is written, so the cookie lives as long as the
//! browser session unless the browser restores sessions on its own.

#[cfg(test)]
#[path = "credential_store_test.rs"]
mod credential_store_test;

use std::sync::Mutex;

/// Storage failures. The session manager absorbs these and behaves as logged out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("credential storage is unavailable")]
    Unavailable,
    #[error("credential storage rejected the operation: {0}")]
    Rejected(String),
}

/// A single-slot store for the bearer token.
pub trait CredentialStore: Send + Sync {
    /// Read the stored token, `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be written.
    fn remove(&self) -> Result<(), StorageError>;
}

// =============================================================================
// COOKIE STORE
// =============================================================================

/// Browser cookie backend (`document.cookie`).
#[derive(Debug, Clone)]
pub struct CookieStore {
    name: String,
}

impl CookieStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(feature = "csr")]
fn html_document() -> Result<web_sys::HtmlDocument, StorageError> {
    use wasm_bindgen::JsCast as _;

    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|doc| doc.dyn_into::<web_sys::HtmlDocument>().ok())
        .ok_or(StorageError::Unavailable)
}

impl CredentialStore for CookieStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            let raw = html_document()?
                .cookie()
                .map_err(|e| StorageError::Rejected(format!("{e:?}")))?;
            Ok(find_cookie(&raw, &self.name))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(StorageError::Unavailable)
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            html_document()?
                .set_cookie(&set_cookie_value(&self.name, token))
                .map_err(|e| StorageError::Rejected(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            html_document()?
                .set_cookie(&expire_cookie_value(&self.name))
                .map_err(|e| StorageError::Rejected(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(StorageError::Unavailable)
        }
    }
}

/// Find `name` in a `document.cookie` string and percent-decode its value.
/// Empty values count as absent.
#[cfg(any(test, feature = "csr"))]
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value).map_or_else(|_| value.to_owned(), std::borrow::Cow::into_owned)
        })
        .filter(|value| !value.is_empty())
}

#[cfg(any(test, feature = "csr"))]
fn set_cookie_value(name: &str, token: &str) -> String {
    format!("{name}={}; Path=/; SameSite=Strict", urlencoding::encode(token))
}

#[cfg(any(test, feature = "csr"))]
fn expire_cookie_value(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Strict")
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process backend for non-browser builds and tests. Reads the same way
/// as [`CookieStore`]: an empty value counts as absent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already stored, as if left over from a previous page load.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(token.into())) }
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> Result<R, StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Rejected("memory store lock poisoned".to_owned()))?;
        Ok(f(&mut slot))
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.with_slot(|slot| slot.clone().filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.with_slot(|slot| *slot = Some(token.to_owned()))
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.with_slot(|slot| *slot = None)
    }
}
