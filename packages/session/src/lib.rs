#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persisted session store, route guard, and navigation rules.
//!
//! The [`SessionStore`] keeps exactly one record, the serialized
//! [`Session`], under [`SESSION_KEY`] in a [`KeyValueStorage`]. Reads are
//! fail-closed: anything that does not parse into a valid session is
//! treated as "logged out" and removed. [`SessionContext`] binds a store to
//! the lifetime of the application and is what the route guard and the
//! navigation menu consult.

pub mod guard;
pub mod routes;
pub mod storage;

use chrono::Utc;
use road_safety_session_models::{ProfileUpdate, Role, Session};
use thiserror::Error;

pub use guard::{GuardDecision, guard};
pub use routes::{Route, RouteOutcome, navigation_items, resolve};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Storage key holding the serialized session.
pub const SESSION_KEY: &str = "user";

/// Errors from session storage operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An I/O operation on the backing storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The operation needs a valid session and there is none.
    #[error("Not logged in")]
    NotLoggedIn,

    /// A required field would be left empty.
    #[error("Missing required field: {field}")]
    MissingFields {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Whether `session` satisfies `required`.
#[must_use]
pub fn has_role(session: &Session, required: Role) -> bool {
    session.has_role(required)
}

/// Single source of truth for the persisted session record.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Creates a store over the given storage backend.
    #[must_use]
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Returns the stored session if it parses and is valid.
    ///
    /// Any stored value that fails to parse or validate is removed. Storage
    /// read failures are logged and reported as no session.
    #[must_use]
    pub fn get_current_session(&self) -> Option<Session> {
        let raw = match self.storage.get_item(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read stored session: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_valid() => Some(session),
            Ok(_) => {
                log::debug!("Stored session is missing token or email, clearing");
                self.discard_invalid();
                None
            }
            Err(e) => {
                log::debug!("Stored session is not valid JSON ({e}), clearing");
                self.discard_invalid();
                None
            }
        }
    }

    /// Persists `session`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if serialization or the storage write fails.
    pub fn set_session(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)?;
        self.storage.set_item(SESSION_KEY, &json)
    }

    /// Removes the stored session unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the storage backend fails to remove the
    /// value.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        self.storage.remove_item(SESSION_KEY)
    }

    /// Applies profile edits to the stored session and persists the result.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NotLoggedIn`] if there is no valid session
    /// * [`SessionError::MissingFields`] if the edit blanks the email
    /// * any storage error from [`Self::set_session`]
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Session, SessionError> {
        let mut session = self
            .get_current_session()
            .ok_or(SessionError::NotLoggedIn)?;

        if let Some(email) = update.email {
            if email.is_empty() {
                return Err(SessionError::MissingFields { field: "email" });
            }
            session.email = email;
        }
        if let Some(name) = update.name {
            session.name = name;
        }

        let contact = &mut session.contact;
        for (slot, value) in [
            (&mut contact.phone, update.phone),
            (&mut contact.address, update.address),
            (&mut contact.city, update.city),
            (&mut contact.country, update.country),
        ] {
            if let Some(value) = value {
                *slot = Some(value).filter(|v| !v.is_empty());
            }
        }
        session.updated_at = Some(Utc::now());

        self.set_session(&session)?;
        Ok(session)
    }

    fn discard_invalid(&self) {
        if let Err(e) = self.clear_session() {
            log::warn!("Failed to clear invalid stored session: {e}");
        }
    }
}

/// The session as seen by the running application.
///
/// Created once at startup with [`SessionContext::init`] and torn down with
/// [`SessionContext::logout`]. Every write goes through the store first so
/// the cached copy never runs ahead of what is persisted.
pub struct SessionContext {
    store: SessionStore,
    current: Option<Session>,
}

impl SessionContext {
    /// Loads the persisted session, if any.
    #[must_use]
    pub fn init(store: SessionStore) -> Self {
        let current = store.get_current_session();
        match &current {
            Some(session) => log::info!("Restored session for {}", session.email),
            None => log::debug!("No stored session"),
        }
        Self { store, current }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Whether a valid session is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Stores a freshly issued session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingFields`] if the session lacks a token
    /// or email, or [`SessionError`] if persisting the session fails.
    pub fn sign_in(&mut self, session: Session) -> Result<(), SessionError> {
        if session.token.is_empty() {
            return Err(SessionError::MissingFields { field: "token" });
        }
        if session.email.is_empty() {
            return Err(SessionError::MissingFields { field: "email" });
        }
        self.store.set_session(&session)?;
        log::info!("Signed in as {} ({})", session.email, session.role);
        self.current = Some(session);
        Ok(())
    }

    /// Clears the session from storage and memory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the storage backend fails to remove the
    /// value. The in-memory session is dropped regardless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.store.clear_session()
    }

    /// Applies profile edits to the current session.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::update_profile`].
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Session, SessionError> {
        let updated = self.store.update_profile(update)?;
        Ok(&*self.current.insert(updated))
    }

    /// Decides whether a page requiring `required` may be shown.
    #[must_use]
    pub fn guard(&self, required: Role) -> GuardDecision {
        guard(self.current(), required)
    }

    /// Resolves a navigation request to `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteOutcome {
        resolve(path, self.current())
    }

    /// Menu entries visible to the current user.
    #[must_use]
    pub fn navigation(&self) -> Vec<Route> {
        navigation_items(self.current())
    }
}
