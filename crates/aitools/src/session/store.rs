use std::sync::Arc;

use aitools_core::types::{AuthResponse, User};

use super::{Session, SessionStorage};
use crate::api::ApiClient;
use crate::error::Error;

/// Holds the authenticated identity and keeps the API client's token in sync
/// with it.
///
/// Every state change takes `&mut self`, so two logins on the same store can
/// never overlap.
pub struct AuthStore {
    api: Arc<ApiClient>,
    storage: Arc<dyn SessionStorage>,
    session: Option<Session>,
    is_loading: bool,
    error: Option<String>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("user", &self.user())
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}

impl AuthStore {
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            api,
            storage,
            session: None,
            is_loading: false,
            error: None,
        }
    }

    /// Load the persisted session, if any, and hand its token to the API client.
    ///
    /// An unreadable session is logged and treated as logged out.
    pub fn restore(&mut self) -> Option<&User> {
        match self.storage.load() {
            Ok(Some(session)) => {
                log::debug!("Restored session for {}", session.user.email);
                self.api.set_token(Some(session.token.clone()));
                self.session = Some(session);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring stored session: {e}"),
        }

        self.user()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, Error> {
        self.begin();
        let result = self.api.login(email, password).await;
        self.finish(result)
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<User, Error> {
        self.begin();
        let result = self.api.signup(name, email, password).await;
        self.finish(result)
    }

    /// Drop the session locally and in storage
    pub fn logout(&mut self) -> Result<(), Error> {
        self.api.set_token(None);
        self.session = None;
        self.error = None;
        self.storage.clear()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed login or signup
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn require_user(&self) -> Result<&User, Error> {
        self.user().ok_or(Error::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<&User, Error> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(Error::Forbidden);
        }
        Ok(user)
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish(&mut self, result: Result<AuthResponse, Error>) -> Result<User, Error> {
        self.is_loading = false;

        let auth = match result {
            Ok(auth) => auth,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        let session = Session {
            user: auth.user,
            token: auth.token,
        };
        self.api.set_token(Some(session.token.clone()));

        if let Err(e) = self.storage.save(&session) {
            log::warn!("Session is active but could not be saved: {e}");
        }

        let user = session.user.clone();
        self.session = Some(session);
        Ok(user)
    }
}
