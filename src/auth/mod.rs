//! Login and signup flows
//!
//! Each form moves through [`FormState`]: `Idle → Submitting → Success`, or
//! back to `Idle` when the request fails. The failure message is kept in
//! [`AuthFlow::error`] until the next submit. Validation happens before any
//! request is sent.

use std::sync::Arc;

use crate::api::FeedApi;
use crate::app::Route;
use crate::error::{Error, Result};
use crate::models::{LoginRequest, Session, SignupRequest};
use crate::session::{Persistence, SessionContext};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Where a form is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    /// Waiting for input
    #[default]
    Idle,
    /// Request in flight
    Submitting,
    /// Request accepted
    Success,
}

/// Login form input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Username (anything after '@' is ignored)
    pub username: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(Error::Validation("Please fill in all fields".to_string()));
        }
        Ok(())
    }
}

/// Signup form input
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Password
    pub password: String,
    /// Password again
    pub confirm_password: String,
}

impl SignupForm {
    /// Check required fields, confirmation and length
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(Error::Validation("Please fill in all fields".to_string()));
        }

        if self.password != self.confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        Ok(())
    }
}

/// Build the login email: the local part of whatever was typed plus the
/// institutional domain
pub fn login_identifier(input: &str, domain: &str) -> String {
    let local = input.trim().split('@').next().unwrap_or_default();
    let domain = domain.trim().trim_start_matches('@');
    format!("{local}@{domain}")
}

/// Result of a successful login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Where to go next
    pub route: Route,
    /// Whether the session will survive a restart
    pub persistence: Persistence,
}

/// Drives the login and signup forms against the API
pub struct AuthFlow<A> {
    api: Arc<A>,
    session: SessionContext,
    email_domain: String,
    state: FormState,
    error: Option<String>,
}

impl<A: FeedApi> AuthFlow<A> {
    /// Create a flow
    pub fn new(api: Arc<A>, session: SessionContext, email_domain: impl Into<String>) -> Self {
        Self {
            api,
            session,
            email_domain: email_domain.into(),
            state: FormState::Idle,
            error: None,
        }
    }

    /// Current form state
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Message from the last failed submit, cleared when a new one starts
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fail(&mut self, err: &Error, fallback: &str) {
        self.state = FormState::Idle;
        self.error = Some(err.user_message(fallback));
    }

    /// Submit the login form. On success the session is established before
    /// routing to the feed.
    pub async fn login(&mut self, form: &LoginForm) -> Result<LoginOutcome> {
        form.validate()?;

        let request = LoginRequest {
            email: login_identifier(&form.username, &self.email_domain),
            password: form.password.clone(),
        };

        self.state = FormState::Submitting;
        self.error = None;
        tracing::debug!(email = %request.email, "Logging in");

        match self.api.login(&request).await {
            Ok(response) => {
                let persistence = self
                    .session
                    .establish(Session::new(response.token, response.user_id));
                self.state = FormState::Success;
                Ok(LoginOutcome {
                    route: Route::Feed,
                    persistence,
                })
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                self.fail(&e, "Login failed");
                Err(e)
            }
        }
    }

    /// Submit the signup form. Routes to the feed without logging in.
    pub async fn signup(&mut self, form: &SignupForm) -> Result<Route> {
        form.validate()?;

        let request = SignupRequest {
            name: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };

        self.state = FormState::Submitting;
        self.error = None;

        match self.api.signup(&request).await {
            Ok(user) => {
                if let Some(user) = user {
                    tracing::debug!(user_id = user.id, "Account created");
                }
                self.state = FormState::Success;
                Ok(Route::Feed)
            }
            Err(e) => {
                tracing::warn!("Signup failed: {}", e);
                self.fail(&e, "Signup failed");
                Err(e)
            }
        }
    }
}
