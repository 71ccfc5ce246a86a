//! The signed-in dashboard: session, backend, and per-page state.
//!
//! Every page operation first resolves its [`Route`] against the current
//! session so the command line enforces the same access rules as the menu.

use road_safety_accident_models::AccidentRecord;
use road_safety_analytics::{HotspotCluster, MonthlySeverity, cluster_hotspots, monthly_breakdown};
use road_safety_api::config::ConfigError;
use road_safety_api::gate::RequestGate;
use road_safety_api::history::PredictionHistory;
use road_safety_api::{ApiError, DataAccess};
use road_safety_api_models::{AdminStats, AdminUser, PredictionInput, PredictionResult, Stats};
use road_safety_server::MAX_HOTSPOT_LIMIT;
use road_safety_session::{Route, RouteOutcome, SessionContext, SessionError};
use road_safety_session_models::{ProfileUpdate, Role, Session, SignupForm, SignupFormError};
use thiserror::Error;

/// Records sampled for the dashboard's monthly trend.
pub const TREND_SAMPLE: u32 = 50;

/// Errors surfaced to the command-line user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Form(#[from] SignupFormError),

    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The page needs a session and there is none.
    #[error("Please log in to open {page}")]
    LoginRequired {
        /// Label of the refused page.
        page: &'static str,
    },

    /// The session lacks the page's role.
    #[error("{page} requires the {required} role")]
    AccessDenied {
        /// Label of the refused page.
        page: &'static str,
        /// Role the page asks for.
        required: Role,
    },

    /// More hotspot records were requested than the server allows.
    #[error("At most {max} hotspot records can be fetched at once")]
    LimitTooLarge {
        /// The largest accepted limit.
        max: u32,
    },

    /// Login or signup was attempted while a session is held.
    #[error("Already signed in as {email}; log out first")]
    AlreadySignedIn {
        /// Email of the current session.
        email: String,
    },
}

/// Application state for one run of the CLI.
pub struct Dashboard {
    session: SessionContext,
    api: Box<dyn DataAccess>,
    history: PredictionHistory,
    predict_gate: RequestGate,
}

impl Dashboard {
    #[must_use]
    pub fn new(session: SessionContext, api: Box<dyn DataAccess>) -> Self {
        Self {
            session,
            api,
            history: PredictionHistory::default(),
            predict_gate: RequestGate::default(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    /// Pages the current user can open from the menu.
    #[must_use]
    pub fn navigation(&self) -> Vec<Route> {
        self.session.navigation()
    }

    /// Predictions made during this run, newest first.
    #[must_use]
    pub const fn history(&self) -> &PredictionHistory {
        &self.history
    }

    #[must_use]
    pub const fn predict_gate(&self) -> &RequestGate {
        &self.predict_gate
    }

    /// Checks that `route` may be shown to the current session.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::LoginRequired`], [`CliError::AccessDenied`], or
    /// (for the auth pages) [`CliError::AlreadySignedIn`] when the route
    /// resolves to a redirect.
    pub fn open(&self, route: Route) -> Result<(), CliError> {
        match self.session.resolve(route.path()) {
            RouteOutcome::Render(_) | RouteOutcome::NotFound => Ok(()),
            RouteOutcome::Redirect(Route::Login) => Err(CliError::LoginRequired {
                page: route.label(),
            }),
            RouteOutcome::Redirect(_) => match route.required_role() {
                Some(required) => Err(CliError::AccessDenied {
                    page: route.label(),
                    required,
                }),
                None => Err(CliError::AlreadySignedIn {
                    email: self
                        .session
                        .current()
                        .map(|s| s.email.clone())
                        .unwrap_or_default(),
                }),
            },
        }
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if a session is already held, the backend
    /// rejects the credentials, or the session cannot be persisted.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, CliError> {
        self.open(Route::Login)?;
        let session = self.api.login(email, password).await?;
        self.session.sign_in(session)?;
        self.current()
    }

    /// Validates the signup form, registers the account, and signs in.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Form`] before contacting the backend if the form
    /// is invalid, otherwise as for [`Dashboard::login`].
    pub async fn signup(&mut self, form: SignupForm) -> Result<&Session, CliError> {
        self.open(Route::Signup)?;
        let request = form.validate()?;
        let session = self.api.signup(&request).await?;
        self.session.sign_in(session)?;
        self.current()
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Session`] if the stored record cannot be removed.
    pub fn logout(&mut self) -> Result<(), CliError> {
        self.session.logout()?;
        Ok(())
    }

    /// Edits the signed-in user's name or email.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the profile page is not accessible or the
    /// update is rejected.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Session, CliError> {
        self.open(Route::Profile)?;
        Ok(self.session.update_profile(update)?)
    }

    /// Requests a severity prediction and records it in the history.
    ///
    /// Returns `Ok(None)` without contacting the backend while another
    /// prediction is still pending. `&mut self` already serialises calls
    /// made through this dashboard, so only a holder of a cloned
    /// [`Dashboard::predict_gate`] handle can make that happen.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the predict page is not accessible or the
    /// backend fails.
    pub async fn predict(
        &mut self,
        input: &PredictionInput,
    ) -> Result<Option<&PredictionResult>, CliError> {
        self.open(Route::Predict)?;

        let gate = self.predict_gate.clone();
        let Some(result) = gate.run(self.api.predict(input)).await else {
            return Ok(None);
        };

        self.history.push(result?);
        Ok(self.history.latest())
    }

    /// Dashboard summary statistics.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the dashboard is not accessible or the
    /// backend fails.
    pub async fn stats(&self) -> Result<Stats, CliError> {
        self.open(Route::Home)?;
        Ok(self.api.get_stats().await?)
    }

    /// Severity counts per month over the latest [`TREND_SAMPLE`] hotspot
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the dashboard is not accessible or the
    /// backend fails.
    pub async fn monthly_trend(&self) -> Result<Vec<MonthlySeverity>, CliError> {
        self.open(Route::Home)?;
        let records = self.api.get_hotspots(TREND_SAMPLE).await?;
        Ok(monthly_breakdown(&records))
    }

    /// Fetches `limit` hotspot records and groups them for the map.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::LimitTooLarge`] above [`MAX_HOTSPOT_LIMIT`], or
    /// [`CliError`] if the analysis page is not accessible or the backend
    /// fails.
    pub async fn hotspots(
        &self,
        limit: u32,
    ) -> Result<(Vec<AccidentRecord>, Vec<HotspotCluster>), CliError> {
        self.open(Route::Analysis)?;
        if limit > MAX_HOTSPOT_LIMIT {
            return Err(CliError::LimitTooLarge {
                max: MAX_HOTSPOT_LIMIT,
            });
        }
        let records = self.api.get_hotspots(limit).await?;
        let clusters = cluster_hotspots(&records);
        log::debug!(
            "Grouped {} hotspot records into {} clusters",
            records.len(),
            clusters.len()
        );
        Ok((records, clusters))
    }

    /// System-wide statistics for administrators.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::AccessDenied`] for non-admin sessions, or
    /// [`CliError::Api`] if the backend fails.
    pub async fn admin_stats(&self) -> Result<AdminStats, CliError> {
        self.open(Route::Admin)?;
        Ok(self.api.get_admin_stats().await?)
    }

    /// Accounts listed on the admin page.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::AccessDenied`] for non-admin sessions, or
    /// [`CliError::Api`] if the backend fails.
    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, CliError> {
        self.open(Route::Admin)?;
        Ok(self.api.get_admin_users().await?)
    }

    fn current(&self) -> Result<&Session, CliError> {
        self.session
            .current()
            .ok_or(CliError::Session(SessionError::NotLoggedIn))
    }
}
