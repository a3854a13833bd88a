//! Application state management for hallpass.
//!
//! This module contains the `App` struct that owns the two views (login and
//! home), the session client, and the background task coordination. Network
//! requests run as spawned tokio tasks and report back over an MPSC channel;
//! each result is stamped with the view epoch it was spawned under so a slow
//! request racing with navigation can never update a view that is gone.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, LoginOutcome, SessionClient};
use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Each view has at most one request in flight, so a small buffer suffices.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum username length, in characters.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum password length, in characters.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// View State Types
// ============================================================================

/// Which page is currently mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Home,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// State of the protected home view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    Loading,
    Loaded(String),
    Error(String),
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned request tasks.
///
/// Every variant carries the view epoch captured when the task was spawned.
/// Results whose epoch no longer matches the current one are dropped - the
/// view they belong to has been navigated away from.
#[derive(Debug)]
pub enum TaskResult {
    /// Outcome of a login attempt
    Login {
        epoch: u64,
        outcome: Result<LoginOutcome, ApiError>,
    },
    /// Outcome of the protected fetch
    Home {
        epoch: u64,
        result: Result<String, ApiError>,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    pub api: SessionClient,

    pub view: View,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub submitting: bool,

    // Home view state
    pub home: HomeState,

    // Monotonic view generation; incremented on every navigation
    epoch: u64,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let api = SessionClient::new(config.base_url())?;
        debug!(base_url = api.base_url(), "Session client created");

        Ok(Self::with_client(config, api))
    }

    /// Create an application instance with an explicit client.
    /// Used by tests to point at a mock backend.
    pub fn with_client(config: Config, api: SessionClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = config.last_username.clone().unwrap_or_default();
        let login_focus = if login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };

        Self {
            config,
            api,
            view: View::Login,
            login_username,
            login_password: String::new(),
            login_focus,
            login_error: None,
            submitting: false,
            home: HomeState::Loading,
            epoch: 0,
            task_rx: rx,
            task_tx: tx,
        }
    }

    #[cfg(test)]
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    // =========================================================================
    // Login View
    // =========================================================================

    /// Submit the login form with the current field values.
    ///
    /// Empty fields are submitted as-is; the backend enforces validation.
    /// Ignored while a previous submit is still in flight.
    pub fn submit_login(&mut self) {
        if self.submitting {
            debug!("Login already in flight, ignoring submit");
            return;
        }

        self.submitting = true;
        self.login_error = None;

        let api = self.api.clone();
        let username = self.login_username.clone();
        let password = self.login_password.clone();
        let epoch = self.epoch;
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let outcome = api.login(&username, &password).await;
            if let Err(e) = tx.send(TaskResult::Login { epoch, outcome }).await {
                debug!(error = %e, "Login result dropped - channel closed");
            }
        });
    }

    // =========================================================================
    // Home View
    // =========================================================================

    /// Navigate to the home view and fetch the protected resource.
    ///
    /// Every entry re-validates the session with a live fetch; the view
    /// never assumes a session is valid from prior state.
    pub fn navigate_to_home(&mut self) {
        self.epoch += 1;
        self.view = View::Home;
        self.home = HomeState::Loading;

        let api = self.api.clone();
        let epoch = self.epoch;
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let result = api.fetch_home().await;
            if let Err(e) = tx.send(TaskResult::Home { epoch, result }).await {
                debug!(error = %e, "Home result dropped - channel closed");
            }
        });
    }

    /// Re-mount the home view, re-running the protected fetch
    pub fn reload_home(&mut self) {
        self.navigate_to_home();
    }

    /// Fire the logout request and return to the login view.
    ///
    /// Logout is fire-and-forget: navigation happens immediately and does
    /// not wait for (or inspect) the backend's response.
    pub fn logout(&mut self) {
        info!("Logging out");

        let api = self.api.clone();
        tokio::spawn(async move {
            api.logout().await;
        });

        self.navigate_to_login();
    }

    /// Navigate to the login view
    pub fn navigate_to_login(&mut self) {
        self.epoch += 1;
        self.view = View::Login;
        self.submitting = false;
        self.login_error = None;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
    }

    // =========================================================================
    // Background Task Processing
    // =========================================================================

    /// Drain completed background tasks and apply their results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    /// Apply a single background task result to the view state
    pub fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Login { epoch, outcome } => {
                if epoch != self.epoch {
                    debug!(epoch, current = self.epoch, "Dropping stale login result");
                    return;
                }
                self.submitting = false;

                match outcome {
                    Ok(LoginOutcome::Authenticated) => {
                        info!("Login successful");
                        self.config.last_username = Some(self.login_username.clone());
                        if let Err(e) = self.config.save() {
                            warn!(error = %e, "Failed to save config");
                        }
                        self.login_password.clear();
                        self.login_error = None;
                        self.navigate_to_home();
                    }
                    Ok(LoginOutcome::Rejected) => {
                        debug!("Login rejected");
                        self.login_error = Some("Invalid credentials".to_string());
                    }
                    Err(e) => {
                        error!(error = %e, "Login failed");
                        self.login_error = Some(login_failure_message(&e));
                    }
                }
            }
            TaskResult::Home { epoch, result } => {
                if epoch != self.epoch {
                    debug!(epoch, current = self.epoch, "Dropping stale home result");
                    return;
                }

                match result {
                    Ok(text) => {
                        self.home = HomeState::Loaded(text);
                    }
                    Err(e) if e.is_unauthorized() => {
                        // No error display - "not logged in" silently redirects
                        info!("Session not valid, returning to login");
                        self.navigate_to_login();
                    }
                    Err(e) => {
                        error!(error = %e, "Protected fetch failed");
                        self.home = HomeState::Error(e.to_string());
                    }
                }
            }
        }
    }
}

/// Map a login transport failure to a user-facing message
fn login_failure_message(e: &ApiError) -> String {
    match e {
        ApiError::Network(inner) if inner.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        ApiError::Network(inner) if inner.is_connect() => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        other => format!("Login failed: {}", other),
    }
}

// ============================================================================
// Input Helpers
// ============================================================================

/// Check if a character is acceptable for a form field
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted.
/// `current_chars` is a character count, not a byte length.
pub fn can_add_username_char(current_chars: usize, c: char) -> bool {
    current_chars < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted.
/// `current_chars` is a character count, not a byte length.
pub fn can_add_password_char(current_chars: usize, c: char) -> bool {
    current_chars < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
