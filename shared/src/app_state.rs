//! # Application State
//!
//! The session, the cached record list and the form live in one [`AppState`]
//! owned by the root component. It only changes through [`AppAction`]s, so
//! every transition can be exercised without a browser.

use crate::form::{FormController, FormField};
use crate::session::Session;
use crate::AnimalRecord;

/// Where the user is in the login flow
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionPhase {
    /// Waiting for the auth provider to report an existing session
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub phase: SessionPhase,
    /// Result of the last full read; replaced wholesale, never patched
    pub records: Vec<AnimalRecord>,
    pub form: FormController,
    /// Message shown on the login form
    pub auth_error: Option<String>,
    /// A write is in flight
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Startup lookup finished, or the provider reported a change
    SessionChanged(Option<Session>),
    RecordsLoaded(Vec<AnimalRecord>),
    OpenCreate,
    OpenEdit(AnimalRecord),
    CloseForm,
    SetField(FormField, String),
    AuthFailed(String),
    ClearAuthError,
    WriteStarted,
    /// Save finished; carries the collection re-read after it
    WriteSucceeded(Vec<AnimalRecord>),
    WriteFailed,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State after `action`
    pub fn reduce(&self, action: AppAction) -> Self {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::SessionChanged(Some(session)) => {
                self.phase = SessionPhase::Authenticated(session);
                self.auth_error = None;
            }
            AppAction::SessionChanged(None) => {
                self.phase = SessionPhase::Unauthenticated;
                self.records.clear();
                self.form.close();
                self.busy = false;
            }
            AppAction::RecordsLoaded(records) => {
                // A read that lands after logout must not repopulate the list
                if self.is_authenticated() {
                    self.records = records;
                }
            }
            AppAction::OpenCreate => self.form.open_create(),
            AppAction::OpenEdit(record) => self.form.open_edit(&record),
            AppAction::CloseForm => self.form.close(),
            AppAction::SetField(field, value) => self.form.set_field(field, value),
            AppAction::AuthFailed(message) => self.auth_error = Some(message),
            AppAction::ClearAuthError => self.auth_error = None,
            AppAction::WriteStarted => self.busy = true,
            AppAction::WriteSucceeded(records) => {
                self.busy = false;
                self.form.close();
                if self.is_authenticated() {
                    self.records = records;
                }
            }
            AppAction::WriteFailed => self.busy = false,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}
