//! In-memory doubles for the record store and the auth provider.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::{AuthError, StoreError};
use crate::session::{Session, SessionEvents, SessionUser, Subscription};
use crate::store::{AuthProvider, RecordStore};
use crate::{AnimalPayload, AnimalRecord, RecordId};

/// Request observed by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    SelectAll,
    Insert,
    Update(RecordId),
    Delete(RecordId),
}

#[derive(Default)]
struct MemoryTable {
    rows: Vec<AnimalRecord>,
    next_id: i64,
    calls: Vec<StoreCall>,
    payloads: Vec<AnimalPayload>,
    fail_reads: bool,
    write_error: Option<String>,
}

impl MemoryTable {
    fn next_row_meta(&mut self) -> (RecordId, String) {
        self.next_id += 1;
        let n = self.next_id;
        (
            RecordId::Number(n),
            format!("2024-01-01T{:02}:{:02}:00+00:00", n / 60, n % 60),
        )
    }

    fn check_write(&self) -> Result<(), StoreError> {
        match &self.write_error {
            Some(message) => Err(StoreError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

/// Table kept in memory; `created_at` increases with every insert.
#[derive(Clone, Default)]
pub struct MemoryStore {
    table: Rc<RefCell<MemoryTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, without recording a call
    pub fn seed(&self, name: &str) -> RecordId {
        let mut table = self.table.borrow_mut();
        let (id, created_at) = table.next_row_meta();
        let payload = crate::AnimalForm {
            name: name.to_string(),
            ..Default::default()
        }
        .to_payload()
        .expect("seeded rows need a name");
        table
            .rows
            .push(AnimalRecord::from_payload(id.clone(), created_at, payload));
        id
    }

    pub fn row(&self, id: &RecordId) -> Option<AnimalRecord> {
        self.table.borrow().rows.iter().find(|r| &r.id == id).cloned()
    }

    pub fn rows_newest_first(&self) -> Vec<AnimalRecord> {
        let mut rows = self.table.borrow().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.table.borrow().calls.clone()
    }

    pub fn last_payload(&self) -> Option<AnimalPayload> {
        self.table.borrow().payloads.last().cloned()
    }

    pub fn fail_reads(&self) {
        self.table.borrow_mut().fail_reads = true;
    }

    pub fn fail_writes_with(&self, message: &str) {
        self.table.borrow_mut().write_error = Some(message.to_string());
    }
}

#[async_trait(?Send)]
impl RecordStore for MemoryStore {
    async fn select_all(&self) -> Result<Vec<AnimalRecord>, StoreError> {
        self.table.borrow_mut().calls.push(StoreCall::SelectAll);
        if self.table.borrow().fail_reads {
            return Err(StoreError::Network("connection reset".to_string()));
        }
        Ok(self.rows_newest_first())
    }

    async fn insert(&self, payload: &AnimalPayload) -> Result<(), StoreError> {
        let mut table = self.table.borrow_mut();
        table.calls.push(StoreCall::Insert);
        table.check_write()?;
        table.payloads.push(payload.clone());
        let (id, created_at) = table.next_row_meta();
        table
            .rows
            .push(AnimalRecord::from_payload(id, created_at, payload.clone()));
        Ok(())
    }

    async fn update(&self, id: &RecordId, payload: &AnimalPayload) -> Result<(), StoreError> {
        let mut table = self.table.borrow_mut();
        table.calls.push(StoreCall::Update(id.clone()));
        table.check_write()?;
        table.payloads.push(payload.clone());
        if let Some(row) = table.rows.iter_mut().find(|r| &r.id == id) {
            let created_at = row.created_at.clone();
            *row = AnimalRecord::from_payload(id.clone(), created_at, payload.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut table = self.table.borrow_mut();
        table.calls.push(StoreCall::Delete(id.clone()));
        table.check_write()?;
        table.rows.retain(|r| &r.id != id);
        Ok(())
    }
}

pub fn sample_session(email: &str) -> Session {
    Session {
        access_token: format!("token-for-{}", email),
        refresh_token: "refresh".to_string(),
        token_type: "bearer".to_string(),
        expires_in: Some(3600),
        expires_at: Some(1_700_003_600),
        user: SessionUser {
            id: format!("user-{}", email),
            email: Some(email.to_string()),
        },
    }
}

#[derive(Default)]
struct MemoryAccounts {
    accounts: Vec<(String, String)>,
    current: Option<Session>,
    fail_lookup: bool,
}

/// Auth provider with a fixed set of accounts
#[derive(Clone, Default)]
pub struct MemoryAuth {
    state: Rc<RefCell<MemoryAccounts>>,
    events: SessionEvents,
}

impl MemoryAuth {
    pub fn with_account(email: &str, password: &str) -> Self {
        let auth = Self::default();
        auth.state
            .borrow_mut()
            .accounts
            .push((email.to_string(), password.to_string()));
        auth
    }

    pub fn fail_session_lookup(&self) {
        self.state.borrow_mut().fail_lookup = true;
    }

    /// Simulate a session appearing from elsewhere (another tab, a refresh)
    pub fn push_external_session(&self, session: Option<Session>) {
        self.state.borrow_mut().current = session.clone();
        self.events.emit(session);
    }
}

#[async_trait(?Send)]
impl AuthProvider for MemoryAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let state = self.state.borrow();
        if state.fail_lookup {
            return Err(AuthError::Network("offline".to_string()));
        }
        Ok(state.current.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let known = self
            .state
            .borrow()
            .accounts
            .iter()
            .any(|(e, p)| e == email && p == password);
        if !known {
            return Err(AuthError::Rejected("Invalid login credentials".to_string()));
        }

        let session = sample_session(email);
        self.state.borrow_mut().current = Some(session.clone());
        self.events.emit(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.borrow_mut().current = None;
        self.events.emit(None);
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn Fn(Option<Session>)>) -> Subscription {
        self.events.subscribe(listener)
    }
}
