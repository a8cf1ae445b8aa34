//! Supabase adapters: PostgREST for the record table, GoTrue for auth.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use gloo::storage::{LocalStorage, Storage};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use shared::{
    decode_rows, AnimalPayload, AnimalRecord, AuthError, AuthProvider, RecordId, RecordStore, Session,
    SessionEvents, StoreError, Subscription, SupabaseConfig,
};

/// `localStorage` key of the persisted session
const SESSION_STORAGE_KEY: &str = "farmlog.session";

/// Client for one Supabase project. Clones share the session and listeners.
#[derive(Clone)]
pub struct SupabaseClient {
    config: Rc<SupabaseConfig>,
    session: Rc<RefCell<Option<Session>>>,
    events: SessionEvents,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
}

/// Error body returned by GoTrue; the field carrying the text varies by version
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Message from a failed PostgREST response
pub fn store_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status, body))
}

/// Message from a failed GoTrue response
pub fn auth_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<AuthErrorBody>(body)
        .ok()
        .and_then(|body| {
            [body.error_description, body.msg, body.message, body.error]
                .into_iter()
                .flatten()
                .find(|message| !message.trim().is_empty())
        })
        .unwrap_or_else(|| fallback_message(status, body))
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

/// PostgREST filter matching one row by id
pub fn id_filter(id: &RecordId) -> String {
    format!("eq.{}", id)
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// What a session needs before its token can be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    NeedsRefresh,
    /// Expired and nothing to renew it with
    Unrenewable,
}

pub fn token_state(session: &Session, now_secs: i64) -> TokenState {
    if !session.is_expired(now_secs) {
        TokenState::Valid
    } else if session.refresh_token.is_empty() {
        TokenState::Unrenewable
    } else {
        TokenState::NeedsRefresh
    }
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config: Rc::new(config),
            session: Rc::new(RefCell::new(None)),
            events: SessionEvents::new(),
        }
    }

    /// Signed-in requests carry the user's token, anonymous ones the anon key
    fn bearer(&self) -> String {
        let token = self
            .session
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone());
        format!("Bearer {}", token)
    }

    /// Attach the project key and a bearer that is valid right now
    async fn rest(&self, builder: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        self.current_session()
            .await
            .map_err(|e| StoreError::SessionExpired(e.to_string()))?;

        Ok(builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &self.bearer()))
    }

    /// The held or persisted session, renewed first when its token has expired.
    ///
    /// Listeners hear about the renewal, or about the session ending when it
    /// cannot be renewed, only if the session was already active in this page.
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let held = self.session.borrow().clone();
        let active = held.is_some();
        let Some(session) = held.or_else(Self::persisted_session) else {
            return Ok(None);
        };

        match token_state(&session, now_secs()) {
            TokenState::Valid => {
                *self.session.borrow_mut() = Some(session.clone());
                Ok(Some(session))
            }
            TokenState::Unrenewable => {
                info!("Session expired without a refresh token");
                self.end_session(active);
                Ok(None)
            }
            TokenState::NeedsRefresh => {
                info!("Session expired, refreshing");
                let refreshed = self
                    .token_request(
                        "refresh_token",
                        &RefreshGrant {
                            refresh_token: &session.refresh_token,
                        },
                    )
                    .await;

                match refreshed {
                    Ok(session) => {
                        if let Err(e) = self.remember(&session) {
                            warn!("{}", e);
                        }
                        if active {
                            self.events.emit(Some(session.clone()));
                        }
                        Ok(Some(session))
                    }
                    Err(e) => {
                        warn!("Failed to refresh session: {}", e);
                        self.end_session(active);
                        Err(e)
                    }
                }
            }
        }
    }

    fn end_session(&self, notify: bool) {
        self.forget();
        if notify {
            self.events.emit(None);
        }
    }

    fn remember(&self, session: &Session) -> Result<(), AuthError> {
        *self.session.borrow_mut() = Some(session.clone());
        LocalStorage::set(SESSION_STORAGE_KEY, session).map_err(|e| AuthError::Storage(e.to_string()))
    }

    fn forget(&self) {
        *self.session.borrow_mut() = None;
        LocalStorage::delete(SESSION_STORAGE_KEY);
    }

    fn persisted_session() -> Option<Session> {
        LocalStorage::get::<Session>(SESSION_STORAGE_KEY).ok()
    }

    async fn token_request<T: Serialize>(&self, grant_type: &str, body: &T) -> Result<Session, AuthError> {
        let response = Request::post(&self.config.auth_url("token"))
            .header("apikey", &self.config.anon_key)
            .query([("grant_type", grant_type)])
            .json(body)
            .map_err(|e| AuthError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(auth_error_message(status, &body)));
        }

        let session = response
            .json::<Session>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(session.with_expiry_from(now_secs()))
    }
}

async fn ensure_ok(response: Response) -> Result<Response, StoreError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected(store_error_message(status, &body)))
}

fn network(e: gloo::net::Error) -> StoreError {
    StoreError::Network(e.to_string())
}

#[async_trait(?Send)]
impl RecordStore for SupabaseClient {
    async fn select_all(&self) -> Result<Vec<AnimalRecord>, StoreError> {
        let response = self
            .rest(Request::get(&self.config.table_url()))
            .await?
            .query([("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(network)?;

        let rows = ensure_ok(response)
            .await?
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(decode_rows(rows))
    }

    async fn insert(&self, payload: &AnimalPayload) -> Result<(), StoreError> {
        let response = self
            .rest(Request::post(&self.config.table_url()))
            .await?
            .header("Prefer", "return=minimal")
            .json(&[payload])
            .map_err(|e| StoreError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        ensure_ok(response).await.map(|_| ())
    }

    async fn update(&self, id: &RecordId, payload: &AnimalPayload) -> Result<(), StoreError> {
        let response = self
            .rest(Request::patch(&self.config.table_url()))
            .await?
            .header("Prefer", "return=minimal")
            .query([("id", id_filter(id))])
            .json(payload)
            .map_err(|e| StoreError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        ensure_ok(response).await.map(|_| ())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let response = self
            .rest(Request::delete(&self.config.table_url()))
            .await?
            .query([("id", id_filter(id))])
            .send()
            .await
            .map_err(network)?;

        ensure_ok(response).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl AuthProvider for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        self.current_session().await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .token_request("password", &PasswordGrant { email, password })
            .await?;

        if let Err(e) = self.remember(&session) {
            // Still signed in for this page load
            warn!("{}", e);
        }
        self.events.emit(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let signed_in = self.session.borrow().is_some();
        let result = if signed_in {
            Request::post(&self.config.auth_url("logout"))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &self.bearer())
                .send()
                .await
                .map_err(|e| AuthError::Network(e.to_string()))
                .and_then(|response| {
                    if response.ok() {
                        Ok(())
                    } else {
                        Err(AuthError::Rejected(format!("HTTP {}", response.status())))
                    }
                })
        } else {
            Ok(())
        };

        // The local session ends even when the provider could not be reached
        self.forget();
        self.events.emit(None);
        result
    }

    fn subscribe(&self, listener: Box<dyn Fn(Option<Session>)>) -> Subscription {
        self.events.subscribe(listener)
    }
}
