use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::store::AuthProvider;

/// Seconds before expiry at which a session is treated as expired
const EXPIRY_MARGIN_SECS: i64 = 10;

/// Authenticated user as returned by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated context issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill `expires_at` from `expires_in` when the provider only sent the latter
    pub fn with_expiry_from(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now_secs + secs);
        }
        self
    }

    /// Sessions without any expiry information never expire locally
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - EXPIRY_MARGIN_SECS <= now_secs)
            .unwrap_or(false)
    }
}

type Listener = Rc<dyn Fn(Option<Session>)>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Single-threaded broadcaster of session changes
#[derive(Clone, Default)]
pub struct SessionEvents {
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Box<dyn Fn(Option<Session>)>) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::from(listener)));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Notify every current listener
    pub fn emit(&self, session: Option<Session>) {
        // Listeners may subscribe or unsubscribe while being notified
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(session.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle to a registered listener; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Login, logout and session restore on top of an [`AuthProvider`]
#[derive(Clone)]
pub struct SessionController<A> {
    auth: A,
}

impl<A: AuthProvider> SessionController<A> {
    pub fn new(auth: A) -> Self {
        Self { auth }
    }

    /// Session held at startup. A provider failure counts as no session.
    pub async fn restore(&self) -> Option<Session> {
        match self.auth.get_session().await {
            Ok(Some(session)) => {
                info!("Restored session for {}", session.user.email.as_deref().unwrap_or("unknown user"));
                Some(session)
            }
            Ok(None) => {
                info!("No existing session");
                None
            }
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                None
            }
        }
    }

    /// Sign in; the provider's error message is returned untouched
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        info!("Signing in {}", email);
        let session = self.auth.sign_in_with_password(email, password).await?;
        info!("Signed in as {}", session.user.id);
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        info!("Signing out");
        self.auth.sign_out().await
    }

    pub fn on_change(&self, listener: Box<dyn Fn(Option<Session>)>) -> Subscription {
        self.auth.subscribe(listener)
    }
}
