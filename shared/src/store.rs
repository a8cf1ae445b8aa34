//! # Collaborator Traits
//!
//! The record store and the auth provider are remote services. These traits
//! describe what the application needs from them so the gateway and session
//! controller can be driven by the Supabase adapters in the browser and by
//! in-memory doubles in tests.

use async_trait::async_trait;

use crate::error::{AuthError, StoreError};
use crate::session::{Session, Subscription};
use crate::{AnimalPayload, AnimalRecord, RecordId};

/// Remote table of animal records.
///
/// Browser futures are not `Send`, hence `?Send`.
#[async_trait(?Send)]
pub trait RecordStore {
    /// Every record, ordered by `created_at` descending (newest first)
    async fn select_all(&self) -> Result<Vec<AnimalRecord>, StoreError>;

    async fn insert(&self, payload: &AnimalPayload) -> Result<(), StoreError>;

    /// Overwrite the record matching `id`
    async fn update(&self, id: &RecordId, payload: &AnimalPayload) -> Result<(), StoreError>;

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;
}

/// Remote email/password authentication
#[async_trait(?Send)]
pub trait AuthProvider {
    /// The session currently held, if any
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Register for session changes. The listener stays registered until the
    /// returned handle is unsubscribed or dropped.
    fn subscribe(&self, listener: Box<dyn Fn(Option<Session>)>) -> Subscription;
}
