use log::{error, info, warn};

use crate::error::GatewayError;
use crate::form::{AnimalForm, FormController, FormMode};
use crate::store::RecordStore;
use crate::{AnimalRecord, RecordId};

/// Question asked before a record is deleted
pub const DELETE_CONFIRMATION: &str = "Hapus data kambing ini?";

/// Kind of write sent to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Insert,
    Update,
    Delete,
}

impl WriteOperation {
    /// Name used in the alert shown when the write fails
    pub fn label(&self) -> &'static str {
        match self {
            WriteOperation::Insert => "Insert",
            WriteOperation::Update => "Update",
            WriteOperation::Delete => "Delete",
        }
    }
}

/// A successful write together with the collection re-read after it
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub operation: WriteOperation,
    pub records: Vec<AnimalRecord>,
}

/// Gateway for reading and writing animal records.
///
/// Every write is followed by a full re-read; callers replace their list with
/// [`WriteOutcome::records`] instead of patching it.
#[derive(Clone)]
pub struct AnimalGateway<S> {
    store: S,
}

impl<S: RecordStore> AnimalGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Full collection, newest first. A failed read yields an empty list.
    pub async fn fetch_all(&self) -> Vec<AnimalRecord> {
        match self.store.select_all().await {
            Ok(records) => {
                info!("Fetched {} records", records.len());
                records
            }
            Err(e) => {
                warn!("Failed to fetch records: {}", e);
                Vec::new()
            }
        }
    }

    /// Insert a new record built from `form`
    pub async fn create(&self, form: &AnimalForm) -> Result<WriteOutcome, GatewayError> {
        let payload = form.to_payload()?;
        info!("Creating record: name={}", payload.name);

        self.store
            .insert(&payload)
            .await
            .map_err(|e| self.write_failed(WriteOperation::Insert, e))?;

        Ok(self.resync(WriteOperation::Insert).await)
    }

    /// Overwrite the record `id` with the values from `form`
    pub async fn update(&self, id: &RecordId, form: &AnimalForm) -> Result<WriteOutcome, GatewayError> {
        let payload = form.to_payload()?;
        info!("Updating record {}: name={}", id, payload.name);

        self.store
            .update(id, &payload)
            .await
            .map_err(|e| self.write_failed(WriteOperation::Update, e))?;

        Ok(self.resync(WriteOperation::Update).await)
    }

    /// Create or update depending on the form mode
    pub async fn save(&self, form: &FormController) -> Result<WriteOutcome, GatewayError> {
        match form.mode() {
            FormMode::Create => self.create(form.fields()).await,
            FormMode::Edit(id) => self.update(id, form.fields()).await,
            FormMode::Closed => Err(GatewayError::FormClosed),
        }
    }

    /// Delete `id` once `confirm` agrees to [`DELETE_CONFIRMATION`].
    ///
    /// Returns `Ok(None)` when the user declined; nothing is sent then.
    pub async fn delete<F>(&self, id: &RecordId, confirm: F) -> Result<Option<WriteOutcome>, GatewayError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRMATION) {
            info!("Delete of record {} cancelled", id);
            return Ok(None);
        }

        info!("Deleting record {}", id);
        self.store
            .delete(id)
            .await
            .map_err(|e| self.write_failed(WriteOperation::Delete, e))?;

        Ok(Some(self.resync(WriteOperation::Delete).await))
    }

    async fn resync(&self, operation: WriteOperation) -> WriteOutcome {
        WriteOutcome {
            operation,
            records: self.fetch_all().await,
        }
    }

    fn write_failed(&self, operation: WriteOperation, source: crate::StoreError) -> GatewayError {
        error!("{} failed: {}", operation.label(), source);
        GatewayError::write(operation, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, ValidationError};
    use crate::form::FormField;
    use crate::test_utils::{MemoryStore, StoreCall};
    use chrono::NaiveDate;

    fn named(name: &str) -> AnimalForm {
        AnimalForm {
            name: name.to_string(),
            ..AnimalForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_inserts_and_returns_fresh_list() {
        let store = MemoryStore::new();
        let gateway = AnimalGateway::new(store.clone());

        let first = gateway.create(&named("Jalu")).await.unwrap();
        assert_eq!(first.operation, WriteOperation::Insert);
        assert_eq!(first.records.len(), 1);

        let second = gateway.create(&named("Si Belang")).await.unwrap();
        let names: Vec<&str> = second.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Si Belang", "Jalu"]);
        assert_eq!(second.records, store.rows_newest_first());
        assert_eq!(
            store.calls(),
            vec![StoreCall::Insert, StoreCall::SelectAll, StoreCall::Insert, StoreCall::SelectAll]
        );
    }

    #[tokio::test]
    async fn test_empty_name_never_reaches_the_store() {
        let store = MemoryStore::new();
        let gateway = AnimalGateway::new(store.clone());

        let err = gateway.create(&named("")).await.unwrap_err();
        assert_eq!(err, GatewayError::Validation(ValidationError::MissingName));
        assert_eq!(err.to_string(), "Nama kambing wajib diisi");

        let mut form = FormController::new();
        form.open_create();
        assert!(gateway.save(&form).await.is_err());

        let id = store.seed("Jalu");
        let mut form = FormController::new();
        form.open_edit(&store.row(&id).unwrap());
        form.set_field(FormField::Name, "  ".to_string());
        assert!(gateway.save(&form).await.is_err());

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_optional_fields_are_stored_absent() {
        let store = MemoryStore::new();
        let gateway = AnimalGateway::new(store.clone());

        let form = AnimalForm {
            name: "Jalu".to_string(),
            purchase_price: "".to_string(),
            illness_history: "".to_string(),
            death_note: " ".to_string(),
            ..AnimalForm::default()
        };
        gateway.create(&form).await.unwrap();

        let payload = store.last_payload().unwrap();
        assert_eq!(payload.purchase_price, None);
        assert_eq!(payload.illness_history, None);
        assert_eq!(payload.death_note, None);
        assert_eq!(payload.birth_date, None);
    }

    #[tokio::test]
    async fn test_edit_then_save_updates_by_id() {
        let store = MemoryStore::new();
        let id = store.seed("Jalu");
        let other = store.seed("Si Belang");
        let gateway = AnimalGateway::new(store.clone());

        let mut form = FormController::new();
        form.open_edit(&store.row(&id).unwrap());
        form.set_field(FormField::MarriageDate, "2024-01-01".to_string());

        let outcome = gateway.save(&form).await.unwrap();

        assert_eq!(outcome.operation, WriteOperation::Update);
        assert_eq!(store.calls(), vec![StoreCall::Update(id.clone()), StoreCall::SelectAll]);
        assert_eq!(outcome.records.len(), 2);

        let updated = store.row(&id).unwrap();
        assert_eq!(updated.estimated_birth_date, NaiveDate::from_ymd_opt(2024, 5, 30));
        assert_eq!(store.row(&other).unwrap().marriage_date, None);
    }

    #[tokio::test]
    async fn test_update_recomputes_estimated_birth() {
        let store = MemoryStore::new();
        let id = store.seed("Jalu");
        let gateway = AnimalGateway::new(store.clone());

        let form = AnimalForm {
            name: "Jalu".to_string(),
            marriage_date: "2024-01-01".to_string(),
            ..AnimalForm::default()
        };
        gateway.update(&id, &form).await.unwrap();

        let cleared = named("Jalu");
        gateway.update(&id, &cleared).await.unwrap();
        assert_eq!(store.row(&id).unwrap().estimated_birth_date, None);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = MemoryStore::new();
        let id = store.seed("Jalu");
        let gateway = AnimalGateway::new(store.clone());

        let mut asked = None;
        let declined = gateway
            .delete(&id, |question| {
                asked = Some(question.to_string());
                false
            })
            .await
            .unwrap();

        assert_eq!(declined, None);
        assert_eq!(asked.as_deref(), Some(DELETE_CONFIRMATION));
        assert!(store.calls().is_empty());

        let outcome = gateway.delete(&id, |_| true).await.unwrap().unwrap();
        assert_eq!(outcome.operation, WriteOperation::Delete);
        assert!(outcome.records.is_empty());
        assert_eq!(store.calls(), vec![StoreCall::Delete(id), StoreCall::SelectAll]);
    }

    #[tokio::test]
    async fn test_list_after_writes_has_no_stale_or_duplicate_entries() {
        let store = MemoryStore::new();
        let gateway = AnimalGateway::new(store.clone());

        gateway.create(&named("Jalu")).await.unwrap();
        let outcome = gateway.create(&named("Si Belang")).await.unwrap();
        let jalu = outcome.records.iter().find(|r| r.name == "Jalu").unwrap().clone();

        // Another device writes in between
        store.seed("Kambing Tetangga");

        let mut form = FormController::new();
        form.open_edit(&jalu);
        form.set_field(FormField::Name, "Jalu Besar".to_string());
        let outcome = gateway.save(&form).await.unwrap();

        let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kambing Tetangga", "Si Belang", "Jalu Besar"]);

        let outcome = gateway.delete(&jalu.id, |_| true).await.unwrap().unwrap();
        assert_eq!(outcome.records, store.rows_newest_first());
        assert_eq!(outcome.records.len(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_names_operation_and_skips_resync() {
        let store = MemoryStore::new();
        let id = store.seed("Jalu");
        store.fail_writes_with("permission denied for table kambing");
        let gateway = AnimalGateway::new(store.clone());

        let err = gateway.create(&named("Si Belang")).await.unwrap_err();
        assert_eq!(err.to_string(), "Insert Error: permission denied for table kambing");

        let err = gateway.update(&id, &named("Jalu")).await.unwrap_err();
        assert_eq!(err.to_string(), "Update Error: permission denied for table kambing");

        let err = gateway.delete(&id, |_| true).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::write(
                WriteOperation::Delete,
                StoreError::Rejected("permission denied for table kambing".to_string())
            )
        );

        assert!(!store.calls().contains(&StoreCall::SelectAll));
    }

    #[tokio::test]
    async fn test_read_failure_is_an_empty_list() {
        let store = MemoryStore::new();
        store.seed("Jalu");
        store.fail_reads();
        let gateway = AnimalGateway::new(store);

        assert!(gateway.fetch_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_with_closed_form() {
        let gateway = AnimalGateway::new(MemoryStore::new());
        let form = FormController::new();
        assert_eq!(gateway.save(&form).await, Err(GatewayError::FormClosed));
    }
}
