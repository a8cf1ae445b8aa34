//! Editable form state for creating and editing animal records.

use serde::{Deserialize, Serialize};

use crate::date_utils::{estimate_birth, parse_date, to_input_value};
use crate::error::ValidationError;
use crate::{clean_text, coerce_price, AnimalPayload, AnimalRecord, RecordId};

/// One editable input of the animal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    BirthDate,
    MarriageDate,
    PurchaseDate,
    PurchasePrice,
    SaleDate,
    SalePrice,
    IllnessHistory,
    IllnessDate,
    TreatmentDate,
    RecoveryDate,
    DeathDate,
    DeathNote,
}

/// How a field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Date,
    Number,
    TextArea,
}

impl FormField {
    /// Fields in the order they appear on the form
    pub const ALL: [FormField; 13] = [
        FormField::Name,
        FormField::BirthDate,
        FormField::MarriageDate,
        FormField::PurchaseDate,
        FormField::PurchasePrice,
        FormField::SaleDate,
        FormField::SalePrice,
        FormField::IllnessHistory,
        FormField::IllnessDate,
        FormField::TreatmentDate,
        FormField::RecoveryDate,
        FormField::DeathDate,
        FormField::DeathNote,
    ];

    /// Column name in the store
    pub fn column(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::BirthDate => "birth_date",
            FormField::MarriageDate => "marriage_date",
            FormField::PurchaseDate => "purchase_date",
            FormField::PurchasePrice => "purchase_price",
            FormField::SaleDate => "sale_date",
            FormField::SalePrice => "sale_price",
            FormField::IllnessHistory => "illness_history",
            FormField::IllnessDate => "illness_date",
            FormField::TreatmentDate => "treatment_date",
            FormField::RecoveryDate => "recovery_date",
            FormField::DeathDate => "death_date",
            FormField::DeathNote => "death_note",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Nama Kambing",
            FormField::BirthDate => "Tanggal Lahir",
            FormField::MarriageDate => "Tanggal Perkawinan",
            FormField::PurchaseDate => "Tanggal Pembelian",
            FormField::PurchasePrice => "Harga Pembelian",
            FormField::SaleDate => "Tanggal Penjualan",
            FormField::SalePrice => "Harga Penjualan",
            FormField::IllnessHistory => "Riwayat Penyakit",
            FormField::IllnessDate => "Tanggal Sakit",
            FormField::TreatmentDate => "Tanggal Pengobatan",
            FormField::RecoveryDate => "Tanggal Sembuh",
            FormField::DeathDate => "Tanggal Meninggal",
            FormField::DeathNote => "Keterangan Meninggal",
        }
    }

    pub fn input_kind(&self) -> InputKind {
        match self {
            FormField::Name => InputKind::Text,
            FormField::PurchasePrice | FormField::SalePrice => InputKind::Number,
            FormField::IllnessHistory | FormField::DeathNote => InputKind::TextArea,
            _ => InputKind::Date,
        }
    }
}

/// Flat set of raw input values, all strings as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalForm {
    pub name: String,
    pub birth_date: String,
    pub marriage_date: String,
    pub purchase_date: String,
    pub purchase_price: String,
    pub sale_date: String,
    pub sale_price: String,
    pub illness_history: String,
    pub illness_date: String,
    pub treatment_date: String,
    pub recovery_date: String,
    pub death_date: String,
    pub death_note: String,
}

impl AnimalForm {
    /// Populate the inputs from a stored record
    pub fn from_record(record: &AnimalRecord) -> Self {
        let price = |price: Option<i64>| price.map(|p| p.to_string()).unwrap_or_default();
        Self {
            name: record.name.clone(),
            birth_date: to_input_value(record.birth_date),
            marriage_date: to_input_value(record.marriage_date),
            purchase_date: to_input_value(record.purchase_date),
            purchase_price: price(record.purchase_price),
            sale_date: to_input_value(record.sale_date),
            sale_price: price(record.sale_price),
            illness_history: record.illness_history.clone().unwrap_or_default(),
            illness_date: to_input_value(record.illness_date),
            treatment_date: to_input_value(record.treatment_date),
            recovery_date: to_input_value(record.recovery_date),
            death_date: to_input_value(record.death_date),
            death_note: record.death_note.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::BirthDate => &self.birth_date,
            FormField::MarriageDate => &self.marriage_date,
            FormField::PurchaseDate => &self.purchase_date,
            FormField::PurchasePrice => &self.purchase_price,
            FormField::SaleDate => &self.sale_date,
            FormField::SalePrice => &self.sale_price,
            FormField::IllnessHistory => &self.illness_history,
            FormField::IllnessDate => &self.illness_date,
            FormField::TreatmentDate => &self.treatment_date,
            FormField::RecoveryDate => &self.recovery_date,
            FormField::DeathDate => &self.death_date,
            FormField::DeathNote => &self.death_note,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::BirthDate => &mut self.birth_date,
            FormField::MarriageDate => &mut self.marriage_date,
            FormField::PurchaseDate => &mut self.purchase_date,
            FormField::PurchasePrice => &mut self.purchase_price,
            FormField::SaleDate => &mut self.sale_date,
            FormField::SalePrice => &mut self.sale_price,
            FormField::IllnessHistory => &mut self.illness_history,
            FormField::IllnessDate => &mut self.illness_date,
            FormField::TreatmentDate => &mut self.treatment_date,
            FormField::RecoveryDate => &mut self.recovery_date,
            FormField::DeathDate => &mut self.death_date,
            FormField::DeathNote => &mut self.death_note,
        };
        *slot = value;
    }

    /// Validate and normalize the inputs into a write payload.
    ///
    /// Blank inputs become absent, prices are rounded to integers and the
    /// estimated birth date is always derived from the mating date.
    pub fn to_payload(&self) -> Result<AnimalPayload, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }

        let date = |field: FormField| parse_date(field.column(), self.get(field));
        let marriage_date = date(FormField::MarriageDate)?;

        Ok(AnimalPayload {
            name: self.name.trim().to_string(),
            birth_date: date(FormField::BirthDate)?,
            marriage_date,
            estimated_birth_date: estimate_birth(marriage_date),
            purchase_date: date(FormField::PurchaseDate)?,
            purchase_price: coerce_price(&self.purchase_price),
            sale_date: date(FormField::SaleDate)?,
            sale_price: coerce_price(&self.sale_price),
            illness_history: clean_text(&self.illness_history),
            illness_date: date(FormField::IllnessDate)?,
            treatment_date: date(FormField::TreatmentDate)?,
            recovery_date: date(FormField::RecoveryDate)?,
            death_date: date(FormField::DeathDate)?,
            death_note: clean_text(&self.death_note),
        })
    }
}

/// Whether the form is shown, and for which record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(RecordId),
}

/// Form state: the raw inputs plus the record being edited, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormController {
    mode: FormMode,
    fields: AnimalForm,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an empty form for a new record
    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.fields = AnimalForm::default();
    }

    /// Show the form filled from `record`; saving will update that record
    pub fn open_edit(&mut self, record: &AnimalRecord) {
        self.mode = FormMode::Edit(record.id.clone());
        self.fields = AnimalForm::from_record(record);
    }

    /// Hide the form and forget the identifier and every input
    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.fields = AnimalForm::default();
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        self.fields.set(field, value);
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &AnimalForm {
        &self.fields
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            FormMode::Edit(id) => Some(id),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Edit(_) => "Edit Data Kambing",
            _ => "Tambah Data Kambing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> AnimalRecord {
        AnimalRecord {
            id: RecordId::Number(3),
            name: "Si Belang".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2023, 4, 12),
            marriage_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            estimated_birth_date: NaiveDate::from_ymd_opt(2024, 5, 30),
            purchase_date: None,
            purchase_price: Some(1_500_000),
            sale_date: None,
            sale_price: None,
            illness_history: Some("Kembung".to_string()),
            illness_date: None,
            treatment_date: None,
            recovery_date: None,
            death_date: None,
            death_note: None,
            created_at: "2024-01-02T08:30:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_blank_form_is_rejected() {
        let form = AnimalForm::default();
        assert_eq!(form.to_payload(), Err(ValidationError::MissingName));

        let form = AnimalForm {
            name: "   ".to_string(),
            birth_date: "2024-01-01".to_string(),
            ..AnimalForm::default()
        };
        assert_eq!(form.to_payload(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_blank_fields_become_absent() {
        let form = AnimalForm {
            name: "Jalu".to_string(),
            illness_history: "  ".to_string(),
            ..AnimalForm::default()
        };

        let payload = form.to_payload().unwrap();

        assert_eq!(payload.name, "Jalu");
        assert_eq!(payload.birth_date, None);
        assert_eq!(payload.purchase_price, None);
        assert_eq!(payload.illness_history, None);
        assert_eq!(payload.death_note, None);
        assert_eq!(payload.estimated_birth_date, None);

        let json = serde_json::to_value(&payload).unwrap();
        for (column, value) in json.as_object().unwrap() {
            assert_ne!(*value, "", "{} stored as empty string", column);
        }
    }

    #[test]
    fn test_payload_derives_estimated_birth_and_rounds_prices() {
        let form = AnimalForm {
            name: " Jalu ".to_string(),
            marriage_date: "2024-01-01".to_string(),
            purchase_price: "1250000.6".to_string(),
            sale_price: "2000000".to_string(),
            death_note: "Sakit tua".to_string(),
            ..AnimalForm::default()
        };

        let payload = form.to_payload().unwrap();

        assert_eq!(payload.name, "Jalu");
        assert_eq!(payload.marriage_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(payload.estimated_birth_date, NaiveDate::from_ymd_opt(2024, 5, 30));
        assert_eq!(payload.purchase_price, Some(1_250_001));
        assert_eq!(payload.sale_price, Some(2_000_000));
        assert_eq!(payload.death_note, Some("Sakit tua".to_string()));
    }

    #[test]
    fn test_invalid_date_names_the_field() {
        let form = AnimalForm {
            name: "Jalu".to_string(),
            sale_date: "2024-13-01".to_string(),
            ..AnimalForm::default()
        };

        assert_eq!(
            form.to_payload(),
            Err(ValidationError::InvalidDate {
                field: "sale_date",
                value: "2024-13-01".to_string(),
            })
        );
    }

    #[test]
    fn test_from_record_round_trips_through_inputs() {
        let record = sample_record();
        let form = AnimalForm::from_record(&record);

        assert_eq!(form.name, "Si Belang");
        assert_eq!(form.birth_date, "2023-04-12");
        assert_eq!(form.purchase_price, "1500000");
        assert_eq!(form.purchase_date, "");
        assert_eq!(form.illness_history, "Kembung");

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.estimated_birth_date, record.estimated_birth_date);
    }

    #[test]
    fn test_get_and_set_cover_every_field() {
        let mut form = AnimalForm::default();
        for field in FormField::ALL {
            form.set(field, field.column().to_string());
        }
        for field in FormField::ALL {
            assert_eq!(form.get(field), field.column());
        }
    }

    #[test]
    fn test_controller_modes() {
        let mut controller = FormController::new();
        assert!(!controller.is_open());
        assert_eq!(controller.editing_id(), None);

        controller.open_create();
        assert_eq!(controller.mode(), &FormMode::Create);
        assert_eq!(controller.title(), "Tambah Data Kambing");
        controller.set_field(FormField::Name, "Jalu".to_string());
        assert_eq!(controller.fields().name, "Jalu");

        controller.open_edit(&sample_record());
        assert_eq!(controller.editing_id(), Some(&RecordId::Number(3)));
        assert_eq!(controller.title(), "Edit Data Kambing");
        assert_eq!(controller.fields().name, "Si Belang");

        controller.close();
        assert!(!controller.is_open());
        assert_eq!(controller.editing_id(), None);
        assert_eq!(controller.fields(), &AnimalForm::default());
    }

    #[test]
    fn test_open_create_resets_fields() {
        let mut controller = FormController::new();
        controller.open_edit(&sample_record());
        controller.open_create();
        assert_eq!(controller.editing_id(), None);
        assert_eq!(controller.fields(), &AnimalForm::default());
    }

    #[test]
    fn test_input_kinds() {
        assert_eq!(FormField::Name.input_kind(), InputKind::Text);
        assert_eq!(FormField::SalePrice.input_kind(), InputKind::Number);
        assert_eq!(FormField::DeathNote.input_kind(), InputKind::TextArea);
        assert_eq!(FormField::RecoveryDate.input_kind(), InputKind::Date);
    }
}
