use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use chrono::NaiveDate;
use log::warn;

pub mod app_state;
pub mod config;
pub mod date_utils;
pub mod error;
pub mod form;
pub mod gateway;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppAction, AppState, SessionPhase};
pub use config::{ConfigError, SupabaseConfig, DEFAULT_TABLE};
pub use error::{AuthError, GatewayError, StoreError, ValidationError};
pub use form::{AnimalForm, FormController, FormField, FormMode, InputKind};
pub use gateway::{AnimalGateway, WriteOperation, WriteOutcome, DELETE_CONFIRMATION};
pub use session::{Session, SessionController, SessionEvents, SessionUser, Subscription};
pub use store::{AuthProvider, RecordStore};

/// Identifier assigned by the remote store.
///
/// The store may hand out integer keys or text keys (uuid); both are kept as-is
/// and only ever used to target updates and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// One tracked animal as stored in the remote `kambing` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: RecordId,
    /// Blank when the row has no name
    #[serde(default, deserialize_with = "deserialize_name")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub birth_date: Option<NaiveDate>,
    /// Mating date
    #[serde(default, deserialize_with = "deserialize_date")]
    pub marriage_date: Option<NaiveDate>,
    /// Always `marriage_date + 150 days`, recomputed on every save
    #[serde(default, deserialize_with = "deserialize_date")]
    pub estimated_birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub purchase_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub sale_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub sale_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub illness_history: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub illness_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub treatment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub recovery_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub death_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub death_note: Option<String>,
    /// RFC 3339 timestamp assigned by the store
    #[serde(default)]
    pub created_at: String,
}

/// Body sent on insert and update.
///
/// Absent values serialize as `null` so an update clears the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalPayload {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub marriage_date: Option<NaiveDate>,
    pub estimated_birth_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<i64>,
    pub sale_date: Option<NaiveDate>,
    pub sale_price: Option<i64>,
    pub illness_history: Option<String>,
    pub illness_date: Option<NaiveDate>,
    pub treatment_date: Option<NaiveDate>,
    pub recovery_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub death_note: Option<String>,
}

impl AnimalRecord {
    /// Build the stored representation of a payload once the store has assigned
    /// an id and creation time
    pub fn from_payload(id: RecordId, created_at: String, payload: AnimalPayload) -> Self {
        Self {
            id,
            name: payload.name,
            birth_date: payload.birth_date,
            marriage_date: payload.marriage_date,
            estimated_birth_date: payload.estimated_birth_date,
            purchase_date: payload.purchase_date,
            purchase_price: payload.purchase_price,
            sale_date: payload.sale_date,
            sale_price: payload.sale_price,
            illness_history: payload.illness_history,
            illness_date: payload.illness_date,
            treatment_date: payload.treatment_date,
            recovery_date: payload.recovery_date,
            death_date: payload.death_date,
            death_note: payload.death_note,
            created_at,
        }
    }

    /// Whether the animal has been sold
    pub fn is_sold(&self) -> bool {
        self.sale_date.is_some()
    }

    /// Whether the animal has a recorded death
    pub fn is_deceased(&self) -> bool {
        self.death_date.is_some()
    }
}

/// Round a numeric price to the nearest integer, half away from zero.
/// Values with no `i64` representation (non-finite or out of range) become absent.
pub fn round_price(value: f64) -> Option<i64> {
    let rounded = value.round();
    // i64::MAX is not representable as f64; the cast yields 2^63, one past the range
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Coerce raw price input into an integer price.
///
/// Blank or non-numeric input is absent.
pub fn coerce_price(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(round_price)
}

/// Rupiah amount with `id-ID` digit grouping, e.g. `Rp1.500.000`
pub fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if price < 0 { "-" } else { "" };
    format!("{}Rp{}", sign, grouped)
}

/// Decode store rows one by one. A row that cannot be read is skipped with a
/// warning so the rest of the collection still shows.
pub fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<AnimalRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<AnimalRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable record: {}", e);
                None
            }
        })
        .collect()
}

/// Treat blank text as absent
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => {
            // Timestamp columns come back as `YYYY-MM-DDTHH:MM:SS...`
            let date_part = value.split('T').next().unwrap_or_default().trim();
            if date_part.is_empty() {
                return Ok(None);
            }
            match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                Ok(date) => Ok(Some(date)),
                Err(_) => {
                    warn!("Ignoring unreadable date: {}", value);
                    Ok(None)
                }
            }
        }
    }
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Integer(i64),
        Decimal(f64),
        Text(String),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        None => None,
        Some(RawPrice::Integer(value)) => Some(value),
        Some(RawPrice::Decimal(value)) => round_price(value),
        Some(RawPrice::Text(value)) => coerce_price(&value),
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(clean_text))
}
