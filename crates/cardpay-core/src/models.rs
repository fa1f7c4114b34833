//! Core data models for card purchases

use cardpay_utils::{format_fixed, fraction_to_percent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{SortKey, Tone};

/// Status value rendered with the warning tone
pub const STATUS_COMMITTED: &str = "COMMITTED";

/// Placeholder for values a record does not carry
pub const MISSING_VALUE: &str = "-";

/// One card purchase as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier, used as row key and as the local search target
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Purchase time as sent by the backend
    #[serde(default)]
    pub date: Option<String>,
    /// Package purchased
    #[serde(default)]
    pub airtime: Option<String>,
    /// Selling price
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Agent display name
    #[serde(default)]
    pub name: Option<String>,
    /// Commission as a fraction (0.0375 is 3.75%)
    #[serde(default)]
    pub commision: Option<Decimal>,
    /// Agent payment
    #[serde(default)]
    pub payment: Option<Decimal>,
    /// Older backend spelling of the agent payment
    #[serde(default, rename = "Payment", skip_serializing_if = "Option::is_none")]
    pub payment_alias: Option<Decimal>,
    /// Whether the agent commission has been settled
    #[serde(default)]
    pub paid: bool,
}

impl TransactionRecord {
    /// Create a record with only the identifier set
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: None,
            date: None,
            airtime: None,
            price: None,
            name: None,
            commision: None,
            payment: None,
            payment_alias: None,
            paid: false,
        }
    }

    /// Agent payment, preferring `payment` over the `Payment` alias
    pub fn resolved_payment(&self) -> CoreResult<Decimal> {
        self.payment
            .or(self.payment_alias)
            .ok_or_else(|| CoreError::DataShape {
                id: self.transaction_id.clone(),
                field: "payment".to_string(),
            })
    }

    pub fn is_committed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMMITTED)
    }

    pub fn status_tone(&self) -> Tone {
        if self.is_committed() {
            Tone::Warning
        } else {
            Tone::Success
        }
    }

    pub fn paid_tone(&self) -> Tone {
        if self.paid {
            Tone::Success
        } else {
            Tone::Error
        }
    }

    /// Value of the column `key`, or `None` when the record lacks it
    pub fn field(&self, key: SortKey) -> Option<FieldValue<'_>> {
        match key {
            SortKey::TransactionId => Some(FieldValue::Text(&self.transaction_id)),
            SortKey::Status => self.status.as_deref().map(FieldValue::Text),
            SortKey::Date => self.date.as_deref().map(FieldValue::Text),
            SortKey::Airtime => self.airtime.as_deref().map(FieldValue::Text),
            SortKey::Price => self.price.map(FieldValue::Amount),
            SortKey::Name => self.name.as_deref().map(FieldValue::Text),
            SortKey::Commission => self.commision.map(FieldValue::Amount),
            SortKey::Payment => self.resolved_payment().ok().map(FieldValue::Amount),
            SortKey::Paid => Some(FieldValue::Flag(self.paid)),
        }
    }
}

/// A comparable column value.
///
/// Values of one column always share a variant, so the derived ordering
/// is the natural one: lexicographic text, numeric amounts, `false < true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Amount(Decimal),
    Flag(bool),
}

/// One rendered table row with display values derived from a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub transaction_id: String,
    pub status: String,
    pub status_tone: Tone,
    pub date: String,
    pub airtime: String,
    pub selling_price: String,
    pub agent_name: String,
    /// `commision * 100`, rounded
    pub commission_percent: Option<Decimal>,
    pub commission_display: String,
    pub agent_payment: Option<Decimal>,
    pub agent_payment_display: String,
    pub paid: bool,
    pub paid_label: String,
    pub paid_tone: Tone,
    /// Whether the operator may mark this row as paid
    pub can_mark_paid: bool,
}

impl RowView {
    /// Derive display values; records missing a value render the placeholder
    pub fn from_record(record: &TransactionRecord, decimal_places: u32, is_superuser: bool) -> Self {
        let text = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| MISSING_VALUE.to_string())
        };
        let amount = |value: Option<Decimal>| {
            value
                .map(|v| format_fixed(v, decimal_places))
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        };

        let commission_percent = record
            .commision
            .map(|c| fraction_to_percent(c, decimal_places));
        let agent_payment = match record.resolved_payment() {
            Ok(payment) => Some(payment),
            Err(e) => {
                log::debug!(target: "cardpay::render", "{}", e);
                None
            }
        };

        Self {
            transaction_id: record.transaction_id.clone(),
            status: text(&record.status),
            status_tone: record.status_tone(),
            date: text(&record.date),
            airtime: text(&record.airtime),
            selling_price: amount(record.price),
            agent_name: text(&record.name),
            commission_percent,
            commission_display: amount(commission_percent),
            agent_payment,
            agent_payment_display: amount(agent_payment),
            paid: record.paid,
            paid_label: if record.paid { "Yes" } else { "No" }.to_string(),
            paid_tone: record.paid_tone(),
            can_mark_paid: is_superuser && !record.paid,
        }
    }
}
