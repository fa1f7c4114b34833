//! Basic types for the card purchases view

use serde::{Deserialize, Serialize};

/// Sortable table columns, named by their column ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "transactionID")]
    TransactionId,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "airtime")]
    Airtime,
    /// Selling price
    #[serde(rename = "sells")]
    Price,
    /// Agent name
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "commision")]
    Commission,
    /// Agent payment, after resolving the `payment`/`Payment` alias
    #[serde(rename = "payment")]
    Payment,
    #[serde(rename = "isPaid")]
    Paid,
}

impl SortKey {
    /// All columns in table order
    pub const ALL: [SortKey; 9] = [
        SortKey::TransactionId,
        SortKey::Status,
        SortKey::Date,
        SortKey::Airtime,
        SortKey::Price,
        SortKey::Name,
        SortKey::Commission,
        SortKey::Payment,
        SortKey::Paid,
    ];

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::TransactionId => "Transaction ID",
            SortKey::Status => "Transaction Status",
            SortKey::Date => "Purchased on",
            SortKey::Airtime => "Airtime Value",
            SortKey::Price => "Selling Price",
            SortKey::Name => "Agent Name",
            SortKey::Commission => "Commission",
            SortKey::Payment => "Agent Payment",
            SortKey::Paid => "Agent Paid",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::TransactionId
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transactionID" => Ok(SortKey::TransactionId),
            "status" => Ok(SortKey::Status),
            "date" => Ok(SortKey::Date),
            "airtime" => Ok(SortKey::Airtime),
            "sells" | "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "commision" => Ok(SortKey::Commission),
            "payment" | "Payment" => Ok(SortKey::Payment),
            "isPaid" | "paid" => Ok(SortKey::Paid),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::TransactionId => write!(f, "transactionID"),
            SortKey::Status => write!(f, "status"),
            SortKey::Date => write!(f, "date"),
            SortKey::Airtime => write!(f, "airtime"),
            SortKey::Price => write!(f, "sells"),
            SortKey::Name => write!(f, "name"),
            SortKey::Commission => write!(f, "commision"),
            SortKey::Payment => write!(f, "payment"),
            SortKey::Paid => write!(f, "isPaid"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Ascending
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Which column the table is ordered by, and in which direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Spec produced by clicking the header of `key`: an ascending sort on
    /// the same column flips to descending, anything else sorts ascending.
    pub fn toggled(&self, key: SortKey) -> Self {
        if self.key == key && self.direction == SortDirection::Ascending {
            Self::descending(key)
        } else {
            Self::ascending(key)
        }
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Zero-based page index
    pub page_index: usize,
    pub page_size: usize,
}

impl PageSpec {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// First row offset of the window
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

/// Two-tone (three with errors) label colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Success => write!(f, "success"),
            Tone::Warning => write!(f, "warning"),
            Tone::Error => write!(f, "error"),
        }
    }
}
