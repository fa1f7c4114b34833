//! Backend filters: the four categorical selections that are resolved by
//! re-querying the backend rather than in memory.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::TransactionRecord;

/// Filter dimensions, in the order the filter panel lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    AgentName,
    PackagePurchased,
    CommissionPaid,
    PaymentStatus,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::AgentName,
        FilterDimension::PackagePurchased,
        FilterDimension::CommissionPaid,
        FilterDimension::PaymentStatus,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FilterDimension::AgentName => "Agent Name",
            FilterDimension::PackagePurchased => "Package Purchased",
            FilterDimension::CommissionPaid => "Commission Paid",
            FilterDimension::PaymentStatus => "Payment Status",
        }
    }

    /// Form field name used by the filter panel
    pub fn form_field(&self) -> &'static str {
        match self {
            FilterDimension::AgentName => "agent",
            FilterDimension::PackagePurchased => "airtime",
            FilterDimension::CommissionPaid => "paid",
            FilterDimension::PaymentStatus => "status",
        }
    }

    fn value_of(&self, record: &TransactionRecord) -> Option<String> {
        match self {
            FilterDimension::AgentName => record.name.clone(),
            FilterDimension::PackagePurchased => record.airtime.clone(),
            FilterDimension::CommissionPaid => Some(record.paid.to_string()),
            FilterDimension::PaymentStatus => record.status.clone(),
        }
    }
}

/// The four backend filter selections. Unset dimensions are `None`.
///
/// Values are immutable: every `with_*` returns a new selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub status: Option<String>,
    pub airtime: Option<String>,
    pub agent: Option<String>,
    pub paid: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl FilterSelection {
    pub fn with_status(self, status: Option<String>) -> Self {
        Self {
            status: non_empty(status),
            ..self
        }
    }

    pub fn with_airtime(self, airtime: Option<String>) -> Self {
        Self {
            airtime: non_empty(airtime),
            ..self
        }
    }

    pub fn with_agent(self, agent: Option<String>) -> Self {
        Self {
            agent: non_empty(agent),
            ..self
        }
    }

    pub fn with_paid(self, paid: Option<bool>) -> Self {
        Self { paid, ..self }
    }

    /// Selection with all four dimensions unset
    pub fn cleared(self) -> Self {
        Self::default()
    }

    /// Set one dimension from its textual form value; empty or unparsable
    /// values unset it.
    pub fn with_value(self, dimension: FilterDimension, value: Option<&str>) -> Self {
        let value = value.map(str::to_string);
        match dimension {
            FilterDimension::AgentName => self.with_agent(value),
            FilterDimension::PackagePurchased => self.with_airtime(value),
            FilterDimension::CommissionPaid => {
                self.with_paid(value.and_then(|v| v.parse::<bool>().ok()))
            }
            FilterDimension::PaymentStatus => self.with_status(value),
        }
    }

    /// Current value of one dimension in textual form
    pub fn value(&self, dimension: FilterDimension) -> Option<String> {
        match dimension {
            FilterDimension::AgentName => self.agent.clone(),
            FilterDimension::PackagePurchased => self.airtime.clone(),
            FilterDimension::CommissionPaid => self.paid.map(|p| p.to_string()),
            FilterDimension::PaymentStatus => self.status.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &FilterSelection::default()
    }

    /// Whether `record` satisfies every set dimension
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.status.as_ref().map_or(true, |s| record.status.as_ref() == Some(s))
            && self.airtime.as_ref().map_or(true, |a| record.airtime.as_ref() == Some(a))
            && self.agent.as_ref().map_or(true, |g| record.name.as_ref() == Some(g))
            && self.paid.map_or(true, |p| record.paid == p)
    }
}

/// Query parameters sent to the fetch collaborator.
///
/// Rendered as `?Status=<s>&Airtime=<a>&Agent=<g>&Paid=<p>`, every unset
/// dimension as an empty string and every value percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestParameterization {
    pub status: String,
    pub airtime: String,
    pub agent: String,
    pub paid: String,
}

impl RequestParameterization {
    /// The unfiltered request
    pub fn baseline() -> Self {
        Self::default()
    }

    pub fn from_selection(selection: &FilterSelection) -> Self {
        Self {
            status: selection.status.clone().unwrap_or_default(),
            airtime: selection.airtime.clone().unwrap_or_default(),
            agent: selection.agent.clone().unwrap_or_default(),
            paid: selection.paid.map(|p| p.to_string()).unwrap_or_default(),
        }
    }

    /// Turn the parameters back into a selection
    pub fn to_selection(&self) -> FilterSelection {
        FilterSelection::default()
            .with_status(Some(self.status.clone()))
            .with_airtime(Some(self.airtime.clone()))
            .with_agent(Some(self.agent.clone()))
            .with_paid(self.paid.parse::<bool>().ok())
    }

    pub fn to_query_string(&self) -> String {
        format!(
            "?Status={}&Airtime={}&Agent={}&Paid={}",
            urlencoding::encode(&self.status),
            urlencoding::encode(&self.airtime),
            urlencoding::encode(&self.agent),
            urlencoding::encode(&self.paid)
        )
    }
}

impl std::fmt::Display for RequestParameterization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// Choices offered for one filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub dimension: FilterDimension,
    pub title: String,
    pub form_field: String,
    /// Distinct values of the current collection, in order of first appearance
    pub values: Vec<String>,
    pub selected: Option<String>,
}

/// Distinct values of `dimension` across `records`, in first-appearance order
pub fn distinct_values(records: &[TransactionRecord], dimension: FilterDimension) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| dimension.value_of(r))
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Tracks the selection being edited in the filter panel and the
/// parameterization of the last applied request.
#[derive(Debug, Clone, Default)]
pub struct BackendFilterCoordinator {
    draft: FilterSelection,
    applied: RequestParameterization,
}

impl BackendFilterCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection currently shown in the filter panel
    pub fn draft(&self) -> &FilterSelection {
        &self.draft
    }

    /// Replace the panel selection without issuing a request
    pub fn set_draft(&mut self, selection: FilterSelection) {
        self.draft = selection;
    }

    /// Parameterization of the most recent apply or clear
    pub fn applied(&self) -> &RequestParameterization {
        &self.applied
    }

    /// Apply `selection`; the caller issues exactly one refetch with the result
    pub fn apply_filters(&mut self, selection: FilterSelection) -> RequestParameterization {
        self.applied = RequestParameterization::from_selection(&selection);
        self.draft = selection;
        self.applied.clone()
    }

    /// Unset all four selections and return the baseline parameterization
    pub fn clear_filters(&mut self) -> RequestParameterization {
        let cleared = self.draft.clone().cleared();
        self.apply_filters(cleared)
    }

    /// Filter panel contents derived from the current collection
    pub fn options(&self, records: &[TransactionRecord]) -> Vec<FilterOption> {
        FilterDimension::ALL
            .iter()
            .map(|dimension| FilterOption {
                dimension: *dimension,
                title: dimension.title().to_string(),
                form_field: dimension.form_field().to_string(),
                values: distinct_values(records, *dimension),
                selected: self.draft.value(*dimension),
            })
            .collect()
    }
}
