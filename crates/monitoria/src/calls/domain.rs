use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::evaluations::Evaluation;
use crate::users::UserId;

/// Identifier wrapper for call records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallId(pub i64);

/// Lifecycle of a call ticket. Values the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

impl CallStatus {
    pub fn ordered() -> [Self; 4] {
        [Self::Open, Self::InProgress, Self::Resolved, Self::Closed]
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CallStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            _ => Self::Other(value),
        }
    }
}

impl From<CallStatus> for String {
    fn from(value: CallStatus) -> Self {
        value.key().to_string()
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Open
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallPriority {
    Low,
    Medium,
    High,
    Urgent,
    Other(String),
}

impl CallPriority {
    pub fn ordered() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Urgent]
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CallPriority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Other(value),
        }
    }
}

impl From<CallPriority> for String {
    fn from(value: CallPriority) -> Self {
        value.key().to_string()
    }
}

impl Default for CallPriority {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallCategory {
    Support,
    Sales,
    Complaint,
    Question,
    Cancellation,
    Other(String),
}

impl CallCategory {
    pub fn ordered() -> [Self; 5] {
        [
            Self::Support,
            Self::Sales,
            Self::Complaint,
            Self::Question,
            Self::Cancellation,
        ]
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Support => "support",
            Self::Sales => "sales",
            Self::Complaint => "complaint",
            Self::Question => "question",
            Self::Cancellation => "cancellation",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Support => "Support",
            Self::Sales => "Sales",
            Self::Complaint => "Complaint",
            Self::Question => "Question",
            Self::Cancellation => "Cancellation",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CallCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "support" => Self::Support,
            "sales" => Self::Sales,
            "complaint" => Self::Complaint,
            "question" => Self::Question,
            "cancellation" => Self::Cancellation,
            _ => Self::Other(value),
        }
    }
}

impl From<CallCategory> for String {
    fn from(value: CallCategory) -> Self {
        value.key().to_string()
    }
}

/// Operator attached to a call, when one has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
}

/// Call record. List endpoints omit `evaluations`; the detail endpoint includes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: CallId,
    pub protocol: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub priority: CallPriority,
    #[serde(default)]
    pub category: Option<CallCategory>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub operator_id: Option<UserId>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
}

impl Call {
    /// Nested operator first, then the flat `operator_name` the list endpoint sends.
    pub fn operator_display_name(&self) -> Option<&str> {
        self.operator
            .as_ref()
            .map(|operator| operator.full_name.as_str())
            .or(self.operator_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Whole minutes, preferring the explicit minute count over rounded seconds.
    pub fn duration_in_minutes(&self) -> Option<u32> {
        self.duration_minutes.or_else(|| {
            self.duration_seconds
                .map(|seconds| (f64::from(seconds) / 60.0).round() as u32)
        })
    }

    /// A new evaluation is only offered while the call has none.
    pub fn accepts_new_evaluation(&self) -> bool {
        self.evaluations.is_empty()
    }
}
