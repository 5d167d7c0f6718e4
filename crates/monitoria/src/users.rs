use serde::{Deserialize, Serialize};

/// Identifier wrapper for user accounts (operators, supervisors, admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Access tier granted by the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Operator,
    Supervisor,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Operator => "Operator",
            Self::Supervisor => "Supervisor",
            Self::Admin => "Admin",
        }
    }
}

/// Authenticated account as returned by `/auth/login` and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Supervisors and admins file and edit evaluations.
    pub fn can_evaluate(&self) -> bool {
        matches!(self.role, UserRole::Supervisor | UserRole::Admin)
    }

    /// Only admins may delete evaluations.
    pub fn can_delete_evaluations(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Operators are limited to their own statistics.
    pub fn can_view_operator_performance(&self) -> bool {
        self.role != UserRole::Operator
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
