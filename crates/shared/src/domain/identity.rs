use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn from_claim(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// Verified caller, as produced by the identity capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn ensure_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Admin access required".into()))
        }
    }

    /// Admins may access anything; everyone else only what they own.
    pub fn ensure_owner_or_admin(&self, owner_id: Option<&str>) -> Result<(), ServiceError> {
        if self.is_admin() || owner_id == Some(self.subject_id.as_str()) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "You do not have access to this resource".into(),
            ))
        }
    }
}

/// Who is calling a public endpoint that also accepts authenticated callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Guest,
    Authenticated(Identity),
}

impl Caller {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Caller::Guest => None,
            Caller::Authenticated(identity) => Some(identity),
        }
    }
}
