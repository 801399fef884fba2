//! Patient models.

use serde::{Deserialize, Serialize};

/// A stored patient record. Patients are append-only once registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Engine-assigned identifier
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Calendar date at UTC+05:30, `YYYY-MM-DD`
    pub date_of_birth: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Date assigned by the engine at insert time
    pub created_at: Option<String>,
}

impl Patient {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration payload, in the shape the registration form submits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    /// Date or timestamp; normalized before storage
    pub date_of_birth: String,
    pub gender: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewPatient {
    /// Create a registration with required fields only.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: date_of_birth.into(),
            gender: gender.into(),
            email: None,
            phone: None,
            address: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Email as stored: blank becomes NULL.
    pub fn stored_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn stored_phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn stored_address(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
