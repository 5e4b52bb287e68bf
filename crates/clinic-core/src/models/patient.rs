//! Patient models.

use serde::{Deserialize, Serialize};

use super::visit::Visit;
use crate::{ClinicError, ClinicResult};

/// A registered clinic patient.
///
/// Name, phone and address are fixed at registration; a patient only
/// changes through the visits recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Generated UUID, immutable
    pub id: String,
    /// Patient name (non-empty)
    pub name: String,
    /// Contact phone (non-empty, unique across patients)
    pub phone: String,
    /// Postal address
    #[serde(default)]
    pub address: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Patient {
    /// Create a new patient with a fresh id.
    pub fn new(name: String, phone: String, address: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone,
            address,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether `name` or `phone` contains `term`, ignoring case.
    ///
    /// Both sides are folded with [`str::to_lowercase`]. An empty term
    /// matches every patient.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.phone.to_lowercase().contains(&needle)
    }
}

/// Registration request for a new patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Validate the request and build the patient record it describes.
    pub fn into_patient(self) -> ClinicResult<Patient> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClinicError::Validation("name is required".into()));
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(ClinicError::Validation("phone is required".into()));
        }

        Ok(Patient::new(
            name.to_string(),
            phone.to_string(),
            non_blank(self.address),
        ))
    }
}

/// A patient together with its full visit history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientWithVisits {
    pub patient: Patient,
    pub visits: Vec<Visit>,
}

/// Collapse blank optional text to `None`, trimming anything kept.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("John Doe".into(), "1234567890".into(), None);
        assert_eq!(patient.name, "John Doe");
        assert_eq!(patient.phone, "1234567890");
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_into_patient_trims_fields() {
        let patient = NewPatient::new("  Jane Smith ", " 0987654321")
            .with_address("   ")
            .into_patient()
            .unwrap();
        assert_eq!(patient.name, "Jane Smith");
        assert_eq!(patient.phone, "0987654321");
        assert_eq!(patient.address, None);
    }

    #[test]
    fn test_into_patient_requires_name_and_phone() {
        let err = NewPatient::new("", "123").into_patient().unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));

        let err = NewPatient::new("Max", "  ").into_patient().unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
    }

    #[test]
    fn test_matches_name_or_phone() {
        let patient = Patient::new("John Doe".into(), "1234567890".into(), None);
        assert!(patient.matches(""));
        assert!(patient.matches("john"));
        assert!(patient.matches("DOE"));
        assert!(patient.matches("4567"));
        assert!(!patient.matches("smith"));
        assert!(!patient.matches("j.hn"));
    }

    #[test]
    fn test_matches_folds_non_ascii_case() {
        let patient = Patient::new("Élodie Ñúñez".into(), "555".into(), None);
        assert!(patient.matches("élodie"));
        assert!(patient.matches("ÉLODIE"));
        assert!(patient.matches("ñúñez"));
        assert!(!patient.matches("elodie"));
    }

    #[test]
    fn test_camel_case_json() {
        let patient = Patient::new("Max".into(), "555".into(), Some("1 Elm St".into()));
        let json = serde_json::to_value(&patient).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["address"], "1 Elm St");
    }
}
