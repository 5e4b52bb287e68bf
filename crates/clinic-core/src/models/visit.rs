//! Visit models.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::patient::non_blank;
use crate::{ClinicError, ClinicResult};

/// A single clinic visit, owned by exactly one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    /// Generated UUID, immutable
    pub id: String,
    /// Owning patient id, never reassigned
    pub patient_id: String,
    /// Disease or diagnosis
    pub disease: String,
    /// Medication or prescription
    #[serde(default)]
    pub medication: Option<String>,
    /// Calendar date of the visit
    pub date: NaiveDate,
    /// Creation timestamp
    pub created_at: String,
}

impl Visit {
    /// Create a new visit for a patient.
    pub fn new(
        patient_id: String,
        disease: String,
        medication: Option<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            disease,
            medication,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Request to record a visit.
///
/// `date` is kept as raw text so that a missing or malformed date is
/// reported as a validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewVisit {
    #[serde(default)]
    pub disease: String,
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub date: String,
}

impl NewVisit {
    pub fn new(disease: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            medication: None,
            date: date.into(),
        }
    }

    pub fn with_medication(mut self, medication: impl Into<String>) -> Self {
        self.medication = Some(medication.into());
        self
    }

    /// Validate the request and build a visit owned by `patient_id`.
    pub fn into_visit(self, patient_id: &str) -> ClinicResult<Visit> {
        let disease = self.disease.trim();
        if disease.is_empty() {
            return Err(ClinicError::Validation("disease is required".into()));
        }
        let raw_date = self.date.trim();
        if raw_date.is_empty() {
            return Err(ClinicError::Validation("date is required".into()));
        }
        let date = parse_visit_date(raw_date).ok_or_else(|| {
            ClinicError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw_date))
        })?;

        Ok(Visit::new(
            patient_id.to_string(),
            disease.to_string(),
            non_blank(self.medication),
            date,
        ))
    }
}

/// Parse a visit date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep their UTC calendar date.
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.naive_utc().date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_visit() {
        let visit = NewVisit::new("Flu", "2024-01-10")
            .with_medication("Tamiflu")
            .into_visit("patient-1")
            .unwrap();

        assert_eq!(visit.patient_id, "patient-1");
        assert_eq!(visit.disease, "Flu");
        assert_eq!(visit.medication, Some("Tamiflu".into()));
        assert_eq!(visit.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(visit.id.len(), 36);
    }

    #[test]
    fn test_into_visit_requires_disease_and_date() {
        let err = NewVisit::new(" ", "2024-01-10")
            .into_visit("p")
            .unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));

        let err = NewVisit::new("Flu", "").into_visit("p").unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));

        let err = NewVisit::new("Flu", "10/01/2024").into_visit("p").unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
    }

    #[test]
    fn test_blank_medication_dropped() {
        let visit = NewVisit::new("Cold", "2024-02-01")
            .with_medication("")
            .into_visit("p")
            .unwrap();
        assert_eq!(visit.medication, None);
    }

    #[test]
    fn test_parse_visit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_visit_date("2024-03-05"), Some(expected));
        assert_eq!(parse_visit_date("2024-03-05T10:00:00Z"), Some(expected));
        assert_eq!(
            parse_visit_date("2024-03-05T01:00:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(parse_visit_date("2024-02-30"), None);
    }

    #[test]
    fn test_visit_json_shape() {
        let visit = NewVisit::new("Flu", "2024-01-10")
            .into_visit("patient-1")
            .unwrap();
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["patientId"], "patient-1");
        assert_eq!(json["date"], "2024-01-10");
    }
}
