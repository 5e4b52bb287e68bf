//! Patient/visit manager.
//!
//! All create/read/search/delete logic lives here and runs against whatever
//! [`RecordStore`] the manager was constructed with.

use crate::export::PatientDirectory;
use crate::models::{NewPatient, NewVisit, Patient, PatientWithVisits, Visit};
use crate::store::RecordStore;
use crate::{ClinicError, ClinicResult};

/// Clinic operations over an injected record store.
pub struct ClinicManager {
    store: Box<dyn RecordStore>,
}

impl ClinicManager {
    pub fn new<S: RecordStore + 'static>(store: S) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Register a new patient.
    pub fn create_patient(&mut self, input: NewPatient) -> ClinicResult<Patient> {
        let patient = input.into_patient()?;
        self.store.insert_patient(&patient).inspect_err(|e| {
            tracing::warn!(phone = %patient.phone, error = %e, "Patient registration rejected");
        })?;

        tracing::info!(patient_id = %patient.id, "Patient registered");
        Ok(patient)
    }

    /// Patients whose name or phone contains `term`, in registration order.
    ///
    /// A missing or blank term lists everyone. Any other term is matched
    /// as given, surrounding spaces included.
    pub fn list_patients(&self, term: Option<&str>) -> ClinicResult<Vec<Patient>> {
        let term = term.filter(|t| !t.trim().is_empty());
        let patients = self.store.find_patients(term)?;
        tracing::debug!(?term, count = patients.len(), "Listed patients");
        Ok(patients)
    }

    /// A patient with its full visit history.
    pub fn get_patient_with_visits(&self, patient_id: &str) -> ClinicResult<PatientWithVisits> {
        let patient = self.require_patient(patient_id)?;
        let visits = self.store.find_visits(patient_id)?;
        Ok(PatientWithVisits { patient, visits })
    }

    /// Delete a patient and every visit it owns.
    ///
    /// Returns the number of visits removed.
    pub fn delete_patient(&mut self, patient_id: &str) -> ClinicResult<usize> {
        let outcome = self.store.delete_patient_cascade(patient_id)?;
        if !outcome.patient_removed {
            return Err(ClinicError::NotFound(format!("patient {}", patient_id)));
        }

        tracing::info!(
            patient_id,
            visits_removed = outcome.visits_removed,
            "Patient deleted"
        );
        Ok(outcome.visits_removed)
    }

    /// Record a visit for an existing patient.
    pub fn add_visit(&mut self, patient_id: &str, input: NewVisit) -> ClinicResult<Visit> {
        let visit = input.into_visit(patient_id)?;
        self.require_patient(patient_id)?;
        self.store.insert_visit(&visit)?;

        tracing::info!(patient_id, visit_id = %visit.id, "Visit recorded");
        Ok(visit)
    }

    /// Remove one visit from a patient's history.
    pub fn delete_visit(&mut self, patient_id: &str, visit_id: &str) -> ClinicResult<()> {
        self.require_patient(patient_id)?;
        if !self.store.delete_visit(patient_id, visit_id)? {
            return Err(ClinicError::NotFound(format!(
                "visit {} of patient {}",
                visit_id, patient_id
            )));
        }

        tracing::info!(patient_id, visit_id, "Visit deleted");
        Ok(())
    }

    /// Snapshot of every patient for download, dated today (UTC).
    pub fn export_directory(&self) -> ClinicResult<PatientDirectory> {
        let patients = self.store.find_patients(None)?;
        tracing::info!(count = patients.len(), "Exported patient directory");
        Ok(PatientDirectory::render(
            &patients,
            chrono::Utc::now().date_naive(),
        ))
    }

    fn require_patient(&self, patient_id: &str) -> ClinicResult<Patient> {
        self.store
            .find_patient(patient_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", patient_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::local::{LocalStore, MemoryKv};

    fn managers() -> Vec<(&'static str, ClinicManager)> {
        vec![
            ("sqlite", ClinicManager::new(Database::open_in_memory().unwrap())),
            ("local", ClinicManager::new(LocalStore::new(MemoryKv::new()))),
        ]
    }

    #[test]
    fn test_create_patient_validation() {
        for (backing, mut manager) in managers() {
            let err = manager.create_patient(NewPatient::new("", "123")).unwrap_err();
            assert!(matches!(err, ClinicError::Validation(_)), "{backing}");

            let err = manager.create_patient(NewPatient::new("Max", "")).unwrap_err();
            assert!(matches!(err, ClinicError::Validation(_)), "{backing}");

            assert!(manager.list_patients(None).unwrap().is_empty(), "{backing}");
        }
    }

    #[test]
    fn test_duplicate_phone_conflict() {
        for (backing, mut manager) in managers() {
            manager
                .create_patient(NewPatient::new("John", "1234567890"))
                .unwrap();
            let err = manager
                .create_patient(NewPatient::new("Johnny", "1234567890"))
                .unwrap_err();
            assert!(matches!(err, ClinicError::Conflict(_)), "{backing}");
        }
    }

    #[test]
    fn test_blank_search_lists_all() {
        for (backing, mut manager) in managers() {
            manager.create_patient(NewPatient::new("John", "1")).unwrap();
            manager.create_patient(NewPatient::new("Jane", "2")).unwrap();

            assert_eq!(manager.list_patients(None).unwrap().len(), 2, "{backing}");
            assert_eq!(manager.list_patients(Some("")).unwrap().len(), 2, "{backing}");
            assert_eq!(manager.list_patients(Some("  ")).unwrap().len(), 2, "{backing}");
            assert_eq!(manager.list_patients(Some("jan")).unwrap().len(), 1, "{backing}");
            assert!(manager.list_patients(Some(" jan ")).unwrap().is_empty(), "{backing}");
        }
    }

    #[test]
    fn test_search_term_not_trimmed() {
        for (backing, mut manager) in managers() {
            manager.create_patient(NewPatient::new("John Doe", "1")).unwrap();
            manager.create_patient(NewPatient::new("Doerr", "2")).unwrap();

            let names: Vec<_> = manager
                .list_patients(Some(" Doe"))
                .unwrap()
                .into_iter()
                .map(|p| p.name)
                .collect();
            assert_eq!(names, vec!["John Doe"], "{backing}");
        }
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        for (backing, mut manager) in managers() {
            let elodie = manager
                .create_patient(NewPatient::new("Élodie Ñúñez", "1"))
                .unwrap();
            manager.create_patient(NewPatient::new("Max", "2")).unwrap();

            for term in ["élodie", "ñúñez", "ÑÚÑEZ"] {
                let listed = manager.list_patients(Some(term)).unwrap();
                assert_eq!(listed, vec![elodie.clone()], "{backing}: {term}");
            }
        }
    }

    #[test]
    fn test_add_visit_unknown_patient() {
        for (backing, mut manager) in managers() {
            let err = manager
                .add_visit("missing", NewVisit::new("Flu", "2024-01-10"))
                .unwrap_err();
            assert!(matches!(err, ClinicError::NotFound(_)), "{backing}");
        }
    }

    #[test]
    fn test_add_visit_validation_before_lookup() {
        for (backing, mut manager) in managers() {
            let err = manager
                .add_visit("missing", NewVisit::new("", "2024-01-10"))
                .unwrap_err();
            assert!(matches!(err, ClinicError::Validation(_)), "{backing}");
        }
    }

    #[test]
    fn test_delete_visit() {
        for (backing, mut manager) in managers() {
            let patient = manager.create_patient(NewPatient::new("John", "1")).unwrap();
            let visit = manager
                .add_visit(&patient.id, NewVisit::new("Flu", "2024-01-10"))
                .unwrap();

            manager.delete_visit(&patient.id, &visit.id).unwrap();
            let err = manager.delete_visit(&patient.id, &visit.id).unwrap_err();
            assert!(matches!(err, ClinicError::NotFound(_)), "{backing}");

            let err = manager.delete_visit("missing", &visit.id).unwrap_err();
            assert!(matches!(err, ClinicError::NotFound(_)), "{backing}");

            let details = manager.get_patient_with_visits(&patient.id).unwrap();
            assert!(details.visits.is_empty(), "{backing}");
        }
    }

    #[test]
    fn test_delete_unknown_patient() {
        for (backing, mut manager) in managers() {
            let err = manager.delete_patient("missing").unwrap_err();
            assert!(matches!(err, ClinicError::NotFound(_)), "{backing}");
        }
    }

    #[test]
    fn test_export_directory() {
        for (backing, mut manager) in managers() {
            manager
                .create_patient(
                    NewPatient::new("John Doe", "1234567890").with_address("123 Main St"),
                )
                .unwrap();
            let directory = manager.export_directory().unwrap();
            assert_eq!(directory.entries.len(), 1, "{backing}");
            assert!(directory.to_text().contains("Name: John Doe"), "{backing}");
        }
    }
}
