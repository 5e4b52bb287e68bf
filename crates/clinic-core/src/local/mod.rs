//! Local blob store.
//!
//! The whole patient list, each patient carrying its visits, lives as one
//! JSON array under [`PATIENTS_KEY`]. Every operation reads the blob and
//! every mutation writes all of it back.
//!
//! ```text
//! [
//!   { "id": "...", "name": "...", "phone": "...", "address": null,
//!     "createdAt": "...",
//!     "visits": [ { "id": "...", "disease": "...", "medication": null,
//!                   "date": "2024-01-10", "createdAt": "..." } ] }
//! ]
//! ```

mod kv;

pub use kv::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Patient, Visit};
use crate::store::{CascadeOutcome, RecordStore, StoreError, StoreResult};

/// Key holding the serialized patient list.
pub const PATIENTS_KEY: &str = "patients";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPatient {
    #[serde(flatten)]
    patient: Patient,
    #[serde(default)]
    visits: Vec<StoredVisit>,
}

/// Embedded visit; the owner is implied by nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredVisit {
    id: String,
    disease: String,
    #[serde(default)]
    medication: Option<String>,
    date: NaiveDate,
    created_at: String,
}

impl StoredVisit {
    fn from_visit(visit: &Visit) -> Self {
        Self {
            id: visit.id.clone(),
            disease: visit.disease.clone(),
            medication: visit.medication.clone(),
            date: visit.date,
            created_at: visit.created_at.clone(),
        }
    }

    fn into_visit(self, patient_id: &str) -> Visit {
        Visit {
            id: self.id,
            patient_id: patient_id.to_string(),
            disease: self.disease,
            medication: self.medication,
            date: self.date,
            created_at: self.created_at,
        }
    }
}

/// Record store over a single key-value blob.
pub struct LocalStore<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> LocalStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Write the sample patients if the blob is missing or empty.
    ///
    /// Returns whether anything was written.
    pub fn seed_sample_patients(&mut self) -> StoreResult<bool> {
        if !self.load()?.is_empty() {
            return Ok(false);
        }

        let samples: Vec<StoredPatient> = sample_patients()
            .into_iter()
            .map(|patient| StoredPatient {
                patient,
                visits: Vec::new(),
            })
            .collect();
        self.save(&samples)?;
        tracing::info!(count = samples.len(), "Seeded sample patients");
        Ok(true)
    }

    /// Access the underlying medium.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    fn load(&self) -> StoreResult<Vec<StoredPatient>> {
        match self.kv.get(PATIENTS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&mut self, records: &[StoredPatient]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.set(PATIENTS_KEY, &raw)
    }
}

impl<K: KeyValueStore> RecordStore for LocalStore<K> {
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.patient.phone == patient.phone) {
            return Err(StoreError::Conflict(format!(
                "phone {} is already registered",
                patient.phone
            )));
        }
        if records.iter().any(|r| r.patient.id == patient.id) {
            return Err(StoreError::Conflict(format!(
                "patient id {} already exists",
                patient.id
            )));
        }

        records.push(StoredPatient {
            patient: patient.clone(),
            visits: Vec::new(),
        });
        self.save(&records)
    }

    fn find_patients(&self, term: Option<&str>) -> StoreResult<Vec<Patient>> {
        let term = term.unwrap_or("");
        Ok(self
            .load()?
            .into_iter()
            .map(|r| r.patient)
            .filter(|p| p.matches(term))
            .collect())
    }

    fn find_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.patient.id == id)
            .map(|r| r.patient))
    }

    fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.delete_patient_cascade(id)?.patient_removed)
    }

    fn insert_visit(&mut self, visit: &Visit) -> StoreResult<()> {
        let mut records = self.load()?;
        let owner = records
            .iter_mut()
            .find(|r| r.patient.id == visit.patient_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("patient {}", visit.patient_id))
            })?;
        owner.visits.push(StoredVisit::from_visit(visit));
        self.save(&records)
    }

    fn find_visits(&self, patient_id: &str) -> StoreResult<Vec<Visit>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.patient.id == patient_id)
            .map(|r| {
                r.visits
                    .into_iter()
                    .map(|v| v.into_visit(patient_id))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn delete_visit(&mut self, patient_id: &str, visit_id: &str) -> StoreResult<bool> {
        let mut records = self.load()?;
        let Some(owner) = records.iter_mut().find(|r| r.patient.id == patient_id) else {
            return Ok(false);
        };

        let before = owner.visits.len();
        owner.visits.retain(|v| v.id != visit_id);
        if owner.visits.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn delete_visits(&mut self, patient_id: &str) -> StoreResult<usize> {
        let mut records = self.load()?;
        let Some(owner) = records.iter_mut().find(|r| r.patient.id == patient_id) else {
            return Ok(0);
        };

        let removed = std::mem::take(&mut owner.visits).len();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    /// Patient and embedded visits go in the same blob rewrite.
    fn delete_patient_cascade(&mut self, id: &str) -> StoreResult<CascadeOutcome> {
        let mut records = self.load()?;
        let Some(index) = records.iter().position(|r| r.patient.id == id) else {
            return Ok(CascadeOutcome {
                patient_removed: false,
                visits_removed: 0,
            });
        };

        let removed = records.remove(index);
        self.save(&records)?;
        Ok(CascadeOutcome {
            patient_removed: true,
            visits_removed: removed.visits.len(),
        })
    }
}

/// Patients written by [`LocalStore::seed_sample_patients`].
pub fn sample_patients() -> Vec<Patient> {
    let created_at = chrono::Utc::now().to_rfc3339();
    vec![
        Patient {
            id: "1".into(),
            name: "John Doe".into(),
            phone: "1234567890".into(),
            address: Some("123 Main St".into()),
            created_at: created_at.clone(),
        },
        Patient {
            id: "2".into(),
            name: "Jane Smith".into(),
            phone: "0987654321".into(),
            address: Some("456 Oak Ave".into()),
            created_at,
        },
    ]
}
