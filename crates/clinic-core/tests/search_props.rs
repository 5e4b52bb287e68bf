//! Property tests for patient search.

use clinic_core::{ClinicManager, Database, LocalStore, MemoryKv, NewPatient, Patient};
use proptest::prelude::*;

const NAME: &str = "[A-Za-zÉéÑñÜüÅå][A-Za-zÉéÑñÜüÅå ]{0,7}";

fn expected_matches(patients: &[Patient], term: &str) -> Vec<String> {
    let needle = term.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            term.trim().is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.phone.to_lowercase().contains(&needle)
        })
        .map(|p| p.id.clone())
        .collect()
}

fn backings() -> Vec<ClinicManager> {
    vec![
        ClinicManager::new(Database::open_in_memory().unwrap()),
        ClinicManager::new(LocalStore::new(MemoryKv::new())),
    ]
}

fn register(manager: &mut ClinicManager, people: &[(String, String)]) -> Vec<Patient> {
    // Duplicate phones are rejected; only successes count.
    people
        .iter()
        .filter_map(|(name, phone)| {
            manager
                .create_patient(NewPatient::new(name.clone(), phone.clone()))
                .ok()
        })
        .collect()
}

fn listed_ids(manager: &ClinicManager, term: &str) -> Vec<String> {
    manager
        .list_patients(Some(term))
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn search_returns_exact_matching_subset_in_creation_order(
        people in prop::collection::vec((NAME, "[0-9]{2,5}"), 0..12),
        term in "[A-Za-z0-9ÉéÑñÜü ]{0,3}",
    ) {
        for mut manager in backings() {
            let created = register(&mut manager, &people);
            prop_assert_eq!(listed_ids(&manager, &term), expected_matches(&created, &term));
        }
    }

    #[test]
    fn uppercased_slice_of_name_finds_patient(
        name in NAME,
        start in 0usize..8,
        len in 1usize..4,
    ) {
        // Registration trims the name; slice what gets stored.
        let name = name.trim().to_string();
        let term: String = name.chars().skip(start).take(len).collect::<String>().to_uppercase();
        prop_assume!(!term.trim().is_empty());

        for mut manager in backings() {
            let patient = manager
                .create_patient(NewPatient::new(name.clone(), "123"))
                .unwrap();
            prop_assert_eq!(listed_ids(&manager, &term), vec![patient.id]);
        }
    }
}
