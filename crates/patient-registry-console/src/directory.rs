//! Patient directory lookups.

use patient_registry_core::{GatewayResult, Patient, StorageGateway};

/// Search by name, or list everyone when the term is blank.
///
/// A non-blank term is searched exactly as typed, surrounding spaces included.
pub fn find_patients(gateway: &StorageGateway, term: &str) -> GatewayResult<Vec<Patient>> {
    if term.trim().is_empty() {
        gateway.list_patients()
    } else {
        gateway.search_patients_by_name(term)
    }
}

/// Footer line, e.g. "3 patients listed".
pub fn listing_summary(count: usize) -> String {
    let noun = if count == 1 { "patient" } else { "patients" };
    format!("{count} {noun} listed")
}
