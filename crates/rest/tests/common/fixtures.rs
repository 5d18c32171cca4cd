//! Test data fixtures.
//!
//! Builders for parent resources with and without contained entries.

use serde_json::{Value, json};

/// A MedicationRequest with one contained Medication referenced as `#med1`.
pub fn medication_request(id: &str) -> Value {
    json!({
        "resourceType": "MedicationRequest",
        "id": id,
        "status": "active",
        "intent": "order",
        "contained": [medication("med1")],
        "medicationReference": {"reference": "#med1"},
        "subject": {"reference": "Patient/p1"}
    })
}

/// A MedicationRequest without contained resources.
pub fn bare_medication_request(id: &str) -> Value {
    json!({
        "resourceType": "MedicationRequest",
        "id": id,
        "status": "active",
        "intent": "order",
        "medicationCodeableConcept": {"text": "Amoxicillin 250mg"},
        "subject": {"reference": "Patient/p1"}
    })
}

/// A contained Medication.
pub fn medication(id: &str) -> Value {
    json!({
        "resourceType": "Medication",
        "id": id,
        "code": {"text": "Amoxicillin 250mg"}
    })
}

/// A contained Practitioner.
pub fn practitioner(id: &str, family: &str) -> Value {
    json!({
        "resourceType": "Practitioner",
        "id": id,
        "name": [{"family": family}]
    })
}

/// An Observation with a contained Practitioner performer and a contained
/// Device referenced from a note.
pub fn observation(id: &str) -> Value {
    json!({
        "resourceType": "Observation",
        "id": id,
        "status": "final",
        "code": {"text": "Heart rate"},
        "contained": [
            practitioner("pr1", "Chalmers"),
            {"resourceType": "Device", "id": "dev1"},
            practitioner("pr2", "Okafor")
        ],
        "performer": [{"reference": "#pr1"}, {"reference": "#pr2"}],
        "device": {"reference": "#dev1"}
    })
}

/// A Condition with a contained Practitioner asserter.
pub fn condition(id: &str) -> Value {
    json!({
        "resourceType": "Condition",
        "id": id,
        "code": {"text": "Hypertension"},
        "contained": [practitioner("pr1", "Nakamura")],
        "asserter": {"reference": "#pr1"}
    })
}
