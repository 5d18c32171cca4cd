//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has an ETag header.
pub fn assert_has_etag(response: &TestResponse) {
    assert!(
        response.headers().contains_key("etag"),
        "Expected ETag header"
    );
}

/// Asserts that the response has the given Location header.
pub fn assert_location(response: &TestResponse, expected: &str) {
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok());
    assert_eq!(location, Some(expected), "Unexpected Location header");
}

/// Asserts that the response body is a FHIR resource of the expected type.
pub fn assert_resource_type(body: &Value, expected: &str) {
    let actual = body
        .get("resourceType")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    assert_eq!(
        actual, expected,
        "Expected resourceType {}, got {}",
        expected, actual
    );
}

/// Asserts that the response body is an OperationOutcome.
pub fn assert_operation_outcome(body: &Value) {
    assert_resource_type(body, "OperationOutcome");
}

/// Returns the issues of an OperationOutcome.
pub fn issues(body: &Value) -> &[Value] {
    assert_operation_outcome(body);
    body.get("issue")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .expect("Expected issues array in OperationOutcome")
}

/// Returns the `diagnostics` strings of an OperationOutcome's issues.
pub fn diagnostics(body: &Value) -> Vec<&str> {
    issues(body)
        .iter()
        .filter_map(|issue| issue.get("diagnostics").and_then(|v| v.as_str()))
        .collect()
}

/// Asserts that some issue's diagnostics contains every given fragment.
pub fn assert_diagnostics_contain(body: &Value, fragments: &[&str]) {
    let found = diagnostics(body);
    assert!(
        found
            .iter()
            .any(|d| fragments.iter().all(|fragment| d.contains(fragment))),
        "No diagnostics contain {:?}: {:?}",
        fragments,
        found
    );
}

/// Asserts that the OperationOutcome has an issue with the expected code.
pub fn assert_issue_code(body: &Value, expected: &str) {
    let has_code = issues(body)
        .iter()
        .any(|issue| issue.get("code").and_then(|v| v.as_str()) == Some(expected));

    assert!(has_code, "Expected issue with code {}", expected);
}

/// Asserts that the Bundle has the expected type and number of entries.
pub fn assert_bundle(body: &Value, bundle_type: &str, entries: usize) {
    assert_resource_type(body, "Bundle");
    assert_eq!(body["type"], bundle_type, "Unexpected Bundle type");
    let actual = body
        .get("entry")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .unwrap_or(0);
    assert_eq!(
        actual, entries,
        "Expected {} bundle entries, got {}",
        entries, actual
    );
}

/// Returns the `contained` ids of a resource, in order.
pub fn contained_ids(resource: &Value) -> Vec<&str> {
    resource
        .get("contained")
        .and_then(|v| v.as_array())
        .map(|entries| entries.iter().filter_map(|e| e["id"].as_str()).collect())
        .unwrap_or_default()
}
