//! Test assertions for records.

use serde_json::Value;

use crate::core::{content_text, role_of, Record};

/// Returns `(role, content)` pairs of a record's messages.
///
/// Panics if the record has no message list.
#[must_use]
pub fn message_pairs(record: &Record) -> Vec<(String, String)> {
    let messages = record
        .messages()
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("Expected a message list, got {:?}", record.messages()));

    messages
        .iter()
        .map(|m| (role_of(m).unwrap_or_default().to_string(), content_text(m).into_owned()))
        .collect()
}

/// Asserts that a record's messages have the given roles, in order.
pub fn assert_roles(record: &Record, expected: &[&str]) {
    let roles: Vec<String> = message_pairs(record).into_iter().map(|(role, _)| role).collect();
    assert_eq!(roles, expected, "Expected roles {expected:?}, got {roles:?}");
}

/// Asserts that a record's message contents equal the expected values, in order.
pub fn assert_contents(record: &Record, expected: &[&str]) {
    let contents: Vec<String> = message_pairs(record).into_iter().map(|(_, c)| c).collect();
    assert_eq!(contents, expected, "Expected contents {expected:?}, got {contents:?}");
}

/// Asserts that a record has a field.
pub fn assert_has_field(record: &Record, field: &str) {
    assert!(
        record.contains(field),
        "Expected record to contain field '{}', but it doesn't. Fields: {:?}",
        field,
        record.field_names()
    );
}

/// Asserts that two records are equal apart from the listed fields.
pub fn assert_unchanged_except(before: &Record, after: &Record, changed: &[&str]) {
    for (field, value) in before.fields() {
        if changed.contains(&field.as_str()) {
            continue;
        }
        assert_eq!(
            after.get(field),
            Some(value),
            "Field '{field}' changed unexpectedly"
        );
    }
    for field in after.field_names() {
        assert!(
            before.contains(field) || changed.contains(&field),
            "Unexpected new field '{field}'"
        );
    }
}
