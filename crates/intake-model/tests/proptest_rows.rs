// SPDX-License-Identifier: Apache-2.0

use intake_model::{validate_profile, FieldMap, ProfileInput, ProgramRow};
use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::json;

fn mixed_case(input: &str, mask: u32) -> String {
    input
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 32)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn status_priority_label_always_come_out_lower_cased(
        status in "[A-Za-z ]{1,24}",
        priority in "[A-Za-z]{1,12}",
        label in "[A-Za-z &]{1,32}",
    ) {
        let mut fields = FieldMap::new();
        fields.insert("programStatus".to_string(), json!(status));
        fields.insert("programPriority".to_string(), json!(priority));
        fields.insert("programLabel".to_string(), json!(label));

        let row = ProgramRow::from_fields("p1", &fields).expect("textual fields");
        prop_assert_eq!(row.status, status.to_lowercase());
        prop_assert_eq!(row.priority, priority.to_lowercase());
        prop_assert_eq!(row.label, label.to_lowercase());
    }

    #[test]
    fn casing_of_the_stored_value_never_changes_the_emitted_row(
        mask in any::<u32>(),
    ) {
        let stored = mixed_case("In Progress", mask);
        let mut fields = FieldMap::new();
        fields.insert("programStatus".to_string(), json!(stored));
        fields.insert("programPriority".to_string(), json!("high"));
        fields.insert("programLabel".to_string(), json!("agriculture"));

        let row = ProgramRow::from_fields("p1", &fields).expect("textual fields");
        prop_assert_eq!(row.status, "in progress");
    }

    #[test]
    fn validation_is_total_and_keys_stay_within_the_declared_fields(
        username in proptest::option::of(".{0,40}"),
        email in proptest::option::of(".{0,40}"),
        bio in proptest::option::of(".{0,200}"),
        urls in proptest::option::of(proptest::collection::vec(".{0,40}", 0..4)),
    ) {
        let input = ProfileInput { username, email, bio, urls };
        if let Err(errors) = validate_profile(&input) {
            prop_assert!(!errors.is_empty());
            for (field, messages) in &errors {
                prop_assert!(["username", "email", "bio", "urls"].contains(&field.as_str()));
                prop_assert!(!messages.is_empty());
            }
        }
    }
}
