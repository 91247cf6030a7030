//! Checks the rule catalog against the published documentation.

use schema_breaking_changes::compat::rule_registry::{self, Rule};
use schema_breaking_changes::compat::types::documentation_reference;
use std::collections::HashSet;

const RULES_DOC: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/docs/breaking-changes.md"
));

#[test]
fn test_identifiers_are_unique_across_families() {
    let identifiers = rule_registry::rule_identifiers();
    let unique: HashSet<&str> = identifiers.iter().copied().collect();
    assert_eq!(unique.len(), identifiers.len());
    assert_eq!(identifiers.len(), rule_registry::get_rule_count());
}

#[test]
fn test_identifiers_are_url_fragment_safe() {
    for identifier in rule_registry::rule_identifiers() {
        assert!(
            identifier
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "identifier {identifier} is not a valid anchor"
        );
    }
}

#[test]
fn test_every_rule_is_documented() {
    for rule in rule_registry::all_rules() {
        let anchor = format!("<a name=\"{}\"></a>", rule.identifier());
        assert!(
            RULES_DOC.contains(&anchor),
            "rule {} has no anchor in docs/breaking-changes.md",
            rule.identifier()
        );
        assert!(RULES_DOC.contains(rule.definition()));
    }
}

#[test]
fn test_documentation_matches_rendered_catalog() {
    assert_eq!(RULES_DOC, rule_registry::render_markdown());
}

#[test]
fn test_undetectable_rules() {
    let undetectable: Vec<&str> = rule_registry::all_rules()
        .into_iter()
        .filter(|rule| rule.undetectable())
        .map(|rule| rule.identifier())
        .collect();

    assert_eq!(
        undetectable,
        vec![
            "resource-id",
            "resource-import-format",
            "field-changing-data-format"
        ]
    );
}

#[test]
fn test_documentation_reference_points_at_anchor() {
    assert_eq!(
        documentation_reference("field-oc-to-c"),
        "https://googlecloudplatform.github.io/magic-modules/develop/breaking-changes#field-oc-to-c"
    );
}
