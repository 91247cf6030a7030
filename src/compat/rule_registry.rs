//! Rule registry
//!
//! Catalog of every breaking change rule across the three rule families,
//! grouped by category. Used by the engine for rule selection and by the
//! documentation renderer.

use crate::compat::categories::BreakingCategory;
use crate::compat::field_rules::{FIELD_RULES, FieldRule};
use crate::compat::resource_inventory_rules::{RESOURCE_INVENTORY_RULES, ResourceInventoryRule};
use crate::compat::resource_schema_rules::{RESOURCE_SCHEMA_RULES, ResourceSchemaRule};
use std::collections::HashSet;
use std::fmt::Write;

/// Capabilities shared by all rule families.
pub trait Rule: std::fmt::Debug + Sync {
    /// Human readable name
    fn name(&self) -> &'static str;
    /// Why the change is breaking
    fn definition(&self) -> &'static str;
    /// Stable, URL-fragment-safe identifier
    fn identifier(&self) -> &'static str;
    /// No detection function exists; the rule is documentation only
    fn undetectable(&self) -> bool;
}

macro_rules! impl_rule {
    ($($family:ty),* $(,)?) => {
        $(
            impl Rule for $family {
                fn name(&self) -> &'static str {
                    self.name
                }

                fn definition(&self) -> &'static str {
                    self.definition
                }

                fn identifier(&self) -> &'static str {
                    self.identifier
                }

                fn undetectable(&self) -> bool {
                    self.is_rule_break.is_none()
                }
            }
        )*
    };
}

impl_rule!(FieldRule, ResourceSchemaRule, ResourceInventoryRule);

/// Rules belonging to one documentation category.
#[derive(Debug, Clone)]
pub struct RuleCategoryGroup {
    pub category: BreakingCategory,
    pub rules: Vec<&'static dyn Rule>,
}

/// All rules grouped by category, in documentation order.
pub fn get_rules() -> Vec<RuleCategoryGroup> {
    let resource_rules = RESOURCE_INVENTORY_RULES
        .iter()
        .map(|rule| rule as &'static dyn Rule)
        .collect();

    let field_rules = RESOURCE_SCHEMA_RULES
        .iter()
        .map(|rule| rule as &'static dyn Rule)
        .chain(FIELD_RULES.iter().map(|rule| rule as &'static dyn Rule))
        .collect();

    vec![
        RuleCategoryGroup {
            category: BreakingCategory::Resource,
            rules: resource_rules,
        },
        RuleCategoryGroup {
            category: BreakingCategory::Field,
            rules: field_rules,
        },
    ]
}

/// Every rule, flattened in documentation order.
pub fn all_rules() -> Vec<&'static dyn Rule> {
    get_rules()
        .into_iter()
        .flat_map(|group| group.rules)
        .collect()
}

/// Identifiers of every rule, in documentation order.
pub fn rule_identifiers() -> Vec<&'static str> {
    all_rules().iter().map(|rule| rule.identifier()).collect()
}

/// Look up a rule by identifier.
pub fn find_rule(identifier: &str) -> Option<&'static dyn Rule> {
    all_rules()
        .into_iter()
        .find(|rule| rule.identifier() == identifier)
}

/// Category a rule belongs to.
pub fn rule_category(identifier: &str) -> Option<BreakingCategory> {
    get_rules()
        .into_iter()
        .find(|group| group.rules.iter().any(|rule| rule.identifier() == identifier))
        .map(|group| group.category)
}

/// Get count of all registered rules
pub fn get_rule_count() -> usize {
    RESOURCE_INVENTORY_RULES.len() + RESOURCE_SCHEMA_RULES.len() + FIELD_RULES.len()
}

/// Verify rule consistency (for testing)
pub fn verify_rules() -> Result<(), String> {
    let mut seen = HashSet::new();
    for rule in all_rules() {
        let identifier = rule.identifier();
        if identifier.is_empty() {
            return Err(format!("Rule \"{}\" has no identifier", rule.name()));
        }
        if !seen.insert(identifier) {
            return Err(format!("Duplicate rule ID: {identifier}"));
        }
    }
    Ok(())
}

/// Render the rule catalog as markdown, with one named anchor per rule.
pub fn render_markdown() -> String {
    let mut out = String::from("# Breaking change rules\n");

    for group in get_rules() {
        let _ = write!(
            out,
            "\n## {}\n\n{}\n",
            group.category.name(),
            group.category.description()
        );
        for rule in group.rules {
            let _ = write!(
                out,
                "\n### <a name=\"{}\"></a> {}\n\n{}\n",
                rule.identifier(),
                rule.name(),
                rule.definition()
            );
            if rule.undetectable() {
                out.push_str("\nThis rule is not detected automatically.\n");
            }
        }
    }

    out
}
