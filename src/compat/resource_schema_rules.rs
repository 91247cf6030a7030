//! Resource schema rules
//!
//! These rules look at all field diffs of a resource at once and report the
//! field names that violate them.

use crate::compat::types::{BreakingChange, documentation_reference, render_placeholders};
use crate::diff::ResourceDiff;

/// Detection function of a resource schema rule; returns violating field names.
pub type ResourceSchemaRuleFn = fn(diff: &ResourceDiff) -> Vec<String>;

/// A rule about the field set of a resource
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchemaRule {
    pub(crate) name: &'static str,
    pub(crate) definition: &'static str,
    pub(crate) message: &'static str,
    pub(crate) identifier: &'static str,
    pub(crate) is_rule_break: Option<ResourceSchemaRuleFn>,
}

impl ResourceSchemaRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn definition(&self) -> &'static str {
        self.definition
    }

    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn undetectable(&self) -> bool {
        self.is_rule_break.is_none()
    }

    /// Field names of `diff` that break this rule.
    pub fn is_rule_break(&self, diff: &ResourceDiff) -> Vec<String> {
        match self.is_rule_break {
            Some(check) => check(diff),
            None => Vec::new(),
        }
    }

    /// Build the breaking change for one violating field.
    pub fn message(&self, resource: &str, field: &str) -> BreakingChange {
        BreakingChange {
            resource: resource.to_string(),
            field: field.to_string(),
            message: render_placeholders(self.message, resource, field),
            documentation_reference: documentation_reference(self.identifier),
            rule_template: self.message.to_string(),
            rule_definition: self.definition.to_string(),
            rule_name: self.name.to_string(),
        }
    }
}

/// Resource schema rules in evaluation order.
pub static RESOURCE_SCHEMA_RULES: &[ResourceSchemaRule] = &[
    REMOVING_A_FIELD,
    CHANGING_RESOURCE_ID_FORMAT,
    CHANGING_IMPORT_ID_FORMAT,
];

pub const REMOVING_A_FIELD: ResourceSchemaRule = ResourceSchemaRule {
    name: "Removing or Renaming an field",
    definition: "In terraform fields should be retained whenever possible. A removable of an field will result in a configuration breakage wherever a dependency on that field exists. Renaming or Removing a field are functionally equivalent in terms of configuration breakages.",
    message: "Field {{field}} within resource {{resource}} was either removed or renamed",
    identifier: "resource-schema-field-removal-or-rename",
    is_rule_break: Some(removing_a_field),
};

fn removing_a_field(diff: &ResourceDiff) -> Vec<String> {
    diff.fields
        .iter()
        .filter(|(_, field)| field.old.is_some() && field.new.is_none())
        .map(|(name, _)| name.clone())
        .collect()
}

pub const CHANGING_RESOURCE_ID_FORMAT: ResourceSchemaRule = ResourceSchemaRule {
    name: "Changing resource ID format",
    definition: "Terraform uses resource ID to read resource state from the api. Modification of the ID format will break the ability to parse the IDs from any deployments.",
    message: "",
    identifier: "resource-id",
    is_rule_break: None,
};

pub const CHANGING_IMPORT_ID_FORMAT: ResourceSchemaRule = ResourceSchemaRule {
    name: "Changing resource ID import format",
    definition: "Automation external to our provider may rely on importing resources with a certain format. Removal or modification of existing formats will break this automation.",
    message: "",
    identifier: "resource-import-format",
    is_rule_break: None,
};
