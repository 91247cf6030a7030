//! Resource inventory rules
//!
//! These rules compare the presence of a whole resource between two provider
//! builds. Adding a resource is never breaking.

use crate::compat::types::{BreakingChange, documentation_reference, quoted};
use crate::schema::ResourceConfig;

/// Detection function of a resource inventory rule.
pub type ResourceInventoryRuleFn =
    fn(old: Option<&ResourceConfig>, new: Option<&ResourceConfig>) -> bool;

/// A rule about the set of resources a provider exposes
#[derive(Debug, Clone, Copy)]
pub struct ResourceInventoryRule {
    pub(crate) name: &'static str,
    pub(crate) definition: &'static str,
    pub(crate) message: &'static str,
    pub(crate) identifier: &'static str,
    pub(crate) is_rule_break: Option<ResourceInventoryRuleFn>,
}

impl ResourceInventoryRule {
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

    pub fn is_rule_break(&self, old: Option<&ResourceConfig>, new: Option<&ResourceConfig>) -> bool {
        self.is_rule_break.is_some_and(|check| check(old, new))
    }

    /// Build the breaking change for `resource`.
    pub fn message(&self, resource: &str) -> BreakingChange {
        BreakingChange {
            resource: resource.to_string(),
            field: String::new(),
            message: self.message.replace("{{resource}}", &quoted(resource)),
            documentation_reference: documentation_reference(self.identifier),
            rule_template: self.message.to_string(),
            rule_definition: self.definition.to_string(),
            rule_name: self.name.to_string(),
        }
    }
}

/// Resource inventory rules in evaluation order.
pub static RESOURCE_INVENTORY_RULES: &[ResourceInventoryRule] = &[REMOVING_A_RESOURCE];

pub const REMOVING_A_RESOURCE: ResourceInventoryRule = ResourceInventoryRule {
    name: "Removing or Renaming an Resource",
    definition: "In terraform resources should be retained whenever possible. A removable of an resource will result in a configuration breakage wherever a dependency on that resource exists. Renaming or Removing a resources are functionally equivalent in terms of configuration breakages.",
    message: "Resource {{resource}} was either removed or renamed",
    identifier: "resource-map-resource-removal-or-rename",
    is_rule_break: Some(removing_a_resource),
};

fn removing_a_resource(old: Option<&ResourceConfig>, new: Option<&ResourceConfig>) -> bool {
    old.is_some() && new.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removing_a_resource() {
        let config = ResourceConfig::default();
        assert!(REMOVING_A_RESOURCE.is_rule_break(Some(&config), None));
        assert!(!REMOVING_A_RESOURCE.is_rule_break(None, Some(&config)));
        assert!(!REMOVING_A_RESOURCE.is_rule_break(Some(&config), Some(&config)));
        assert!(!REMOVING_A_RESOURCE.is_rule_break(None, None));
    }

    #[test]
    fn test_removing_a_resource_message() {
        let change = REMOVING_A_RESOURCE.message("google-x");
        assert_eq!(change.resource, "google-x");
        assert!(change.field.is_empty());
        assert_eq!(change.message, "Resource `google-x` was either removed or renamed");
        assert_eq!(
            change.documentation_reference,
            "https://googlecloudplatform.github.io/magic-modules/develop/breaking-changes#resource-map-resource-removal-or-rename"
        );
        assert_eq!(change.rule_template, "Resource {{resource}} was either removed or renamed");
    }
}
