//! Breaking change detection engine
//!
//! Walks a [`SchemaDiff`] and applies the resource inventory rules, the
//! resource schema rules, and the field rules, in that order.

use crate::compat::categories::BreakingCategory;
use crate::compat::field_rules::FIELD_RULES;
use crate::compat::resource_inventory_rules::RESOURCE_INVENTORY_RULES;
use crate::compat::resource_schema_rules::RESOURCE_SCHEMA_RULES;
use crate::compat::rule_registry::{self, Rule};
use crate::compat::types::{BreakingChange, MessageContext};
use crate::diff::SchemaDiff;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for breaking change detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingConfig {
    /// Categories to enable (if empty, all categories run)
    #[serde(default)]
    pub use_categories: Vec<String>,
    /// Specific rule identifiers to enable (if empty, all rules run)
    #[serde(default)]
    pub use_rules: Vec<String>,
    /// Rule identifiers to explicitly disable
    #[serde(default)]
    pub except_rules: Vec<String>,
    /// Resources to skip entirely
    #[serde(default)]
    pub ignore_resources: Vec<String>,
}

impl BreakingConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct ConfigFile {
            breaking: Option<BreakingConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        let config = config_file.breaking.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Reject category ids that match no known category.
    pub fn validate(&self) -> anyhow::Result<()> {
        for id in &self.use_categories {
            id.parse::<BreakingCategory>()
                .map_err(|err| anyhow::anyhow!("{err} (expected one of: RESOURCE, FIELD)"))?;
        }
        Ok(())
    }

    /// Whether the rule with this identifier should run
    pub fn is_rule_enabled(&self, identifier: &str) -> bool {
        if self.except_rules.iter().any(|rule| rule == identifier) {
            return false;
        }
        if !self.use_rules.is_empty() {
            return self.use_rules.iter().any(|rule| rule == identifier);
        }
        if !self.use_categories.is_empty() {
            let Some(category) = rule_registry::rule_category(identifier) else {
                return false;
            };
            return self
                .use_categories
                .iter()
                .any(|id| BreakingCategory::from_id(id) == Some(category));
        }
        true
    }

    fn is_resource_ignored(&self, resource: &str) -> bool {
        self.ignore_resources.iter().any(|r| r == resource)
    }
}

/// Result of breaking change detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakingResult {
    /// All breaking changes found
    pub changes: Vec<BreakingChange>,
    /// Whether any breaking changes were found
    pub has_breaking_changes: bool,
    /// Number of breaking changes per resource
    pub summary: BTreeMap<String, usize>,
    /// Identifiers of the rules that were evaluated
    pub executed_rules: Vec<String>,
}

impl BreakingResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a breaking change to the result
    pub fn add_change(&mut self, change: BreakingChange) {
        self.has_breaking_changes = true;
        *self.summary.entry(change.resource.clone()).or_insert(0) += 1;
        self.changes.push(change);
    }

    /// Mark a rule as executed
    pub fn mark_rule_executed(&mut self, rule_id: &str) {
        self.executed_rules.push(rule_id.to_string());
    }
}

/// Main engine for breaking change detection
#[derive(Debug, Default)]
pub struct BreakingEngine {
    // Engine is stateless, rules come from the static registries
}

impl BreakingEngine {
    /// Create a new breaking change engine
    pub fn new() -> Self {
        Self {}
    }

    /// Check a schema diff for breaking changes
    pub fn check(&self, schema_diff: &SchemaDiff, config: &BreakingConfig) -> BreakingResult {
        let mut result = BreakingResult::new();

        let inventory_rules: Vec<_> = RESOURCE_INVENTORY_RULES
            .iter()
            .filter(|rule| is_selected(*rule, config))
            .collect();
        let schema_rules: Vec<_> = RESOURCE_SCHEMA_RULES
            .iter()
            .filter(|rule| is_selected(*rule, config))
            .collect();
        let field_rules: Vec<_> = FIELD_RULES
            .iter()
            .filter(|rule| is_selected(*rule, config))
            .collect();

        for rule_id in inventory_rules
            .iter()
            .map(|rule| rule.identifier())
            .chain(schema_rules.iter().map(|rule| rule.identifier()))
            .chain(field_rules.iter().map(|rule| rule.identifier()))
        {
            result.mark_rule_executed(rule_id);
        }

        for (resource, resource_diff) in schema_diff {
            if config.is_resource_ignored(resource) {
                tracing::debug!(resource = %resource, "skipping ignored resource");
                continue;
            }

            let old_config = resource_diff.resource_config.old.as_ref();
            let new_config = resource_diff.resource_config.new.as_ref();

            for rule in &inventory_rules {
                if rule.is_rule_break(old_config, new_config) {
                    tracing::debug!(resource = %resource, rule = rule.identifier(), "resource rule broken");
                    result.add_change(rule.message(resource));
                }
            }

            // Added or removed resources have no field-level comparison.
            if old_config.is_none() || new_config.is_none() {
                continue;
            }

            for rule in &schema_rules {
                for field in rule.is_rule_break(resource_diff) {
                    tracing::debug!(resource = %resource, field = %field, rule = rule.identifier(), "resource schema rule broken");
                    result.add_change(rule.message(resource, &field));
                }
            }

            for (field, field_diff) in &resource_diff.fields {
                for rule in &field_rules {
                    let mc = MessageContext::new(resource, field, rule.name(), rule.definition());
                    if let Some(change) =
                        rule.is_rule_break(field_diff.old.as_ref(), field_diff.new.as_ref(), mc)
                    {
                        tracing::debug!(resource = %resource, field = %field, rule = rule.identifier(), "field rule broken");
                        result.add_change(change);
                    }
                }
            }
        }

        tracing::info!(
            resources = schema_diff.len(),
            breaking_changes = result.changes.len(),
            "breaking change check complete"
        );
        result
    }

    /// Get rule count from the registry
    pub fn get_rule_count(&self) -> usize {
        rule_registry::get_rule_count()
    }

    /// Verify rule registry integrity
    pub fn verify_rules(&self) -> Result<(), String> {
        rule_registry::verify_rules()
    }
}

fn is_selected(rule: &dyn Rule, config: &BreakingConfig) -> bool {
    !rule.undetectable() && config.is_rule_enabled(rule.identifier())
}

/// Every breaking change in `schema_diff`, with all rules enabled.
pub fn compute_breaking_changes(schema_diff: &SchemaDiff) -> Vec<BreakingChange> {
    BreakingEngine::new()
        .check(schema_diff, &BreakingConfig::default())
        .changes
}
