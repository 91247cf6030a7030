//! Core types for breaking change detection

use const_format::concatcp;
use serde::{Deserialize, Serialize};

/// Root of the contributor documentation site.
pub const DOCS_BASE_URL: &str = "https://googlecloudplatform.github.io/magic-modules/";
/// Path of the breaking change guide below [`DOCS_BASE_URL`].
pub const DOCS_RELATIVE_PATH: &str = "develop/";
/// Page holding one anchor per rule identifier.
pub const DOCS_FILENAME: &str = "breaking-changes";

const DOCS_PAGE_URL: &str = concatcp!(DOCS_BASE_URL, DOCS_RELATIVE_PATH, DOCS_FILENAME);

/// Link to the documentation anchor of a rule.
pub fn documentation_reference(identifier: &str) -> String {
    format!("{DOCS_PAGE_URL}#{identifier}")
}

/// A breaking change detected between two versions of a provider schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingChange {
    /// Resource the violation was found on
    pub resource: String,
    /// Flattened field path, empty for resource-level violations
    pub field: String,
    /// Rendered, human-readable message
    pub message: String,
    /// Link to the rule's documentation
    pub documentation_reference: String,
    /// Message template with only `{{resource}}` and `{{field}}` left unresolved
    pub rule_template: String,
    pub rule_definition: String,
    pub rule_name: String,
}

/// Per-violation metadata handed to a field rule.
///
/// The engine fills in the resource, field, and rule description; the rule
/// itself sets its identifier and raw message before evaluating.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageContext<'a> {
    pub resource: &'a str,
    pub field: &'a str,
    pub(crate) definition: &'static str,
    pub(crate) name: &'static str,
    pub(crate) identifier: &'static str,
    pub(crate) message: &'static str,
}

impl<'a> MessageContext<'a> {
    pub fn new(
        resource: &'a str,
        field: &'a str,
        name: &'static str,
        definition: &'static str,
    ) -> Self {
        Self {
            resource,
            field,
            definition,
            name,
            ..Default::default()
        }
    }

    /// Raw template of the rule being evaluated.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Resolve `{{resource}}` and `{{field}}` in `message` and build the
    /// breaking change. `message` becomes the rule template.
    pub fn populate(&self, message: String) -> BreakingChange {
        let rendered = render_placeholders(&message, self.resource, self.field);
        BreakingChange {
            resource: self.resource.to_string(),
            field: self.field.to_string(),
            message: rendered,
            documentation_reference: documentation_reference(self.identifier),
            rule_template: message,
            rule_definition: self.definition.to_string(),
            rule_name: self.name.to_string(),
        }
    }
}

/// Wrap a value in backticks for use in a message.
pub fn quoted(value: &str) -> String {
    format!("`{value}`")
}

/// Replace the `{{resource}}` and `{{field}}` placeholders.
pub(crate) fn render_placeholders(template: &str, resource: &str, field: &str) -> String {
    template
        .replace("{{resource}}", &quoted(resource))
        .replace("{{field}}", &quoted(field))
}
