//! Field rules
//!
//! Each rule compares the old and new schema of a single field. A field that
//! was added or removed (either side absent) never triggers a field rule;
//! removals are reported by the resource schema rules instead.

use crate::compat::types::{BreakingChange, MessageContext, quoted};
use crate::schema::{ConfigMode, Schema};

/// Detection function of a field rule.
pub type FieldRuleFn =
    fn(old: Option<&Schema>, new: Option<&Schema>, mc: &MessageContext) -> Option<BreakingChange>;

/// A rule about changes to a single field's attributes
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub(crate) name: &'static str,
    pub(crate) definition: &'static str,
    pub(crate) message: &'static str,
    pub(crate) identifier: &'static str,
    pub(crate) is_rule_break: Option<FieldRuleFn>,
}

impl FieldRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn definition(&self) -> &'static str {
        self.definition
    }

    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Raw message template, with placeholders unresolved.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// No detection function exists for this rule; it is documentation only.
    pub fn undetectable(&self) -> bool {
        self.is_rule_break.is_none()
    }

    /// Compare the two versions of a field and return the breakage, if any.
    pub fn is_rule_break(
        &self,
        old: Option<&Schema>,
        new: Option<&Schema>,
        mut mc: MessageContext,
    ) -> Option<BreakingChange> {
        let check = self.is_rule_break?;
        mc.identifier = self.identifier;
        mc.message = self.message;
        check(old, new, &mc)
    }
}

/// Field rules in evaluation order.
pub static FIELD_RULES: &[FieldRule] = &[
    CHANGING_TYPE,
    BECOMING_REQUIRED,
    BECOMING_COMPUTED_ONLY,
    OPTIONAL_COMPUTED_TO_OPTIONAL,
    DEFAULT_MODIFICATION,
    GROWING_MIN,
    SHRINKING_MAX,
    REMOVING_DIFF_SUPPRESS,
    ADDING_SUBFIELD_TO_CONFIG_MODE_ATTR,
    CHANGING_FIELD_DATA_FORMAT,
];

pub const CHANGING_FIELD_DATA_FORMAT: FieldRule = FieldRule {
    name: "Changing field data format",
    definition: "Modification of the data format (either by the API or manually) will cause a diff in subsequent plans if that field is not Computed. This results in a breakage. API breaking changes are out of scope with respect to provider responsibility but we may make changes in response to API breakages in some instances to provide more customer stability.",
    message: "",
    identifier: "field-changing-data-format",
    is_rule_break: None,
};

// ========================================
// Changing Field Type
// ========================================

pub const CHANGING_TYPE: FieldRule = FieldRule {
    name: "Changing Field Type",
    definition: "While certain Field Type migrations may be supported at a technical level, it's a practice that we highly discourage. We see little value for these transitions vs the risk they impose.",
    message: "Field {{field}} changed from {{oldType}} to {{newType}} on {{resource}}",
    identifier: "field-changing-type",
    is_rule_break: Some(changing_type),
};

fn changing_type(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };

    let (old_type, new_type) = if old.value_type != new.value_type {
        (
            old.value_type.name().to_string(),
            new.value_type.name().to_string(),
        )
    } else {
        let (old_elem, new_elem) = (old.elem_schema()?, new.elem_schema()?);
        if old_elem.value_type == new_elem.value_type {
            return None;
        }
        (
            format!("{}.{}", old.value_type, old_elem.value_type),
            format!("{}.{}", new.value_type, new_elem.value_type),
        )
    };

    let message = mc
        .message()
        .replace("{{oldType}}", &old_type)
        .replace("{{newType}}", &new_type);
    Some(mc.populate(message))
}

// ========================================
// Required / Computed transitions
// ========================================

pub const BECOMING_REQUIRED: FieldRule = FieldRule {
    name: "Field becoming Required Field",
    definition: "A field cannot become required as existing configs may not have this field defined. Thus, breaking configs in sequential plan or applies. If you are adding Required to a field so a block won't remain empty, this can cause two issues. First if it's a singular nested field the block may gain more fields later and it's not clear whether the field is actually required so it may be misinterpreted by future contributors. Second if users are defining empty blocks in existing configurations this change will break them. Consider these points in admittance of this type of change.",
    message: "Field {{field}} changed from optional to required on {{resource}}",
    identifier: "field-optional-to-required",
    is_rule_break: Some(becoming_required),
};

fn becoming_required(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if !old.required && new.required {
        return Some(mc.populate(mc.message().to_string()));
    }
    None
}

pub const BECOMING_COMPUTED_ONLY: FieldRule = FieldRule {
    name: "Becoming a Computed only Field",
    definition: "While a field can go from Optional to Optional+Computed it cannot go from Required or Optional to only Computed. This transition would effectively make the field read-only thus breaking configs in sequential plan or applies where this field is defined in a configuration.",
    message: "Field {{field}} became Computed only on {{resource}}",
    identifier: "field-becoming-computed",
    is_rule_break: Some(becoming_computed_only),
};

fn becoming_computed_only(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    // already computed only
    if old.is_computed_only() {
        return None;
    }
    if new.is_computed_only() {
        return Some(mc.populate(mc.message().to_string()));
    }
    None
}

pub const OPTIONAL_COMPUTED_TO_OPTIONAL: FieldRule = FieldRule {
    name: "Optional and Computed to Optional",
    definition: "A field cannot go from Computed + Optional to Optional. On a sequential `apply` the terraform state will have the previously computed value. The value won't be present in the config, thus ultimately causing a diff.",
    message: "Field {{field}} transitioned from optional+computed to optional {{resource}}",
    identifier: "field-oc-to-c",
    is_rule_break: Some(optional_computed_to_optional),
};

fn optional_computed_to_optional(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if (old.computed && old.optional) && (new.optional && !new.computed) {
        return Some(mc.populate(mc.message().to_string()));
    }
    None
}

// ========================================
// Default values
// ========================================

pub const DEFAULT_MODIFICATION: FieldRule = FieldRule {
    name: "Adding or Changing a Default Value",
    definition: "Adding a default value where one was not previously declared can work in a very limited subset of scenarios but is an all around 'not good' practice to engage in. Changing a default value will absolutely cause a breakage. The mechanism of break for both scenarios is current terraform deployments now gain a diff with sequential applies where the diff is the new or changed default value.",
    message: "Field {{field}} default value changed from {{oldDefault}} to {{newDefault}} on {{resource}}",
    identifier: "field-changing-default-value",
    is_rule_break: Some(default_modification),
};

fn default_modification(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if old.default == new.default {
        return None;
    }
    let message = mc
        .message()
        .replace("{{oldDefault}}", &format_default(old.default.as_ref()))
        .replace("{{newDefault}}", &format_default(new.default.as_ref()));
    Some(mc.populate(message))
}

/// Strings render without quotes and a missing default as `<nil>`.
fn format_default(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "<nil>".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ========================================
// Item count bounds
// ========================================

pub const GROWING_MIN: FieldRule = FieldRule {
    name: "Growing Minimum Items",
    definition: "MinItems cannot grow. Otherwise existing terraform configurations that don't satisfy this rule will break.",
    message: "Field {{field}} MinItems went from {{oldMin}} to {{newMin}} on {{resource}}",
    identifier: "field-growing-min",
    is_rule_break: Some(growing_min),
};

fn growing_min(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if old.min_items < new.min_items {
        let message = mc
            .message()
            .replace("{{oldMin}}", &format_item_bound(old.min_items))
            .replace("{{newMin}}", &new.min_items.to_string());
        return Some(mc.populate(message));
    }
    None
}

pub const SHRINKING_MAX: FieldRule = FieldRule {
    name: "Shrinking Maximum Items",
    definition: "MaxItems cannot shrink. Otherwise existing terraform configurations that don't satisfy this rule will break.",
    message: "Field {{field}} MinItems went from {{oldMax}} to {{newMax}} on {{resource}}",
    identifier: "field-shrinking-max",
    is_rule_break: Some(shrinking_max),
};

fn shrinking_max(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    // Going from unset to any bound is reported as well.
    if old.max_items > new.max_items || (old.max_items == 0 && new.max_items > 0) {
        let message = mc
            .message()
            .replace("{{oldMax}}", &format_item_bound(old.max_items))
            .replace("{{newMax}}", &new.max_items.to_string());
        return Some(mc.populate(message));
    }
    None
}

fn format_item_bound(bound: u32) -> String {
    if bound == 0 {
        "unset".to_string()
    } else {
        bound.to_string()
    }
}

// ========================================
// Diff suppression
// ========================================

pub const REMOVING_DIFF_SUPPRESS: FieldRule = FieldRule {
    name: "Removing Diff Suppress Function",
    definition: "Diff suppress functions cannot be removed. Otherwise terraform configurations that previously had no diffs would show diffs.",
    message: "Field {{field}} lost its diff suppress function",
    identifier: "field-removing-diff-suppress",
    is_rule_break: Some(removing_diff_suppress),
};

fn removing_diff_suppress(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if old.diff_suppress_func && !new.diff_suppress_func {
        return Some(mc.populate(mc.message().to_string()));
    }
    None
}

// ========================================
// Config mode attribute blocks
// ========================================

pub const ADDING_SUBFIELD_TO_CONFIG_MODE_ATTR: FieldRule = FieldRule {
    name: "Adding a subfield to a SchemaConfigModeAttr field",
    definition: "Subfields cannot be added to fields with SchemaConfigModeAttr because they will be treated as required even if optional.",
    message: "Field {{field}} gained a subfield {{subfield}} when it has SchemaConfigModeAttr",
    identifier: "field-adding-subfield-to-config-mode-attr",
    is_rule_break: Some(adding_subfield_to_config_mode_attr),
};

fn adding_subfield_to_config_mode_attr(
    old: Option<&Schema>,
    new: Option<&Schema>,
    mc: &MessageContext,
) -> Option<BreakingChange> {
    let (Some(old), Some(new)) = (old, new) else {
        return None;
    };
    if new.config_mode != ConfigMode::Attr {
        return None;
    }
    let new_block = new.elem_resource()?;
    let old_block = old.elem_resource()?;

    // Sub-fields are ordered by name; the first new one is reported.
    let subfield = new_block
        .schema
        .keys()
        .find(|name| !old_block.schema.contains_key(*name))?;
    let message = mc.message().replace("{{subfield}}", &quoted(subfield));
    Some(mc.populate(message))
}
