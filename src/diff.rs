//! Computes the typed difference between two provider schemas.
//!
//! The rule engine only looks at the shape of a [`SchemaDiff`]; this module is
//! one way of producing it from two loaded [`ProviderSchema`] values.

use crate::schema::{ProviderSchema, ResourceConfig, Schema};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Resource name to resource diff. Only resources that changed are present.
pub type SchemaDiff = BTreeMap<String, ResourceDiff>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDiff {
    pub resource_config: ResourceConfigDiff,
    /// Flattened field path (`parent.child`) to field diff.
    pub fields: BTreeMap<String, FieldDiff>,
}

/// `None` on a side means the resource does not exist there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfigDiff {
    pub old: Option<ResourceConfig>,
    pub new: Option<ResourceConfig>,
}

/// `None` on a side means the field does not exist there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// Names of the attributes that differ. Empty for added or removed fields.
    pub changed: BTreeSet<String>,
    pub old: Option<Schema>,
    pub new: Option<Schema>,
}

/// Compare two provider schemas resource by resource and field by field.
pub fn compute_schema_diff(old: &ProviderSchema, new: &ProviderSchema) -> SchemaDiff {
    let mut schema_diff = SchemaDiff::new();

    let resource_names: BTreeSet<&String> =
        old.resources.keys().chain(new.resources.keys()).collect();

    for resource_name in resource_names {
        let old_resource = old.resources.get(resource_name);
        let new_resource = new.resources.get(resource_name);

        let mut resource_diff = ResourceDiff {
            resource_config: ResourceConfigDiff {
                old: old_resource.map(|r| r.config()),
                new: new_resource.map(|r| r.config()),
            },
            fields: BTreeMap::new(),
        };

        let old_fields = old_resource
            .map(|r| flatten_schema("", &r.schema))
            .unwrap_or_default();
        let new_fields = new_resource
            .map(|r| flatten_schema("", &r.schema))
            .unwrap_or_default();

        let field_keys: BTreeSet<&String> = old_fields.keys().chain(new_fields.keys()).collect();
        for key in field_keys {
            let old_field = old_fields.get(key).copied();
            let new_field = new_fields.get(key).copied();
            if let Some(changed) = field_changed(old_field, new_field) {
                resource_diff.fields.insert(
                    key.clone(),
                    FieldDiff {
                        changed,
                        old: old_field.cloned(),
                        new: new_field.cloned(),
                    },
                );
            }
        }

        if !resource_diff.fields.is_empty()
            || resource_diff.resource_config.old != resource_diff.resource_config.new
        {
            schema_diff.insert(resource_name.clone(), resource_diff);
        }
    }

    schema_diff
}

/// Flatten nested blocks into dot-separated keys. Parent fields are kept
/// alongside their sub-fields.
pub fn flatten_schema<'a>(
    parent_key: &str,
    fields: &'a BTreeMap<String, Schema>,
) -> BTreeMap<String, &'a Schema> {
    let mut flattened = BTreeMap::new();

    for (field_name, field) in fields {
        let key = if parent_key.is_empty() {
            field_name.clone()
        } else {
            format!("{parent_key}.{field_name}")
        };
        if let Some(child) = field.elem_resource() {
            flattened.extend(flatten_schema(&key, &child.schema));
        }
        flattened.insert(key, field);
    }

    flattened
}

/// Returns the set of changed attribute names, or `None` when nothing changed.
/// Added and removed fields yield an empty set.
fn field_changed(old: Option<&Schema>, new: Option<&Schema>) -> Option<BTreeSet<String>> {
    let (old, new) = match (old, new) {
        (None, None) => return None,
        (Some(old), Some(new)) => (old, new),
        _ => return Some(BTreeSet::new()),
    };

    let mut changed = BTreeSet::new();
    let mut mark = |attr: &str, differs: bool| {
        if differs {
            changed.insert(attr.to_string());
        }
    };

    mark("Type", old.value_type != new.value_type);
    mark("ConfigMode", old.config_mode != new.config_mode);
    mark("Required", old.required != new.required);
    mark("Optional", old.optional != new.optional);
    mark("Computed", old.computed != new.computed);
    mark("ForceNew", old.force_new != new.force_new);
    mark(
        "DiffSuppressOnRefresh",
        old.diff_suppress_on_refresh != new.diff_suppress_on_refresh,
    );
    mark("Default", old.default != new.default);
    mark("Description", old.description != new.description);
    mark("MaxItems", old.max_items != new.max_items);
    mark("MinItems", old.min_items != new.min_items);
    mark("Deprecated", old.deprecated != new.deprecated);
    mark("Sensitive", old.sensitive != new.sensitive);

    mark(
        "ConflictsWith",
        !same_members(&old.conflicts_with, &new.conflicts_with),
    );
    mark(
        "ExactlyOneOf",
        !same_members(&old.exactly_one_of, &new.exactly_one_of),
    );
    mark(
        "AtLeastOneOf",
        !same_members(&old.at_least_one_of, &new.at_least_one_of),
    );
    mark(
        "RequiredWith",
        !same_members(&old.required_with, &new.required_with),
    );

    match (old.elem_schema(), new.elem_schema()) {
        (Some(old_elem), Some(new_elem)) => {
            if let Some(elem_changed) = field_changed(Some(old_elem), Some(new_elem)) {
                for attr in elem_changed {
                    mark(&format!("Elem.{attr}"), true);
                }
            }
        }
        (None, None) => match (old.elem_resource(), new.elem_resource()) {
            (Some(old_block), Some(new_block)) => {
                // Sub-field attributes are diffed under their own keys; the
                // parent only records that its set of sub-fields changed.
                let old_keys: BTreeSet<&String> = old_block.schema.keys().collect();
                let new_keys: BTreeSet<&String> = new_block.schema.keys().collect();
                mark("Subfields", old_keys != new_keys);
            }
            (None, None) => {}
            _ => mark("Elem", true),
        },
        _ => mark("Elem", true),
    }

    // Functions can only be compared by presence.
    mark(
        "DiffSuppressFunc",
        old.diff_suppress_func != new.diff_suppress_func,
    );
    mark("DefaultFunc", old.default_func != new.default_func);
    mark("StateFunc", old.state_func != new.state_func);
    mark("ValidateFunc", old.validate_func != new.validate_func);

    if changed.is_empty() {
        None
    } else {
        Some(changed)
    }
}

fn same_members(old: &[String], new: &[String]) -> bool {
    let old: BTreeSet<&String> = old.iter().collect();
    let new: BTreeSet<&String> = new.iter().collect();
    old == new
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConfigMode, Elem, Resource, ValueType};

    fn provider(resources: Vec<(&str, Vec<(&str, Schema)>)>) -> ProviderSchema {
        ProviderSchema {
            resources: resources
                .into_iter()
                .map(|(name, fields)| {
                    (
                        name.to_string(),
                        Resource {
                            schema: fields
                                .into_iter()
                                .map(|(field, schema)| (field.to_string(), schema))
                                .collect(),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        }
    }

    fn optional() -> Schema {
        Schema {
            description: "beep".to_string(),
            optional: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_schemas_produce_empty_diff() {
        let old = provider(vec![("google-x", vec![("field-a", optional())])]);
        let new = old.clone();
        assert!(compute_schema_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_added_resource() {
        let old = provider(vec![]);
        let new = provider(vec![("google-x", vec![("field-a", optional())])]);

        let diff = compute_schema_diff(&old, &new);
        let resource_diff = &diff["google-x"];
        assert!(resource_diff.resource_config.old.is_none());
        assert!(resource_diff.resource_config.new.is_some());
        let field = &resource_diff.fields["field-a"];
        assert!(field.old.is_none());
        assert!(field.new.is_some());
        assert!(field.changed.is_empty());
    }

    #[test]
    fn test_removed_field() {
        let old = provider(vec![(
            "google-x",
            vec![("field-a", optional()), ("field-b", optional())],
        )]);
        let new = provider(vec![("google-x", vec![("field-a", optional())])]);

        let diff = compute_schema_diff(&old, &new);
        let fields = &diff["google-x"].fields;
        assert_eq!(fields.len(), 1);
        assert!(fields["field-b"].new.is_none());
    }

    #[test]
    fn test_changed_attributes_are_recorded() {
        let old = provider(vec![("google-x", vec![("field-a", optional())])]);
        let new = provider(vec![(
            "google-x",
            vec![(
                "field-a",
                Schema {
                    required: true,
                    min_items: 2,
                    ..optional()
                },
            )],
        )]);

        let diff = compute_schema_diff(&old, &new);
        let changed: Vec<&str> = diff["google-x"].fields["field-a"]
            .changed
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(changed, vec!["MinItems", "Required"]);
    }

    #[test]
    fn test_conflict_lists_are_order_insensitive() {
        let old = provider(vec![(
            "google-x",
            vec![(
                "field-a",
                Schema {
                    conflicts_with: vec!["b".to_string(), "c".to_string()],
                    ..optional()
                },
            )],
        )]);
        let new = provider(vec![(
            "google-x",
            vec![(
                "field-a",
                Schema {
                    conflicts_with: vec!["c".to_string(), "b".to_string()],
                    ..optional()
                },
            )],
        )]);
        assert!(compute_schema_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_nested_fields_are_flattened() {
        let block = |subfields: Vec<&str>| Schema {
            value_type: ValueType::List,
            optional: true,
            max_items: 1,
            config_mode: ConfigMode::Block,
            elem: Some(Elem::Resource(Resource {
                schema: subfields
                    .into_iter()
                    .map(|name| (name.to_string(), optional()))
                    .collect(),
                ..Default::default()
            })),
            ..Default::default()
        };
        let old = provider(vec![(
            "google-x",
            vec![("field-a", block(vec!["sub-field-1", "sub-field-2"]))],
        )]);
        let new = provider(vec![("google-x", vec![("field-a", block(vec!["sub-field-1"]))])]);

        let diff = compute_schema_diff(&old, &new);
        let fields = &diff["google-x"].fields;
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["field-a", "field-a.sub-field-2"]
        );
        assert!(fields["field-a"].changed.contains("Subfields"));
        assert!(fields["field-a.sub-field-2"].new.is_none());
    }

    #[test]
    fn test_element_type_change_is_prefixed() {
        let list_of = |value_type| Schema {
            value_type: ValueType::List,
            elem: Some(Elem::Schema(Box::new(Schema {
                value_type,
                ..Default::default()
            }))),
            ..Default::default()
        };
        let old = provider(vec![("google-x", vec![("tags", list_of(ValueType::String))])]);
        let new = provider(vec![("google-x", vec![("tags", list_of(ValueType::Int))])]);

        let diff = compute_schema_diff(&old, &new);
        assert!(diff["google-x"].fields["tags"].changed.contains("Elem.Type"));
    }

    #[test]
    fn test_flatten_keeps_parent() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "parent".to_string(),
            Schema {
                elem: Some(Elem::Resource(Resource {
                    schema: [("child".to_string(), optional())].into_iter().collect(),
                    ..Default::default()
                })),
                ..Default::default()
            },
        );
        let flattened = flatten_schema("", &fields);
        assert_eq!(
            flattened.keys().collect::<Vec<_>>(),
            vec!["parent", "parent.child"]
        );
    }
}
