//! Provider schema model consumed by the differ and the rule engine.
//!
//! These types mirror the attributes of a plugin SDK field schema that matter
//! for compatibility analysis. Function-valued attributes (diff suppression,
//! validation, state functions) are reduced to presence flags because only
//! their presence can be compared between two provider builds.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

//==============================================================================
// Field-level types
//==============================================================================

/// The value type of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[default]
    #[serde(rename = "TypeInvalid", alias = "invalid")]
    Invalid,
    #[serde(rename = "TypeBool", alias = "bool")]
    Bool,
    #[serde(rename = "TypeInt", alias = "int")]
    Int,
    #[serde(rename = "TypeFloat", alias = "float")]
    Float,
    #[serde(rename = "TypeString", alias = "string")]
    String,
    #[serde(rename = "TypeList", alias = "list")]
    List,
    #[serde(rename = "TypeMap", alias = "map")]
    Map,
    #[serde(rename = "TypeSet", alias = "set")]
    Set,
}

impl ValueType {
    /// Name used in breaking change messages. Unknown types render as
    /// `TypeUndefined`.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "TypeBool",
            ValueType::Int => "TypeInt",
            ValueType::Float => "TypeFloat",
            ValueType::String => "TypeString",
            ValueType::List => "TypeList",
            ValueType::Map => "TypeMap",
            ValueType::Set => "TypeSet",
            ValueType::Invalid => "TypeUndefined",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a nested block is represented in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigMode {
    #[default]
    Auto,
    Block,
    /// The block is written as a flat attribute; every sub-field is treated
    /// as required by the framework.
    Attr,
}

/// Element descriptor of a collection field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elem {
    /// Single-value element (e.g. the string inside a list of strings).
    Schema(Box<Schema>),
    /// Nested block with its own sub-fields.
    Resource(Resource),
}

/// Schema of a single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "is_default_config_mode")]
    pub config_mode: ConfigMode,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deprecated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "is_zero")]
    pub min_items: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_items: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem: Option<Elem>,

    // Presence of function-valued attributes
    #[serde(skip_serializing_if = "is_false")]
    pub diff_suppress_func: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub diff_suppress_on_refresh: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub default_func: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub state_func: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub validate_func: bool,

    // Cross-field constraints
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exactly_one_of: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub at_least_one_of: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_with: Vec<String>,
}

impl Schema {
    /// The element schema, if this field holds single values.
    pub fn elem_schema(&self) -> Option<&Schema> {
        match &self.elem {
            Some(Elem::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    /// The nested block, if this field holds sub-fields.
    pub fn elem_resource(&self) -> Option<&Resource> {
        match &self.elem {
            Some(Elem::Resource(resource)) => Some(resource),
            _ => None,
        }
    }

    /// Computed and not settable from configuration.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_default_config_mode(mode: &ConfigMode) -> bool {
    *mode == ConfigMode::Auto
}

//==============================================================================
// Resource-level types
//==============================================================================

/// A resource type (or nested block) and its fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    pub schema: BTreeMap<String, Schema>,
}

impl Resource {
    /// Resource-level attributes, without the field schema.
    pub fn config(&self) -> ResourceConfig {
        ResourceConfig {
            description: self.description.clone(),
            deprecation_message: self.deprecation_message.clone(),
        }
    }
}

/// Resource-level attributes compared by the resource inventory rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
}

/// The full set of resource schemas exposed by one provider build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSchema {
    pub resources: BTreeMap<String, Resource>,
}

impl ProviderSchema {
    /// Parse a provider schema from a JSON document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse provider schema JSON")
    }

    /// Parse a provider schema from a YAML document.
    ///
    /// The document goes through a JSON value first so that element
    /// descriptors are written as `elem: {schema: ...}` maps, as in JSON,
    /// rather than YAML `!schema` tags.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value =
            serde_yaml::from_str(yaml).context("Failed to parse provider schema YAML")?;
        serde_json::from_value(value).context("Invalid provider schema YAML")
    }

    /// Load a provider schema from disk. Files ending in `.yaml` or `.yml`
    /// are read as YAML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file '{}'", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        parsed.with_context(|| format!("Invalid schema file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_names() {
        assert_eq!(ValueType::Bool.name(), "TypeBool");
        assert_eq!(ValueType::Set.to_string(), "TypeSet");
        assert_eq!(ValueType::Invalid.name(), "TypeUndefined");
    }

    #[test]
    fn test_parse_json_schema() {
        let json = r#"{
            "resources": {
                "google_x": {
                    "schema": {
                        "name": {"type": "TypeString", "required": true},
                        "tags": {
                            "type": "list",
                            "optional": true,
                            "max_items": 3,
                            "elem": {"schema": {"type": "string"}}
                        },
                        "block": {
                            "type": "TypeList",
                            "optional": true,
                            "config_mode": "attr",
                            "elem": {"resource": {"schema": {"a": {"type": "TypeInt"}}}}
                        }
                    }
                }
            }
        }"#;

        let schema = ProviderSchema::from_json_str(json).unwrap();
        let resource = &schema.resources["google_x"];
        assert!(resource.schema["name"].required);
        assert_eq!(resource.schema["tags"].max_items, 3);
        assert_eq!(
            resource.schema["tags"].elem_schema().map(|s| s.value_type),
            Some(ValueType::String)
        );
        let block = &resource.schema["block"];
        assert_eq!(block.config_mode, ConfigMode::Attr);
        assert!(block.elem_resource().unwrap().schema.contains_key("a"));
    }

    #[test]
    fn test_parse_yaml_schema() {
        let yaml = r#"
resources:
  google_y:
    description: a resource
    schema:
      enabled:
        type: TypeBool
        optional: true
        default: true
"#;
        let schema = ProviderSchema::from_yaml_str(yaml).unwrap();
        let field = &schema.resources["google_y"].schema["enabled"];
        assert_eq!(field.value_type, ValueType::Bool);
        assert_eq!(field.default, Some(serde_json::Value::Bool(true)));
    }

    #[test]
    fn test_parse_yaml_schema_with_elements() {
        let yaml = r#"
resources:
  google_x:
    schema:
      tags:
        type: TypeList
        optional: true
        elem:
          schema:
            type: TypeString
      block:
        type: TypeList
        config_mode: attr
        elem:
          resource:
            schema:
              a:
                type: TypeInt
"#;
        let schema = ProviderSchema::from_yaml_str(yaml).unwrap();
        let resource = &schema.resources["google_x"];
        assert_eq!(
            resource.schema["tags"].elem_schema().map(|s| s.value_type),
            Some(ValueType::String)
        );
        let block = resource.schema["block"].elem_resource().unwrap();
        assert_eq!(block.schema["a"].value_type, ValueType::Int);

        let json = r#"{"resources":{"google_x":{"schema":{
            "tags":{"type":"TypeList","optional":true,"elem":{"schema":{"type":"TypeString"}}},
            "block":{"type":"TypeList","config_mode":"attr","elem":{"resource":{"schema":{"a":{"type":"TypeInt"}}}}}
        }}}}"#;
        assert_eq!(schema, ProviderSchema::from_json_str(json).unwrap());
    }

    #[test]
    fn test_invalid_yaml_schema_is_an_error() {
        assert!(ProviderSchema::from_yaml_str("resources: [1, 2]").is_err());
    }

    #[test]
    fn test_invalid_schema_is_an_error() {
        assert!(ProviderSchema::from_json_str("{\"resources\": 3}").is_err());
    }

    #[test]
    fn test_computed_only() {
        let computed = Schema {
            computed: true,
            ..Default::default()
        };
        let optional_computed = Schema {
            computed: true,
            optional: true,
            ..Default::default()
        };
        assert!(computed.is_computed_only());
        assert!(!optional_computed.is_computed_only());
    }
}
