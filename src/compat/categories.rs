//! Breaking change categories used to group rules in the documentation

use serde::{Deserialize, Serialize};

/// Breaking change categories that group related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakingCategory {
    /// RESOURCE category - resources disappearing from the provider
    Resource,
    /// FIELD category - field presence and attribute changes within a resource
    Field,
}

impl BreakingCategory {
    /// Get the string identifier for this category
    pub fn id(&self) -> &'static str {
        match self {
            BreakingCategory::Resource => "RESOURCE",
            BreakingCategory::Field => "FIELD",
        }
    }

    /// Heading used in the rule documentation
    pub fn name(&self) -> &'static str {
        match self {
            BreakingCategory::Resource => "Resource level breakages",
            BreakingCategory::Field => "Field level breakages",
        }
    }

    /// Get the description for this category
    pub fn description(&self) -> &'static str {
        match self {
            BreakingCategory::Resource => {
                "Resource/datasource naming conventions and entry differences."
            }
            BreakingCategory::Field => {
                "Individual field level conventions, attribute changes and naming conventions."
            }
        }
    }

    /// Parse category from string ID
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "RESOURCE" => Some(BreakingCategory::Resource),
            "FIELD" => Some(BreakingCategory::Field),
            _ => None,
        }
    }

    /// Get all available categories
    pub fn all() -> Vec<Self> {
        vec![BreakingCategory::Resource, BreakingCategory::Field]
    }
}

impl std::fmt::Display for BreakingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for BreakingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown breaking category: {s}"))
    }
}
