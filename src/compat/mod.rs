//! Breaking change detection for provider schemas
//!
//! Rules come in three families: resource inventory rules (whole resources
//! removed), resource schema rules (fields removed from a resource), and field
//! rules (attribute changes on a field present in both versions).

pub mod categories;
pub mod engine;
pub mod field_rules;
pub mod resource_inventory_rules;
pub mod resource_schema_rules;
pub mod rule_registry;
pub mod types;

pub use categories::BreakingCategory;
pub use engine::{BreakingConfig, BreakingEngine, BreakingResult, compute_breaking_changes};
pub use rule_registry::Rule;
pub use types::{BreakingChange, MessageContext};
