//! Provides the high-level snapshot API for comparing provider schemas.

use crate::compat::{BreakingConfig, BreakingEngine, BreakingResult};
use crate::diff::{SchemaDiff, compute_schema_diff};
use crate::generate_fingerprint;
use crate::schema::ProviderSchema;
use std::path::Path;

/// The result of a compatibility comparison between two provider schemas.
#[derive(Debug, PartialEq, Eq)]
pub enum Compatibility {
    /// The two schemas are identical.
    Green,
    /// The schemas differ, but no breaking change was detected.
    Yellow,
    /// At least one breaking change was detected.
    Red,
}

/// One version of a provider schema, along with its fingerprint.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub schema: ProviderSchema,
    pub fingerprint: String,
}

impl Snapshot {
    /// Creates a new `Snapshot`, computing the fingerprint once.
    pub fn new(schema: ProviderSchema) -> anyhow::Result<Self> {
        let fingerprint = generate_fingerprint(&schema)?;
        Ok(Snapshot {
            schema,
            fingerprint,
        })
    }

    /// Loads a snapshot from a JSON or YAML schema file.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::new(ProviderSchema::from_file(path)?)
    }

    /// Diff this snapshot (the "old" version) against `new_snapshot`.
    pub fn diff(&self, new_snapshot: &Snapshot) -> SchemaDiff {
        compute_schema_diff(&self.schema, &new_snapshot.schema)
    }

    /// Compares this snapshot (the "old" version) with `new_snapshot`.
    pub fn compare_with(&self, new_snapshot: &Snapshot) -> Compatibility {
        if self.fingerprint == new_snapshot.fingerprint {
            return Compatibility::Green;
        }

        if self.check_breaking_changes(new_snapshot).has_breaking_changes {
            Compatibility::Red
        } else {
            Compatibility::Yellow
        }
    }

    /// Run every breaking change rule against `new_snapshot`.
    pub fn check_breaking_changes(&self, new_snapshot: &Snapshot) -> BreakingResult {
        self.check_breaking_changes_with_config(new_snapshot, &BreakingConfig::default())
    }

    /// Run the rules selected by `config` against `new_snapshot`.
    pub fn check_breaking_changes_with_config(
        &self,
        new_snapshot: &Snapshot,
        config: &BreakingConfig,
    ) -> BreakingResult {
        BreakingEngine::new().check(&self.diff(new_snapshot), config)
    }
}
