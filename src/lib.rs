pub mod compat;
pub mod diff;
pub mod logging;
pub mod schema;
pub mod snapshot;

pub use compat::{BreakingChange, compute_breaking_changes};
pub use diff::{SchemaDiff, compute_schema_diff};
pub use schema::ProviderSchema;
pub use snapshot::{Compatibility, Snapshot};

use anyhow::Context;
use sha2::{Digest, Sha256};

/// Generates a fingerprint for a provider schema.
///
/// The fingerprint is a SHA-256 hash of the schema's canonical JSON form.
/// Resources and fields are kept in sorted maps, so the fingerprint does not
/// depend on the key order of the file the schema was loaded from.
///
/// # Returns
///
/// A `Result` containing the hex-encoded SHA-256 fingerprint string,
/// or an error if serialization fails.
pub fn generate_fingerprint(schema: &ProviderSchema) -> anyhow::Result<String> {
    let json_string = serde_json::to_string(schema)
        .context("Failed to serialize canonical representation to JSON")?;

    let mut hasher = Sha256::new();
    hasher.update(json_string.as_bytes());
    let hash_result = hasher.finalize();

    Ok(format!("{:x}", hash_result))
}
