//! Versioned encode/decode of the persisted state entries.
//!
//! Each entry is stored independently as JSON text: the favorites list, the
//! snapshot mapping, the last-check timestamp, and the schema version.
use thiserror::Error;

use crate::model::EpochMillis;
use crate::state::Snapshots;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed {entry} entry: {source}")]
    Malformed {
        entry: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported schema version {found} (expected {expected})", expected = SCHEMA_VERSION)]
    UnsupportedVersion { found: u32 },
}

fn malformed(entry: &'static str) -> impl FnOnce(serde_json::Error) -> CodecError {
    move |source| CodecError::Malformed { entry, source }
}

pub fn encode_favorites(favorites: &[String]) -> Result<String, CodecError> {
    serde_json::to_string(favorites).map_err(malformed("favorites"))
}

pub fn decode_favorites(raw: &str) -> Result<Vec<String>, CodecError> {
    serde_json::from_str(raw).map_err(malformed("favorites"))
}

pub fn encode_snapshots(snapshots: &Snapshots) -> Result<String, CodecError> {
    serde_json::to_string(snapshots).map_err(malformed("snapshots"))
}

pub fn decode_snapshots(raw: &str) -> Result<Snapshots, CodecError> {
    let snapshots: Snapshots = serde_json::from_str(raw).map_err(malformed("snapshots"))?;
    Ok(snapshots
        .into_iter()
        .map(|(name, snapshot)| (name, snapshot.normalized()))
        .collect())
}

pub fn encode_last_check(at: EpochMillis) -> Result<String, CodecError> {
    serde_json::to_string(&at).map_err(malformed("last check"))
}

pub fn decode_last_check(raw: &str) -> Result<EpochMillis, CodecError> {
    serde_json::from_str(raw).map_err(malformed("last check"))
}

pub fn encode_version() -> Result<String, CodecError> {
    serde_json::to_string(&SCHEMA_VERSION).map_err(malformed("schema version"))
}

/// Accepts an absent version (state written before versioning) or the
/// current one.
pub fn check_version(raw: Option<&str>) -> Result<(), CodecError> {
    let Some(raw) = raw else {
        return Ok(());
    };
    let found: u32 = serde_json::from_str(raw).map_err(malformed("schema version"))?;
    if found == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(CodecError::UnsupportedVersion { found })
    }
}
