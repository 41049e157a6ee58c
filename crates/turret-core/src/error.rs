//! Error types shared by the turret crates.

use crate::enums::MountKind;
use crate::types::EntityId;

/// Errors raised when building or driving a turret.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurretError {
    /// A configuration value is out of its valid range.
    #[error("invalid turret config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The turret cannot operate without both mounts.
    #[error("turret is missing its {0} mount")]
    MissingMount(MountKind),

    /// An id did not resolve to a live entity of the expected kind.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

impl TurretError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TurretError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] TurretError),

    #[error("unknown key `{key}` in [[{table}]]")]
    UnknownKey { table: &'static str, key: String },
}
