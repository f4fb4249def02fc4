//! Errors raised while building the static lookup tables.
//!
//! The derivation pipeline itself never fails; only table construction does.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("location name must not be empty")]
    EmptyName,

    #[error("alias fragment for '{target}' must not be empty")]
    EmptyAlias { target: String },

    #[error("location '{0}' is registered more than once")]
    DuplicateLocation(String),

    #[error("location '{name}' has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        name: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("alias '{alias}' points at unknown location '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("alias '{alias}' maps to both '{first}' and '{second}'")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("waypoints between '{0}' and itself are meaningless")]
    DegenerateWaypointPair(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ConfigError::UnknownAliasTarget {
            alias: "muelle".to_string(),
            target: "Atlantis".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "alias 'muelle' points at unknown location 'Atlantis'"
        );

        let err = ConfigError::DuplicateLocation("Panajachel".to_string());
        assert!(err.to_string().contains("Panajachel"));
    }
}
