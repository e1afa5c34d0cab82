use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ARCHETYPE_PATH: &str =
    "/Game/Chimera/Drones/DA_RailDroneConfig.DA_RailDroneConfig";
pub const DEFAULT_FRAGMENT_PREFIX: &str = "/Script/Chimera.CrLogisticsAgentFragment";
pub const DEFAULT_START_REFERENCE: &str = "CurrentMovementStart";
pub const DEFAULT_TARGET_REFERENCE: &str = "CurrentMovementTarget";

/// The literals that decide which entities a repair run targets and how
/// their references are spelled inside fragment text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairProfile {
    pub archetype_path: String,
    pub fragment_prefix: String,
    pub start_reference: String,
    pub target_reference: String,
}

impl Default for RepairProfile {
    fn default() -> Self {
        Self {
            archetype_path: DEFAULT_ARCHETYPE_PATH.to_string(),
            fragment_prefix: DEFAULT_FRAGMENT_PREFIX.to_string(),
            start_reference: DEFAULT_START_REFERENCE.to_string(),
            target_reference: DEFAULT_TARGET_REFERENCE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse profile json: {message}")]
    Parse { message: String },
    #[error("profile field '{field}' cannot be empty")]
    EmptyField { field: &'static str },
    #[error("profile field '{field}' must be an identifier (ASCII letters, digits, '_'), got '{value}'")]
    InvalidReferenceName { field: &'static str, value: String },
    #[error("profile fields 'start_reference' and 'target_reference' must differ (both '{value}')")]
    DuplicateReferenceName { value: String },
    #[error("failed to compile reference pattern for '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl RepairProfile {
    pub fn from_json_str(raw: &str) -> Result<Self, ProfileError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let profile = match serde_path_to_error::deserialize::<_, RepairProfile>(&mut deserializer)
        {
            Ok(profile) => profile,
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                let message = if path.is_empty() || path == "." {
                    source.to_string()
                } else {
                    format!("at {path}: {source}")
                };
                return Err(ProfileError::Parse { message });
            }
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = fs::read_to_string(path).map_err(|source| ProfileError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in [
            ("archetype_path", &self.archetype_path),
            ("fragment_prefix", &self.fragment_prefix),
            ("start_reference", &self.start_reference),
            ("target_reference", &self.target_reference),
        ] {
            if value.trim().is_empty() {
                return Err(ProfileError::EmptyField { field });
            }
        }
        for (field, value) in [
            ("start_reference", &self.start_reference),
            ("target_reference", &self.target_reference),
        ] {
            if !is_identifier(value) {
                return Err(ProfileError::InvalidReferenceName {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.start_reference == self.target_reference {
            return Err(ProfileError::DuplicateReferenceName {
                value: self.target_reference.clone(),
            });
        }
        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
