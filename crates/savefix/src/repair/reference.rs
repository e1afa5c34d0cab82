use regex::Regex;

use crate::profile::{ProfileError, RepairProfile};

/// Entity ids named by a behavior fragment. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementRefs {
    pub start: Option<u64>,
    pub target: Option<u64>,
}

impl MovementRefs {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.target.is_none()
    }
}

/// Finds `Name=(ID=<digits>)` assignments inside fragment text.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    start: Regex,
    target: Regex,
}

impl ReferenceExtractor {
    pub fn new(profile: &RepairProfile) -> Result<Self, ProfileError> {
        Ok(Self {
            start: assignment_pattern(&profile.start_reference)?,
            target: assignment_pattern(&profile.target_reference)?,
        })
    }

    pub fn extract(&self, fragment: &str) -> MovementRefs {
        MovementRefs {
            start: first_id(&self.start, fragment),
            target: first_id(&self.target, fragment),
        }
    }
}

fn assignment_pattern(name: &str) -> Result<Regex, ProfileError> {
    // The leading boundary keeps `CurrentMovementTarget` from matching inside
    // `PrevCurrentMovementTarget`.
    let pattern = format!(r"(?:^|[^A-Za-z0-9_]){}=\(ID=(\d+)\)", regex::escape(name));
    Regex::new(&pattern).map_err(|source| ProfileError::Pattern {
        name: name.to_string(),
        source,
    })
}

// Ids that overflow u64 are treated as absent.
fn first_id(pattern: &Regex, fragment: &str) -> Option<u64> {
    let captures = pattern.captures(fragment)?;
    captures.get(1)?.as_str().parse::<u64>().ok()
}
