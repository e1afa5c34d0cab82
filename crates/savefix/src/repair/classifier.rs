use serde_json::Value;

use crate::profile::RepairProfile;

pub const SPAWN_DATA_KEY: &str = "spawnData";
pub const CONFIG_PATH_KEY: &str = "entityConfigDataPath";
pub const FRAGMENT_VALUES_KEY: &str = "fragmentValues";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    NoMatch,
    MatchNoFragment,
    MatchWithFragment(&'a str),
}

impl<'a> Classification<'a> {
    pub fn is_match(&self) -> bool {
        !matches!(self, Classification::NoMatch)
    }

    pub fn fragment(&self) -> Option<&'a str> {
        match self {
            Classification::MatchWithFragment(fragment) => Some(fragment),
            _ => None,
        }
    }
}

/// Any shape other than the expected one is a non-match, never an error.
pub fn classify<'a>(record: &'a Value, profile: &RepairProfile) -> Classification<'a> {
    if archetype_of(record) != Some(profile.archetype_path.as_str()) {
        return Classification::NoMatch;
    }
    match behavior_fragment(record, &profile.fragment_prefix) {
        Some(fragment) => Classification::MatchWithFragment(fragment),
        None => Classification::MatchNoFragment,
    }
}

pub fn archetype_of(record: &Value) -> Option<&str> {
    record
        .as_object()?
        .get(SPAWN_DATA_KEY)?
        .as_object()?
        .get(CONFIG_PATH_KEY)?
        .as_str()
}

fn behavior_fragment<'a>(record: &'a Value, prefix: &str) -> Option<&'a str> {
    record
        .get(FRAGMENT_VALUES_KEY)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|fragment| fragment.starts_with(prefix))
}
