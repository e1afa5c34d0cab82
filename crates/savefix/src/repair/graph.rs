use crate::document::EntityCollection;

const KEY_PREFIX: &str = "(ID=";
const KEY_SUFFIX: &str = ")";

pub fn entity_key(id: u64) -> String {
    format!("{KEY_PREFIX}{id}{KEY_SUFFIX}")
}

/// Parses `(ID=<digits>)`. Signs, whitespace and overflow are rejected.
pub fn parse_entity_key(key: &str) -> Option<u64> {
    let digits = key.strip_prefix(KEY_PREFIX)?.strip_suffix(KEY_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// One-hop check against the collection as borrowed for the scan.
pub fn is_reference_valid(collection: &EntityCollection, target_id: u64) -> bool {
    collection.contains_key(&entity_key(target_id))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn collection(value: Value) -> EntityCollection {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn key_format_and_parse_agree() {
        assert_eq!(entity_key(0), "(ID=0)");
        assert_eq!(entity_key(1234567), "(ID=1234567)");
        assert_eq!(parse_entity_key("(ID=1234567)"), Some(1234567));
        assert_eq!(parse_entity_key(&entity_key(u64::MAX)), Some(u64::MAX));
    }

    #[test]
    fn malformed_keys_do_not_parse() {
        for key in [
            "", "(ID=)", "(ID=-1)", "(ID=+1)", "(ID= 1)", "ID=1", "(ID=1", "(id=1)", "(ID=1a)",
            "(ID=99999999999999999999999)",
        ] {
            assert_eq!(parse_entity_key(key), None, "{key}");
        }
    }

    #[test]
    fn reference_valid_only_when_key_present() {
        let entities = collection(json!({"(ID=2)": {}, "(ID=10)": {"x": 1}}));
        assert!(is_reference_valid(&entities, 2));
        assert!(is_reference_valid(&entities, 10));
        assert!(!is_reference_valid(&entities, 1));
        assert!(!is_reference_valid(&entities, 100));
    }

    #[test]
    fn leading_zero_keys_are_not_aliases() {
        let entities = collection(json!({"(ID=007)": {}}));
        assert!(!is_reference_valid(&entities, 7));
        assert_eq!(parse_entity_key("(ID=007)"), Some(7));
    }
}
