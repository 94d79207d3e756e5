//! Identifiers for records created while the remote store is unreachable.
//!
//! Local ids look like `local-<base36 millis><10 base36 random chars>`.
//! Remote ids never contain `-`, so the two cannot collide even though
//! they share the same `id` field.

use chrono::Utc;
use rand::Rng;

pub const LOCAL_ID_PREFIX: &str = "local-";

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 10;

pub fn generate_local_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}{}{}", LOCAL_ID_PREFIX, to_base36(millis), suffix)
}

pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_local_id_shape() {
        let id = generate_local_id();
        assert!(is_local_id(&id));
        let body = id.strip_prefix(LOCAL_ID_PREFIX).unwrap();
        assert!(body.len() > SUFFIX_LEN);
        assert!(body.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_local_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_local_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_remote_style_ids_are_not_local() {
        assert!(!is_local_id("3f2a9c0d4b6e4f1a8c7d2e5b9a0c1d3e"));
        assert!(!is_local_id("Xy7fQ2pLm9KdR4sTz1Vb"));
    }
}
