//! Parallel-array encoding of filter maps
//!
//! EventHub expects every key first, then every value:
//!
//! ```text
//! ufk[]=k1&ufk[]=k2&ufv[]=v1&ufv[]=v2
//! ```
//!
//! The value at position `i` belongs to the key at position `i`.

use std::collections::BTreeMap;

/// Key/value pairs scoping a query, e.g. users whose `plan` is `pro`
pub type FilterMap = BTreeMap<String, String>;

/// Encode `filters` as a body fragment using the given array field names.
///
/// Tokens are written verbatim. An empty map yields an empty string.
pub fn encode_filters(filters: &FilterMap, key_field: &str, value_field: &str) -> String {
    let mut keys = String::new();
    let mut values = String::new();
    for (key, value) in filters {
        keys.push_str(key_field);
        keys.push('=');
        keys.push_str(key);
        keys.push('&');

        values.push_str(value_field);
        values.push('=');
        values.push_str(value);
        values.push('&');
    }
    // the trailing separator only belongs between the two runs
    values.pop();
    keys + &values
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn single_entry() {
        assert_eq!(
            encode_filters(&filters(&[("external_user_id", "a@x.com")]), "ufk[]", "ufv[]"),
            "ufk[]=external_user_id&ufv[]=a@x.com"
        );
    }

    #[test]
    fn keys_then_values() {
        let encoded = encode_filters(
            &filters(&[("plan", "pro"), ("country", "jp"), ("age", "30")]),
            "refk[]",
            "refv[]",
        );
        assert_eq!(
            encoded,
            "refk[]=age&refk[]=country&refk[]=plan&refv[]=30&refv[]=jp&refv[]=pro"
        );
    }

    #[test]
    fn empty_map_is_empty_fragment() {
        assert_eq!(encode_filters(&FilterMap::new(), "cefk[]", "cefv[]"), "");
    }

    #[test]
    fn layout_holds_for_random_maps() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let n = rng.gen_range(1..10);
            let map: FilterMap = (0..n)
                .map(|i| (format!("key{i}"), format!("value{}", rng.gen::<u16>())))
                .collect();
            let encoded = encode_filters(&map, "k[]", "v[]");
            assert!(!encoded.ends_with('&'));

            let tokens: Vec<&str> = encoded.split('&').collect();
            assert_eq!(tokens.len(), 2 * map.len());
            let (key_tokens, value_tokens) = tokens.split_at(map.len());
            for (i, (key, value)) in map.iter().enumerate() {
                assert_eq!(key_tokens[i], format!("k[]={key}"));
                assert_eq!(value_tokens[i], format!("v[]={value}"));
            }
        }
    }
}
