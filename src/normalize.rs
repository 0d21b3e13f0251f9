//! Flattening call-time option values into a canonical [`OptionMap`].
//!
//! Anything implementing [`ToOptions`] can be handed to [`normalize`]:
//! configuration records, string-keyed maps, `Option`s of either (`None`
//! contributes nothing), and sequences (only the first element counts).
//! [`normalize_with`] merges an override value into a base, and
//! [`OptionsBuilder`] chains as many merges as a call site needs.

use crate::record::{serialize_field, OptionField};
use crate::{OptionMap, OptionValue};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use tracing::{debug, trace, warn};

/// Flattens a value into a canonical option map.
///
/// Entries that hold an absent reference (`None`, `null`) are omitted;
/// meaningful zero values are kept.
pub trait ToOptions {
    fn to_options(&self) -> OptionMap;
}

/// Flattens a single options value.
pub fn normalize<T: ToOptions + ?Sized>(options: &T) -> OptionMap {
    options.to_options()
}

/// Flattens `base`, then merges `overrides` into it. Keys present in both take
/// the override's value; keys unique to `base` are preserved.
pub fn normalize_with<B, O>(base: &B, overrides: &O) -> OptionMap
where
    B: ToOptions + ?Sized,
    O: ToOptions + ?Sized,
{
    let mut merged = base.to_options();
    merge_into(&mut merged, overrides.to_options());
    merged
}

fn merge_into(base: &mut OptionMap, overrides: OptionMap) {
    if overrides.is_empty() {
        return;
    }
    debug!("Merging {} option(s) into base of {}", overrides.len(), base.len());
    for (key, value) in overrides {
        if base.contains_key(&key) {
            trace!("Option `{}` overridden", key);
        }
        base.insert(key, value);
    }
}

fn entry_options<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> OptionMap
where
    K: Display + 'a,
    V: OptionField + 'a,
{
    let mut out = OptionMap::new();
    for (key, value) in entries {
        match value.to_option_value() {
            Some(value) => {
                out.insert(key.to_string(), value);
            }
            None => trace!("Skipping absent option `{}`", key),
        }
    }
    out
}

/// Accumulates options left to right; later values win.
///
/// ```rust
/// use cdp_options::normalize::OptionsBuilder;
/// use serde_json::json;
///
/// let params = OptionsBuilder::new()
///     .insert("url", "https://example.com")
///     .merge(&json!({"referrer": "https://www.rust-lang.org", "frameId": null}))
///     .build();
///
/// assert_eq!(params.len(), 2);
/// assert!(!params.contains_key("frameId"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsBuilder {
    options: OptionMap,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge<T: ToOptions + ?Sized>(mut self, options: &T) -> Self {
        merge_into(&mut self.options, options.to_options());
        self
    }

    /// Sets a single key. A value serializing to `null` is skipped.
    pub fn insert<V: Serialize>(mut self, key: impl Into<String>, value: V) -> Self {
        let key = key.into();
        match serialize_field(&value) {
            Some(OptionValue::Null) | None => trace!("Skipping absent option `{}`", key),
            Some(value) => {
                self.options.insert(key, value);
            }
        }
        self
    }

    pub fn build(self) -> OptionMap {
        self.options
    }
}

impl ToOptions for OptionsBuilder {
    fn to_options(&self) -> OptionMap {
        self.options.clone()
    }
}

/// No options at all.
impl ToOptions for () {
    fn to_options(&self) -> OptionMap {
        OptionMap::new()
    }
}

impl<T: ToOptions + ?Sized> ToOptions for &T {
    fn to_options(&self) -> OptionMap {
        (**self).to_options()
    }
}

impl<T: ToOptions + ?Sized> ToOptions for Box<T> {
    fn to_options(&self) -> OptionMap {
        (**self).to_options()
    }
}

impl<T: ToOptions> ToOptions for Option<T> {
    fn to_options(&self) -> OptionMap {
        match self {
            Some(options) => options.to_options(),
            None => OptionMap::new(),
        }
    }
}

/// Variadic convenience: only the first element is used.
impl<T: ToOptions> ToOptions for [T] {
    fn to_options(&self) -> OptionMap {
        match self.first() {
            Some(options) => options.to_options(),
            None => OptionMap::new(),
        }
    }
}

impl<T: ToOptions> ToOptions for Vec<T> {
    fn to_options(&self) -> OptionMap {
        self.as_slice().to_options()
    }
}

impl<T: ToOptions, const N: usize> ToOptions for [T; N] {
    fn to_options(&self) -> OptionMap {
        self.as_slice().to_options()
    }
}

impl<K: Display, V: OptionField, S> ToOptions for HashMap<K, V, S> {
    fn to_options(&self) -> OptionMap {
        entry_options(self.iter())
    }
}

impl<K: Display, V: OptionField> ToOptions for BTreeMap<K, V> {
    fn to_options(&self) -> OptionMap {
        entry_options(self.iter())
    }
}

impl ToOptions for OptionMap {
    fn to_options(&self) -> OptionMap {
        entry_options(self.iter())
    }
}

impl ToOptions for OptionValue {
    fn to_options(&self) -> OptionMap {
        match self {
            OptionValue::Object(map) => map.to_options(),
            OptionValue::Null => OptionMap::new(),
            other => {
                warn!("Ignoring non-object options value: {}", other);
                OptionMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option_record;
    use serde_json::json;

    option_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct ClickOptions {
            button: Option<String>,
            click_count: i32 => "clickCount",
            delay: Option<u64>,
            modifiers: Option<Vec<String>>,
            force: bool,
        }
    }

    fn populated() -> ClickOptions {
        ClickOptions {
            button: Some("right".into()),
            click_count: 2,
            delay: Some(10),
            modifiers: Some(vec!["Shift".into()]),
            force: true,
        }
    }

    #[test]
    fn test_zero_arguments_yield_empty_map() {
        assert!(normalize(&()).is_empty());
        assert!(OptionsBuilder::new().build().is_empty());
    }

    #[test]
    fn test_populated_record_has_one_entry_per_field() {
        let map = normalize(&populated());
        assert_eq!(map.len(), 5);
        assert_eq!(map["button"], json!("right"));
        assert_eq!(map["clickCount"], json!(2));
        assert_eq!(map["delay"], json!(10));
        assert_eq!(map["modifiers"], json!(["Shift"]));
        assert_eq!(map["force"], json!(true));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let map = normalize(&ClickOptions {
            button: Some(String::new()),
            ..Default::default()
        });

        let mut keys: Vec<_> = map.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["button", "clickCount", "force"]);
        assert_eq!(map["button"], json!(""));
        assert_eq!(map["clickCount"], json!(0));
    }

    #[test]
    fn test_maps_skip_null_entries_and_stringify_keys() {
        let mut headers = HashMap::new();
        headers.insert("accept", Some("text/html".to_string()));
        headers.insert("cookie", None);
        let map = normalize(&headers);
        assert_eq!(map.len(), 1);
        assert_eq!(map["accept"], json!("text/html"));

        let mut indexed = BTreeMap::new();
        indexed.insert(1, json!("one"));
        indexed.insert(2, OptionValue::Null);
        let map = normalize(&indexed);
        assert_eq!(map.len(), 1);
        assert_eq!(map["1"], json!("one"));
    }

    #[test]
    fn test_sequence_uses_first_element_only() {
        let first = ClickOptions {
            click_count: 1,
            ..Default::default()
        };
        let map = normalize(&vec![first, populated()]);
        assert_eq!(map["clickCount"], json!(1));
        assert!(!map.contains_key("button"));

        let empty: Vec<ClickOptions> = Vec::new();
        assert!(normalize(&empty).is_empty());
    }

    #[test]
    fn test_empty_sequence_and_none_leave_base_unchanged() {
        let base = json!({"url": "about:blank", "timeout": 30000});
        let none: Option<ClickOptions> = None;
        let empty: [ClickOptions; 0] = [];

        assert_eq!(normalize_with(&base, &none), base.to_options());
        assert_eq!(normalize_with(&base, &empty[..]), base.to_options());
    }

    #[test]
    fn test_override_wins_and_base_keys_survive() {
        let base = json!({"clickCount": 1, "position": {"x": 4, "y": 2}});
        let merged = normalize_with(&base, &Some(Box::new(populated())));

        assert_eq!(merged["clickCount"], json!(2));
        assert_eq!(merged["position"], json!({"x": 4, "y": 2}));
        assert_eq!(merged.len(), 6);
    }

    #[test]
    fn test_record_as_base() {
        let overrides = json!({"force": false, "trial": true});
        let merged = normalize_with(&populated(), &overrides);
        assert_eq!(merged["force"], json!(false));
        assert_eq!(merged["trial"], json!(true));
        assert_eq!(merged["button"], json!("right"));
    }

    #[test]
    fn test_builder_inserts_and_merges_in_order() {
        let params = OptionsBuilder::new()
            .insert("clickCount", 3)
            .insert("button", Option::<String>::None)
            .merge(&populated())
            .insert("force", false)
            .build();

        assert_eq!(params["clickCount"], json!(2));
        assert_eq!(params["button"], json!("right"));
        assert_eq!(params["force"], json!(false));
    }

    #[test]
    fn test_scalar_value_contributes_nothing() {
        assert!(normalize(&json!(42)).is_empty());
        assert!(normalize(&json!("headless")).is_empty());
        assert!(normalize(&OptionValue::Null).is_empty());
    }
}
