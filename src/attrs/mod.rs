//! Attribute sets describing a content object.
//!
//! An attribute set is everything needed to locate one object, e.g.
//! `{type: "post", year: 2010, month: 3, day: 14, slug: "foo"}`. Maps are
//! ordered so anything derived from them is reproducible.

mod merge;
mod value;

use std::collections::{BTreeMap, BTreeSet};

pub use merge::{AttrSource, merge_sources};
pub use value::Value;

/// Attribute set: key -> scalar value.
pub type Attrs = BTreeMap<String, Value>;

/// Set of attribute keys.
pub type KeySet = BTreeSet<String>;

/// Build an [`Attrs`] map.
///
/// ```ignore
/// let post = attrs! { "type" => "post", "year" => 2010, "slug" => "foo" };
/// ```
#[macro_export]
macro_rules! attrs {
    () => { $crate::attrs::Attrs::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::attrs::Attrs::new();
        $( map.insert(::std::string::String::from($key), $crate::attrs::Value::from($value)); )+
        map
    }};
}

/// Whether `attrs` has exactly the keys in `keys`.
#[inline]
pub fn has_exact_keys(attrs: &Attrs, keys: &KeySet) -> bool {
    attrs.len() == keys.len() && attrs.keys().zip(keys).all(|(a, b)| a == b)
}

/// Whether `attrs` agrees with every pair in `bound`.
#[inline]
pub fn agrees_with(attrs: &Attrs, bound: &Attrs) -> bool {
    bound.iter().all(|(key, value)| attrs.get(key) == Some(value))
}

/// Restrict `attrs` to the given keys.
pub fn project(attrs: &Attrs, keys: &KeySet) -> Attrs {
    keys.iter()
        .filter_map(|key| attrs.get_key_value(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Render an attribute set as `{k=v, ..}` for messages.
pub fn describe(attrs: &Attrs) -> String {
    let pairs: Vec<String> = attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}
