//! Merging layered attribute sources.

use std::collections::BTreeSet;

use super::Attrs;
use crate::error::{Result, RouteError};

/// One layer of attributes passed to a lookup.
///
/// Layers are merged left to right. `Given` layers override earlier values;
/// a key pinned by a `Fixed` layer must keep its value in every other layer.
#[derive(Debug, Clone, Copy)]
pub enum AttrSource<'a> {
    /// Values the caller has fixed (e.g. `type = "post"` for a post writer).
    Fixed(&'a Attrs),
    /// Ordinary values; later ones win.
    Given(&'a Attrs),
}

impl<'a> AttrSource<'a> {
    #[inline]
    const fn attrs(&self) -> &'a Attrs {
        match self {
            Self::Fixed(attrs) | Self::Given(attrs) => attrs,
        }
    }

    #[inline]
    const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Merge attribute sources into one map.
///
/// A disagreement on a pinned key is reported as [`RouteError::Conflict`]
/// instead of being settled by precedence.
pub fn merge_sources(sources: &[AttrSource<'_>]) -> Result<Attrs> {
    let mut merged = Attrs::new();
    let mut pinned = BTreeSet::new();

    for source in sources {
        for (key, value) in source.attrs() {
            if let Some(existing) = merged.get(key)
                && existing != value
            {
                if pinned.contains(key) {
                    return Err(RouteError::Conflict {
                        key: key.clone(),
                        fixed: existing.clone(),
                        given: value.clone(),
                    });
                }
                if source.is_fixed() {
                    return Err(RouteError::Conflict {
                        key: key.clone(),
                        fixed: value.clone(),
                        given: existing.clone(),
                    });
                }
            }
            merged.insert(key.clone(), value.clone());
            if source.is_fixed() {
                pinned.insert(key.clone());
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::attrs::Value;

    #[test]
    fn test_later_given_overrides() {
        let base = attrs! { "type" => "post", "page" => 1 };
        let kwargs = attrs! { "page" => 2 };
        let merged =
            merge_sources(&[AttrSource::Given(&base), AttrSource::Given(&kwargs)]).unwrap();
        assert_eq!(merged, attrs! { "type" => "post", "page" => 2 });
    }

    #[test]
    fn test_fixed_then_conflicting_given() {
        let fixed = attrs! { "type" => "post" };
        let given = attrs! { "type" => "tag" };
        let err =
            merge_sources(&[AttrSource::Fixed(&fixed), AttrSource::Given(&given)]).unwrap_err();
        assert_eq!(
            err,
            RouteError::Conflict {
                key: "type".into(),
                fixed: Value::from("post"),
                given: Value::from("tag"),
            }
        );
    }

    #[test]
    fn test_given_then_conflicting_fixed() {
        let given = attrs! { "type" => "tag" };
        let fixed = attrs! { "type" => "post" };
        let err =
            merge_sources(&[AttrSource::Given(&given), AttrSource::Fixed(&fixed)]).unwrap_err();
        assert!(matches!(err, RouteError::Conflict { ref key, .. } if key == "type"));
    }

    #[test]
    fn test_fixed_repeated_with_same_value() {
        let fixed = attrs! { "type" => "post" };
        let given = attrs! { "type" => "post", "slug" => "hi" };
        let merged =
            merge_sources(&[AttrSource::Fixed(&fixed), AttrSource::Given(&given)]).unwrap();
        assert_eq!(merged, attrs! { "type" => "post", "slug" => "hi" });
    }

    #[test]
    fn test_empty_sources() {
        assert!(merge_sources(&[]).unwrap().is_empty());
    }
}
