//! Path components - the building blocks of rule paths.
//!
//! ```text
//! Component::literal("blog") / Component::var("year") / Component::zero_pad("month", 2)
//!     / Component::var("slug") / Component::bound("type", "post")
//!
//! {type: post, year: 2010, month: 3, slug: foo}  ->  blog/2010/03/foo
//! ```
//!
//! A component consumes a fixed set of attribute keys. Some of those keys are
//! *bound*: the component fixes their value and emits nothing for them, which
//! lets two otherwise identical paths be told apart by e.g. `type`.

mod format;
mod segment;

use std::ops::Div;

use crate::attrs::{self, Attrs, KeySet, Value};
use crate::error::{Result, RouteError};

pub use format::{FormatFn, Formatter};

/// One node of a path.
#[derive(Debug, Clone)]
pub enum Component {
    /// Fixed text, no attributes.
    Literal(String),
    /// One free attribute rendered through a formatter.
    Variable { key: String, format: Formatter },
    /// One bound attribute; matches only `value` and emits nothing.
    Bound { key: String, value: Value },
    /// Children joined with `/`. Empty child output is skipped.
    Compound(Vec<Component>),
}

impl Component {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn var(key: impl Into<String>) -> Self {
        Self::var_with(key, Formatter::plain())
    }

    pub fn var_with(key: impl Into<String>, format: Formatter) -> Self {
        Self::Variable {
            key: key.into(),
            format,
        }
    }

    pub fn zero_pad(key: impl Into<String>, width: usize) -> Self {
        Self::var_with(key, Formatter::zero_pad(width))
    }

    /// Page index segment: omitted for page 1, `page{n}` otherwise.
    pub fn page_no(key: impl Into<String>) -> Self {
        Self::var_with(key, Formatter::page_no("page"))
    }

    pub fn bound(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Bound {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Flat compound of the given components.
    pub fn compound(parts: impl IntoIterator<Item = Component>) -> Self {
        parts
            .into_iter()
            .fold(Self::Compound(Vec::new()), Self::then)
    }

    /// Concatenate two components into one flat compound.
    pub fn then(self, next: Component) -> Self {
        let mut children = self.into_children();
        children.extend(next.into_children());
        Self::Compound(children)
    }

    fn into_children(self) -> Vec<Component> {
        match self {
            Self::Compound(children) => children,
            other => vec![other],
        }
    }

    /// Every key this component consumes.
    pub fn attributes(&self) -> KeySet {
        let mut keys = KeySet::new();
        self.collect_attributes(&mut keys);
        keys
    }

    fn collect_attributes(&self, keys: &mut KeySet) {
        match self {
            Self::Literal(_) => {}
            Self::Variable { key, .. } | Self::Bound { key, .. } => {
                keys.insert(key.clone());
            }
            Self::Compound(children) => children.iter().for_each(|c| c.collect_attributes(keys)),
        }
    }

    /// Keys whose value this component fixes.
    ///
    /// When two bound children disagree the first one is reported; see
    /// [`Component::bound_conflict`].
    pub fn bound_attributes(&self) -> Attrs {
        let mut bound = Attrs::new();
        self.for_each_bound(&mut |key, value| {
            bound.entry(key.to_string()).or_insert_with(|| value.clone());
        });
        bound
    }

    /// Keys the caller must supply a value for.
    pub fn free_attributes(&self) -> KeySet {
        let bound = self.bound_attributes();
        self.attributes()
            .into_iter()
            .filter(|key| !bound.contains_key(key))
            .collect()
    }

    /// First key bound to two different values, which makes the component
    /// unmatchable.
    pub fn bound_conflict(&self) -> Option<String> {
        let mut seen = Attrs::new();
        let mut conflict = None;
        self.for_each_bound(&mut |key, value| {
            if conflict.is_some() {
                return;
            }
            match seen.get(key) {
                Some(existing) if existing != value => conflict = Some(key.to_string()),
                Some(_) => {}
                None => {
                    seen.insert(key.to_string(), value.clone());
                }
            }
        });
        conflict
    }

    fn for_each_bound(&self, visit: &mut dyn FnMut(&str, &Value)) {
        match self {
            Self::Bound { key, value } => visit(key, value),
            Self::Compound(children) => children.iter().for_each(|c| c.for_each_bound(visit)),
            Self::Literal(_) | Self::Variable { .. } => {}
        }
    }

    /// Exact-signature match: the keys of `attrs` equal [`Self::attributes`]
    /// and every bound child sees its value.
    pub fn matches(&self, attrs: &Attrs) -> bool {
        attrs::has_exact_keys(attrs, &self.attributes()) && self.bound_satisfied(attrs)
    }

    fn bound_satisfied(&self, attrs: &Attrs) -> bool {
        let mut ok = true;
        self.for_each_bound(&mut |key, value| {
            ok &= attrs.get(key) == Some(value);
        });
        ok
    }

    /// Build the path fragment. `attrs` may carry extra keys; each compound
    /// child only sees its own.
    pub fn construct(&self, attrs: &Attrs) -> Result<String> {
        match self {
            Self::Literal(text) => Ok(text.clone()),
            Self::Variable { key, format } => {
                let value = attrs
                    .get(key)
                    .ok_or_else(|| RouteError::MissingAttribute(key.clone()))?;
                Ok(format.apply(value).unwrap_or_default())
            }
            Self::Bound { key, value } => match attrs.get(key) {
                Some(actual) if actual == value => Ok(String::new()),
                Some(actual) => Err(RouteError::BoundMismatch {
                    key: key.clone(),
                    expected: value.clone(),
                    actual: actual.clone(),
                }),
                None => Err(RouteError::MissingAttribute(key.clone())),
            },
            Self::Compound(children) => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    let own = attrs::project(attrs, &child.attributes());
                    let part = child.construct(&own)?;
                    if !part.is_empty() {
                        parts.push(part);
                    }
                }
                Ok(parts.join("/"))
            }
        }
    }
}

impl Div for Component {
    type Output = Component;

    fn div(self, rhs: Component) -> Component {
        self.then(rhs)
    }
}

impl From<&str> for Component {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn post_path() -> Component {
        Component::literal("blog")
            / Component::var("year")
            / Component::zero_pad("month", 2)
            / Component::var("slug")
            / Component::bound("type", "post")
    }

    #[test]
    fn test_attributes() {
        let path = post_path();
        let keys: Vec<_> = path.attributes().into_iter().collect();
        assert_eq!(keys, ["month", "slug", "type", "year"]);
        assert_eq!(path.bound_attributes(), attrs! { "type" => "post" });
        let free: Vec<_> = path.free_attributes().into_iter().collect();
        assert_eq!(free, ["month", "slug", "year"]);
    }

    #[test]
    fn test_construct() {
        let attrs = attrs! { "type" => "post", "year" => 2010, "month" => 3, "slug" => "foo" };
        assert_eq!(post_path().construct(&attrs).unwrap(), "blog/2010/03/foo");
    }

    #[test]
    fn test_then_is_flat() {
        let path = post_path();
        match &path {
            Component::Compound(children) => {
                assert_eq!(children.len(), 5);
                assert!(children.iter().all(|c| !matches!(c, Component::Compound(_))));
            }
            other => panic!("expected compound, got {other:?}"),
        }

        let nested = Component::compound([path.clone(), Component::page_no("page")]);
        match nested {
            Component::Compound(children) => assert_eq!(children.len(), 6),
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn test_match_exact_keys() {
        let path = Component::var("type") / Component::var("year");
        assert!(path.matches(&attrs! { "type" => "post", "year" => 2010 }));
        assert!(!path.matches(&attrs! { "type" => "post" }));
        assert!(!path.matches(&attrs! { "type" => "post", "year" => 2010, "month" => 1 }));
    }

    #[test]
    fn test_match_bound_value() {
        let path = post_path();
        let base = attrs! { "year" => 2010, "month" => 3, "slug" => "foo" };

        let mut post = base.clone();
        post.insert("type".into(), "post".into());
        assert!(path.matches(&post));

        let mut tag = base;
        tag.insert("type".into(), "tag".into());
        assert!(!path.matches(&tag));
    }

    #[test]
    fn test_construct_bound_mismatch() {
        let err = Component::bound("type", "post")
            .construct(&attrs! { "type" => "tag" })
            .unwrap_err();
        assert!(matches!(err, RouteError::BoundMismatch { .. }));
    }

    #[test]
    fn test_construct_missing() {
        let err = Component::var("slug").construct(&Attrs::new()).unwrap_err();
        assert_eq!(err, RouteError::MissingAttribute("slug".into()));
    }

    #[test]
    fn test_page_no_segment() {
        let path = Component::literal("tags") / Component::var("tag") / Component::page_no("page");
        assert_eq!(
            path.construct(&attrs! { "tag" => "rust", "page" => 1 }).unwrap(),
            "tags/rust"
        );
        assert_eq!(
            path.construct(&attrs! { "tag" => "rust", "page" => 2 }).unwrap(),
            "tags/rust/page2"
        );
    }

    #[test]
    fn test_bound_conflict() {
        assert_eq!(post_path().bound_conflict(), None);
        let broken = Component::bound("type", "post") / Component::bound("type", "tag");
        assert_eq!(broken.bound_conflict(), Some("type".into()));
        assert!(!broken.matches(&attrs! { "type" => "post" }));
        assert!(!broken.matches(&attrs! { "type" => "tag" }));
    }

    #[test]
    fn test_literal_from_str() {
        let path = Component::from("about") / Component::var("lang");
        assert_eq!(path.construct(&attrs! { "lang" => "en" }).unwrap(), "about/en");
    }
}
