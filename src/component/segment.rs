//! Parse components from path strings.
//!
//! Segment syntax:
//!
//! | Segment        | Component                          |
//! |----------------|------------------------------------|
//! | `blog`         | literal                            |
//! | `{slug}`       | variable                           |
//! | `{month:02}`   | variable with format spec          |
//! | `{page:page}`  | page number (omitted for page 1)   |
//! | `{type=post}`  | bound attribute                    |

use std::sync::LazyLock;

use regex::Regex;

use super::{Component, Formatter};
use crate::attrs::Value;
use crate::error::{Result, RouteError};

/// `{key}`, `{key:spec}` or `{key=value}`
static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)(?:=([^{}]*)|:([^{}]*))?\}$").expect("valid regex")
});

impl Component {
    /// Parse a `/`-separated path into a flat compound.
    pub fn parse_path(path: &str) -> Result<Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(Self::parse_segment)
            .try_fold(Self::Compound(Vec::new()), |acc, part| Ok(acc.then(part?)))
    }

    /// Parse a single segment.
    pub fn parse_segment(segment: &str) -> Result<Self> {
        if let Some(caps) = SEGMENT.captures(segment) {
            let key = &caps[1];
            if let Some(value) = caps.get(2) {
                return Ok(Self::bound(key, Value::parse(value.as_str())));
            }
            let spec = caps.get(3).map_or("", |m| m.as_str());
            let format = Formatter::from_spec(spec)
                .map_err(|_| RouteError::template(segment, format!("unknown format spec `{spec}`")))?;
            return Ok(Self::var_with(key, format));
        }

        if segment.contains(['{', '}']) {
            return Err(RouteError::template(segment, "malformed placeholder"));
        }
        Ok(Self::literal(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_parse_literal() {
        assert!(matches!(
            Component::parse_segment("blog").unwrap(),
            Component::Literal(ref s) if s == "blog"
        ));
    }

    #[test]
    fn test_parse_variable() {
        match Component::parse_segment("{month:02}").unwrap() {
            Component::Variable { key, format } => {
                assert_eq!(key, "month");
                assert_eq!(format.name(), "02");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_bound() {
        match Component::parse_segment("{year=2010}").unwrap() {
            Component::Bound { key, value } => {
                assert_eq!(key, "year");
                assert_eq!(value, Value::Int(2010));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_bound_keeps_leading_zeros() {
        let path = Component::parse_segment("{code=007}").unwrap();
        assert_eq!(path.bound_attributes(), attrs! { "code" => "007" });
        assert!(path.matches(&attrs! { "code" => "007" }));
        assert!(!path.matches(&attrs! { "code" => 7 }));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Component::parse_segment("{slug").is_err());
        assert!(Component::parse_segment("pre{slug}").is_err());
        assert!(Component::parse_segment("{1abc}").is_err());
        assert!(Component::parse_segment("{slug:xyz}").is_err());
    }

    #[test]
    fn test_parse_path() {
        let path = Component::parse_path("/blog/{year}/{month:02}/{slug}/{page:page}/{type=post}/")
            .unwrap();
        assert_eq!(path.bound_attributes(), attrs! { "type" => "post" });

        let attrs = attrs! {
            "type" => "post", "year" => 2010, "month" => 3, "slug" => "foo", "page" => 1,
        };
        assert!(path.matches(&attrs));
        assert_eq!(path.construct(&attrs).unwrap(), "blog/2010/03/foo");
    }

    #[test]
    fn test_parse_empty_path() {
        let path = Component::parse_path("/").unwrap();
        assert!(path.attributes().is_empty());
        assert_eq!(path.construct(&attrs! {}).unwrap(), "");
    }
}
