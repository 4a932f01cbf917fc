//! Format-string path builders, e.g. `/{type}/{year:04}/{slug}.atom`.

use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{Attrs, KeySet};
use crate::component::Formatter;
use crate::error::{Result, RouteError};

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([^{}]*))?\}").expect("valid regex")
});

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Field { key: String, format: Formatter },
}

/// A compiled format template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut last = 0;

        for caps in FIELD.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut pieces, source, &source[last..whole.start()])?;

            let spec = caps.get(2).map_or("", |m| m.as_str());
            let format = Formatter::from_spec(spec)
                .map_err(|_| RouteError::template(source, format!("unknown format spec `{spec}`")))?;
            pieces.push(Piece::Field {
                key: caps[1].to_string(),
                format,
            });
            last = whole.end();
        }
        push_text(&mut pieces, source, &source[last..])?;

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    /// The template text as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Keys referenced by the template's fields.
    pub fn attributes(&self) -> KeySet {
        self.pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Field { key, .. } => Some(key.clone()),
                Piece::Text(_) => None,
            })
            .collect()
    }

    /// Substitute every field from `attrs`.
    pub fn construct(&self, attrs: &Attrs) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Field { key, format } => {
                    let value = attrs
                        .get(key)
                        .ok_or_else(|| RouteError::MissingAttribute(key.clone()))?;
                    if let Some(text) = format.apply(value) {
                        out.push_str(&text);
                    }
                }
            }
        }
        Ok(out)
    }
}

fn push_text(pieces: &mut Vec<Piece>, source: &str, text: &str) -> Result<()> {
    if text.contains(['{', '}']) {
        return Err(RouteError::template(source, "unbalanced `{` or `}`"));
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(text.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_parse_and_construct() {
        let tpl = Template::parse("/{type}/{year:04}/{month:02d}/{slug}.atom").unwrap();
        let keys: Vec<_> = tpl.attributes().into_iter().collect();
        assert_eq!(keys, ["month", "slug", "type", "year"]);

        let attrs = attrs! { "type" => "post", "year" => 811, "month" => 5, "slug" => "hi" };
        assert_eq!(tpl.construct(&attrs).unwrap(), "/post/0811/05/hi.atom");
    }

    #[test]
    fn test_no_fields() {
        let tpl = Template::parse("/feed.xml").unwrap();
        assert!(tpl.attributes().is_empty());
        assert_eq!(tpl.construct(&Attrs::new()).unwrap(), "/feed.xml");
    }

    #[test]
    fn test_page_spec() {
        let tpl = Template::parse("/archive/{page:page}").unwrap();
        assert_eq!(tpl.construct(&attrs! { "page" => 1 }).unwrap(), "/archive/");
        assert_eq!(tpl.construct(&attrs! { "page" => 4 }).unwrap(), "/archive/page4");
    }

    #[test]
    fn test_unbalanced() {
        assert!(Template::parse("/{type").is_err());
        assert!(Template::parse("/type}").is_err());
        assert!(Template::parse("/{}").is_err());
        assert!(Template::parse("/{slug:zz}").is_err());
        assert!(Template::parse("/{n:0999999999}").is_err());
    }

    #[test]
    fn test_missing_attribute() {
        let tpl = Template::parse("/wiki/{url}").unwrap();
        assert_eq!(
            tpl.construct(&Attrs::new()).unwrap_err(),
            RouteError::MissingAttribute("url".into())
        );
    }
}
