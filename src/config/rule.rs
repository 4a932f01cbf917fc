//! `[[rules]]` entries.
//!
//! ```toml
//! [[rules]]
//! fix = { type = "wiki" }
//! fmt = "/wiki/{url}"        # format template
//! pretty = false
//!
//! [[rules]]
//! path = "blog/{year}/{month:02}/{slug}/{type=post}"   # component path
//!
//! [[rules]]
//! fmt = "/feed.xml"
//! fix = { type = "feed" }
//! ext = ""                   # no extension, output used verbatim
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigDiagnostics;
use crate::attrs::Attrs;
use crate::component::Component;
use crate::rule::Rule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Format template, e.g. `/{type}/{slug}`.
    pub fmt: Option<String>,
    /// Component path, e.g. `blog/{year}/{slug}/{type=post}`.
    pub path: Option<String>,
    /// Bound attribute values.
    pub fix: Attrs,
    /// Output extension; `""` disables it. Defaults to `html`.
    pub ext: Option<String>,
    /// Per-rule pretty override.
    pub pretty: Option<bool>,
}

impl RuleConfig {
    /// Build and validate the rule, recording problems under `rules[index]`.
    pub fn to_rule(&self, index: usize, diag: &mut ConfigDiagnostics) -> Option<Rule> {
        let field = format!("rules[{index}]");

        let rule = match (&self.fmt, &self.path) {
            (Some(fmt), None) => match Rule::from_template(fmt) {
                Ok(rule) => rule,
                Err(e) => {
                    diag.error(format!("{field}.fmt"), e.to_string());
                    return None;
                }
            },
            (None, Some(path)) => match Component::parse_path(path) {
                Ok(component) => Rule::from_component(component),
                Err(e) => {
                    diag.error(format!("{field}.path"), e.to_string());
                    return None;
                }
            },
            (Some(_), Some(_)) => {
                diag.error_with_hint(
                    field,
                    "both `fmt` and `path` are set",
                    "keep only one of them",
                );
                return None;
            }
            (None, None) => {
                diag.error_with_hint(
                    field,
                    "rule has no pattern",
                    "add `fmt = \"/{type}/{slug}\"` or `path = \"{type}/{slug}\"`",
                );
                return None;
            }
        };

        let mut rule = self
            .fix
            .iter()
            .fold(rule, |rule, (key, value)| rule.fix(key.clone(), value.clone()));
        rule = match self.ext.as_deref() {
            Some("") => rule.no_ext(),
            Some(ext) => rule.ext(ext.trim_start_matches('.')),
            None => rule,
        };
        if let Some(pretty) = self.pretty {
            rule = rule.pretty(pretty);
        }

        match rule.validate() {
            Ok(()) => Some(rule),
            Err(e) => {
                diag.error(field, e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn parse(content: &str) -> RuleConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_template_rule() {
        let config = parse("fmt = \"/wiki/{url}\"\nfix = { type = \"wiki\" }\npretty = false");
        let mut diag = ConfigDiagnostics::new();
        let rule = config.to_rule(0, &mut diag).unwrap();
        assert!(diag.is_empty());
        assert_eq!(rule.bound_values(), &attrs! { "type" => "wiki" });
        assert_eq!(rule.pretty_override(), Some(false));
        assert_eq!(rule.extension(), Some("html"));
    }

    #[test]
    fn test_path_rule_with_int_fix() {
        let config = parse("path = \"archive/{year}\"\nfix = { year = 2010 }\next = \".htm\"");
        let mut diag = ConfigDiagnostics::new();
        let rule = config.to_rule(0, &mut diag).unwrap();
        assert!(rule.matches(&attrs! { "year" => 2010 }));
        assert!(!rule.matches(&attrs! { "year" => "2010" }));
        assert_eq!(rule.extension(), Some("htm"));
    }

    #[test]
    fn test_empty_ext() {
        let config = parse("fmt = \"/feed.xml\"\nfix = { type = \"feed\" }\next = \"\"");
        let mut diag = ConfigDiagnostics::new();
        assert_eq!(config.to_rule(0, &mut diag).unwrap().extension(), None);
    }

    #[test]
    fn test_errors_are_collected() {
        let mut diag = ConfigDiagnostics::new();
        assert!(RuleConfig::default().to_rule(0, &mut diag).is_none());
        assert!(parse("fmt = \"/a\"\npath = \"a\"").to_rule(1, &mut diag).is_none());
        assert!(parse("fmt = \"/{oops\"").to_rule(2, &mut diag).is_none());
        assert!(parse("fmt = \"/x\"\next = \"\"\npretty = true").to_rule(3, &mut diag).is_none());

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["rules[0]", "rules[1]", "rules[2].fmt", "rules[3]"]);
    }
}
