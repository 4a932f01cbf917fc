//! Rules: an attribute signature paired with a path builder.
//!
//! A rule applies to an attribute set when the set has *exactly* the rule's
//! required keys and agrees with every bound value:
//!
//! ```text
//! Rule::from_template("/wiki/{url}")?.fix("type", "wiki")
//!     required = {type, url}, bound = {type: wiki}
//!
//! {type: wiki, url: x}          -> /wiki/x
//! {type: image, url: x}         -> no match (bound value differs)
//! {type: wiki, url: x, lang: de} -> no match (extra key)
//! ```

mod template;

use std::fmt;

use crate::attrs::{self, Attrs, KeySet, Value};
use crate::component::Component;
use crate::error::{Result, RouteError};

pub use template::Template;

/// Extension used unless a rule says otherwise.
pub const DEFAULT_EXTENSION: &str = "html";

/// How a rule turns attributes into a raw path.
#[derive(Debug, Clone)]
pub enum Builder {
    Component(Component),
    Template(Template),
}

impl Builder {
    pub fn attributes(&self) -> KeySet {
        match self {
            Self::Component(c) => c.attributes(),
            Self::Template(t) => t.attributes(),
        }
    }

    /// Values fixed by the builder itself (templates fix nothing).
    pub fn bound_attributes(&self) -> Attrs {
        match self {
            Self::Component(c) => c.bound_attributes(),
            Self::Template(_) => Attrs::new(),
        }
    }

    pub fn construct(&self, attrs: &Attrs) -> Result<String> {
        match self {
            Self::Component(c) => c.construct(attrs),
            Self::Template(t) => t.construct(attrs),
        }
    }
}

impl From<Component> for Builder {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

impl From<Template> for Builder {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

/// A registered path rule.
#[derive(Debug, Clone)]
pub struct Rule {
    ext: Option<String>,
    required: KeySet,
    bound: Attrs,
    builder: Builder,
    pretty: Option<bool>,
}

impl Rule {
    /// Explicit form. Values bound by the builder are added to `bound`
    /// unless `bound` already names the key.
    pub fn new<K>(
        required: impl IntoIterator<Item = K>,
        mut bound: Attrs,
        builder: impl Into<Builder>,
    ) -> Self
    where
        K: Into<String>,
    {
        let builder = builder.into();
        for (key, value) in builder.bound_attributes() {
            bound.entry(key).or_insert(value);
        }
        Self {
            ext: Some(DEFAULT_EXTENSION.to_string()),
            required: required.into_iter().map(Into::into).collect(),
            bound,
            builder,
            pretty: None,
        }
    }

    /// Signature derived from the component: required keys are its
    /// attributes, bound values its bound attributes.
    pub fn from_component(component: Component) -> Self {
        let required = component.attributes();
        Self::new(required, Attrs::new(), component)
    }

    /// Signature derived from the template's fields; add bound keys with
    /// [`Rule::fix`].
    pub fn from_template(fmt: &str) -> Result<Self> {
        let template = Template::parse(fmt)?;
        let required = template.attributes();
        Ok(Self::new(required, Attrs::new(), template))
    }

    /// Bind `key` to `value`. The key becomes required.
    pub fn fix(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        self.required.insert(key.clone());
        self.bound.insert(key, value.into());
        self
    }

    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Output is used verbatim, with no extension or index file.
    pub fn no_ext(mut self) -> Self {
        self.ext = None;
        self
    }

    /// Override the renderer's global pretty flag for this rule.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    #[inline]
    pub fn extension(&self) -> Option<&str> {
        self.ext.as_deref()
    }

    #[inline]
    pub fn required_keys(&self) -> &KeySet {
        &self.required
    }

    #[inline]
    pub fn bound_values(&self) -> &Attrs {
        &self.bound
    }

    #[inline]
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    #[inline]
    pub fn pretty_override(&self) -> Option<bool> {
        self.pretty
    }

    /// Registration-time checks.
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = self.bound.keys().find(|k| !self.required.contains(*k)) {
            return Err(RouteError::malformed(format!(
                "bound key `{key}` is not a required key"
            )));
        }
        if let Some(key) = self
            .builder
            .attributes()
            .into_iter()
            .find(|k| !self.required.contains(k))
        {
            return Err(RouteError::malformed(format!(
                "path uses `{key}` which is not a required key"
            )));
        }
        if let Builder::Component(component) = &self.builder
            && let Some(key) = component.bound_conflict()
        {
            return Err(RouteError::malformed(format!(
                "`{key}` is bound to two different values"
            )));
        }
        for (key, value) in self.builder.bound_attributes() {
            if let Some(fixed) = self.bound.get(&key)
                && *fixed != value
            {
                return Err(RouteError::malformed(format!(
                    "`{key}` is bound to `{value}` by the path but fixed to `{fixed}`"
                )));
            }
        }
        match (&self.ext, self.pretty) {
            (Some(ext), _) if ext.is_empty() => Err(RouteError::malformed(
                "empty extension, use no extension instead",
            )),
            (None, Some(true)) => Err(RouteError::malformed(
                "pretty output needs an extension for the index file",
            )),
            _ => Ok(()),
        }
    }

    /// Exact key-set equality plus agreement on every bound value.
    pub fn matches(&self, attrs: &Attrs) -> bool {
        attrs::has_exact_keys(attrs, &self.required) && attrs::agrees_with(attrs, &self.bound)
    }

    /// Build the raw path with any trailing `/` removed.
    pub fn construct(&self, attrs: &Attrs) -> Result<String> {
        let raw = self.builder.construct(attrs)?;
        Ok(raw.trim_end_matches('/').to_string())
    }

    /// Whether every attribute set matching `later` is already claimed by
    /// this rule.
    pub fn shadows(&self, later: &Rule) -> bool {
        self.required == later.required
            && self
                .bound
                .iter()
                .all(|(key, value)| later.bound.get(key) == Some(value))
    }

    /// `{key, key=value, ..}` over the required keys.
    pub fn signature(&self) -> String {
        let keys: Vec<String> = self
            .required
            .iter()
            .map(|key| match self.bound.get(key) {
                Some(value) => format!("{key}={value}"),
                None => key.clone(),
            })
            .collect();
        format!("{{{}}}", keys.join(", "))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.builder {
            Builder::Template(t) => write!(f, "{}", t.as_str())?,
            Builder::Component(c) => write!(f, "{}", describe_component(c))?,
        }
        write!(f, " {}", self.signature())?;
        if let Some(ext) = &self.ext {
            write!(f, " .{ext}")?;
        }
        if let Some(pretty) = self.pretty {
            write!(f, " pretty={pretty}")?;
        }
        Ok(())
    }
}

fn describe_component(component: &Component) -> String {
    match component {
        Component::Literal(text) => text.clone(),
        Component::Variable { key, format } if format.name() == "plain" => format!("{{{key}}}"),
        Component::Variable { key, format } => format!("{{{key}:{}}}", format.name()),
        Component::Bound { key, value } => format!("{{{key}={value}}}"),
        Component::Compound(children) => children
            .iter()
            .map(describe_component)
            .collect::<Vec<_>>()
            .join("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_template_rule_signature() {
        let rule = Rule::from_template("/wiki/{url}").unwrap().fix("type", "wiki");
        let keys: Vec<_> = rule.required_keys().iter().cloned().collect();
        assert_eq!(keys, ["type", "url"]);
        assert_eq!(rule.bound_values(), &attrs! { "type" => "wiki" });
        assert_eq!(rule.signature(), "{type=wiki, url}");
        rule.validate().unwrap();
    }

    #[test]
    fn test_component_rule_signature() {
        let rule = Rule::from_component(
            Component::literal("blog") / Component::var("slug") / Component::bound("type", "post"),
        );
        assert_eq!(rule.bound_values(), &attrs! { "type" => "post" });
        assert!(rule.matches(&attrs! { "type" => "post", "slug" => "a" }));
        assert!(!rule.matches(&attrs! { "type" => "tag", "slug" => "a" }));
        assert_eq!(rule.to_string(), "blog/{slug}/{type=post} {slug, type=post} .html");
    }

    #[test]
    fn test_exact_key_matching() {
        let rule = Rule::from_template("/{type}/{year}").unwrap();
        assert!(rule.matches(&attrs! { "type" => "post", "year" => 2010 }));
        assert!(!rule.matches(&attrs! { "type" => "post", "year" => 2010, "month" => 3 }));
        assert!(!rule.matches(&attrs! { "type" => "post" }));
    }

    #[test]
    fn test_construct_strips_trailing_slash() {
        let rule = Rule::from_template("/{type}/").unwrap();
        assert_eq!(rule.construct(&attrs! { "type" => "tags" }).unwrap(), "/tags");
    }

    #[test]
    fn test_bound_not_required() {
        let rule = Rule::new(["url"], attrs! { "type" => "wiki" }, Template::parse("/{url}").unwrap());
        assert!(matches!(rule.validate(), Err(RouteError::MalformedRule(_))));
    }

    #[test]
    fn test_builder_key_not_required() {
        let rule = Rule::new(["type"], Attrs::new(), Template::parse("/{type}/{url}").unwrap());
        assert!(matches!(rule.validate(), Err(RouteError::MalformedRule(_))));
    }

    #[test]
    fn test_null_extension_forced_pretty() {
        let rule = Rule::from_template("/feed.xml").unwrap().no_ext().pretty(true);
        assert!(matches!(rule.validate(), Err(RouteError::MalformedRule(_))));

        let rule = Rule::from_template("/feed.xml").unwrap().no_ext();
        rule.validate().unwrap();
    }

    #[test]
    fn test_fix_disagrees_with_component() {
        let rule = Rule::from_component(Component::bound("type", "post") / Component::var("slug"))
            .fix("type", "tag");
        assert!(matches!(rule.validate(), Err(RouteError::MalformedRule(_))));
    }

    #[test]
    fn test_component_bound_conflict() {
        let rule = Rule::from_component(
            Component::bound("type", "post") / Component::bound("type", "tag"),
        );
        assert!(matches!(rule.validate(), Err(RouteError::MalformedRule(_))));
    }

    #[test]
    fn test_empty_extension() {
        let rule = Rule::from_template("/x").unwrap().ext("");
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_shadows() {
        let generic = Rule::from_template("/{type}/{url}").unwrap();
        let wiki = Rule::from_template("/wiki/{url}").unwrap().fix("type", "wiki");
        assert!(generic.shadows(&wiki));
        assert!(!wiki.shadows(&generic));
        assert!(!wiki.shadows(&Rule::from_template("/{url}").unwrap()));
    }
}
