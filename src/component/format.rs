//! Value formatters for variable path segments.

use std::fmt;
use std::sync::Arc;

use crate::attrs::Value;
use crate::error::{Result, RouteError};

/// Widest zero padding a format spec may ask for.
pub const MAX_PAD_WIDTH: usize = 32;

/// Formatting function: `None` (or an empty string) suppresses the segment.
pub type FormatFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// A named, shareable formatter.
#[derive(Clone)]
pub struct Formatter {
    name: Arc<str>,
    func: FormatFn,
}

impl Formatter {
    /// Wrap a custom formatting function.
    pub fn custom<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    /// Value as text.
    pub fn plain() -> Self {
        Self::custom("plain", |value| Some(value.to_string()))
    }

    /// Integers zero-padded to `width` (`3` -> `03`). Other values are plain.
    pub fn zero_pad(width: usize) -> Self {
        Self::custom(&format!("0{width}"), move |value| match value {
            Value::Int(n) => Some(format!("{n:0width$}")),
            other => Some(other.to_string()),
        })
    }

    /// Page number: page 1 is the canonical page and has no segment,
    /// later pages render as `{prefix}{n}`.
    pub fn page_no(prefix: &str) -> Self {
        let prefix = prefix.to_string();
        Self::custom("page", move |value| match value.as_int() {
            Some(1) => None,
            Some(n) => Some(format!("{prefix}{n}")),
            None => Some(value.to_string()),
        })
    }

    /// Parse a format spec: `""`, `d`, `s`, `0N`, `0Nd` or `page`.
    pub fn from_spec(spec: &str) -> Result<Self> {
        match spec {
            "" | "d" | "s" => Ok(Self::plain()),
            "page" => Ok(Self::page_no("page")),
            _ => {
                let digits = spec.strip_suffix('d').unwrap_or(spec);
                match digits.strip_prefix('0').map(str::parse::<usize>) {
                    Some(Ok(width)) if width > MAX_PAD_WIDTH => Err(RouteError::template(
                        spec,
                        format!("zero padding wider than {MAX_PAD_WIDTH}"),
                    )),
                    Some(Ok(width)) if width > 0 => Ok(Self::zero_pad(width)),
                    _ => Err(RouteError::template(spec, "unknown format spec")),
                }
            }
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format a value; empty output is normalized to `None`.
    pub fn apply(&self, value: &Value) -> Option<String> {
        (self.func)(value).filter(|s| !s.is_empty())
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::plain()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formatter({})", self.name)
    }
}
