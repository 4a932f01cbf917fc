//! URL and output path rendering.
//!
//! ```text
//! raw path: blog/2011/05/hi    ext: html
//!
//!              pretty                       not pretty
//! url   /blog/2011/05/hi/               /blog/2011/05/hi.html
//! fs    public/blog/2011/05/hi/index.html   public/blog/2011/05/hi.html
//! ```
//!
//! A `None` result means the attributes have no canonical location; writers
//! skip such objects.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::attrs::{AttrSource, Attrs};
use crate::error::Result;
use crate::table::{Resolved, RuleTable};

/// Characters escaped in encoded URL segments.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Rule table plus output bases. Immutable once built, shareable across
/// threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    table: RuleTable,
    url_base: String,
    fs_base: PathBuf,
    pretty: bool,
}

impl Renderer {
    /// Defaults: url base `/`, fs base `.`, pretty output.
    pub fn new(table: RuleTable) -> Self {
        Self {
            table,
            url_base: "/".to_string(),
            fs_base: PathBuf::from("."),
            pretty: true,
        }
    }

    pub fn with_url_base(mut self, base: impl Into<String>) -> Self {
        self.url_base = base.into();
        self
    }

    pub fn with_fs_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.fs_base = base.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[inline]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    #[inline]
    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    #[inline]
    pub fn fs_base(&self) -> &Path {
        &self.fs_base
    }

    #[inline]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Public URL for `attrs`.
    pub fn url(&self, attrs: &Attrs) -> Result<Option<String>> {
        Ok(self
            .table
            .resolve(attrs)?
            .map(|r| join_url(&self.url_base, &self.url_tail(&r))))
    }

    /// Output file path for `attrs`.
    pub fn fs(&self, attrs: &Attrs) -> Result<Option<PathBuf>> {
        Ok(self
            .table
            .resolve(attrs)?
            .map(|r| join_fs(&self.fs_base, &self.fs_tail(&r))))
    }

    /// [`Renderer::url`] over layered sources.
    pub fn url_from(&self, sources: &[AttrSource<'_>]) -> Result<Option<String>> {
        Ok(self
            .table
            .resolve_sources(sources)?
            .map(|r| join_url(&self.url_base, &self.url_tail(&r))))
    }

    /// [`Renderer::fs`] over layered sources.
    pub fn fs_from(&self, sources: &[AttrSource<'_>]) -> Result<Option<PathBuf>> {
        Ok(self
            .table
            .resolve_sources(sources)?
            .map(|r| join_fs(&self.fs_base, &self.fs_tail(&r))))
    }

    /// [`Renderer::url`] with the part after the base percent-encoded.
    pub fn url_encoded(&self, attrs: &Attrs) -> Result<Option<String>> {
        Ok(self.table.resolve(attrs)?.map(|r| {
            let tail = self
                .url_tail(&r)
                .split('/')
                .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
                .collect::<Vec<_>>()
                .join("/");
            join_url(&self.url_base, &tail)
        }))
    }

    /// Pretty output needs an index file name, so extensionless rules are
    /// never pretty.
    fn is_pretty_for(&self, resolved: &Resolved) -> bool {
        resolved.ext.is_some() && resolved.pretty.unwrap_or(self.pretty)
    }

    fn url_tail(&self, resolved: &Resolved) -> String {
        if self.is_pretty_for(resolved) {
            format!("{}/", resolved.raw)
        } else {
            plain_tail(resolved)
        }
    }

    fn fs_tail(&self, resolved: &Resolved) -> String {
        match &resolved.ext {
            Some(ext) if self.is_pretty_for(resolved) => format!("{}/index.{ext}", resolved.raw),
            _ => plain_tail(resolved),
        }
    }
}

/// Non-pretty tail: `raw.ext`, `index.ext` for an empty raw path, or the
/// raw path itself when there is no extension.
fn plain_tail(resolved: &Resolved) -> String {
    match &resolved.ext {
        Some(ext) if resolved.raw.trim_matches('/').is_empty() => format!("index.{ext}"),
        Some(ext) => format!("{}.{ext}", resolved.raw),
        None => resolved.raw.clone(),
    }
}

/// Join a URL base and a path, collapsing repeated `/` in the path and at
/// the seam. The base itself is kept as written (it may carry a scheme).
pub fn join_url(base: &str, tail: &str) -> String {
    let mut out = String::with_capacity(base.len() + tail.len() + 1);
    out.push_str(base.trim_end_matches('/'));
    out.push('/');
    let mut prev_slash = true;
    for c in tail.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Push every non-empty `/`-separated segment of `tail` onto `base`.
pub fn join_fs(base: &Path, tail: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in tail.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
