//! pathrule - attribute-keyed URL and output path resolution.
//!
//! Content objects are described by attribute sets such as
//! `{type: post, year: 2010, month: 3, slug: foo}`. An ordered table of
//! rules maps each set to a raw path; a [`Renderer`] turns that into a
//! public URL and an output file path.
//!
//! ```text
//! Attrs ──> RuleTable (first exact-signature match)
//!              │
//!              ▼
//!          raw path ──> Renderer ──> url  /2010/03/foo/
//!                                └─> fs   public/2010/03/foo/index.html
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pathrule::{Component, Renderer, Rule, RuleTable, attrs};
//!
//! let post = Component::var("year") / Component::zero_pad("month", 2)
//!     / Component::var("slug") / Component::bound("type", "post");
//! let table = RuleTable::new()
//!     .with(Rule::from_component(post))?
//!     .with(Rule::from_template("/wiki/{url}")?.fix("type", "wiki"))?;
//! let renderer = Renderer::new(table).with_fs_base("public");
//!
//! let attrs = attrs! { "type" => "post", "year" => 2010, "month" => 3, "slug" => "foo" };
//! assert_eq!(renderer.url(&attrs)?.as_deref(), Some("/2010/03/foo/"));
//! ```

pub mod attrs;
pub mod check;
pub mod component;
pub mod config;
pub mod error;
pub mod logger;
pub mod render;
pub mod rule;
pub mod table;

pub use attrs::{AttrSource, Attrs, Value};
pub use component::{Component, Formatter};
pub use error::RouteError;
pub use render::Renderer;
pub use rule::{Builder, Rule, Template};
pub use table::{Resolved, RuleTable};
