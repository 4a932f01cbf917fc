//! Route configuration from `routes.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                      |
//! |---------------|----------------------------------------------|
//! | `[base]`      | URL base, output directory, pretty flag      |
//! | `[[rules]]`   | Ordered path rules (first match wins)        |
//!
//! ```toml
//! [base]
//! url = "/"
//! fs = "public"
//! pretty = true
//!
//! [[rules]]
//! fix = { type = "wiki" }
//! fmt = "/wiki/{url}"
//! ```

mod error;
mod rule;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use rule::RuleConfig;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::log;
use crate::render::Renderer;
use crate::table::RuleTable;

/// Default config file name.
pub const CONFIG_FILE: &str = "routes.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routes.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Output bases and pretty flag
    pub base: BaseConfig,

    /// Rules in match order
    pub rules: Vec<RuleConfig>,
}

/// `[base]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Prefix for every public URL.
    pub url: String,
    /// Output directory, relative to the config file.
    pub fs: PathBuf,
    /// Directory-style URLs (`/a/b/` + `a/b/index.html`).
    pub pretty: bool,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            url: "/".to_string(),
            fs: PathBuf::from("public"),
            pretty: true,
        }
    }
}

impl RouteConfig {
    /// Load from a file. Relative output directories are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if config.base.fs.is_relative() {
            config.base.fs = config.root.join(&config.base.fs);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Build the rule table, reporting every bad rule at once.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let mut table = RuleTable::new();

        for (index, rule_config) in self.rules.iter().enumerate() {
            if let Some(rule) = rule_config.to_rule(index, &mut diag)
                && let Err(e) = table.register(rule)
            {
                diag.error(format!("rules[{index}]"), e.to_string());
            }
        }

        diag.into_result().map_err(ConfigError::Diagnostics)?;
        Ok(table)
    }

    /// Build the renderer used for the rest of the run.
    pub fn into_renderer(self) -> Result<Renderer, ConfigError> {
        let table = self.rule_table()?;
        Ok(Renderer::new(table)
            .with_url_base(self.base.url)
            .with_fs_base(self.base.fs)
            .with_pretty(self.base.pretty))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> RouteConfig {
    let (parsed, ignored) = RouteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
