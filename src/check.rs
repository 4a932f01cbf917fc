//! URL conflict detection across a batch of attribute sets.
//!
//! The renderer only promises first-match determinism; it does not promise
//! that distinct objects get distinct URLs. This pass resolves a whole
//! batch and reports:
//!
//! - URLs claimed by more than one distinct attribute set
//! - attribute sets with no URL at all
//! - attribute sets whose resolution failed

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::attrs::{self, Attrs};
use crate::error::RouteError;
use crate::log;
use crate::render::Renderer;

/// URL sources map: URL -> distinct attribute sets claiming that URL.
pub type UrlSourceMap = FxHashMap<String, Vec<Attrs>>;

/// A URL conflict: multiple attribute sets render to the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlConflict {
    /// The conflicting URL
    pub url: String,
    /// All attribute sets claiming this URL, in input order
    pub sources: Vec<Attrs>,
}

/// Result of checking a batch.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of attribute sets checked
    pub checked: usize,
    /// Conflicts, sorted by URL
    pub conflicts: Vec<UrlConflict>,
    /// Attribute sets no rule matched
    pub unresolved: Vec<Attrs>,
    /// Attribute sets whose resolution raised an error
    pub errors: Vec<(Attrs, RouteError)>,
}

impl CheckReport {
    /// True if nothing needs reporting.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.unresolved.is_empty() && self.errors.is_empty()
    }
}

/// Resolve every attribute set and collect problems.
///
/// Resolution runs in parallel; results are folded in input order so the
/// report is reproducible.
pub fn run(renderer: &Renderer, items: &[Attrs]) -> CheckReport {
    let results: Vec<Result<Option<String>, RouteError>> =
        items.par_iter().map(|attrs| renderer.url(attrs)).collect();

    let mut report = CheckReport {
        checked: items.len(),
        ..CheckReport::default()
    };
    let mut url_sources = UrlSourceMap::default();

    for (attrs, result) in items.iter().zip(results) {
        match result {
            Ok(Some(url)) => {
                let sources = url_sources.entry(url).or_default();
                if !sources.contains(attrs) {
                    sources.push(attrs.clone());
                }
            }
            Ok(None) => report.unresolved.push(attrs.clone()),
            Err(e) => report.errors.push((attrs.clone(), e)),
        }
    }

    report.conflicts = detect_conflicts(&url_sources);
    report
}

/// Find URLs with more than one source, sorted by URL.
pub fn detect_conflicts(url_sources: &UrlSourceMap) -> Vec<UrlConflict> {
    let mut conflicts: Vec<UrlConflict> = url_sources
        .iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(url, sources)| UrlConflict {
            url: url.clone(),
            sources: sources.clone(),
        })
        .collect();
    conflicts.sort_by(|a, b| a.url.cmp(&b.url));
    conflicts
}

/// Print the report using the standard log format.
///
/// Output format:
/// ```text
/// [warning] url conflicts (1 url, 2 sources)
/// [url] /foo/ (2 sources)
///   - {type=page, url=foo}
///   - {type=post, url=foo}
/// [warning] no url for 1 attribute set
///   - {type=draft}
/// ```
pub fn print_report(report: &CheckReport) {
    if !report.conflicts.is_empty() {
        let total_sources: usize = report.conflicts.iter().map(|c| c.sources.len()).sum();
        log!("warning"; "url conflicts ({} url{}, {} source{})",
            report.conflicts.len(), plural_s(report.conflicts.len()),
            total_sources, plural_s(total_sources));

        for conflict in &report.conflicts {
            log!("url"; "{} ({} source{})", conflict.url, conflict.sources.len(), plural_s(conflict.sources.len()));
            for source in &conflict.sources {
                eprintln!("  - {}", attrs::describe(source));
            }
        }
    }

    if !report.unresolved.is_empty() {
        log!("warning"; "no url for {} attribute set{}",
            report.unresolved.len(), plural_s(report.unresolved.len()));
        for attrs in &report.unresolved {
            eprintln!("  - {}", attrs::describe(attrs));
        }
    }

    for (attrs, error) in &report.errors {
        log!("error"; "{}: {}", attrs::describe(attrs), error);
    }
}

/// Format conflicts as a string (for error messages).
pub fn format_conflicts(conflicts: &[UrlConflict]) -> String {
    conflicts
        .iter()
        .map(format_single_conflict)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_single_conflict(conflict: &UrlConflict) -> String {
    let mut lines = vec![format!("{} ({})", conflict.url, conflict.sources.len())];
    for source in &conflict.sources {
        lines.push(format!("  - {}", attrs::describe(source)));
    }
    lines.join("\n")
}

#[inline]
fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
