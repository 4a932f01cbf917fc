//! Command-line interface module.

mod args;

pub use args::{CheckArgs, Cli, Commands, ResolveArgs};

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use pathrule::attrs::{self, Attrs};
use pathrule::check;
use pathrule::render::Renderer;
use pathrule::{debug, log};

// ============================================================================
// resolve
// ============================================================================

/// Print the URL and/or output path for one attribute set.
pub fn run_resolve(renderer: &Renderer, args: &ResolveArgs) -> Result<()> {
    let attrs = args.to_attrs();
    debug!("route"; "resolving {}", attrs::describe(&attrs));

    let url = if args.encode {
        renderer.url_encoded(&attrs)?
    } else {
        renderer.url(&attrs)?
    };
    let Some(url) = url else {
        bail!("no rule matches {}", attrs::describe(&attrs));
    };
    let fs = renderer
        .fs(&attrs)?
        .context("url resolved but output path did not")?;

    match (args.url, args.fs) {
        (true, _) => println!("{url}"),
        (_, true) => println!("{}", fs.display()),
        _ => {
            println!("url: {url}");
            println!("fs:  {}", fs.display());
        }
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

/// Resolve a JSON batch and report conflicts, unresolved sets and errors.
pub fn run_check(renderer: &Renderer, args: &CheckArgs) -> Result<()> {
    let items = read_batch(&args.input)?;
    log!("check"; "resolving {} attribute sets against {} rules", items.len(), renderer.table().len());

    let report = check::run(renderer, &items);
    check::print_report(&report);

    if report.is_clean() {
        log!("check"; "{} attribute sets, no conflicts", report.checked);
        return Ok(());
    }
    if args.warn_only {
        return Ok(());
    }
    bail!(
        "{} conflict(s), {} unresolved, {} error(s)",
        report.conflicts.len(),
        report.unresolved.len(),
        report.errors.len()
    );
}

fn read_batch(input: &Path) -> Result<Vec<Attrs>> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read `{}`", input.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("`{}` is not a JSON array of attribute objects", input.display()))
}

// ============================================================================
// rules
// ============================================================================

/// List rules in match order, flagging unreachable ones.
pub fn run_rules(renderer: &Renderer) -> Result<()> {
    let shadowed = renderer.table().shadowed();

    for (index, rule) in renderer.table().iter().enumerate() {
        match shadowed.iter().find(|(i, _)| *i == index) {
            Some((_, by)) => println!(
                "{:>3}  {}  {}",
                index,
                rule.dimmed(),
                format!("(shadowed by #{by})").yellow()
            ),
            None => println!("{index:>3}  {rule}"),
        }
    }

    if renderer.table().is_empty() {
        log!("warning"; "no rules configured");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathrule::{Rule, RuleTable, Value};

    fn renderer() -> Renderer {
        let table = RuleTable::new()
            .with(Rule::from_template("/{url}").unwrap().fix("type", "page"))
            .unwrap()
            .with(Rule::from_template("/{url}").unwrap().fix("type", "post"))
            .unwrap();
        Renderer::new(table)
    }

    fn batch(json: &str) -> (tempfile::TempDir, CheckArgs) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch.json");
        std::fs::write(&input, json).unwrap();
        let args = CheckArgs {
            input,
            warn_only: false,
        };
        (dir, args)
    }

    #[test]
    fn test_check_clean_batch() {
        let (_dir, args) = batch(r#"[{"type": "page", "url": "a"}, {"type": "post", "url": "b"}]"#);
        run_check(&renderer(), &args).unwrap();
    }

    #[test]
    fn test_check_fails_on_conflict() {
        let (_dir, args) = batch(r#"[{"type": "page", "url": "a"}, {"type": "post", "url": "a"}]"#);
        let err = run_check(&renderer(), &args).unwrap_err();
        assert!(err.to_string().contains("1 conflict(s), 0 unresolved"));
    }

    #[test]
    fn test_check_fails_on_unresolved() {
        let (_dir, args) = batch(r#"[{"type": "draft", "url": "a"}]"#);
        let err = run_check(&renderer(), &args).unwrap_err();
        assert!(err.to_string().contains("0 conflict(s), 1 unresolved"));
    }

    #[test]
    fn test_check_warn_only() {
        let (_dir, mut args) = batch(r#"[{"type": "page", "url": "a"}, {"type": "post", "url": "a"}]"#);
        args.warn_only = true;
        run_check(&renderer(), &args).unwrap();
    }

    #[test]
    fn test_check_rejects_non_array() {
        let (_dir, args) = batch(r#"{"type": "page"}"#);
        assert!(run_check(&renderer(), &args).is_err());
    }

    #[test]
    fn test_resolve() {
        let args = ResolveArgs {
            attrs: vec![
                ("type".into(), Value::from("page")),
                ("url".into(), Value::from("a")),
            ],
            url: true,
            fs: false,
            encode: false,
        };
        run_resolve(&renderer(), &args).unwrap();
    }

    #[test]
    fn test_resolve_no_match() {
        let args = ResolveArgs {
            attrs: vec![("type".into(), Value::from("draft"))],
            url: false,
            fs: false,
            encode: false,
        };
        let err = run_resolve(&renderer(), &args).unwrap_err();
        assert!(err.to_string().contains("no rule matches {type=draft}"));
    }
}
