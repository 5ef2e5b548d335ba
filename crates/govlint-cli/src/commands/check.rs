//! Check command implementation.
//!
//! Walks the given paths, lowers each supported file through the matching
//! front-end, runs the governance rules, and prints the aggregated report.
//! A file that fails to parse yields a single per-file diagnostic and never
//! aborts the scan of the remaining files.

use anyhow::{Context, Result};
use govlint_core::{
    partition_suppressed, CommentMarker, Config, FileContext, Linter, LintResult, Location,
    Severity, SuggestedFix, Taxonomy, Violation,
};
use govlint_rules::{configured_rules, rule_by_name};
use govlint_ts::{JsAdapter, ParseError, PythonAdapter, SyntaxAdapter};
use govlint_window::WindowScanner;
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, ConfigSource};
use crate::{EngineHint, OutputFormat};

/// Runs the check command.
#[allow(clippy::too_many_lines)]
pub fn run(
    paths: &[PathBuf],
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    engine: EngineHint,
    fixes: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let project_dir = project_dir_of(paths);
    let source = config_resolver::resolve(&project_dir, config_path);
    let config = load_config(&source)?;

    let options = config.rule_options();
    let mut taxonomy = Taxonomy::new();
    taxonomy.extend_tool_patterns(&options.additional_tool_patterns);
    taxonomy.extend_check_patterns(&options.additional_check_patterns);

    // Resolve the rule set; unknown rule ids are a usage error.
    let rules = if let Some(filter) = rules_filter {
        let mut rules = Vec::new();
        let mut unknown = Vec::new();
        for name in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match rule_by_name(name, &options) {
                Some(rule) => rules.push(rule),
                None => unknown.push(name.to_owned()),
            }
        }
        if !unknown.is_empty() {
            eprintln!(
                "govlint: unknown rule id(s): {}. Run `govlint list-rules` for available rules.",
                unknown.join(", ")
            );
            std::process::exit(2);
        }
        rules
    } else {
        configured_rules(&options)
    };

    let linter = Linter::new(rules).with_config(config.clone());

    let adapters: Vec<Box<dyn SyntaxAdapter>> =
        vec![Box::new(PythonAdapter::new()), Box::new(JsAdapter::new())];

    let mut exclude_patterns = exclude;
    exclude_patterns.extend(config.linter.exclude.clone());

    let files = discover_files(
        paths,
        &exclude_patterns,
        &adapters,
        config.linter.respect_gitignore,
    );

    tracing::info!(
        "Linting {} file(s) with {} rule(s)",
        files.len(),
        linter.rule_count()
    );

    let window = WindowScanner::with_taxonomy(&taxonomy, options.max_magic_value);

    let mut result = LintResult::new();
    for file_path in &files {
        let relative = file_path
            .strip_prefix(&project_dir)
            .unwrap_or(file_path)
            .to_path_buf();

        let content = match std::fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", file_path.display(), e);
                result.violations.push(io_error_violation(relative, &e));
                continue;
            }
        };

        match engine {
            EngineHint::Window => {
                let violations = window.scan(&relative, &content);
                let report = partition_suppressed(violations, &content);
                result.suppressed += report.suppression_count();
                result.violations.extend(report.active);
                result.files_checked += 1;
            }
            EngineHint::Tree => {
                let Some(adapter) = adapter_for(&adapters, file_path) else {
                    continue;
                };
                match adapter.parse(&content, &taxonomy) {
                    Ok(model) => {
                        let ctx = FileContext::new(file_path, &content, &project_dir);
                        let report = linter.lint_with_suppressions(&ctx, &model);
                        result.suppressed += report.suppression_count();
                        result.violations.extend(report.active);
                        result.files_checked += 1;
                    }
                    Err(err) => {
                        tracing::warn!("Failed to parse {}: {}", file_path.display(), err);
                        result.violations.push(parse_error_violation(relative, &err));
                        result.files_checked += 1;
                    }
                }
            }
        }
    }

    result.sort();
    super::output::print(&result, format)?;

    if fixes {
        print_fixes(&result);
    }

    if !result.violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Directory used for config resolution and relative paths.
fn project_dir_of(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        None => PathBuf::from("."),
    }
}

fn adapter_for<'a>(
    adapters: &'a [Box<dyn SyntaxAdapter>],
    path: &Path,
) -> Option<&'a dyn SyntaxAdapter> {
    let ext = extension_of(path)?;
    adapters
        .iter()
        .find(|adapter| adapter.extensions().contains(&ext.as_str()))
        .map(|adapter| &**adapter)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}

/// Enumerates candidate files: explicit files as-is, directories via a
/// gitignore-respecting walk. A missing path is a usage error (exit 2).
fn discover_files(
    paths: &[PathBuf],
    exclude: &[String],
    adapters: &[Box<dyn SyntaxAdapter>],
    respect_gitignore: bool,
) -> Vec<PathBuf> {
    let supported: Vec<&str> = adapters
        .iter()
        .flat_map(|adapter| adapter.extensions().iter().copied())
        .collect();

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            match extension_of(path) {
                Some(ext) if supported.contains(&ext.as_str()) => files.push(path.clone()),
                _ => tracing::warn!("Skipping unsupported file: {}", path.display()),
            }
        } else if path.is_dir() {
            let mut builder = ignore::WalkBuilder::new(path);
            builder.hidden(false).git_ignore(respect_gitignore);

            for entry in builder.build().flatten() {
                let entry_path = entry.path();
                if !entry_path.is_file() {
                    continue;
                }
                let Some(ext) = extension_of(entry_path) else {
                    continue;
                };
                if !supported.contains(&ext.as_str()) {
                    continue;
                }
                if should_exclude(entry_path, exclude) {
                    tracing::debug!("Excluding: {}", entry_path.display());
                    continue;
                }
                files.push(entry_path.to_path_buf());
            }
        } else {
            eprintln!("govlint: path not found: {}", path.display());
            std::process::exit(2);
        }
    }

    files.sort();
    files
}

/// Checks a path against exclude patterns: glob match first, with a
/// substring fallback for patterns like `**/node_modules/**`.
fn should_exclude(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
            if glob_pattern.matches(&path_str) {
                return true;
            }
        }

        let normalized = pattern.replace("**", "");
        if !normalized.is_empty() && path_str.contains(&normalized) {
            return true;
        }
    }

    false
}

fn parse_error_violation(file: PathBuf, err: &ParseError) -> Violation {
    let line = match err {
        ParseError::Syntax { line } => *line,
        _ => 0,
    };
    Violation::new(
        "GV000",
        "parse-error",
        Severity::Error,
        Location::new(file, line, 0),
        format!("Could not parse file: {err}"),
    )
}

fn io_error_violation(file: PathBuf, err: &std::io::Error) -> Violation {
    Violation::new(
        "GV000",
        "io-error",
        Severity::Error,
        Location::new(file, 0, 0),
        format!("Could not read file: {err}"),
    )
}

/// Prints the inert fix placeholder for each violation that has one.
fn print_fixes(result: &LintResult) {
    let mut printed_header = false;
    for violation in &result.violations {
        let marker = match extension_of(&violation.location.file).as_deref() {
            Some(".py") => CommentMarker::Hash,
            _ => CommentMarker::Slashes,
        };
        let Some(fix) = SuggestedFix::for_rule(&violation.rule, marker) else {
            continue;
        };
        if !printed_header {
            println!("\nSuggested fixes (placeholders only):");
            printed_header = true;
        }
        println!(
            "  {}:{}  [{}]",
            violation.location.file.display(),
            violation.location.line,
            violation.rule
        );
        println!("    {}", fix.description);
        for line in fix.placeholder() {
            println!("    {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_patterns_match_globs_and_substrings() {
        let patterns = vec!["**/node_modules/**".to_owned(), "generated".to_owned()];
        assert!(should_exclude(
            Path::new("/app/node_modules/lib/index.js"),
            &patterns
        ));
        assert!(should_exclude(Path::new("/app/generated/api.py"), &patterns));
        assert!(!should_exclude(Path::new("/app/src/agent.py"), &patterns));
    }

    #[test]
    fn parse_error_violation_carries_the_line() {
        let v = parse_error_violation(PathBuf::from("bad.py"), &ParseError::Syntax { line: 7 });
        assert_eq!(v.rule, "parse-error");
        assert_eq!(v.location.line, 7);
        assert_eq!(v.severity, Severity::Error);
    }

    #[test]
    fn project_dir_prefers_first_directory() {
        assert_eq!(
            project_dir_of(&[PathBuf::from("src/agent.py")]),
            PathBuf::from("src")
        );
        assert_eq!(project_dir_of(&[]), PathBuf::from("."));
    }
}
