//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# govlint configuration

[linter]
# Root directory to lint (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/.venv/**",
    "**/__pycache__/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-hardcoded-trust-level]
enabled = true
# Inclusive upper bound for flagged numeric literals (default: 5)
max_magic_value = 5

[rules.no-ungoverned-tool-call]
enabled = true
# severity = "warning"  # Override default severity
# Extra call patterns merged into the taxonomy: "object.method" pairs
# or bare receiver names
# additional_tool_patterns = ["sandbox.spawn"]
# additional_check_patterns = ["guard.allow"]

# [rules.require-budget-check]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("govlint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created govlint.toml");
    println!("\nNext steps:");
    println!("  1. Edit govlint.toml to configure rules");
    println!("  2. Run: govlint check");

    Ok(())
}
