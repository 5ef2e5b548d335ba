//! List rules command implementation.

use govlint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<28} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<28} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  govlint check --rules no-ungoverned-tool-call,require-budget-check");
    println!("  govlint check --rules GV001,GV005");
    println!("\nSuppress inline with:");
    println!("  # govlint: disable=RULE            (covers the same line)");
    println!("  # govlint: disable-next-line=RULE  (covers the next line)");
}
