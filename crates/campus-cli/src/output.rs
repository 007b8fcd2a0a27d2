//! Terminal output formatting.

use campus_graph::{AppliedCount, ConstraintSpec, ExistingConstraint};
use colored::Colorize;
use serde_json::{Value, json};

/// Print the outcome of an apply pass.
pub fn print_applied(count: &AppliedCount) {
    println!("\n{}", "Schema applied:".green().bold());
    println!("  Created:        {}", count.created.to_string().cyan());
    println!("  Already present: {}", count.existing.to_string().dimmed());
    println!("  Total ensured:  {}", count.total().to_string().bold());
}

/// JSON form of an apply result.
pub fn applied_json(count: &AppliedCount) -> Value {
    json!({
        "created": count.created,
        "existing": count.existing,
        "total": count.total(),
    })
}

/// Print the statements a spec list would issue.
pub fn print_plan(specs: &[ConstraintSpec]) {
    println!("{} ({} constraints)", "Schema plan".bold(), specs.len());
    println!("{}", "─".repeat(50));

    for (i, spec) in specs.iter().enumerate() {
        println!("{}. {} {}", i + 1, spec.name.cyan(), spec.target().dimmed());
        println!("   {}", spec.to_cypher());
    }
}

/// Print a constraint catalog as a table.
pub fn print_constraints_table(constraints: &[ExistingConstraint]) {
    if constraints.is_empty() {
        println!("{}", "No constraints defined.".dimmed());
        return;
    }

    println!("{:<32} {:<20} {:<16} {:<20}", "Name", "Type", "Labels", "Properties");
    println!("{}", "─".repeat(90));

    for c in constraints {
        println!(
            "{:<32} {:<20} {:<16} {:<20}",
            truncate(&c.name, 30).cyan(),
            truncate(&c.kind, 18),
            truncate(&c.labels.join("|"), 14),
            truncate(&c.properties.join(", "), 20).dimmed()
        );
    }

    println!("\n{} constraints.", constraints.len().to_string().bold());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
