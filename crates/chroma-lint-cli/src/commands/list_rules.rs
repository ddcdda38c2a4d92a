//! List rules command implementation.

use chroma_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<45} Description", "Name");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        println!("{:<45} {}", rule.name(), rule.description());
    }

    println!("\nPresets:");
    for preset in [Preset::Recommended, Preset::Minimal] {
        let names: Vec<_> = preset
            .rules()
            .iter()
            .map(|rule| short_name(rule.name()))
            .collect();
        let marker = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:<12} - {}{marker}", preset.as_str(), names.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  chroma-lint lint --rules FunctionComment,OpeningFunctionBrace");
    println!("  chroma-lint lint --rules Chroma.Files.MatchingCase");
}

fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
