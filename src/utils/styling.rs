//! Terminal styling for the pipeline's console output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static MODEL: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static SEED: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██████╗ ██████╗ ██╗ ██████╗███████╗███████╗██╗████████╗
    ██╔══██╗██╔══██╗██║██╔════╝██╔════╝██╔════╝██║╚══██╔══╝
    ██████╔╝██████╔╝██║██║     █████╗  █████╗  ██║   ██║
    ██╔═══╝ ██╔══██╗██║██║     ██╔══╝  ██╔══╝  ██║   ██║
    ██║     ██║  ██║██║╚██████╗███████╗██║     ██║   ██║
    ╚═╝     ╚═╝  ╚═╝╚═╝ ╚═════╝╚══════╝╚═╝     ╚═╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Housing price regression: preprocess, train, compare").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card
pub fn print_config(
    input: &Path,
    processed_dir: &Path,
    model_dir: &Path,
    output_dir: &Path,
    seed: u64,
    cv_folds: usize,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:     {:<36}│", FOLDER, truncate_path(input, 35));
    println!("    │  {} Processed: {:<36}│", SAVE, truncate_path(processed_dir, 35));
    println!("    │  {} Models:    {:<36}│", MODEL, truncate_path(model_dir, 35));
    println!("    │  {} Outputs:   {:<36}│", CHART, truncate_path(output_dir, 35));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Seed: {:<10} CV folds: {:<19}│",
        SEED,
        style(seed).yellow(),
        style(cv_folds).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("    {} {}", ROCKET, style(message).green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Print a ranked `(name, value)` list, one per line
pub fn print_ranked(title: &str, entries: &[(String, f64)]) {
    println!("      {}", style(title).white().bold());
    for (i, (name, value)) in entries.iter().enumerate() {
        println!(
            "        {}. {:<28} {}",
            i + 1,
            name,
            style(format!("{:.4}", value)).cyan()
        );
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("data/processed_data", 10), "...ed_data");
    }
}
