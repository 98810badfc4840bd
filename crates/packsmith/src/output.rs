//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_WIDTH: usize = 20;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print an indented list item
pub fn item(msg: &str) {
    println!("    - {}", msg);
}

/// Progress bar used while work items run; hidden when `visible` is false
pub fn progress_bar(len: u64, msg: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    // The template is a constant; fall back to the default style if it is rejected.
    let bar_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|s| s.progress_chars("█▓░"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(bar_style);
    pb.set_message(msg.to_string());
    pb
}

/// Text bar for completion lines: `[████░░░░] 2/5 (40.0%)`
pub fn render_bar(completed: usize, total: usize) -> String {
    let (filled, percent) = if total == 0 {
        (BAR_WIDTH, 100.0)
    } else {
        let completed = completed.min(total);
        (
            BAR_WIDTH * completed / total,
            completed as f64 / total as f64 * 100.0,
        )
    };

    format!(
        "[{}{}] {}/{} ({:.1}%)",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        completed,
        total,
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar() {
        assert_eq!(
            render_bar(1, 4),
            "[█████░░░░░░░░░░░░░░░] 1/4 (25.0%)"
        );
        assert_eq!(
            render_bar(3, 3),
            "[████████████████████] 3/3 (100.0%)"
        );
    }

    #[test]
    fn test_render_bar_rounds_down() {
        assert!(render_bar(1, 3).starts_with("[██████░"));
        assert!(render_bar(1, 3).ends_with("1/3 (33.3%)"));
    }

    #[test]
    fn test_render_bar_empty_total() {
        assert_eq!(render_bar(0, 0), "[████████████████████] 0/0 (100.0%)");
    }
}
