//! Output formatting for the CLI.
//!
//! Separate from core logic so tysnap can be used as a library.

use colored::Colorize;

use super::run::RunSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(summary: &RunSummary, verbose: bool) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Wrote {} ({}, {})",
            summary.output_path.display(),
            counted(summary.type_count, "type"),
            counted(summary.const_count, "constant"),
        )
        .green()
    );

    print_parse_warning(summary.parse_error_count, verbose);
}

/// Print a warning about files that could not be parsed.
fn print_parse_warning(count: usize, verbose: bool) {
    if count > 0 && !verbose {
        eprintln!(
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

fn counted(n: usize, noun: &str) -> String {
    format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_counted_pluralization() {
        assert_eq!(counted(0, "type"), "0 types");
        assert_eq!(counted(1, "type"), "1 type");
        assert_eq!(counted(3, "constant"), "3 constants");
    }
}
