//! Column helpers for CLI listings.

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use devpilot_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("exec:git status", 20), "exec:git status");
/// assert_eq!(truncate_string("exec:npx eslint . --fix", 12), "exec:npx ...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}
