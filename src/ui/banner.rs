use console::style;

use crate::ui::icons::CROSS;

/// Dismissible red error banner, as a single line.
pub fn render_banner(message: &str) -> String {
    format!("{}{}", CROSS, style(message).red().bold())
}

/// Print the banner to stderr if there is one.
pub fn print_banner(banner: Option<&str>) {
    if let Some(message) = banner {
        eprintln!("{}", render_banner(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_contains_message() {
        console::set_colors_enabled(false);
        let out = render_banner("Failed to pause campaigns: boom");
        assert!(out.ends_with("Failed to pause campaigns: boom"));
    }
}
