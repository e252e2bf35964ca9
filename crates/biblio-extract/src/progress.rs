//! Progress bar for the per-work citation queries

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})";

/// Bar over `total` works, or a hidden one when `visible` is false
pub fn citation_progress(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Fetching citation graph");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_bar_has_length() {
        let pb = citation_progress(42, true);
        assert_eq!(pb.length(), Some(42));
        pb.finish_and_clear();
    }

    #[test]
    fn test_hidden_bar() {
        let pb = citation_progress(42, false);
        assert!(pb.is_hidden());
    }
}
