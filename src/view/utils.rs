//! Utility functions for rendering UI components

use ratatui::layout::Rect;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

/// A fixed-size rectangle centered in `area`, clamped to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_pads_short_strings() {
        assert_eq!(truncate_string("ab", 5), "ab   ");
    }

    #[test]
    fn truncate_adds_ellipsis_for_long_strings() {
        assert_eq!(truncate_string("abcdefgh", 5), "ab...");
    }

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect { x: 0, y: 0, width: 20, height: 10 };
        let rect = centered_rect(area, 100, 100);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}
