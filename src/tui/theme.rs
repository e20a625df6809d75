use ratatui::style::{Color, Modifier, Style};

use crate::models::{StatusCategory, TaskStatus};

// ── Color palette ──────────────────────────────────────────────────

pub const BG: Color = Color::Rgb(0x0a, 0x0a, 0x0f);
pub const NEON_CYAN: Color = Color::Rgb(0x00, 0xff, 0xf5);
pub const NEON_MAGENTA: Color = Color::Rgb(0xff, 0x00, 0xff);
pub const NEON_PINK: Color = Color::Rgb(0xff, 0x2d, 0x6f);
pub const NEON_GREEN: Color = Color::Rgb(0x39, 0xff, 0x14);
pub const NEON_YELLOW: Color = Color::Rgb(0xff, 0xe6, 0x00);
pub const ELECTRIC_BLUE: Color = Color::Rgb(0x00, 0xd4, 0xff);
pub const TEXT_DIM: Color = Color::Rgb(0xb0, 0xb0, 0xb0);
pub const TEXT_BRIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const BORDER_DIM: Color = Color::Rgb(0x00, 0x5f, 0x5f);
pub const BORDER_BRIGHT: Color = Color::Rgb(0x00, 0xff, 0xf5);
pub const DARK_RED: Color = Color::Rgb(0x66, 0x11, 0x22);

// ── Style presets ──────────────────────────────────────────────────

pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BORDER_BRIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BORDER_DIM)
    }
}

pub fn category_style(category: StatusCategory) -> Style {
    match category {
        StatusCategory::Warning => Style::default().fg(NEON_YELLOW),
        StatusCategory::Info => Style::default().fg(ELECTRIC_BLUE).add_modifier(Modifier::BOLD),
        StatusCategory::Success => Style::default().fg(NEON_GREEN),
    }
}

pub fn status_style(status: &TaskStatus) -> Style {
    category_style(status.category())
}

pub fn status_symbol(status: &TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "■",
        TaskStatus::InProgress => "▶",
        TaskStatus::Completed => "◉",
    }
}

pub fn error_style() -> Style {
    Style::default().fg(NEON_PINK)
}

// ── Progress bar ───────────────────────────────────────────────────

pub fn progress_bar(percent: u64, width: usize) -> String {
    let filled = ((percent.min(100) as usize * width) / 100).min(width);
    let empty = width - filled;
    "█".repeat(filled) + &"░".repeat(empty)
}

// ── ASCII art header ───────────────────────────────────────────────

pub const HEADER_ART: &str = "\
▐██▌ TASKBOARD ▐██▌";

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_half() {
        assert_eq!(progress_bar(50, 10), "█████░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(progress_bar(100, 10), "██████████");
    }

    #[test]
    fn progress_bar_clamps_over_100() {
        assert_eq!(progress_bar(250, 4), "████");
    }

    #[test]
    fn status_style_follows_category() {
        assert_eq!(status_style(&TaskStatus::Pending).fg, Some(NEON_YELLOW));
        assert_eq!(status_style(&TaskStatus::InProgress).fg, Some(ELECTRIC_BLUE));
        assert_eq!(status_style(&TaskStatus::Completed).fg, Some(NEON_GREEN));
    }

    #[test]
    fn status_symbol_returns_correct_char() {
        assert_eq!(status_symbol(&TaskStatus::Pending), "■");
        assert_eq!(status_symbol(&TaskStatus::InProgress), "▶");
        assert_eq!(status_symbol(&TaskStatus::Completed), "◉");
    }
}
