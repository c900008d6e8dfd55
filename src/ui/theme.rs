use ratatui::style::Color;

use crate::replay::select::BarState;
use crate::replay::{NodeStatus, Verdict};

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub highlight: Color, // Yellow
    pub accent: Color,    // Pink
    pub teal: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    highlight: Color::Rgb(249, 226, 175),
    accent: Color::Rgb(245, 194, 231),
    teal: Color::Rgb(148, 226, 213),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
};

impl Theme {
    pub fn node(&self, status: NodeStatus) -> Color {
        match status {
            NodeStatus::Hidden => self.current_line_bg,
            NodeStatus::Pending => self.comment,
            NodeStatus::Active => self.highlight,
            NodeStatus::Done => self.success,
        }
    }

    pub fn bar(&self, state: BarState) -> Color {
        match state {
            BarState::Idle => self.comment,
            BarState::Active => self.primary,
            BarState::Pivot => self.highlight,
            BarState::Rejected => self.error,
            BarState::Less => self.teal,
            BarState::Greater => self.secondary,
            BarState::Eliminated => self.current_line_bg,
            BarState::Found => self.success,
        }
    }

    pub fn verdict(&self, verdict: Option<Verdict>) -> Color {
        match verdict {
            Some(Verdict::Keep) => self.success,
            Some(Verdict::Drop) => self.error,
            None => self.highlight,
        }
    }

    /// One colour per decimal digit
    pub fn digit(&self, digit: u8) -> Color {
        const PALETTE: [Color; 10] = [
            Color::Rgb(243, 139, 168),
            Color::Rgb(250, 179, 135),
            Color::Rgb(249, 226, 175),
            Color::Rgb(166, 227, 161),
            Color::Rgb(148, 226, 213),
            Color::Rgb(137, 220, 235),
            Color::Rgb(137, 180, 250),
            Color::Rgb(180, 190, 254),
            Color::Rgb(203, 166, 247),
            Color::Rgb(245, 194, 231),
        ];
        PALETTE[usize::from(digit) % PALETTE.len()]
    }
}
