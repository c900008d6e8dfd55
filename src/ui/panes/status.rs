//! Status bar rendering with keybindings and playback indicators

use crate::playback::Phase;
use crate::snapshot::Frame as Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `notice` replaces the status message for one redraw, e.g. when a key was
/// ignored because motion is still in flight.
pub fn render_status_bar(frame: &mut Frame, area: Rect, snapshot: &Snapshot, notice: Option<&str>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let step_text = match snapshot.phase {
        Phase::Input => " Step -/- ".to_string(),
        _ => format!(
            " Step {}/{} ({:.0}%) ",
            snapshot.index,
            snapshot.total,
            snapshot.progress() * 100.0
        ),
    };

    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if notice.is_some() {
                    DEFAULT_THEME.secondary
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", notice.unwrap_or(&snapshot.status)),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if notice.is_some() {
                    DEFAULT_THEME.secondary
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    let bindings: [(&str, &str); 6] = [
        (" ←/→ ", " step "),
        (" ⎵ ", " play "),
        (" ↵ ", " start/end "),
        (" r/s ", " reset/restart "),
        (" +/- ", " speed "),
        (" hjkl zx ", " camera "),
    ];
    for (key, desc) in bindings {
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(" ", desc_style));
    }
    right_spans.push(Span::styled("q", key_style));
    right_spans.push(Span::styled(" quit ", desc_style));
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(
        format!(" {}x ", snapshot.speed.get()),
        Style::default()
            .bg(DEFAULT_THEME.teal)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    let badge = match (snapshot.phase, snapshot.playing) {
        (Phase::Input, _) => Some((" INPUT ", DEFAULT_THEME.secondary)),
        (Phase::Running, true) => Some((" ▶ PLAYING ", DEFAULT_THEME.secondary)),
        (Phase::Complete, _) => Some((" END ", DEFAULT_THEME.error)),
        (Phase::Running, false) if snapshot.index == 0 => Some((" START ", DEFAULT_THEME.success)),
        (Phase::Running, false) => None,
    };
    if let Some((text, bg)) = badge {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
