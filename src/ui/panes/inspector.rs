//! Inspector pane: the numbers behind the scene

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::primitives::digits::{ordinal, position_label, trim_zeros};
use crate::replay::radix::PassState;
use crate::replay::{Interpret, KaratsubaView, Verdict};
use crate::trace::karatsuba::Subproduct;
use crate::trace::Registry;
use crate::ui::theme::DEFAULT_THEME;
use crate::visualizer::Visualizer;

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(name: &str, value: impl ToString) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<10}", name),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

fn plain(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(DEFAULT_THEME.fg)))
}

fn ids(list: &[usize]) -> String {
    if list.is_empty() {
        return "none".to_string();
    }
    list.iter()
        .map(|id| format!("#{}", id + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the inspector for whichever algorithm is loaded
pub fn render_inspector_pane(frame: &mut Frame, area: Rect, visualizer: &Visualizer) {
    let lines = match visualizer {
        Visualizer::Karatsuba(s) => match s.view().zip(s.trace()) {
            Some((view, trace)) => karatsuba_lines(view, trace.nodes()),
            None => Vec::new(),
        },
        Visualizer::Select(s) => match s.view() {
            Some(view) => {
                let mut lines = vec![
                    field("target", format!("{} smallest", ordinal(view.k()))),
                    field(
                        "range",
                        view.range()
                            .map_or("-".to_string(), |(lo, hi)| format!("[{}..{}]", lo, hi)),
                    ),
                    field("rejects", view.rejects()),
                ];
                if let Some(answer) = view.answer() {
                    lines.push(field("answer", answer));
                }
                lines.push(Line::default());
                lines.push(heading("Rounds"));
                for round in view.history() {
                    let pivot = round.pivot.map_or("?".to_string(), |p| p.to_string());
                    let landed = round.landed.map_or("-".to_string(), |l| l.to_string());
                    let decision = round.decision.map_or("…", |d| d.label());
                    lines.push(plain(format!(
                        "#{} [{}..{}] pivot {} at {} → {} ({} rejected)",
                        round.round.index() + 1,
                        round.lo,
                        round.hi,
                        pivot,
                        landed,
                        decision,
                        round.rejected
                    )));
                }
                lines
            }
            None => Vec::new(),
        },
        Visualizer::Radix(s) => match s.view() {
            Some(view) => {
                let mut lines = vec![
                    field("passes", view.total_passes()),
                    field(
                        "digit",
                        view.position().map_or("-".to_string(), position_label),
                    ),
                    field("sorted", if view.is_sorted() { "yes" } else { "no" }),
                    Line::default(),
                    heading("Passes"),
                ];
                for pass in view.history() {
                    let sizes = pass
                        .bucket_sizes
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    let state = match pass.state {
                        PassState::Distributing => "distributing",
                        PassState::Collected => "collected",
                    };
                    lines.push(plain(format!(
                        "{}: [{}] {}",
                        position_label(pass.position),
                        sizes,
                        state
                    )));
                }
                lines
            }
            None => Vec::new(),
        },
        Visualizer::MaximaDivide(s) => match s.view().zip(s.trace()) {
            Some((view, trace)) => {
                let mut lines = vec![heading("Call stack")];
                for &id in view.call_stack().iter().rev() {
                    if let Some(node) = trace.nodes().get(id) {
                        lines.push(plain(format!(
                            "{}[{}..{}]",
                            "  ".repeat(node.depth),
                            node.data.lo + 1,
                            node.data.hi + 1
                        )));
                    }
                }
                lines.push(Line::default());
                lines.push(candidate_line(view.candidate(), |id| view.label(id)));
                lines.push(field("maximal", ids(view.maximal())));
                lines
            }
            None => Vec::new(),
        },
        Visualizer::MaximaSweep(s) => match s.view() {
            Some(view) => vec![
                field(
                    "sweep x",
                    view.sweep_x().map_or("-".to_string(), |x| format!("{:.0}", x)),
                ),
                field(
                    "max y",
                    view.right_max().map_or("-".to_string(), |(y, _)| format!("{:.0}", y)),
                ),
                candidate_line(view.candidate(), |id| view.label(id)),
                field("maximal", ids(&view.maximal())),
            ],
            None => Vec::new(),
        },
        Visualizer::Segments(s) => match s.view() {
            Some(view) => {
                let mut lines = vec![
                    field(
                        "sweep x",
                        view.sweep_x().map_or("-".to_string(), |x| format!("{:.0}", x)),
                    ),
                    field(
                        "query",
                        view.query()
                            .map_or("-".to_string(), |(a, b)| format!("y in [{:.0}, {:.0}]", a, b)),
                    ),
                    field("hits", view.intersections().len()),
                    Line::default(),
                    heading("Active set"),
                ];
                for entry in view.active().balanced() {
                    lines.push(plain(format!(
                        "{}S{} y={:.0}",
                        "  ".repeat(entry.depth),
                        entry.segment + 1,
                        entry.y
                    )));
                }
                lines
            }
            None => Vec::new(),
        },
    };

    let block = Block::default()
        .title(" Inspector ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal))
        .padding(Padding::horizontal(1));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn candidate_line(
    candidate: Option<(usize, Option<usize>, Option<Verdict>)>,
    label: impl Fn(usize) -> String,
) -> Line<'static> {
    let Some((point, witness, verdict)) = candidate else {
        return field("checking", "-");
    };
    let against = witness.map_or(String::new(), |w| format!(" vs {}", label(w)));
    let (text, color) = match verdict {
        Some(Verdict::Keep) => ("keep", DEFAULT_THEME.success),
        Some(Verdict::Drop) => ("drop", DEFAULT_THEME.error),
        None => ("?", DEFAULT_THEME.highlight),
    };
    Line::from(vec![
        Span::styled("checking  ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!("{}{} ", label(point), against),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
        Span::styled(text, Style::default().fg(color)),
    ])
}

fn karatsuba_lines(view: &KaratsubaView, nodes: &Registry<Subproduct>) -> Vec<Line<'static>> {
    let (done, total) = view.progress();
    let mut lines = vec![field("calls", format!("{}/{}", done, total))];
    if let Some(product) = view.product() {
        lines.push(field("product", product));
    }
    let Some(id) = view.active_node() else {
        return lines;
    };
    let Some(node) = nodes.get(id) else {
        return lines;
    };
    lines.push(Line::default());
    lines.push(heading(&format!(
        "{} × {}",
        trim_zeros(&node.data.x),
        trim_zeros(&node.data.y)
    )));
    lines.push(field("depth", node.depth));
    let revealed = view.revealed(id);
    if let (Some(split), true) = (&node.data.split, revealed.is_some_and(|r| r.split)) {
        lines.push(field("m", split.m));
        lines.push(field("x", format!("{} | {}", split.x_high, split.x_low)));
        lines.push(field("y", format!("{} | {}", split.y_high, split.y_low)));
        lines.push(field("sums", format!("{} , {}", split.sum_x, split.sum_y)));
    }
    if let Some(r) = revealed {
        for (name, value) in [("z2", r.z2), ("z0", r.z0), ("z1", r.z1), ("result", r.result)] {
            if let Some(value) = value {
                lines.push(field(name, value));
            }
        }
    }
    lines
}
