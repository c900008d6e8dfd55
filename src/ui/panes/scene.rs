//! Scene pane: the recursion tree, the bars, or the plane, drawn on a braille
//! canvas through the session camera

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points, Rectangle},
        Block, Borders,
    },
    Frame,
};

use crate::motion::{bucket_center, lerp, BarLayout, Bounds, Camera, TreeLayout, Viewport};
use crate::playback::Session;
use crate::primitives::digits::trim_zeros;
use crate::primitives::{Point, PointId, Segment};
use crate::replay::{Interpret, NodeStatus, RadixView, SelectView};
use crate::trace::{NodeId, Registry};
use crate::ui::theme::DEFAULT_THEME;
use crate::visualizer::Visualizer;

/// Braille dots per terminal cell, scaled to keep cells roughly square
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;

/// Room around plane content when it is framed without the session camera
const PLANE_PADDING: f64 = 20.0;

/// Canvas size in virtual pixels for a bordered pane
pub fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(
        f64::from(area.width.saturating_sub(2).max(1)) * CELL_WIDTH,
        f64::from(area.height.saturating_sub(2).max(1)) * CELL_HEIGHT,
    )
}

/// The part of the scene pane the session camera looks through
pub fn camera_area(area: Rect, visualizer: &Visualizer) -> Rect {
    match visualizer {
        Visualizer::MaximaDivide(_) => split(area)[1],
        _ => area,
    }
}

fn split(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    [chunks[0], chunks[1]]
}

/// World-to-canvas mapping for one pane
#[derive(Debug, Clone, Copy)]
struct Projection {
    visible: Bounds,
    /// World y grows downward (trees, bars); the canvas grows upward
    flip: bool,
}

impl Projection {
    fn new(camera: Camera, viewport: Viewport, flip: bool) -> Self {
        Projection {
            visible: camera.visible(viewport),
            flip,
        }
    }

    fn x_bounds(&self) -> [f64; 2] {
        [self.visible.min_x, self.visible.max_x]
    }

    fn y_bounds(&self) -> [f64; 2] {
        if self.flip {
            [-self.visible.max_y, -self.visible.min_y]
        } else {
            [self.visible.min_y, self.visible.max_y]
        }
    }

    fn y(&self, wy: f64) -> f64 {
        if self.flip {
            -wy
        } else {
            wy
        }
    }

    /// Canvas rectangle for world `min_x..max_x` by `min_y..max_y`
    fn rect(&self, b: Bounds, color: ratatui::style::Color) -> Rectangle {
        let bottom = if self.flip { -b.max_y } else { b.min_y };
        Rectangle {
            x: b.min_x,
            y: bottom,
            width: b.width(),
            height: b.height(),
            color,
        }
    }
}

fn block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Render the scene for whichever algorithm is loaded
pub fn render_scene_pane(frame: &mut Frame, area: Rect, visualizer: &Visualizer) {
    let title = format!(" {} ", visualizer.name());
    match visualizer {
        Visualizer::Karatsuba(s) => {
            let Some((view, trace)) = s.view().zip(s.trace()) else {
                return render_empty(frame, area, title);
            };
            let nodes = trace.nodes();
            let label = |id: NodeId| {
                let Some(node) = nodes.get(id) else {
                    return String::new();
                };
                let product = format!(
                    "{}×{}",
                    trim_zeros(&node.data.x),
                    trim_zeros(&node.data.y)
                );
                match view.revealed(id).and_then(|r| r.result) {
                    Some(result) => format!("{} = {}", product, result),
                    None => product,
                }
            };
            render_tree(frame, area, title, s, nodes, |id| view.status_of(id), label);
        }
        Visualizer::MaximaDivide(s) => {
            let Some((view, trace)) = s.view().zip(s.trace()) else {
                return render_empty(frame, area, title);
            };
            let [plane_area, tree_area] = split(area);
            let candidate = view.candidate();
            let style = |p: &Point| {
                if view.maximal().contains(&p.id) {
                    DEFAULT_THEME.success
                } else if view.is_dominated(p.id) {
                    DEFAULT_THEME.comment
                } else if candidate.is_some_and(|(c, _, _)| c == p.id) {
                    DEFAULT_THEME.verdict(candidate.and_then(|(_, _, v)| v))
                } else if candidate.is_some_and(|(_, w, _)| w == Some(p.id)) {
                    DEFAULT_THEME.primary
                } else {
                    DEFAULT_THEME.fg
                }
            };
            render_points(
                frame,
                plane_area,
                " points ".to_string(),
                &view.points(),
                None,
                style,
                |id| view.label(id),
            );
            let nodes = trace.nodes();
            let label = |id: NodeId| {
                let Some(node) = nodes.get(id) else {
                    return String::new();
                };
                let range = format!("[{}..{}]", node.data.lo + 1, node.data.hi + 1);
                match view.result_of(id) {
                    Some(result) => format!("{} → {}", range, result.len()),
                    None => range,
                }
            };
            render_tree(frame, tree_area, title, s, nodes, |id| view.status_of(id), label);
        }
        Visualizer::MaximaSweep(s) => {
            let Some(view) = s.view() else {
                return render_empty(frame, area, title);
            };
            let candidate = view.candidate();
            let style = |p: &Point| {
                if view.is_maximal(p.id) {
                    DEFAULT_THEME.success
                } else if view.is_dominated(p.id) {
                    DEFAULT_THEME.comment
                } else if candidate.is_some_and(|(c, _, _)| c == p.id) {
                    DEFAULT_THEME.verdict(candidate.and_then(|(_, _, v)| v))
                } else if candidate.is_some_and(|(_, w, _)| w == Some(p.id)) {
                    DEFAULT_THEME.primary
                } else {
                    DEFAULT_THEME.fg
                }
            };
            let sweep = s.animator().sweep_x();
            render_points_with_camera(frame, area, title, s, &view.points(), sweep, style, |id| {
                view.label(id)
            });
        }
        Visualizer::Segments(s) => {
            let Some(view) = s.view() else {
                return render_empty(frame, area, title);
            };
            let proj = Projection::new(s.camera(), s.viewport(), false);
            let extent = view.extent();
            let sweep = s.animator().sweep_x();
            let canvas = Canvas::default()
                .block(block(title, true))
                .marker(Marker::Braille)
                .x_bounds(proj.x_bounds())
                .y_bounds(proj.y_bounds())
                .paint(|ctx| {
                    for seg in view.segments() {
                        let color = if view.current_segment() == Some(seg.id()) {
                            DEFAULT_THEME.highlight
                        } else if view.active().contains(seg.id()) {
                            DEFAULT_THEME.primary
                        } else if view.is_retired(seg.id()) {
                            DEFAULT_THEME.comment
                        } else if matches!(seg, Segment::Vertical { .. }) {
                            DEFAULT_THEME.secondary
                        } else {
                            DEFAULT_THEME.fg
                        };
                        let ((x1, y1), (x2, y2)) = seg.endpoints();
                        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                    }
                    if let (Some(x), Some(ext)) = (sweep, extent) {
                        draw_sweep(ctx, x, ext);
                    }
                    if let (Some((y1, y2)), Some(x)) = (view.query(), view.sweep_x()) {
                        ctx.draw(&CanvasLine::new(x, y1, x, y2, DEFAULT_THEME.accent));
                    }
                    ctx.layer();
                    ctx.draw(&Points {
                        coords: view.intersections(),
                        color: DEFAULT_THEME.error,
                    });
                });
            frame.render_widget(canvas, area);
        }
        Visualizer::Select(s) => {
            let Some(view) = s.view() else {
                return render_empty(frame, area, title);
            };
            render_select(frame, area, title, s, view);
        }
        Visualizer::Radix(s) => {
            let Some(view) = s.view() else {
                return render_empty(frame, area, title);
            };
            render_radix(frame, area, title, s, view);
        }
    }
}

fn render_empty(frame: &mut Frame, area: Rect, title: String) {
    let paragraph = ratatui::widgets::Paragraph::new("Press Enter to build the trace")
        .block(block(title, false))
        .style(Style::default().fg(DEFAULT_THEME.comment));
    frame.render_widget(paragraph, area);
}

fn render_tree<V: Interpret, N>(
    frame: &mut Frame,
    area: Rect,
    title: String,
    session: &Session<V>,
    nodes: &Registry<N>,
    status: impl Fn(NodeId) -> NodeStatus,
    label: impl Fn(NodeId) -> String,
) {
    let layout: &TreeLayout = session.layout();
    let proj = Projection::new(session.camera(), session.viewport(), true);
    let canvas = Canvas::default()
        .block(block(title, true))
        .marker(Marker::Braille)
        .x_bounds(proj.x_bounds())
        .y_bounds(proj.y_bounds())
        .paint(|ctx| {
            for node in nodes.iter() {
                if status(node.id) == NodeStatus::Hidden {
                    continue;
                }
                let (Some(parent), Some(own)) = (node.parent, layout.get(node.id)) else {
                    continue;
                };
                if let Some(up) = layout.get(parent) {
                    let (from, to) = (up.bounds(), own.bounds());
                    ctx.draw(&CanvasLine::new(
                        up.cx,
                        proj.y(from.max_y),
                        own.cx,
                        proj.y(to.min_y),
                        DEFAULT_THEME.border_normal,
                    ));
                }
            }
            ctx.layer();
            for node in nodes.iter() {
                let state = status(node.id);
                if state == NodeStatus::Hidden {
                    continue;
                }
                let Some(b) = layout.get(node.id) else {
                    continue;
                };
                let bounds = b.bounds();
                let color = DEFAULT_THEME.node(state);
                ctx.draw(&proj.rect(bounds, color));
                let text = label(node.id);
                let half = text.chars().count() as f64 * CELL_WIDTH / 2.0 / session.camera().scale;
                ctx.print(
                    b.cx - half,
                    proj.y(b.cy),
                    Span::styled(text, Style::default().fg(color)),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_sweep(ctx: &mut Context<'_>, x: f64, extent: Bounds) {
    ctx.draw(&CanvasLine::new(
        x,
        extent.min_y - PLANE_PADDING,
        x,
        extent.max_y + PLANE_PADDING,
        DEFAULT_THEME.accent,
    ));
}

/// Points framed on their own, outside the session camera
fn render_points(
    frame: &mut Frame,
    area: Rect,
    title: String,
    points: &[Point],
    sweep: Option<f64>,
    color: impl Fn(&Point) -> ratatui::style::Color,
    label: impl Fn(PointId) -> String,
) {
    let viewport = viewport_for(area);
    let camera = Bounds::around(points.iter().map(|p| (p.x, p.y)))
        .map_or_else(Camera::default, |b| Camera::frame(b, viewport));
    let proj = Projection::new(camera, viewport, false);
    draw_points(frame, area, title, proj, points, sweep, color, label);
}

#[allow(clippy::too_many_arguments)]
fn render_points_with_camera<V: Interpret>(
    frame: &mut Frame,
    area: Rect,
    title: String,
    session: &Session<V>,
    points: &[Point],
    sweep: Option<f64>,
    color: impl Fn(&Point) -> ratatui::style::Color,
    label: impl Fn(PointId) -> String,
) {
    let proj = Projection::new(session.camera(), session.viewport(), false);
    draw_points(frame, area, title, proj, points, sweep, color, label);
}

#[allow(clippy::too_many_arguments)]
fn draw_points(
    frame: &mut Frame,
    area: Rect,
    title: String,
    proj: Projection,
    points: &[Point],
    sweep: Option<f64>,
    color: impl Fn(&Point) -> ratatui::style::Color,
    label: impl Fn(PointId) -> String,
) {
    let extent = Bounds::around(points.iter().map(|p| (p.x, p.y)));
    let canvas = Canvas::default()
        .block(block(title, true))
        .marker(Marker::Braille)
        .x_bounds(proj.x_bounds())
        .y_bounds(proj.y_bounds())
        .paint(|ctx| {
            if let (Some(x), Some(ext)) = (sweep, extent) {
                draw_sweep(ctx, x, ext);
            }
            ctx.layer();
            for p in points {
                let c = color(p);
                ctx.draw(&Points {
                    coords: &[(p.x, p.y)],
                    color: c,
                });
                let text = label(p.id);
                let short = text.split_whitespace().next().unwrap_or_default().to_string();
                ctx.print(p.x, p.y, Span::styled(short, Style::default().fg(c)));
            }
        });
    frame.render_widget(canvas, area);
}

fn render_select(
    frame: &mut Frame,
    area: Rect,
    title: String,
    session: &Session<SelectView>,
    view: &SelectView,
) {
    let vp = session.viewport();
    let proj = Projection::new(session.camera(), vp, true);
    let count = view.slots().map_or(0, <[_]>::len);
    let bars = BarLayout::new(count, vp);
    let max_abs = (0..count)
        .filter_map(|bar| view.value(bar))
        .fold(0.0_f64, |m, v| m.max(v.abs()))
        .max(1.0);
    let base = vp.height * 0.8;
    let span = vp.height * 0.6;

    let canvas = Canvas::default()
        .block(block(title, true))
        .marker(Marker::Braille)
        .x_bounds(proj.x_bounds())
        .y_bounds(proj.y_bounds())
        .paint(|ctx| {
            if let Some((lo, hi)) = view.range() {
                let left = bars.slot_x(lo as f64) - 3.0;
                let right = bars.slot_x(hi as f64) + bars.bar_width + 3.0;
                let y = proj.y(base + 8.0);
                ctx.draw(&CanvasLine::new(left, y, right, y, DEFAULT_THEME.primary));
            }
            for bar in 0..count {
                let Some(value) = view.value(bar) else {
                    continue;
                };
                let x = session.animator().bar_position(bar);
                let left = bars.slot_x(x);
                let height = (value.abs() / max_abs * span).max(4.0);
                let color = DEFAULT_THEME.bar(view.bar_state(bar));
                let rect = Bounds {
                    min_x: left,
                    max_x: left + bars.bar_width,
                    min_y: base - height,
                    max_y: base,
                };
                ctx.draw(&proj.rect(rect, color));
                ctx.print(
                    left,
                    proj.y(base - height - 6.0),
                    Span::styled(value.to_string(), Style::default().fg(color)),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn render_radix(
    frame: &mut Frame,
    area: Rect,
    title: String,
    session: &Session<RadixView>,
    view: &RadixView,
) {
    let vp = session.viewport();
    let proj = Projection::new(session.camera(), vp, true);
    let count = view.slots().map_or(0, <[_]>::len);
    let bars = BarLayout::new(count, vp);
    let max = (0..count)
        .filter_map(|bar| view.value(bar))
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let base = vp.height * 0.45;
    let span = vp.height * 0.35;
    let bucket_top = vp.height * 0.6;
    let bucket_bottom = vp.height * 0.95;
    let bucket_width = vp.width / 10.0;
    let mote = session.animator().mote();

    let canvas = Canvas::default()
        .block(block(title, true))
        .marker(Marker::Braille)
        .x_bounds(proj.x_bounds())
        .y_bounds(proj.y_bounds())
        .paint(|ctx| {
            for digit in 0..10u8 {
                let cx = bucket_center(digit, vp);
                let rect = Bounds {
                    min_x: cx - bucket_width / 2.0 + 4.0,
                    max_x: cx + bucket_width / 2.0 - 4.0,
                    min_y: bucket_top,
                    max_y: bucket_bottom,
                };
                ctx.draw(&proj.rect(rect, DEFAULT_THEME.border_normal));
                ctx.print(
                    cx,
                    proj.y(bucket_bottom - 6.0),
                    Span::styled(digit.to_string(), Style::default().fg(DEFAULT_THEME.digit(digit))),
                );
                let contents = &view.buckets()[usize::from(digit)];
                for (row, &bar) in contents.iter().enumerate() {
                    let Some(value) = view.value(bar) else {
                        continue;
                    };
                    ctx.print(
                        rect.min_x + 2.0,
                        proj.y(bucket_top + 14.0 + row as f64 * CELL_HEIGHT),
                        Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
                    );
                }
            }
            ctx.layer();
            for bar in 0..count {
                let Some(value) = view.value(bar) else {
                    continue;
                };
                let in_bucket = view.buckets().iter().any(|b| b.contains(&bar));
                let in_flight = mote.is_some_and(|(b, _, _)| b == bar);
                let color = match (view.examining() == Some(bar), view.current_digit(bar)) {
                    _ if in_bucket || in_flight => DEFAULT_THEME.current_line_bg,
                    (true, Some(digit)) => DEFAULT_THEME.digit(digit),
                    _ => DEFAULT_THEME.primary,
                };
                let left = bars.slot_x(session.animator().bar_position(bar));
                let height = (value as f64 / max * span).max(4.0);
                let rect = Bounds {
                    min_x: left,
                    max_x: left + bars.bar_width,
                    min_y: base - height,
                    max_y: base,
                };
                ctx.draw(&proj.rect(rect, color));
                ctx.print(
                    left,
                    proj.y(base + 12.0),
                    Span::styled(value.to_string(), Style::default().fg(color)),
                );
            }
            if let Some((bar, digit, t)) = mote {
                let from_x = bars.slot_center(session.animator().bar_position(bar));
                let to_x = bucket_center(digit, vp);
                let x = lerp(from_x, to_x, t);
                let y = lerp(base, bucket_top + 8.0, t);
                let half = bars.bar_width / 4.0;
                let rect = Bounds {
                    min_x: x - half,
                    max_x: x + half,
                    min_y: y - half,
                    max_y: y + half,
                };
                ctx.draw(&proj.rect(rect, DEFAULT_THEME.digit(digit)));
            }
        });
    frame.render_widget(canvas, area);
}
