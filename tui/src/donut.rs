//! Terminal chart backend: doughnut charts drawn on a braille canvas.
//!
//! [`TerminalCharts`] owns a registry of live charts keyed by mount.
//! The panel controller creates and disposes charts through the
//! [`ChartBackend`] seam; [`DonutRenderable`] draws whatever the registry
//! currently holds for its mount.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use pmmap_core::ChartBackend;
use pmmap_core::ChartError;
use pmmap_core::ChartHandle;
use pmmap_core::ChartMount;
use pmmap_core::ChartSpec;
use pmmap_core::chart::LegendPosition;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::canvas::Points;
use unicode_width::UnicodeWidthStr;

use crate::render::renderable::Renderable;
use crate::style;

const RING_ROWS: u16 = 12;
const OUTER_RADIUS: f64 = 0.95;
const INNER_RADIUS: f64 = 0.5;
/// Extra radius for the hovered wedge.
const HOVER_OFFSET: f64 = 0.05;
/// Canvas units per border pixel.
const BORDER_SCALE: f64 = 0.01;
const LEGEND_SWATCH: &str = "■ ";
const LEGEND_GAP: &str = "  ";

#[derive(Debug)]
struct LiveChart {
    id: u64,
    spec: ChartSpec,
    hovered: Option<usize>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    charts: HashMap<ChartMount, LiveChart>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TerminalCharts {
    registry: Rc<RefCell<Registry>>,
}

impl TerminalCharts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.registry.borrow().charts.len()
    }

    pub(crate) fn hovered(&self, mount: &ChartMount) -> Option<usize> {
        self.registry
            .borrow()
            .charts
            .get(mount)
            .and_then(|chart| chart.hovered)
    }

    fn spec(&self, mount: &ChartMount) -> Option<ChartSpec> {
        self.registry
            .borrow()
            .charts
            .get(mount)
            .map(|chart| chart.spec.clone())
    }

    /// Record the hovered wedge. Returns true when it changed.
    fn set_hovered(&self, mount: &ChartMount, wedge: Option<usize>) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(chart) = registry.charts.get_mut(mount) else {
            return false;
        };
        if chart.hovered == wedge {
            return false;
        }
        chart.hovered = wedge;
        true
    }
}

#[derive(Debug)]
pub(crate) struct TerminalChartHandle {
    id: u64,
    mount: ChartMount,
    registry: Rc<RefCell<Registry>>,
}

impl ChartHandle for TerminalChartHandle {
    fn dispose(self) {
        let mut registry = self.registry.borrow_mut();
        // The mount may already hold a newer chart.
        if registry
            .charts
            .get(&self.mount)
            .is_some_and(|chart| chart.id == self.id)
        {
            registry.charts.remove(&self.mount);
            tracing::debug!(mount = %self.mount, id = self.id, "chart released");
        }
    }
}

impl ChartBackend for TerminalCharts {
    type Handle = TerminalChartHandle;

    fn create(
        &mut self,
        mount: &ChartMount,
        spec: &ChartSpec,
    ) -> Result<TerminalChartHandle, ChartError> {
        spec.validate()?;
        let mut registry = self.registry.borrow_mut();
        if registry.charts.contains_key(mount) {
            return Err(ChartError::Backend {
                mount: mount.to_string(),
                reason: "mount already holds a live chart".to_string(),
            });
        }
        registry.next_id += 1;
        let id = registry.next_id;
        registry.charts.insert(
            mount.clone(),
            LiveChart {
                id,
                spec: spec.clone(),
                hovered: None,
            },
        );
        tracing::debug!(mount = %mount, id, "chart created");
        Ok(TerminalChartHandle {
            id,
            mount: mount.clone(),
            registry: Rc::clone(&self.registry),
        })
    }
}

/// Wedge under canvas point `(x, y)`, ignoring borders and hover growth.
/// Wedges run clockwise from twelve o'clock.
pub(crate) fn wedge_at(shares: &[f64], x: f64, y: f64) -> Option<usize> {
    let radius = x.hypot(y);
    if !(INNER_RADIUS..=OUTER_RADIUS).contains(&radius) {
        return None;
    }
    wedge_span(shares, clockwise_angle(x, y)).map(|(index, _, _)| index)
}

fn clockwise_angle(x: f64, y: f64) -> f64 {
    x.atan2(y).rem_euclid(TAU)
}

/// Index and angular bounds of the wedge containing `angle`.
fn wedge_span(shares: &[f64], angle: f64) -> Option<(usize, f64, f64)> {
    let mut start = 0.0;
    for (index, share) in shares.iter().enumerate() {
        let end = start + share * TAU;
        if angle >= start && angle < end {
            return Some((index, start, end));
        }
        start = end;
    }
    None
}

/// Draws the chart registered under one mount.
///
/// The spec is captured at construction so the block keeps its size while
/// the panel slides out after the chart has been released.
pub(crate) struct DonutRenderable {
    charts: TerminalCharts,
    mount: ChartMount,
    spec: ChartSpec,
}

struct DonutLayout {
    legend_top: u16,
    legend_rows: u16,
    ring_top: u16,
    tooltip_row: u16,
}

impl DonutRenderable {
    /// `None` when nothing is mounted at `mount`.
    pub(crate) fn new(charts: TerminalCharts, mount: ChartMount) -> Option<Self> {
        let spec = charts.spec(&mount)?;
        Some(Self {
            charts,
            mount,
            spec,
        })
    }

    fn legend_lines(&self, width: u16) -> Vec<Line<'static>> {
        let entries: Vec<Vec<Span<'static>>> = self
            .spec
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                vec![
                    Span::styled(LEGEND_SWATCH, Style::default().fg(style::to_color(self.spec.color(i)))),
                    Span::raw(label.clone()),
                ]
            })
            .collect();
        let single_width: usize = entries
            .iter()
            .map(|spans| spans.iter().map(|s| s.content.width()).sum::<usize>())
            .sum::<usize>()
            + LEGEND_GAP.len() * entries.len().saturating_sub(1);

        if single_width <= usize::from(width) {
            let mut spans = Vec::new();
            for (i, entry) in entries.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(LEGEND_GAP));
                }
                spans.extend(entry);
            }
            vec![Line::from(spans).alignment(Alignment::Center)]
        } else {
            entries
                .into_iter()
                .map(|entry| Line::from(entry).alignment(Alignment::Center))
                .collect()
        }
    }

    fn layout(&self, width: u16) -> DonutLayout {
        let legend_rows = u16::try_from(self.legend_lines(width).len()).unwrap_or(u16::MAX);
        let (legend_top, ring_top) = match self.spec.legend {
            LegendPosition::Top => (1, 1 + legend_rows),
            LegendPosition::Bottom => (1 + RING_ROWS, 1),
        };
        DonutLayout {
            legend_top,
            legend_rows,
            ring_top,
            tooltip_row: 1 + legend_rows + RING_ROWS,
        }
    }

    fn x_extent(width: u16) -> f64 {
        // Braille cells are twice as tall as they are wide.
        f64::from(width) / (2.0 * f64::from(RING_ROWS))
    }

    /// Canvas coordinates of the center of a cell inside the ring area.
    fn cell_point(width: u16, column: u16, row: u16) -> (f64, f64) {
        let extent = Self::x_extent(width);
        let x = -extent + (f64::from(column) + 0.5) / f64::from(width) * 2.0 * extent;
        let y = 1.0 - (f64::from(row) + 0.5) / f64::from(RING_ROWS) * 2.0;
        (x, y)
    }

    /// Braille dots of each wedge, with border gaps cut out.
    fn wedge_points(&self, width: u16, hovered: Option<usize>) -> Vec<Vec<(f64, f64)>> {
        let shares = self.spec.shares();
        let gap = f64::from(self.spec.border_width) * BORDER_SCALE / 2.0;
        let extent = Self::x_extent(width);
        let dots_x = u32::from(width) * 2;
        let dots_y = u32::from(RING_ROWS) * 4;
        let mut wedges = vec![Vec::new(); shares.len()];
        for dy in 0..dots_y {
            let y = 1.0 - (f64::from(dy) + 0.5) / f64::from(dots_y) * 2.0;
            for dx in 0..dots_x {
                let x = -extent + (f64::from(dx) + 0.5) / f64::from(dots_x) * 2.0 * extent;
                let radius = x.hypot(y);
                let Some((index, start, end)) = wedge_span(&shares, clockwise_angle(x, y)) else {
                    continue;
                };
                let outer = if hovered == Some(index) {
                    OUTER_RADIUS + HOVER_OFFSET
                } else {
                    OUTER_RADIUS
                };
                if radius < INNER_RADIUS || radius > outer {
                    continue;
                }
                let angle = clockwise_angle(x, y);
                if shares.len() > 1 && (angle - start).min(end - angle) * radius < gap {
                    continue;
                }
                wedges[index].push((x, y));
            }
        }
        wedges
    }

    fn render_ring(&self, area: Rect, buf: &mut Buffer, hovered: Option<usize>) {
        let extent = Self::x_extent(area.width);
        let wedges = self.wedge_points(area.width, hovered);
        let colors: Vec<_> = (0..wedges.len())
            .map(|i| style::to_color(self.spec.color(i)))
            .collect();
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-extent, extent])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                for (coords, color) in wedges.iter().zip(&colors) {
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }
            })
            .render(area, buf);
    }
}

impl Renderable for DonutRenderable {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let layout = self.layout(area.width);
        let row = |offset: u16, height: u16| {
            let top = area.y.saturating_add(offset);
            let bottom = area.bottom().min(top.saturating_add(height));
            Rect::new(area.x, top, area.width, bottom.saturating_sub(top))
        };

        Paragraph::new(Line::from(self.spec.title.clone().bold()).alignment(Alignment::Center))
            .render(row(0, 1), buf);
        Paragraph::new(self.legend_lines(area.width))
            .render(row(layout.legend_top, layout.legend_rows), buf);

        let live = self.charts.spec(&self.mount).is_some();
        let hovered = self.charts.hovered(&self.mount);
        let ring_area = row(layout.ring_top, RING_ROWS);
        if live && ring_area.height == RING_ROWS {
            self.render_ring(ring_area, buf, hovered);
        }

        if let Some(text) = hovered.and_then(|i| self.spec.tooltip(i)) {
            Paragraph::new(Line::from(text).alignment(Alignment::Center))
                .style(style::muted())
                .render(row(layout.tooltip_row, 1), buf);
        }
    }

    fn desired_height(&self, width: u16) -> u16 {
        self.layout(width).tooltip_row + 1
    }

    fn pointer_moved(&self, position: Option<(u16, u16)>, width: u16) -> bool {
        let layout = self.layout(width);
        let wedge = position.and_then(|(column, row)| {
            let row = row.checked_sub(layout.ring_top)?;
            if row >= RING_ROWS || column >= width {
                return None;
            }
            let (x, y) = Self::cell_point(width, column, row);
            wedge_at(&self.spec.shares(), x, y)
        });
        self.charts.set_hovered(&self.mount, wedge)
    }
}
