//! Fishbone drawing of the cause-effect diagram.

use pmmap_core::special::CauseEffectDiagram;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::render::line_utils::wrap_styled;
use crate::render::renderable::Renderable;
use crate::style;

/// Labels, two branch rows, spine, two branch rows, labels.
const SKELETON_ROWS: u16 = 7;
const SPINE_ROW: u16 = 3;
/// Below this the skeleton cannot fit three labelled branches.
const MIN_SKELETON_WIDTH: u16 = 36;

pub(crate) struct DiagramRenderable {
    diagram: CauseEffectDiagram,
}

impl DiagramRenderable {
    pub(crate) fn new(diagram: CauseEffectDiagram) -> Self {
        Self { diagram }
    }

    fn intro_lines(&self, width: u16) -> Vec<Line<'static>> {
        if self.diagram.intro.is_empty() {
            return Vec::new();
        }
        let mut lines = wrap_styled(&self.diagram.intro, usize::from(width), Style::default());
        lines.push(Line::default());
        lines
    }

    fn box_width(&self) -> u16 {
        let inner = self
            .diagram
            .effect
            .width()
            .max(self.diagram.effect_caption.width());
        u16::try_from(inner + 2).unwrap_or(u16::MAX)
    }

    fn body_rows(&self, width: u16) -> u16 {
        if width < MIN_SKELETON_WIDTH {
            // Effect line plus one line per category.
            1 + u16::try_from(self.diagram.categories().count()).unwrap_or(u16::MAX)
        } else {
            SKELETON_ROWS
        }
    }

    fn render_skeleton(&self, area: Rect, buf: &mut Buffer) {
        let box_width = self.box_width();
        let spine_width = area.width.saturating_sub(box_width);
        let segment = spine_width / 3;
        let label_width = usize::from(segment.saturating_sub(1));
        let branch = style::secondary_marker();
        let label = style::item_title();
        let x = |offset: u16| area.x + offset;
        let y = |row: u16| area.y + row;

        for (i, (top, bottom)) in self
            .diagram
            .top
            .iter()
            .zip(self.diagram.bottom.iter())
            .enumerate()
        {
            let start = segment * u16::try_from(i).unwrap_or(0);
            buf.set_stringn(x(start + 1), y(0), top, label_width, label);
            buf.set_string(x(start + 3), y(1), "╲", branch);
            buf.set_string(x(start + 4), y(2), "╲", branch);
            buf.set_string(x(start + 4), y(4), "╱", branch);
            buf.set_string(x(start + 3), y(5), "╱", branch);
            buf.set_stringn(x(start + 1), y(6), bottom, label_width, label);
        }

        let spine = format!("{}▶", "━".repeat(usize::from(spine_width.saturating_sub(1))));
        buf.set_string(x(0), y(SPINE_ROW), spine, style::primary_marker());

        let inner = usize::from(box_width.saturating_sub(2));
        let rule = "─".repeat(inner);
        let boxed = style::heading();
        let left = x(spine_width);
        buf.set_string(left, y(1), format!("┌{rule}┐"), boxed);
        buf.set_string(left, y(2), format!("│{}│", center(&self.diagram.effect, inner)), boxed);
        buf.set_string(
            left,
            y(SPINE_ROW),
            format!("│{}│", center(&self.diagram.effect_caption, inner)),
            style::muted(),
        );
        buf.set_string(left, y(4), format!("└{rule}┘"), boxed);
    }

    fn render_stacked(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(vec![
            self.diagram.effect.clone().into(),
            " ".into(),
            Span::styled(self.diagram.effect_caption.clone(), style::muted()),
        ])
        .style(style::heading())];
        lines.extend(self.diagram.categories().map(|category| {
            Line::from(vec![
                Span::styled("  ╰ ", style::secondary_marker()),
                category.to_string().into(),
            ])
        }));
        Paragraph::new(lines).render(area, buf);
    }
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(pad - left))
}

impl Renderable for DiagramRenderable {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let intro = self.intro_lines(area.width);
        let intro_rows = u16::try_from(intro.len()).unwrap_or(u16::MAX).min(area.height);
        Paragraph::new(intro).render(Rect { height: intro_rows, ..area }, buf);

        let body = Rect {
            y: area.y + intro_rows,
            height: area.height - intro_rows,
            ..area
        };
        if body.height < self.body_rows(area.width) {
            return;
        }
        if area.width < MIN_SKELETON_WIDTH {
            self.render_stacked(body, buf);
        } else {
            self.render_skeleton(body, buf);
        }
    }

    fn desired_height(&self, width: u16) -> u16 {
        let intro = u16::try_from(self.intro_lines(width).len()).unwrap_or(u16::MAX);
        intro.saturating_add(self.body_rows(width))
    }
}
