//! The slide-in detail panel.
//!
//! [`PanelView`] turns a mounted [`DetailBody`] into a stack of
//! [`Renderable`] blocks and scrolls them like a pager: the body is laid
//! out at the panel width, and only the rows inside the viewport are drawn.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::MouseEventKind;
use pmmap_core::DetailBody;
use pmmap_core::Fragment;
use pmmap_core::special::RoleMatrix;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Clear;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::diagram::DiagramRenderable;
use crate::donut::DonutRenderable;
use crate::donut::TerminalCharts;
use crate::key_hint;
use crate::key_hint::KeyBinding;
use crate::render::line_utils::hanging;
use crate::render::line_utils::prefix_lines;
use crate::render::line_utils::wrap_styled;
use crate::render::renderable::LinesRenderable;
use crate::render::renderable::Renderable;
use crate::render::renderable::Spaced;
use crate::style;

const KEY_UP: KeyBinding = key_hint::plain(KeyCode::Up);
const KEY_DOWN: KeyBinding = key_hint::plain(KeyCode::Down);
const KEY_K: KeyBinding = key_hint::plain(KeyCode::Char('k'));
const KEY_J: KeyBinding = key_hint::plain(KeyCode::Char('j'));
const KEY_PAGE_UP: KeyBinding = key_hint::plain(KeyCode::PageUp);
const KEY_PAGE_DOWN: KeyBinding = key_hint::plain(KeyCode::PageDown);
const KEY_SPACE: KeyBinding = key_hint::plain(KeyCode::Char(' '));
const KEY_SHIFT_SPACE: KeyBinding = key_hint::shift(KeyCode::Char(' '));
const KEY_HOME: KeyBinding = key_hint::plain(KeyCode::Home);
const KEY_END: KeyBinding = key_hint::plain(KeyCode::End);

pub(crate) const SCROLL_KEYS: &[KeyBinding] = &[KEY_UP, KEY_DOWN];

const CLOSE_CONTROL: &str = "[x]";
const WHEEL_STEP: usize = 3;
const BULLET: &str = "◆ ";
const SUB_BULLET: &str = "  - ";
const PARAGRAPH_INDENT: &str = "  ";

/// Panel width for a screen `width` columns wide.
pub(crate) fn panel_width(width: u16) -> u16 {
    match width {
        0..60 => width,
        60..120 => width / 2,
        _ => width * 2 / 5,
    }
}

pub(crate) struct PanelView {
    renderables: Vec<Box<dyn Renderable>>,
    scroll_offset: usize,
    last_content_area: Option<Rect>,
    last_close_rect: Option<Rect>,
    hovered_block: Option<usize>,
}

impl PanelView {
    pub(crate) fn new(body: &DetailBody, charts: &TerminalCharts) -> Self {
        let mut renderables: Vec<Box<dyn Renderable>> = vec![header(body)];
        let mut previous_was_item = false;
        for fragment in &body.fragments {
            let Some(block) = fragment_renderable(fragment, charts) else {
                continue;
            };
            // Special blocks stand apart from the item list.
            let spaced = previous_was_item && !fragment.is_item();
            previous_was_item = fragment.is_item();
            renderables.push(if spaced {
                Box::new(Spaced::top(block, 1))
            } else {
                block
            });
        }
        Self {
            renderables,
            scroll_offset: 0,
            last_content_area: None,
            last_close_rect: None,
            hovered_block: None,
        }
    }

    fn content_height(&self, width: u16) -> usize {
        self.renderables
            .iter()
            .map(|r| usize::from(r.desired_height(width)))
            .sum()
    }

    /// Draw into `area`, which is the panel's on-screen rectangle.
    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(style::muted());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 4 || inner.height < 3 {
            self.last_content_area = None;
            self.last_close_rect = None;
            return;
        }

        let close_width = u16::try_from(CLOSE_CONTROL.len()).unwrap_or(u16::MAX);
        let close_rect = Rect::new(inner.right() - close_width - 1, inner.y, close_width, 1);
        buf.set_string(close_rect.x, close_rect.y, CLOSE_CONTROL, style::heading());
        self.last_close_rect = Some(close_rect);

        let content_area = Rect::new(
            inner.x + 1,
            inner.y + 1,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(2),
        );
        let content_height = self.content_height(content_area.width);
        self.scroll_offset = self
            .scroll_offset
            .min(content_height.saturating_sub(usize::from(content_area.height)));
        self.last_content_area = Some(content_area);

        self.render_content(content_area, buf);
        self.render_bottom_bar(inner, content_area, buf, content_height);
    }

    fn render_content(&self, area: Rect, buf: &mut Buffer) {
        let viewport = usize::from(area.height);
        let mut top = 0usize;
        for renderable in &self.renderables {
            let height = usize::from(renderable.desired_height(area.width));
            let bottom = top + height;
            if bottom <= self.scroll_offset {
                top = bottom;
                continue;
            }
            if top >= self.scroll_offset + viewport {
                break;
            }
            if top >= self.scroll_offset && bottom <= self.scroll_offset + viewport {
                let y = area.y + u16::try_from(top - self.scroll_offset).unwrap_or(0);
                let draw_area = Rect::new(area.x, y, area.width, renderable.desired_height(area.width));
                renderable.render(draw_area, buf);
            } else {
                render_clipped(area, buf, &**renderable, top, self.scroll_offset);
            }
            top = bottom;
        }
    }

    fn render_bottom_bar(&self, inner: Rect, content_area: Rect, buf: &mut Buffer, total_len: usize) {
        let y = content_area.bottom();
        if y >= inner.bottom() {
            return;
        }
        buf.set_string(inner.x, y, "─".repeat(usize::from(inner.width)), Style::default().dim());
        let max_scroll = total_len.saturating_sub(usize::from(content_area.height));
        let percent = if max_scroll == 0 {
            100
        } else {
            self.scroll_offset.min(max_scroll) * 100 / max_scroll
        };
        let text = format!(" {percent}% ");
        let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let x = inner.right().saturating_sub(text_width + 1).max(inner.x);
        buf.set_string(x, y, text, Style::default().dim());
    }

    /// Scroll keys. Returns true when the key was consumed.
    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        let page = self
            .last_content_area
            .map_or(1, |area| usize::from(area.height).max(1));
        match key_event {
            e if KEY_UP.is_press(e) || KEY_K.is_press(e) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            e if KEY_DOWN.is_press(e) || KEY_J.is_press(e) => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            e if KEY_PAGE_UP.is_press(e) || KEY_SHIFT_SPACE.is_press(e) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(page);
            }
            e if KEY_PAGE_DOWN.is_press(e) || KEY_SPACE.is_press(e) => {
                self.scroll_offset = self.scroll_offset.saturating_add(page);
            }
            e if KEY_HOME.is_press(e) => {
                self.scroll_offset = 0;
            }
            e if KEY_END.is_press(e) => {
                self.scroll_offset = usize::MAX;
            }
            _ => return false,
        }
        true
    }

    pub(crate) fn handle_mouse_scroll(&mut self, kind: MouseEventKind) -> bool {
        match kind {
            MouseEventKind::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(WHEEL_STEP);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(WHEEL_STEP);
            }
            _ => return false,
        }
        true
    }

    pub(crate) fn is_close_control(&self, column: u16, row: u16) -> bool {
        self.last_close_rect
            .is_some_and(|rect| rect.contains(Position::new(column, row)))
    }

    /// Forward a pointer position in screen coordinates to the block under
    /// it. Returns true when something needs a redraw.
    pub(crate) fn pointer_moved(&mut self, column: u16, row: u16) -> bool {
        let Some(area) = self.last_content_area else {
            return false;
        };
        let target = if area.contains(Position::new(column, row)) {
            self.block_at(area.width, self.scroll_offset + usize::from(row - area.y))
                .map(|(index, local_row)| (index, (column - area.x, local_row)))
        } else {
            None
        };

        let mut changed = false;
        if let Some(previous) = self.hovered_block
            && target.map(|(index, _)| index) != Some(previous)
            && let Some(block) = self.renderables.get(previous)
        {
            changed |= block.pointer_moved(None, area.width);
        }
        if let Some((index, position)) = target
            && let Some(block) = self.renderables.get(index)
        {
            changed |= block.pointer_moved(Some(position), area.width);
        }
        self.hovered_block = target.map(|(index, _)| index);
        changed
    }

    /// Block index and row within it for content row `content_row`.
    fn block_at(&self, width: u16, content_row: usize) -> Option<(usize, u16)> {
        let mut top = 0usize;
        for (index, renderable) in self.renderables.iter().enumerate() {
            let height = usize::from(renderable.desired_height(width));
            if content_row < top + height {
                return Some((index, u16::try_from(content_row - top).unwrap_or(u16::MAX)));
            }
            top += height;
        }
        None
    }
}

/// Render a block that is cut off at the top or bottom of the viewport
/// through a scratch buffer of its full height.
fn render_clipped(
    area: Rect,
    buf: &mut Buffer,
    renderable: &dyn Renderable,
    block_top: usize,
    scroll_offset: usize,
) {
    let height = renderable.desired_height(area.width);
    let mut tall_buf = Buffer::empty(Rect::new(0, 0, area.width, height));
    renderable.render(*tall_buf.area(), &mut tall_buf);

    let skip = scroll_offset.saturating_sub(block_top);
    let dest_top = block_top.saturating_sub(scroll_offset);
    let rows = usize::from(height)
        .saturating_sub(skip)
        .min(usize::from(area.height).saturating_sub(dest_top));
    for row in 0..rows {
        let src_y = u16::try_from(skip + row).unwrap_or(u16::MAX);
        let dst_y = area.y + u16::try_from(dest_top + row).unwrap_or(u16::MAX);
        for x in 0..area.width {
            buf[(area.x + x, dst_y)] = tall_buf[(x, src_y)].clone();
        }
    }
}

fn header(body: &DetailBody) -> Box<dyn Renderable> {
    let title = format!("{} {}", body.icon, body.title);
    // The diagram opens with the description itself.
    let description = match body.fragments.first() {
        Some(Fragment::CauseEffect(_)) => String::new(),
        _ => body.description.clone(),
    };
    Box::new(LinesRenderable::new(move |width| {
        let width = usize::from(width);
        let mut lines = wrap_styled(&title, width, style::heading());
        if !description.is_empty() {
            lines.extend(wrap_styled(&description, width, style::muted().italic()));
        }
        lines.push(Line::from("─".repeat(width)).style(style::muted()));
        lines.push(Line::default());
        lines
    }))
}

fn fragment_renderable(fragment: &Fragment, charts: &TerminalCharts) -> Option<Box<dyn Renderable>> {
    let block: Box<dyn Renderable> = match fragment.clone() {
        Fragment::Bullet { text } => Box::new(LinesRenderable::new(move |width| {
            hanging(Span::styled(BULLET, style::primary_marker()), &text, width, Style::default())
        })),
        Fragment::Group { title, entries } => Box::new(LinesRenderable::new(move |width| {
            let mut lines = wrap_styled(&title, usize::from(width), style::item_title());
            for entry in &entries {
                lines.extend(hanging(
                    Span::styled(SUB_BULLET, style::secondary_marker()),
                    entry,
                    width,
                    Style::default(),
                ));
            }
            lines
        })),
        Fragment::Paragraph { title, text } => Box::new(LinesRenderable::new(move |width| {
            let mut lines = wrap_styled(&title, usize::from(width), style::item_title());
            let body_width = usize::from(width).saturating_sub(PARAGRAPH_INDENT.len());
            lines.extend(prefix_lines(
                wrap_styled(&text, body_width, Style::default()),
                PARAGRAPH_INDENT.into(),
                PARAGRAPH_INDENT.into(),
            ));
            lines
        })),
        Fragment::RoleMatrix(matrix) => Box::new(RoleTable { matrix }),
        Fragment::CauseEffect(diagram) => Box::new(DiagramRenderable::new(diagram)),
        Fragment::Chart { mount } => Box::new(DonutRenderable::new(charts.clone(), mount)?),
    };
    Some(block)
}

/// Two-column role table: badge and name, then the wrapped description.
struct RoleTable {
    matrix: RoleMatrix,
}

impl RoleTable {
    const SPACING: u16 = 1;
    /// Badge cell plus the gap after it.
    const BADGE_WIDTH: usize = 4;

    fn name_width(&self, width: u16) -> u16 {
        let widest = self
            .matrix
            .rows
            .iter()
            .map(|row| row.name.width())
            .chain(std::iter::once(self.matrix.headers[0].width()))
            .max()
            .unwrap_or_default()
            + Self::BADGE_WIDTH;
        u16::try_from(widest).unwrap_or(u16::MAX).min(width / 2)
    }

    /// Name and description cells of every row, wrapped to their columns.
    fn cells(&self, width: u16) -> Vec<(Vec<Line<'static>>, Vec<Line<'static>>)> {
        let name_width = self.name_width(width);
        let name_body = usize::from(name_width).saturating_sub(Self::BADGE_WIDTH);
        let description_width = usize::from(width.saturating_sub(name_width + Self::SPACING));
        self.matrix
            .rows
            .iter()
            .map(|row| {
                let name: Vec<Line<'static>> = wrap_styled(&row.name, name_body, style::item_title())
                    .into_iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let mut spans = if i == 0 {
                            vec![Span::styled(format!(" {} ", row.badge), style::badge()), " ".into()]
                        } else {
                            vec![" ".repeat(Self::BADGE_WIDTH).into()]
                        };
                        spans.extend(line.spans);
                        Line::from(spans)
                    })
                    .collect();
                let description = wrap_styled(&row.description, description_width, Style::default());
                (name, description)
            })
            .collect()
    }
}

impl Renderable for RoleTable {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(
            self.matrix
                .headers
                .iter()
                .map(|h| Cell::from(h.clone()))
                .collect::<Vec<_>>(),
        )
        .style(style::heading());
        let rows = self.cells(area.width).into_iter().map(|(name, description)| {
            let height = u16::try_from(name.len().max(description.len())).unwrap_or(u16::MAX);
            Row::new(vec![Cell::from(Text::from(name)), Cell::from(Text::from(description))])
                .height(height)
        });
        let widths = [
            Constraint::Length(self.name_width(area.width)),
            Constraint::Fill(1),
        ];
        Table::new(rows, widths)
            .header(header)
            .column_spacing(Self::SPACING)
            .render(area, buf);
    }

    fn desired_height(&self, width: u16) -> u16 {
        let rows: usize = self
            .cells(width)
            .iter()
            .map(|(name, description)| name.len().max(description.len()))
            .sum();
        u16::try_from(rows + 1).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::buffer_rows;
    use crossterm::event::KeyModifiers;
    use pmmap_core::ChartMount;
    use pmmap_core::ContentModel;
    use pmmap_core::PanelController;
    use pmmap_core::special::QUALITY_CHART_MOUNT;
    use pmmap_core::special::role_matrix;
    use pretty_assertions::assert_eq;

    fn mounted(id: &str) -> (PanelController<TerminalCharts>, TerminalCharts) {
        let model = ContentModel::builtin().expect("builtin content");
        let charts = TerminalCharts::new();
        let mut panel = PanelController::new(charts.clone());
        panel
            .show(model.topic(id).expect("topic exists"))
            .expect("chart renders");
        (panel, charts)
    }

    fn draw(view: &mut PanelView, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buffer_rows(&buf)
    }

    #[test]
    fn panel_width_follows_breakpoints() {
        assert_eq!(panel_width(40), 40);
        assert_eq!(panel_width(80), 40);
        assert_eq!(panel_width(150), 60);
    }

    #[test]
    fn generic_topic_shows_header_then_bullets() {
        let (panel, charts) = mounted("tap");
        let body = panel.body().expect("mounted");
        let mut view = PanelView::new(body, &charts);
        let rows = draw(&mut view, 70, 40);
        assert!(rows[0].ends_with(CLOSE_CONTROL));
        assert!(rows[1].contains(&body.title));
        assert!(rows[2].contains("Documento que autoriza"));
        let bullets = rows.iter().filter(|row| row.contains(BULLET)).count();
        assert_eq!(bullets, body.item_count());
    }

    #[test]
    fn role_table_lists_four_roles_under_headers() {
        let table = RoleTable {
            matrix: role_matrix(),
        };
        let width = 100;
        let height = table.desired_height(width);
        assert_eq!(height, 5);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        table.render(area, &mut buf);
        let rows = buffer_rows(&buf);
        assert!(rows[0].starts_with("Papel"));
        assert!(rows[0].contains("Descrição"));
        assert!(rows[1].starts_with(" R  Responsible (Responsável)"));
        assert!(rows[4].starts_with(" I  Informed (Informado)"));
    }

    #[test]
    fn role_table_wraps_descriptions_when_narrow() {
        let table = RoleTable {
            matrix: role_matrix(),
        };
        assert!(table.desired_height(40) > 5);
    }

    #[test]
    fn chart_topic_adds_a_donut_block() {
        let (panel, charts) = mounted("qualidade");
        let body = panel.body().expect("mounted");
        assert_eq!(body.chart_mount(), Some(&ChartMount::new(QUALITY_CHART_MOUNT)));
        let mut view = PanelView::new(body, &charts);
        let rows = draw(&mut view, 70, 60);
        assert!(
            rows.iter()
                .any(|row| row.contains("Componentes da Gestão da Qualidade"))
        );
    }

    #[test]
    fn unmounted_chart_leaves_no_block() {
        let charts = TerminalCharts::new();
        let fragment = Fragment::Chart {
            mount: ChartMount::new(QUALITY_CHART_MOUNT),
        };
        assert!(fragment_renderable(&fragment, &charts).is_none());
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let (panel, charts) = mounted("metodologias");
        let mut view = PanelView::new(panel.body().expect("mounted"), &charts);
        draw(&mut view, 40, 10);
        let end = KeyEvent::new(KeyCode::End, KeyModifiers::NONE);
        assert!(view.handle_key_event(end));
        let rows = draw(&mut view, 40, 10);
        let content_height = view.content_height(40 - 3);
        assert_eq!(view.scroll_offset, content_height - 8);
        assert!(rows[9].contains("100%"));

        let home = KeyEvent::new(KeyCode::Home, KeyModifiers::NONE);
        assert!(view.handle_key_event(home));
        let rows = draw(&mut view, 40, 10);
        assert!(rows[9].contains(" 0%"));
        assert!(!view.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn close_control_is_hit_tested() {
        let (panel, charts) = mounted("eap");
        let mut view = PanelView::new(panel.body().expect("mounted"), &charts);
        let area = Rect::new(30, 0, 40, 20);
        let mut buf = Buffer::empty(Rect::new(0, 0, 70, 20));
        view.render(area, &mut buf);
        // "[x]" ends one column before the right edge.
        assert!(view.is_close_control(66, 0));
        assert!(view.is_close_control(68, 0));
        assert!(!view.is_close_control(69, 0));
        assert!(!view.is_close_control(66, 1));
    }
}
