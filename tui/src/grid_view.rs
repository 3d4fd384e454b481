//! The node grid: page header, centerpiece, and one card per topic.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::MouseEventKind;
use pmmap_core::GridNode;
use pmmap_core::content::PageHeader;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;

use crate::app_event_sender::AppEventSender;
use crate::key_hint;
use crate::key_hint::KeyBinding;
use crate::style;

const KEY_LEFT: KeyBinding = key_hint::plain(KeyCode::Left);
const KEY_RIGHT: KeyBinding = key_hint::plain(KeyCode::Right);
const KEY_UP: KeyBinding = key_hint::plain(KeyCode::Up);
const KEY_DOWN: KeyBinding = key_hint::plain(KeyCode::Down);
const KEY_H: KeyBinding = key_hint::plain(KeyCode::Char('h'));
const KEY_L: KeyBinding = key_hint::plain(KeyCode::Char('l'));
const KEY_K: KeyBinding = key_hint::plain(KeyCode::Char('k'));
const KEY_J: KeyBinding = key_hint::plain(KeyCode::Char('j'));
const KEY_ENTER: KeyBinding = key_hint::plain(KeyCode::Enter);
const KEY_SPACE: KeyBinding = key_hint::plain(KeyCode::Char(' '));

pub(crate) const MOVE_KEYS: &[KeyBinding] = &[KEY_LEFT, KEY_RIGHT, KEY_UP, KEY_DOWN];
pub(crate) const ACTIVATE_KEYS: &[KeyBinding] = &[KEY_ENTER];

const HEADER_ROWS: u16 = 3;
const NODE_HEIGHT: u16 = 5;
const ROW_GAP: u16 = 1;
const COLUMN_GAP: u16 = 2;
const WHEEL_STEP: u16 = 3;

/// Topic columns for a grid `width` columns wide.
pub(crate) fn columns_for(width: u16) -> u16 {
    match width {
        0..40 => 1,
        40..60 => 2,
        60..90 => 3,
        _ => 4,
    }
}

/// Node rectangles relative to the grid's top-left corner, in node order,
/// plus the total height. The first node spans the full width.
fn layout(node_count: usize, width: u16) -> (Vec<Rect>, u16) {
    let columns = columns_for(width);
    let cell_width = width.saturating_sub(COLUMN_GAP * (columns - 1)) / columns;
    let mut rects = Vec::with_capacity(node_count);
    if node_count == 0 {
        return (rects, 0);
    }
    rects.push(Rect::new(0, 0, width, NODE_HEIGHT));
    let mut bottom = NODE_HEIGHT;
    for i in 0..node_count - 1 {
        let i = u16::try_from(i).unwrap_or(u16::MAX);
        let (row, column) = (i / columns, i % columns);
        let y = (NODE_HEIGHT + ROW_GAP) * (row + 1);
        let rect = Rect::new(column * (cell_width + COLUMN_GAP), y, cell_width, NODE_HEIGHT);
        bottom = rect.bottom();
        rects.push(rect);
    }
    (rects, bottom)
}

pub(crate) struct GridView {
    page: PageHeader,
    nodes: Vec<GridNode>,
    /// Node indices that can take focus.
    interactive: Vec<usize>,
    focus: usize,
    scroll_offset: u16,
    reveal_focus: bool,
    columns: u16,
    last_layout: Vec<(usize, Rect)>,
    app_event_tx: AppEventSender,
}

impl GridView {
    pub(crate) fn new(page: PageHeader, nodes: Vec<GridNode>, app_event_tx: AppEventSender) -> Self {
        let interactive = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_interactive())
            .map(|(i, _)| i)
            .collect();
        Self {
            page,
            nodes,
            interactive,
            focus: 0,
            scroll_offset: 0,
            reveal_focus: false,
            columns: 1,
            last_layout: Vec::new(),
            app_event_tx,
        }
    }

    pub(crate) fn focused_node(&self) -> Option<&GridNode> {
        self.interactive
            .get(self.focus)
            .and_then(|&index| self.nodes.get(index))
    }

    /// Move focus onto the topic `id`, if it is on the grid.
    pub(crate) fn focus_topic(&mut self, id: &str) {
        if let Some(position) = self.interactive.iter().position(|&index| {
            self.nodes[index]
                .topic_id()
                .is_some_and(|topic| topic.as_str() == id)
        }) {
            self.focus = position;
            self.reveal_focus = true;
        }
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let header = vec![
            Line::from(self.page.title.clone()).style(style::heading()),
            Line::from(self.page.subtitle.clone()).style(style::muted()),
        ];
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .render(Rect { height: HEADER_ROWS.min(area.height), ..area }, buf);

        let grid_area = Rect {
            y: area.y + HEADER_ROWS.min(area.height),
            height: area.height.saturating_sub(HEADER_ROWS),
            ..area
        };
        self.columns = columns_for(grid_area.width);
        let (rects, total_height) = layout(self.nodes.len(), grid_area.width);

        if self.reveal_focus {
            self.reveal_focus = false;
            if let Some(rect) = self.interactive.get(self.focus).and_then(|&i| rects.get(i)) {
                if rect.y < self.scroll_offset {
                    self.scroll_offset = rect.y;
                } else if rect.bottom() > self.scroll_offset + grid_area.height {
                    self.scroll_offset = rect.bottom().saturating_sub(grid_area.height);
                }
            }
        }
        self.scroll_offset = self
            .scroll_offset
            .min(total_height.saturating_sub(grid_area.height));

        let focused = self.interactive.get(self.focus).copied();
        self.last_layout.clear();
        for (index, (node, rect)) in self.nodes.iter().zip(rects).enumerate() {
            let Some(top) = rect.y.checked_sub(self.scroll_offset) else {
                continue;
            };
            let screen = Rect {
                x: grid_area.x + rect.x,
                y: grid_area.y + top,
                ..rect
            }
            .intersection(grid_area);
            if screen.is_empty() {
                continue;
            }
            render_node(node, focused == Some(index), screen, buf);
            self.last_layout.push((index, screen));
        }
    }

    pub(crate) fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        let last = self.interactive.len().saturating_sub(1);
        let columns = usize::from(self.columns);
        match key_event {
            e if KEY_LEFT.is_press(e) || KEY_H.is_press(e) => {
                self.focus = self.focus.saturating_sub(1);
            }
            e if KEY_RIGHT.is_press(e) || KEY_L.is_press(e) => {
                self.focus = (self.focus + 1).min(last);
            }
            e if KEY_UP.is_press(e) || KEY_K.is_press(e) => {
                self.focus = self.focus.saturating_sub(columns);
            }
            e if KEY_DOWN.is_press(e) || KEY_J.is_press(e) => {
                self.focus = (self.focus + columns).min(last);
            }
            e if KEY_ENTER.is_press(e) || KEY_SPACE.is_press(e) => {
                self.activate_focused();
                return true;
            }
            _ => return false,
        }
        self.reveal_focus = true;
        true
    }

    fn activate_focused(&self) {
        if let Some(id) = self.focused_node().and_then(GridNode::topic_id) {
            self.app_event_tx.activate_topic(id.clone());
        }
    }

    pub(crate) fn node_at(&self, column: u16, row: u16) -> Option<&GridNode> {
        self.last_layout
            .iter()
            .find(|(_, rect)| rect.contains(Position::new(column, row)))
            .and_then(|&(index, _)| self.nodes.get(index))
    }

    /// Click at a screen position. Returns true when it hit a topic.
    pub(crate) fn handle_click(&mut self, column: u16, row: u16) -> bool {
        let Some(id) = self.node_at(column, row).and_then(GridNode::topic_id).cloned() else {
            return false;
        };
        self.focus_topic(id.as_str());
        self.app_event_tx.activate_topic(id);
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
}

fn render_node(node: &GridNode, focused: bool, area: Rect, buf: &mut Buffer) {
    let (icon, title, fill) = match node {
        GridNode::Central {
            title,
            icon,
            style: central,
        } => (icon, title, style::central_style(*central)),
        GridNode::Topic { title, icon, .. } => (icon, title, Style::default()),
    };
    let (border_type, border_style) = if focused {
        (BorderType::Thick, style::focused_node())
    } else {
        (BorderType::Rounded, style::muted())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .style(fill);
    Paragraph::new(vec![
        Line::from(icon.clone()),
        Line::from(title.clone()).style(style::item_title()),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block)
    .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_event::AppEvent;
    use crate::render::test_support::buffer_rows;
    use crossterm::event::KeyModifiers;
    use pmmap_core::ContentModel;
    use pmmap_core::GridController;
    use pmmap_core::TopicId;
    use pretty_assertions::assert_eq;
    use std::sync::mpsc::Receiver;
    use std::sync::mpsc::channel;

    fn view() -> (GridView, Receiver<AppEvent>) {
        let model = ContentModel::builtin().expect("builtin content");
        let page = model.page().clone();
        let grid = GridController::new(model);
        let (tx, rx) = channel();
        (
            GridView::new(page, grid.build_grid(), AppEventSender::new(tx)),
            rx,
        )
    }

    fn draw(view: &mut GridView, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buffer_rows(&buf)
    }

    fn press(view: &mut GridView, code: KeyCode) -> bool {
        view.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn columns_follow_breakpoints() {
        assert_eq!(columns_for(30), 1);
        assert_eq!(columns_for(50), 2);
        assert_eq!(columns_for(80), 3);
        assert_eq!(columns_for(120), 4);
    }

    #[test]
    fn centerpiece_spans_the_first_row() {
        let (rects, height) = layout(12, 100);
        assert_eq!(rects[0], Rect::new(0, 0, 100, NODE_HEIGHT));
        assert_eq!(rects[1], Rect::new(0, 6, 23, NODE_HEIGHT));
        assert_eq!(rects[4], Rect::new(75, 6, 23, NODE_HEIGHT));
        assert_eq!(rects[5].y, 12);
        // Eleven topics in rows of four.
        assert_eq!(height, 6 * 3 + NODE_HEIGHT);
    }

    #[test]
    fn renders_header_and_every_title() {
        let (mut view, _rx) = view();
        let rows = draw(&mut view, 100, 40);
        assert!(rows[0].contains("Mapa Interativo: Gestão de Projetos"));
        assert!(rows[1].contains("Clique em um conceito para explorar seus detalhes."));
        let screen = rows.join("\n");
        for title in ["Gestão de Projetos", "TAP", "Cronograma", "Qualidade", "Matriz RACI"] {
            assert!(screen.contains(title), "{title} missing");
        }
    }

    #[test]
    fn arrows_move_focus_within_bounds() {
        let (mut view, _rx) = view();
        draw(&mut view, 100, 40);
        let focused = |view: &GridView| {
            view.focused_node()
                .and_then(GridNode::topic_id)
                .map(|id| id.as_str().to_string())
        };
        assert_eq!(focused(&view).as_deref(), Some("tap"));
        press(&mut view, KeyCode::Left);
        assert_eq!(focused(&view).as_deref(), Some("tap"));
        press(&mut view, KeyCode::Right);
        assert_eq!(focused(&view).as_deref(), Some("tailoring"));
        press(&mut view, KeyCode::Down);
        assert_eq!(focused(&view).as_deref(), Some("metodologias"));
        for _ in 0..5 {
            press(&mut view, KeyCode::Char('j'));
        }
        assert_eq!(focused(&view).as_deref(), Some("raci"));
    }

    #[test]
    fn enter_activates_the_focused_topic() {
        let (mut view, rx) = view();
        draw(&mut view, 100, 40);
        assert!(press(&mut view, KeyCode::Enter));
        assert_eq!(rx.try_recv().ok(), Some(AppEvent::ActivateTopic(TopicId::new("tap"))));
        assert!(!press(&mut view, KeyCode::Char('x')));
    }

    #[test]
    fn clicks_hit_topics_but_not_the_centerpiece() {
        let (mut view, rx) = view();
        draw(&mut view, 100, 40);
        // Centerpiece starts right under the header.
        assert!(!view.handle_click(50, HEADER_ROWS + 1));
        assert!(rx.try_recv().is_err());
        // Second card of the first topic row.
        assert!(view.handle_click(30, HEADER_ROWS + 7));
        assert_eq!(
            rx.try_recv().ok(),
            Some(AppEvent::ActivateTopic(TopicId::new("tailoring")))
        );
        assert!(!view.handle_click(24, HEADER_ROWS + 7));
    }

    #[test]
    fn keyboard_focus_scrolls_into_view() {
        let (mut view, _rx) = view();
        draw(&mut view, 100, 14);
        for _ in 0..3 {
            press(&mut view, KeyCode::Down);
        }
        let rows = draw(&mut view, 100, 14);
        assert!(rows.join("\n").contains("Matriz RACI"));
        assert!(view.scroll_offset > 0);
    }
}
