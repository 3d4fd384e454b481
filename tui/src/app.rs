use std::sync::mpsc::Receiver;
use std::sync::mpsc::channel;
use std::time::Duration;

use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use pmmap_core::ContentModel;
use pmmap_core::GridController;
use pmmap_core::PanelController;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::detail_panel;
use crate::detail_panel::PanelView;
use crate::donut::TerminalCharts;
use crate::grid_view;
use crate::grid_view::GridView;
use crate::key_hint;
use crate::key_hint::KeyBinding;
use crate::slide::Slide;
use crate::style;
use crate::tui::Tui;

const KEY_ESC: KeyBinding = key_hint::plain(KeyCode::Esc);
const KEY_Q: KeyBinding = key_hint::plain(KeyCode::Char('q'));
const KEY_CTRL_C: KeyBinding = key_hint::ctrl(KeyCode::Char('c'));

/// Poll interval while the panel slides.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

pub(crate) struct App {
    grid: GridController,
    grid_view: GridView,
    panel: PanelController<TerminalCharts>,
    panel_view: Option<PanelView>,
    charts: TerminalCharts,
    slide: Slide,
    app_event_tx: AppEventSender,
    app_event_rx: Receiver<AppEvent>,
    /// Visible part of the panel as of the last frame.
    last_panel_area: Option<Rect>,
    exit: bool,
}

impl App {
    pub(crate) fn new(model: ContentModel) -> Self {
        let (tx, app_event_rx) = channel();
        let app_event_tx = AppEventSender::new(tx);
        let grid = GridController::new(model);
        let grid_view = GridView::new(
            grid.model().page().clone(),
            grid.build_grid(),
            app_event_tx.clone(),
        );
        let charts = TerminalCharts::new();
        Self {
            grid,
            grid_view,
            panel: PanelController::new(charts.clone()),
            panel_view: None,
            charts,
            slide: Slide::default(),
            app_event_tx,
            app_event_rx,
            last_panel_area: None,
            exit: false,
        }
    }

    /// Open the panel on `id` before the first frame, without animation.
    pub(crate) fn open_at_startup(&mut self, id: &str) {
        self.grid_view.focus_topic(id);
        self.activate(id);
        self.slide.jump_open();
    }

    pub(crate) fn run(&mut self, terminal: &mut Tui) -> anyhow::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.render(frame.area(), frame.buffer_mut()))?;

            let timeout = if self.slide.is_animating() {
                FRAME_INTERVAL
            } else {
                IDLE_POLL
            };
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key_event) => self.app_event_tx.send(AppEvent::KeyEvent(key_event)),
                    Event::Mouse(mouse_event) => {
                        self.app_event_tx.send(AppEvent::MouseEvent(mouse_event));
                    }
                    Event::Resize(..) | Event::FocusGained => self.app_event_tx.send(AppEvent::Redraw),
                    _ => {}
                }
            }
            if self.slide.is_animating() {
                self.app_event_tx.send(AppEvent::Tick);
            }
            self.drain_events();
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.app_event_rx.try_recv() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::KeyEvent(key_event) => self.handle_key_event(key_event),
            AppEvent::MouseEvent(mouse_event) => self.handle_mouse_event(mouse_event),
            AppEvent::Tick => {
                self.slide.tick();
                if !self.slide.is_visible() {
                    self.panel_view = None;
                    self.last_panel_area = None;
                }
            }
            AppEvent::Redraw => {}
            AppEvent::ActivateTopic(id) => self.activate(id.as_str()),
            AppEvent::ClosePanel => self.close_panel(),
            AppEvent::ExitRequest => self.exit = true,
        }
    }

    fn activate(&mut self, id: &str) {
        match self.grid.on_node_activated(id, &mut self.panel) {
            Ok(true) => {}
            Ok(false) => return,
            // The panel is open with the generic items; only the chart is missing.
            Err(err) => tracing::error!(topic = id, "failed to render chart: {err}"),
        }
        if let Some(body) = self.panel.body() {
            self.panel_view = Some(PanelView::new(body, &self.charts));
        }
        tracing::debug!(live_charts = self.charts.live_count(), "panel view rebuilt");
        self.slide.open();
    }

    fn close_panel(&mut self) {
        // The view stays until the slide-out finishes.
        if self.panel.close() {
            self.slide.close();
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if KEY_CTRL_C.is_press(key_event) {
            self.app_event_tx.send(AppEvent::ExitRequest);
            return;
        }
        if self.panel.is_open() {
            if KEY_ESC.is_press(key_event) || KEY_Q.is_press(key_event) {
                self.app_event_tx.close_panel();
            } else if let Some(view) = self.panel_view.as_mut() {
                view.handle_key_event(key_event);
            }
        } else if KEY_ESC.is_press(key_event) || KEY_Q.is_press(key_event) {
            self.app_event_tx.send(AppEvent::ExitRequest);
        } else {
            self.grid_view.handle_key_event(key_event);
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let (column, row) = (mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.panel.is_open() {
                    self.grid_view.handle_click(column, row);
                    return;
                }
                let on_close = self
                    .panel_view
                    .as_ref()
                    .is_some_and(|view| view.is_close_control(column, row));
                let on_overlay = !self
                    .last_panel_area
                    .is_some_and(|area| area.contains(Position::new(column, row)));
                if on_close || on_overlay {
                    self.app_event_tx.close_panel();
                }
            }
            kind @ (MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) => {
                // The grid behind an open panel does not scroll.
                if self.panel.is_open() {
                    if let Some(view) = self.panel_view.as_mut() {
                        view.handle_mouse_scroll(kind);
                    }
                } else {
                    self.grid_view.handle_mouse_scroll(kind);
                }
            }
            MouseEventKind::Moved => {
                if self.panel.is_open()
                    && let Some(view) = self.panel_view.as_mut()
                {
                    view.pointer_moved(column, row);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let footer = Rect {
            y: body.bottom(),
            height: area.height - body.height,
            ..area
        };

        self.grid_view.render(body, buf);
        if self.panel.visual().overlay_visible {
            buf.set_style(body, style::overlay());
        }

        self.last_panel_area = None;
        if self.slide.is_visible()
            && let Some(view) = self.panel_view.as_mut()
        {
            let width = detail_panel::panel_width(body.width);
            let full = Rect {
                x: body.right() - width,
                width,
                ..body
            };
            let shown = slide_width(width, self.slide.visible_fraction());
            if shown > 0 {
                // Lay the panel out at full width and reveal its left part.
                let mut scratch = Buffer::empty(full);
                view.render(full, &mut scratch);
                let visible = Rect {
                    x: body.right() - shown,
                    width: shown,
                    ..body
                };
                for y in visible.top()..visible.bottom() {
                    for dx in 0..shown {
                        buf[(visible.x + dx, y)] = scratch[(full.x + dx, y)].clone();
                    }
                }
                self.last_panel_area = Some(visible);
            }
        }

        Paragraph::new(self.footer_hints()).render(footer, buf);
    }

    fn footer_hints(&self) -> Line<'static> {
        if self.panel.is_open() {
            key_hint::hint_line(&[
                (detail_panel::SCROLL_KEYS, "rolar"),
                (&[KEY_ESC], "fechar"),
                (&[KEY_CTRL_C], "sair"),
            ])
        } else {
            key_hint::hint_line(&[
                (grid_view::MOVE_KEYS, "navegar"),
                (grid_view::ACTIVATE_KEYS, "abrir"),
                (&[KEY_Q], "sair"),
            ])
        }
    }
}

fn slide_width(width: u16, fraction: f64) -> u16 {
    let shown = (f64::from(width) * fraction).round();
    if shown <= 0.0 {
        0
    } else if shown >= f64::from(width) {
        width
    } else {
        // In range (0, width) after the checks above.
        shown as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::buffer_rows;
    use crate::slide::SLIDE_FRAMES;
    use crossterm::event::KeyModifiers;
    use pmmap_core::PanelState;
    use pmmap_core::TopicId;
    use pretty_assertions::assert_eq;

    const WIDTH: u16 = 100;
    const HEIGHT: u16 = 40;

    fn app() -> App {
        App::new(ContentModel::builtin().expect("builtin content"))
    }

    fn draw(app: &mut App) -> Vec<String> {
        let area = Rect::new(0, 0, WIDTH, HEIGHT);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buffer_rows(&buf)
    }

    fn key(app: &mut App, code: KeyCode) {
        app.dispatch(AppEvent::KeyEvent(KeyEvent::new(code, KeyModifiers::NONE)));
        app.drain_events();
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.dispatch(AppEvent::MouseEvent(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
        app.drain_events();
    }

    fn finish_slide(app: &mut App) {
        for _ in 0..SLIDE_FRAMES {
            app.dispatch(AppEvent::Tick);
        }
    }

    fn open_topic(app: &App) -> Option<String> {
        app.panel.current_topic().map(|id| id.as_str().to_string())
    }

    #[test]
    fn enter_opens_the_focused_topic() {
        let mut app = app();
        draw(&mut app);
        key(&mut app, KeyCode::Enter);
        assert_eq!(open_topic(&app).as_deref(), Some("tap"));
        assert!(app.panel_view.is_some());
        assert_eq!(app.charts.live_count(), 0);
    }

    #[test]
    fn chart_topic_holds_one_chart_until_closed() {
        let mut app = app();
        app.open_at_startup("qualidade");
        assert_eq!(app.charts.live_count(), 1);
        let rows = draw(&mut app);
        assert!(rows.iter().any(|row| row.contains("[x]")));
        assert!(
            rows.iter()
                .any(|row| row.contains("Componentes da Gestão da Qualidade"))
        );

        key(&mut app, KeyCode::Esc);
        assert_eq!(app.panel.state(), &PanelState::Closed);
        assert_eq!(app.charts.live_count(), 0);
        assert!(app.panel_view.is_some());
        finish_slide(&mut app);
        assert!(app.panel_view.is_none());
        assert!(!app.exit);
    }

    #[test]
    fn switching_topics_releases_the_chart() {
        let mut app = app();
        app.open_at_startup("qualidade");
        app.dispatch(AppEvent::ActivateTopic(TopicId::new("raci")));
        assert_eq!(open_topic(&app).as_deref(), Some("raci"));
        assert_eq!(app.charts.live_count(), 0);
        let rows = draw(&mut app);
        assert!(rows.iter().any(|row| row.contains(" R  Responsible")));
        assert!(rows.iter().any(|row| row.contains(" I  Informed")));
    }

    #[test]
    fn unknown_topic_changes_nothing() {
        let mut app = app();
        app.dispatch(AppEvent::ActivateTopic(TopicId::new("nope")));
        assert_eq!(app.panel.state(), &PanelState::Closed);
        assert!(app.panel_view.is_none());
    }

    #[test]
    fn clicking_the_overlay_or_close_control_closes() {
        let mut app = app();
        app.open_at_startup("eap");
        draw(&mut app);
        // Inside the panel body: stays open.
        click(&mut app, WIDTH - 10, 10);
        assert!(app.panel.is_open());
        // On the dimmed grid.
        click(&mut app, 5, 10);
        assert!(!app.panel.is_open());

        app.open_at_startup("eap");
        draw(&mut app);
        // "[x]" sits one column in from the right edge.
        click(&mut app, WIDTH - 2, 0);
        assert!(!app.panel.is_open());
    }

    #[test]
    fn grid_is_dimmed_only_while_open() {
        let mut app = app();
        let area = Rect::new(0, 0, WIDTH, HEIGHT);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        assert!(!buf[(0, 5)].modifier.contains(ratatui::style::Modifier::DIM));

        app.open_at_startup("tap");
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        assert!(buf[(0, 5)].modifier.contains(ratatui::style::Modifier::DIM));
    }

    #[test]
    fn q_closes_the_panel_before_quitting() {
        let mut app = app();
        app.open_at_startup("tap");
        key(&mut app, KeyCode::Char('q'));
        assert!(!app.panel.is_open());
        assert!(!app.exit);
        key(&mut app, KeyCode::Char('q'));
        assert!(app.exit);
    }

    #[test]
    fn slide_width_is_clamped() {
        assert_eq!(slide_width(40, 0.0), 0);
        assert_eq!(slide_width(40, 0.5), 20);
        assert_eq!(slide_width(40, 1.0), 40);
    }
}
