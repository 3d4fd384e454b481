use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;

/// A block of panel content that knows its height for a given width.
pub(crate) trait Renderable {
    fn render(&self, area: Rect, buf: &mut Buffer);

    fn desired_height(&self, width: u16) -> u16;

    /// Pointer position relative to this block (`None` once it leaves).
    /// Returns true when the block needs a redraw.
    fn pointer_moved(&self, _position: Option<(u16, u16)>, _width: u16) -> bool {
        false
    }
}

/// Pre-wrapped lines produced per width.
pub(crate) struct LinesRenderable<F>
where
    F: Fn(u16) -> Vec<Line<'static>>,
{
    lines_for_width: F,
}

impl<F> LinesRenderable<F>
where
    F: Fn(u16) -> Vec<Line<'static>>,
{
    pub(crate) fn new(lines_for_width: F) -> Self {
        Self { lines_for_width }
    }
}

impl<F> Renderable for LinesRenderable<F>
where
    F: Fn(u16) -> Vec<Line<'static>>,
{
    fn render(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new((self.lines_for_width)(area.width)).render(area, buf);
    }

    fn desired_height(&self, width: u16) -> u16 {
        u16::try_from((self.lines_for_width)(width).len()).unwrap_or(u16::MAX)
    }
}

/// Adds blank rows above a renderable.
pub(crate) struct Spaced {
    inner: Box<dyn Renderable>,
    top: u16,
}

impl Spaced {
    pub(crate) fn top(inner: Box<dyn Renderable>, top: u16) -> Self {
        Self { inner, top }
    }
}

impl Renderable for Spaced {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut area = area;
        area.y = area.y.saturating_add(self.top);
        area.height = area.height.saturating_sub(self.top);
        self.inner.render(area, buf);
    }

    fn desired_height(&self, width: u16) -> u16 {
        self.inner.desired_height(width).saturating_add(self.top)
    }

    fn pointer_moved(&self, position: Option<(u16, u16)>, width: u16) -> bool {
        let position = position.and_then(|(x, y)| y.checked_sub(self.top).map(|y| (x, y)));
        self.inner.pointer_moved(position, width)
    }
}
