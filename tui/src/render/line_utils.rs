use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

/// Prefix each line with `initial_prefix` for the first line and
/// `subsequent_prefix` for following lines. Returns a new Vec of owned lines.
pub(crate) fn prefix_lines(
    lines: Vec<Line<'static>>,
    initial_prefix: Span<'static>,
    subsequent_prefix: Span<'static>,
) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            let mut spans = Vec::with_capacity(l.spans.len() + 1);
            spans.push(if i == 0 {
                initial_prefix.clone()
            } else {
                subsequent_prefix.clone()
            });
            spans.extend(l.spans);
            Line::from(spans).style(l.style)
        })
        .collect()
}

/// Wrap `text` to `width` columns as styled owned lines. Always yields at
/// least one line so empty labels still take a row.
pub(crate) fn wrap_styled(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let wrapped = textwrap::wrap(text, width.max(1));
    if wrapped.is_empty() {
        return vec![Line::default()];
    }
    wrapped
        .into_iter()
        .map(|piece| Line::from(Span::styled(piece.into_owned(), style)))
        .collect()
}

/// Wrap `text` and hang it behind a marker: the marker on the first line,
/// matching blank padding on the rest.
pub(crate) fn hanging(
    marker: Span<'static>,
    text: &str,
    width: u16,
    style: Style,
) -> Vec<Line<'static>> {
    let indent = marker.width();
    let body_width = usize::from(width).saturating_sub(indent);
    let padding = Span::raw(" ".repeat(indent));
    prefix_lines(wrap_styled(text, body_width, style), marker, padding)
}
