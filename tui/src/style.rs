//! Palette: warm stone neutrals with sky accents.

use pmmap_core::chart::Rgb;
use pmmap_core::content::CentralStyle;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

pub(crate) const SKY_500: Color = Color::Rgb(0x0e, 0xa5, 0xe9);
pub(crate) const SKY_600: Color = Color::Rgb(0x02, 0x84, 0xc7);
pub(crate) const STONE_400: Color = Color::Rgb(0xa8, 0xa2, 0x9e);
pub(crate) const STONE_600: Color = Color::Rgb(0x57, 0x53, 0x4e);
pub(crate) const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

pub(crate) fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub(crate) fn central_style(style: CentralStyle) -> Style {
    match style {
        CentralStyle::Accent => Style::default()
            .fg(WHITE)
            .bg(SKY_600)
            .add_modifier(Modifier::BOLD),
        CentralStyle::Plain => Style::default().add_modifier(Modifier::BOLD),
    }
}

pub(crate) fn heading() -> Style {
    Style::default().fg(SKY_600).add_modifier(Modifier::BOLD)
}

pub(crate) fn item_title() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn primary_marker() -> Style {
    Style::default().fg(SKY_500)
}

pub(crate) fn secondary_marker() -> Style {
    Style::default().fg(STONE_400)
}

pub(crate) fn muted() -> Style {
    Style::default().fg(STONE_600)
}

pub(crate) fn badge() -> Style {
    Style::default()
        .fg(WHITE)
        .bg(SKY_500)
        .add_modifier(Modifier::BOLD)
}

/// Dimming applied to the grid while the panel is up.
pub(crate) fn overlay() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn focused_node() -> Style {
    Style::default().fg(SKY_600).add_modifier(Modifier::BOLD)
}
