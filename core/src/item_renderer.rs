//! Generic rendering of display items.

use crate::content::DisplayItem;
use crate::fragment::Fragment;

/// Map one display item to its fragment.
pub fn render_item(item: &DisplayItem) -> Fragment {
    match item {
        DisplayItem::Plain { label } => Fragment::Bullet {
            text: label.clone(),
        },
        DisplayItem::Group { title, entries } => Fragment::Group {
            title: title.clone(),
            entries: entries.clone(),
        },
        DisplayItem::Paragraph { title, text } => Fragment::Paragraph {
            title: title.clone(),
            text: text.clone(),
        },
    }
}

/// Render every item in order, one fragment per item.
pub fn render_items(items: &[DisplayItem]) -> Vec<Fragment> {
    items.iter().map(render_item).collect()
}
