//! Display fragments: the toolkit-neutral output of the renderers.
//!
//! A front end turns each [`Fragment`] into whatever its surface draws;
//! the terminal front end maps them onto ratatui renderables.

use serde::Serialize;

use crate::chart::ChartMount;
use crate::special::CauseEffectDiagram;
use crate::special::RoleMatrix;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Fragment {
    /// One line with the primary bullet marker.
    Bullet { text: String },
    /// Bold title over an indented list with the secondary marker.
    Group { title: String, entries: Vec<String> },
    /// Bold title over one paragraph of text.
    Paragraph { title: String, text: String },
    RoleMatrix(RoleMatrix),
    CauseEffect(CauseEffectDiagram),
    /// Placeholder the chart backend draws into.
    Chart { mount: ChartMount },
}

impl Fragment {
    /// True for fragments produced by the item renderer.
    pub fn is_item(&self) -> bool {
        matches!(
            self,
            Fragment::Bullet { .. } | Fragment::Group { .. } | Fragment::Paragraph { .. }
        )
    }
}

/// Everything the panel shows for one topic: a header and the body
/// fragments in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailBody {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub fragments: Vec<Fragment>,
}

impl DetailBody {
    pub fn item_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_item()).count()
    }

    pub fn chart_mount(&self) -> Option<&ChartMount> {
        self.fragments.iter().find_map(|f| match f {
            Fragment::Chart { mount } => Some(mount),
            _ => None,
        })
    }
}
