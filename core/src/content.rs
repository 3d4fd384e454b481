//! The static content tree: page header, central topic and child topics.
//!
//! A [`ContentModel`] is validated once when it is built and is read-only
//! afterwards. Lookups are linear scans; the tree holds about a dozen
//! topics.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ContentError;
use crate::error::Result;

/// Stable identifier of a [`Topic`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One unit of detail content inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DisplayItem {
    /// A single bulleted label.
    Plain { label: String },
    /// A bold title followed by an indented list of sub-labels.
    Group { title: String, entries: Vec<String> },
    /// A bold title followed by one paragraph of free text.
    Paragraph { title: String, text: String },
}

impl DisplayItem {
    pub fn plain(label: impl Into<String>) -> Self {
        Self::Plain {
            label: label.into(),
        }
    }

    pub fn group<I, S>(title: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Group {
            title: title.into(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paragraph(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Paragraph {
            title: title.into(),
            text: text.into(),
        }
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        match self {
            DisplayItem::Plain { .. } => Ok(()),
            DisplayItem::Group { title, entries } => {
                if title.trim().is_empty() {
                    Err("group title is empty")
                } else if entries.is_empty() {
                    Err("group has no entries")
                } else {
                    Ok(())
                }
            }
            DisplayItem::Paragraph { title, .. } if title.trim().is_empty() => {
                Err("paragraph title is empty")
            }
            DisplayItem::Paragraph { .. } => Ok(()),
        }
    }
}

/// How the body of a topic is rendered. Resolved when the content loads.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RendererKind {
    /// Every display item through the item renderer.
    #[default]
    Generic,
    /// The fixed RACI table; display items are ignored.
    RoleMatrix,
    /// The fixed six-category cause/effect diagram; display items are ignored.
    CauseEffect,
    /// The generic item list followed by the quality chart.
    GenericPlusChart,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CentralStyle {
    #[default]
    Accent,
    Plain,
}

/// The non-interactive centerpiece of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CentralTopic {
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub style: CentralStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageHeader {
    pub title: String,
    pub subtitle: String,
}

/// One explorable node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    title: String,
    icon: String,
    description: String,
    items: Vec<DisplayItem>,
    renderer: RendererKind,
}

impl Topic {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TopicId::new(id),
            title: title.into(),
            icon: icon.into(),
            description: description.into(),
            items: Vec::new(),
            renderer: RendererKind::Generic,
        }
    }

    pub fn with_items(mut self, items: Vec<DisplayItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_renderer(mut self, renderer: RendererKind) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn id(&self) -> &TopicId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn renderer(&self) -> RendererKind {
        self.renderer
    }
}

/// Validated, immutable content tree.
#[derive(Debug, Clone)]
pub struct ContentModel {
    page: PageHeader,
    central: CentralTopic,
    topics: Vec<Topic>,
}

impl ContentModel {
    /// Build a model, rejecting empty or duplicate identifiers and
    /// malformed display items.
    pub fn new(page: PageHeader, central: CentralTopic, topics: Vec<Topic>) -> Result<Self> {
        if topics.is_empty() {
            return Err(ContentError::NoTopics);
        }

        let mut seen = HashSet::with_capacity(topics.len());
        for (index, topic) in topics.iter().enumerate() {
            if topic.id.as_str().trim().is_empty() {
                return Err(ContentError::EmptyTopicId { index });
            }
            if !seen.insert(topic.id.as_str()) {
                return Err(ContentError::DuplicateTopicId(topic.id.to_string()));
            }
            for (item_index, item) in topic.items.iter().enumerate() {
                item.check().map_err(|reason| ContentError::MalformedItem {
                    topic: topic.id.to_string(),
                    index: item_index,
                    reason,
                })?;
            }
        }

        tracing::debug!(topics = topics.len(), "content model built");
        Ok(Self {
            page,
            central,
            topics,
        })
    }

    /// The project-management tree shipped with the binary.
    pub fn builtin() -> Result<Self> {
        crate::config::load_str(crate::config::BUILTIN_CONTENT)
    }

    pub fn page(&self) -> &PageHeader {
        &self.page
    }

    pub fn central(&self) -> &CentralTopic {
        &self.central
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id.as_str() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.id.as_str() == id)
    }
}
