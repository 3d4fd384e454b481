//! Loading the content tree from its TOML document.
//!
//! The raw document mirrors the shapes a content author writes: an item is
//! either a bare string or a table with a `title` plus `sub` or `text`.
//! Raw items are converted into [`DisplayItem`] once, here, so nothing
//! downstream inspects optional fields.

use serde::Deserialize;

use crate::content::CentralTopic;
use crate::content::ContentModel;
use crate::content::DisplayItem;
use crate::content::PageHeader;
use crate::content::RendererKind;
use crate::content::Topic;
use crate::error::ContentError;
use crate::error::Result;

/// The content document compiled into the binary.
pub const BUILTIN_CONTENT: &str = include_str!("../content/gestao_de_projetos.toml");

#[derive(Debug, Deserialize)]
struct RawDocument {
    page: PageHeader,
    central: CentralTopic,
    #[serde(default)]
    topics: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    id: String,
    title: String,
    icon: String,
    description: String,
    #[serde(default)]
    renderer: RendererKind,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawItem {
    Label(String),
    Titled {
        title: String,
        #[serde(default)]
        sub: Option<Vec<String>>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl RawItem {
    /// `sub` takes precedence over `text` when an entry carries both.
    fn into_item(self, topic: &str, index: usize) -> Result<DisplayItem> {
        match self {
            RawItem::Label(label) => Ok(DisplayItem::plain(label)),
            RawItem::Titled {
                title,
                sub: Some(entries),
                text,
            } => {
                if text.is_some() {
                    tracing::warn!(
                        topic,
                        index,
                        "item has both `sub` and `text`; rendering `sub`"
                    );
                }
                Ok(DisplayItem::group(title, entries))
            }
            RawItem::Titled {
                title,
                sub: None,
                text: Some(text),
            } => Ok(DisplayItem::paragraph(title, text)),
            RawItem::Titled {
                sub: None,
                text: None,
                ..
            } => Err(ContentError::MalformedItem {
                topic: topic.to_string(),
                index,
                reason: "titled item has neither `sub` nor `text`",
            }),
        }
    }
}

impl RawTopic {
    fn into_topic(self) -> Result<Topic> {
        let RawTopic {
            id,
            title,
            icon,
            description,
            renderer,
            items,
        } = self;
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_item(&id, index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Topic::new(id, title, icon, description)
            .with_items(items)
            .with_renderer(renderer))
    }
}

/// Parse and validate a content document.
pub fn load_str(source: &str) -> Result<ContentModel> {
    let raw: RawDocument = toml::from_str(source)?;
    let topics = raw
        .topics
        .into_iter()
        .map(RawTopic::into_topic)
        .collect::<Result<Vec<_>>>()?;
    ContentModel::new(raw.page, raw.central, topics)
}
