//! The node grid: one centerpiece plus one activatable node per topic.

use serde::Serialize;

use crate::chart::ChartBackend;
use crate::content::CentralStyle;
use crate::content::ContentModel;
use crate::content::TopicId;
use crate::error::ChartError;
use crate::panel::PanelController;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GridNode {
    /// Non-interactive root of the map.
    Central {
        title: String,
        icon: String,
        style: CentralStyle,
    },
    Topic {
        id: TopicId,
        title: String,
        icon: String,
    },
}

impl GridNode {
    pub fn topic_id(&self) -> Option<&TopicId> {
        match self {
            GridNode::Topic { id, .. } => Some(id),
            GridNode::Central { .. } => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.topic_id().is_some()
    }
}

pub struct GridController {
    model: ContentModel,
}

impl GridController {
    pub fn new(model: ContentModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ContentModel {
        &self.model
    }

    /// The centerpiece followed by the topics in content order.
    pub fn build_grid(&self) -> Vec<GridNode> {
        let central = self.model.central();
        std::iter::once(GridNode::Central {
            title: central.title.clone(),
            icon: central.icon.clone(),
            style: central.style,
        })
        .chain(self.model.topics().iter().map(|topic| GridNode::Topic {
            id: topic.id().clone(),
            title: topic.title().to_string(),
            icon: topic.icon().to_string(),
        }))
        .collect()
    }

    /// Resolve an activated node and open the panel on it.
    ///
    /// Returns `Ok(false)` when `id` names no topic; nothing changes then.
    pub fn on_node_activated<B: ChartBackend>(
        &self,
        id: &str,
        panel: &mut PanelController<B>,
    ) -> Result<bool, ChartError> {
        let Some(topic) = self.model.topic(id) else {
            tracing::debug!(id, "activation for unknown topic ignored");
            return Ok(false);
        };
        panel.show(topic)?;
        Ok(true)
    }
}
