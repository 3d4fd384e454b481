//! Detail panel state machine.
//!
//! The panel is either `Closed` or `Open(topic)`. All mutation goes
//! through [`PanelController::show`] and [`PanelController::close`], which
//! also own the lifetime of the one chart handle the panel may hold: any
//! held handle is disposed before a new body is rendered, when the panel
//! closes, and when the controller is dropped.

use serde::Serialize;

use crate::chart::ChartBackend;
use crate::chart::ChartHandle;
use crate::chart::ChartMount;
use crate::content::RendererKind;
use crate::content::Topic;
use crate::content::TopicId;
use crate::error::ChartError;
use crate::fragment::DetailBody;
use crate::fragment::Fragment;
use crate::item_renderer::render_items;
use crate::special::QUALITY_CHART_MOUNT;
use crate::special::cause_effect_diagram;
use crate::special::quality_chart_spec;
use crate::special::role_matrix;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open(TopicId),
}

/// The visual transform applied to the screen for each panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelVisual {
    /// Panel slid into view.
    pub panel_shown: bool,
    /// Dimming overlay over the grid.
    pub overlay_visible: bool,
    /// Grid does not scroll while the panel is up.
    pub background_scroll_locked: bool,
}

impl PanelVisual {
    pub const CLOSED: PanelVisual = PanelVisual {
        panel_shown: false,
        overlay_visible: false,
        background_scroll_locked: false,
    };

    pub const OPEN: PanelVisual = PanelVisual {
        panel_shown: true,
        overlay_visible: true,
        background_scroll_locked: true,
    };
}

/// Result of rendering one topic: the body plus the chart it asked for.
pub struct RenderedDetail<H> {
    pub body: DetailBody,
    /// `Ok(None)` when the topic has no chart.
    pub chart: Result<Option<H>, ChartError>,
}

/// Render the detail body for `topic`, creating its chart if it has one.
///
/// When chart creation fails the body keeps the generic items and has no
/// chart fragment.
pub fn render_detail<B: ChartBackend>(topic: &Topic, backend: &mut B) -> RenderedDetail<B::Handle> {
    let mut fragments = match topic.renderer() {
        RendererKind::RoleMatrix => vec![Fragment::RoleMatrix(role_matrix())],
        RendererKind::CauseEffect => {
            vec![Fragment::CauseEffect(cause_effect_diagram(
                topic.description(),
            ))]
        }
        RendererKind::Generic | RendererKind::GenericPlusChart => render_items(topic.items()),
    };

    let chart = if topic.renderer() == RendererKind::GenericPlusChart {
        let mount = ChartMount::new(QUALITY_CHART_MOUNT);
        match backend.create(&mount, &quality_chart_spec()) {
            Ok(handle) => {
                fragments.push(Fragment::Chart { mount });
                Ok(Some(handle))
            }
            Err(err) => Err(err),
        }
    } else {
        Ok(None)
    };

    RenderedDetail {
        body: DetailBody {
            icon: topic.icon().to_string(),
            title: topic.title().to_string(),
            description: topic.description().to_string(),
            fragments,
        },
        chart,
    }
}

pub struct PanelController<B: ChartBackend> {
    backend: B,
    state: PanelState,
    mounted: Option<DetailBody>,
    chart: Option<B::Handle>,
    visual: PanelVisual,
}

impl<B: ChartBackend> PanelController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PanelState::Closed,
            mounted: None,
            chart: None,
            visual: PanelVisual::CLOSED,
        }
    }

    /// Open the panel on `topic`, replacing whatever was shown.
    ///
    /// The panel ends up open even when the chart backend fails; the error
    /// is returned after the generic content is mounted.
    pub fn show(&mut self, topic: &Topic) -> Result<(), ChartError> {
        self.release_chart();

        let RenderedDetail { body, chart } = render_detail(topic, &mut self.backend);
        self.mounted = Some(body);

        let outcome = match chart {
            Ok(handle) => {
                self.chart = handle;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(topic = %topic.id(), "chart not rendered: {err}");
                Err(err)
            }
        };

        self.state = PanelState::Open(topic.id().clone());
        self.visual = PanelVisual::OPEN;
        tracing::info!(topic = %topic.id(), chart = self.chart.is_some(), "panel opened");
        outcome
    }

    /// Close the panel. Returns false when it was already closed.
    pub fn close(&mut self) -> bool {
        let PanelState::Open(topic) = std::mem::take(&mut self.state) else {
            return false;
        };
        self.visual = PanelVisual::CLOSED;
        self.release_chart();
        tracing::info!(topic = %topic, "panel closed");
        true
    }

    fn release_chart(&mut self) {
        if let Some(handle) = self.chart.take() {
            tracing::debug!("disposing chart");
            handle.dispose();
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    pub fn current_topic(&self) -> Option<&TopicId> {
        match &self.state {
            PanelState::Open(id) => Some(id),
            PanelState::Closed => None,
        }
    }

    /// The last mounted body. It stays mounted after `close` so a front end
    /// can animate the panel out.
    pub fn body(&self) -> Option<&DetailBody> {
        self.mounted.as_ref()
    }

    pub fn visual(&self) -> PanelVisual {
        self.visual
    }

    pub fn has_live_chart(&self) -> bool {
        self.chart.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for PanelController<B> {
    fn drop(&mut self) {
        self.release_chart();
    }
}
