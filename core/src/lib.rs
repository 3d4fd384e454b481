//! Root of the `pmmap-core` library.
//!
//! Holds the project-management content tree and the engine that turns a
//! topic into a detail body: the generic item renderer, the special-case
//! renderers (role matrix, cause/effect diagram, quality chart) and the
//! panel controller that owns the open/closed state and the live chart
//! handle. Nothing here knows about terminals; `pmmap-tui` draws the
//! fragments produced by this crate.

// Library code reports through `tracing`; user-visible output belongs to
// the front end.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod chart;
pub mod config;
pub mod content;
pub mod error;
pub mod fragment;
pub mod grid;
pub mod item_renderer;
pub mod panel;
pub mod special;

pub use chart::ChartBackend;
pub use chart::ChartHandle;
pub use chart::ChartMount;
pub use chart::ChartSpec;
pub use content::CentralTopic;
pub use content::ContentModel;
pub use content::DisplayItem;
pub use content::RendererKind;
pub use content::Topic;
pub use content::TopicId;
pub use error::ChartError;
pub use error::ContentError;
pub use fragment::DetailBody;
pub use fragment::Fragment;
pub use grid::GridController;
pub use grid::GridNode;
pub use panel::PanelController;
pub use panel::PanelState;
pub use panel::PanelVisual;

/// pmmap-core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
