//! Seam to the external chart renderer.
//!
//! The panel controller only knows a [`ChartBackend`] that turns a
//! [`ChartSpec`] into an opaque [`ChartHandle`]. Handles are consumed by
//! [`ChartHandle::dispose`], so a chart can be released at most once.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::Serializer;

use crate::error::ChartError;

/// Name of the slot a chart is mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChartMount(String);

impl ChartMount {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Proportional ring chart.
    Doughnut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a tooltip callback sees for the hovered wedge.
#[derive(Debug, Clone, Copy)]
pub struct TooltipContext<'a> {
    pub label: &'a str,
    pub value: f64,
    pub dataset_label: &'a str,
}

pub type TooltipLabelFn = fn(&TooltipContext<'_>) -> String;

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub title_font_size: u16,
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Rgb>,
    pub border_color: Rgb,
    pub border_width: u16,
    pub legend: LegendPosition,
    #[serde(skip)]
    pub tooltip_label: TooltipLabelFn,
}

impl ChartSpec {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.labels.len() != self.values.len() {
            return Err(ChartError::LengthMismatch {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }

    /// Fraction of the whole taken by each value. Zero totals yield zeros.
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        if total <= 0.0 {
            return vec![0.0; self.values.len()];
        }
        self.values.iter().map(|v| v / total).collect()
    }

    /// Tooltip text for wedge `index`, through the configured override.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let label = self.labels.get(index)?;
        let value = self.values.get(index).copied().unwrap_or_default();
        Some((self.tooltip_label)(&TooltipContext {
            label,
            value,
            dataset_label: &self.dataset_label,
        }))
    }

    pub fn color(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return Rgb::WHITE;
        }
        self.colors[index % self.colors.len()]
    }
}

/// A live chart. Disposing releases whatever the backend holds for it.
pub trait ChartHandle {
    fn dispose(self);
}

pub trait ChartBackend {
    type Handle: ChartHandle;

    fn create(&mut self, mount: &ChartMount, spec: &ChartSpec) -> Result<Self::Handle, ChartError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ChartEvent {
    Created {
        id: u64,
        mount: ChartMount,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Disposed {
        id: u64,
    },
}

#[derive(Debug, Default)]
struct Recording {
    next_id: u64,
    live: usize,
    events: Vec<ChartEvent>,
    fail_with: Option<String>,
}

/// Backend that draws nothing and records every create/dispose call.
///
/// Used for headless rendering and for checking handle lifetimes.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every `create` fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.inner.borrow_mut().fail_with = Some(reason.into());
        backend
    }

    /// Charts created and not yet disposed.
    pub fn live(&self) -> usize {
        self.inner.borrow().live
    }

    pub fn events(&self) -> Vec<ChartEvent> {
        self.inner.borrow().events.clone()
    }
}

#[derive(Debug)]
pub struct RecordedChart {
    id: u64,
    inner: Rc<RefCell<Recording>>,
}

impl RecordedChart {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl ChartHandle for RecordedChart {
    fn dispose(self) {
        let mut rec = self.inner.borrow_mut();
        rec.live = rec.live.saturating_sub(1);
        rec.events.push(ChartEvent::Disposed { id: self.id });
    }
}

impl ChartBackend for RecordingBackend {
    type Handle = RecordedChart;

    fn create(&mut self, mount: &ChartMount, spec: &ChartSpec) -> Result<RecordedChart, ChartError> {
        spec.validate()?;
        let mut rec = self.inner.borrow_mut();
        if let Some(reason) = &rec.fail_with {
            return Err(ChartError::Backend {
                mount: mount.to_string(),
                reason: reason.clone(),
            });
        }
        rec.next_id += 1;
        let id = rec.next_id;
        rec.live += 1;
        rec.events.push(ChartEvent::Created {
            id,
            mount: mount.clone(),
            labels: spec.labels.clone(),
            values: spec.values.clone(),
        });
        Ok(RecordedChart {
            id,
            inner: Rc::clone(&self.inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::special::quality_chart_spec;
    use pretty_assertions::assert_eq;

    #[test]
    fn rgb_formats_as_hex() {
        assert_eq!(Rgb(0x38, 0xbd, 0xf8).to_string(), "#38bdf8");
    }

    #[test]
    fn equal_values_give_equal_shares() {
        let spec = quality_chart_spec();
        let shares = spec.shares();
        assert_eq!(shares.len(), 3);
        for share in shares {
            assert!((share - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn mismatched_spec_is_rejected_before_creation() {
        let mut spec = quality_chart_spec();
        spec.values.pop();
        let mut backend = RecordingBackend::new();
        let err = backend
            .create(&ChartMount::new("m"), &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::LengthMismatch {
                labels: 3,
                values: 2
            }
        ));
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn recording_backend_tracks_live_handles() {
        let spec = quality_chart_spec();
        let mut backend = RecordingBackend::new();
        let a = backend.create(&ChartMount::new("m"), &spec).unwrap();
        assert_eq!(backend.live(), 1);
        let a_id = a.id();
        a.dispose();
        assert_eq!(backend.live(), 0);
        assert_eq!(
            backend.events().last(),
            Some(&ChartEvent::Disposed { id: a_id })
        );
    }
}
