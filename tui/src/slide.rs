//! Frame-stepped slide animation for the detail panel.

/// Frames for a full slide in or out; about 300ms at the 16ms tick.
pub(crate) const SLIDE_FRAMES: u16 = 18;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Slide {
    frame: u16,
    open: bool,
}

impl Slide {
    pub(crate) fn open(&mut self) {
        self.open = true;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    /// Skip straight to fully open.
    pub(crate) fn jump_open(&mut self) {
        self.open = true;
        self.frame = SLIDE_FRAMES;
    }

    /// Advance one frame toward the target. Returns true while moving.
    pub(crate) fn tick(&mut self) -> bool {
        if self.open && self.frame < SLIDE_FRAMES {
            self.frame += 1;
        } else if !self.open && self.frame > 0 {
            self.frame -= 1;
        }
        self.is_animating()
    }

    pub(crate) fn is_animating(&self) -> bool {
        if self.open {
            self.frame < SLIDE_FRAMES
        } else {
            self.frame > 0
        }
    }

    /// True while any part of the panel is on screen.
    pub(crate) fn is_visible(&self) -> bool {
        self.open || self.frame > 0
    }

    /// Share of the panel width on screen, eased in and out.
    pub(crate) fn visible_fraction(&self) -> f64 {
        let t = f64::from(self.frame) / f64::from(SLIDE_FRAMES);
        if t < 0.5 {
            2.0 * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
        }
    }
}
