//! Width negotiation for the resizable side panel.
//!
//! A resize gesture adds a live translation on top of the committed width.
//! While the gesture runs the rendered width is only kept within
//! `[MIN, MAX]`; when it ends the authoritative rule applies, which snaps an
//! under-drag back to the default width instead of to `MIN`.

/// Fixed bounds for the panel, in the front end's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLimits {
    pub min_width: f64,
    pub default_width: f64,
}

impl Default for PanelLimits {
    fn default() -> Self {
        Self {
            min_width: 24.0,
            default_width: 32.0,
        }
    }
}

/// The container the panel lives in, sampled at the moment of a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerGeometry {
    pub container_width: f64,
    pub fixed_insets: f64,
    /// Combined width of the other fixed panels (activity bar and the like).
    pub fixed_panel_widths: f64,
    /// Minimum width the sibling panel (the editor) must keep.
    pub sibling_min_width: f64,
}

impl ContainerGeometry {
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    pub fn max_width(&self) -> f64 {
        self.container_width - self.fixed_insets - self.fixed_panel_widths - self.sibling_min_width
    }
}

#[derive(Debug, Clone)]
pub struct PanelResizer {
    limits: PanelLimits,
    committed_width: f64,
    live_translation: Option<f64>,
}

impl PanelResizer {
    pub fn new(limits: PanelLimits, committed_width: f64) -> Self {
        Self {
            limits,
            committed_width,
            live_translation: None,
        }
    }

    /// Start from the default width, for a first run with nothing persisted.
    pub fn with_default_width(limits: PanelLimits) -> Self {
        Self::new(limits, limits.default_width)
    }

    pub fn limits(&self) -> PanelLimits {
        self.limits
    }

    pub fn committed_width(&self) -> f64 {
        self.committed_width
    }

    pub fn is_resizing(&self) -> bool {
        self.live_translation.is_some()
    }

    pub fn begin_gesture(&mut self) {
        if self.is_resizing() {
            tracing::debug!("resize gesture already active, restarting translation");
        }
        self.live_translation = Some(0.0);
    }

    /// Report the gesture's translation since it began. Ignored when no
    /// gesture is active.
    pub fn update_gesture(&mut self, translation: f64) {
        if let Some(live) = self.live_translation.as_mut() {
            *live = translation;
        }
    }

    /// Width to draw right now.
    pub fn live_width(&self, geometry: &ContainerGeometry) -> f64 {
        let raw = self.committed_width + self.live_translation.unwrap_or(0.0);
        raw.max(self.limits.min_width).min(geometry.max_width())
    }

    /// Finish the gesture and commit. Returns the new committed width, or
    /// `None` when no gesture was active.
    pub fn end_gesture(&mut self, geometry: &ContainerGeometry) -> Option<f64> {
        let translation = self.live_translation.take()?;
        let width = self.propose_width(self.committed_width + translation, geometry);
        tracing::info!(
            from = self.committed_width,
            to = width,
            max = geometry.max_width(),
            "panel width committed"
        );
        self.committed_width = width;
        Some(width)
    }

    /// Drop the gesture without committing.
    pub fn cancel_gesture(&mut self) {
        self.live_translation = None;
    }

    /// Authoritative clamp for a raw width. `MAX` is taken from `geometry`
    /// on every call.
    pub fn propose_width(&self, raw: f64, geometry: &ContainerGeometry) -> f64 {
        let max = geometry.max_width();
        if raw.is_nan() || raw < self.limits.min_width {
            self.limits.default_width.min(max)
        } else if raw > max {
            max
        } else {
            raw
        }
    }
}
