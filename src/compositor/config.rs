//! Compositor configuration.

use crate::buffer::Style;

/// Configuration for the [`Compositor`](super::Compositor).
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Style used to clear the surface before widgets draw.
    pub background: Style,
    /// Rows reserved at the bottom for the status bar.
    pub status_bar_height: u16,
    /// Whether a handled Enter moves focus to the next stop.
    pub auto_advance_on_enter: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            background: Style::DEFAULT,
            status_bar_height: 1,
            auto_advance_on_enter: true,
        }
    }
}
