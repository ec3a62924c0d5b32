//! Status Bar Widget: three-section bar that also shows key hints.
//!
//! Meant for the compositor's fixed bottom slot. Registered as a focus
//! observer, it replaces its center section with the hints of whatever
//! widget holds focus.

use crate::buffer::{Rgb, Style};
use crate::damage::Invalidator;
use crate::input::KeyEvent;
use crate::layout::Rect;
use crate::painter::Painter;
use crate::widget::{FocusObserver, InvalidationAware, KeyHint, Widget, WidgetId};
use unicode_width::UnicodeWidthStr;

/// Configuration for the status bar widget.
#[derive(Debug, Clone)]
pub struct StatusBarConfig {
    /// Bar background and left section style.
    pub style: Style,
    /// Key hints and center section style.
    pub center_style: Style,
    /// Right section style.
    pub right_style: Style,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        let style = Style::new(Rgb::WHITE, Rgb::new(40, 40, 40));
        Self {
            style,
            center_style: style.fg(Rgb::new(150, 150, 150)),
            right_style: style.fg(Rgb::new(100, 200, 100)),
        }
    }
}

/// A three-section status bar (left, center, right).
#[derive(Debug)]
pub struct StatusBar {
    id: WidgetId,
    left: String,
    center: String,
    right: String,
    hints: Vec<KeyHint>,
    bounds: Rect,
    config: StatusBarConfig,
    invalidator: Option<Invalidator>,
}

impl StatusBar {
    /// Create an empty status bar. The compositor sizes it when installed.
    pub fn new() -> Self {
        Self::with_config(StatusBarConfig::default())
    }

    /// Create an empty status bar with custom configuration.
    pub fn with_config(config: StatusBarConfig) -> Self {
        Self {
            id: WidgetId::next(),
            left: String::new(),
            center: String::new(),
            right: String::new(),
            hints: Vec::new(),
            bounds: Rect::ZERO,
            config,
            invalidator: None,
        }
    }

    fn invalidate(&self) {
        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate(self.bounds);
        }
    }

    /// Set the left section content.
    pub fn set_left(&mut self, text: impl Into<String>) {
        self.left = text.into();
        self.invalidate();
    }

    /// Set the center section content, shown when no hints are active.
    pub fn set_center(&mut self, text: impl Into<String>) {
        self.center = text.into();
        self.invalidate();
    }

    /// Set the right section content.
    pub fn set_right(&mut self, text: impl Into<String>) {
        self.right = text.into();
        self.invalidate();
    }

    /// Get the left section content.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Get the center section content.
    pub fn center(&self) -> &str {
        &self.center
    }

    /// Get the right section content.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// The hints currently displayed.
    pub fn hints(&self) -> &[KeyHint] {
        &self.hints
    }

    /// What the center section shows: hints if any, else the center text.
    fn center_text(&self) -> String {
        if self.hints.is_empty() {
            return self.center.clone();
        }
        self.hints
            .iter()
            .map(|hint| format!("{} {}", hint.key, hint.label))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.invalidate();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        let Rect { x, y, width, .. } = self.bounds;
        painter.fill(self.bounds, ' ', self.config.style);

        painter.clipped(self.bounds, |painter| {
            painter.draw_text(x, y, &self.left, self.config.style);

            let right_width = i32::try_from(self.right.width()).unwrap_or(i32::MAX);
            painter.draw_text(x + width - right_width, y, &self.right, self.config.right_style);

            let center = self.center_text();
            let center_width = i32::try_from(center.width()).unwrap_or(i32::MAX);
            painter.draw_text(x + (width - center_width).max(0) / 2, y, &center, self.config.center_style);
        });
    }

    fn handle_key(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    fn focusable(&self) -> bool {
        false
    }

    fn as_invalidation_aware_mut(&mut self) -> Option<&mut dyn InvalidationAware> {
        Some(self)
    }

    fn as_focus_observer_mut(&mut self) -> Option<&mut dyn FocusObserver> {
        Some(self)
    }
}

impl InvalidationAware for StatusBar {
    fn set_invalidator(&mut self, invalidator: Invalidator) {
        self.invalidator = Some(invalidator);
    }
}

impl FocusObserver for StatusBar {
    fn focus_changed(&mut self, _focused: Option<WidgetId>, hints: &[KeyHint]) {
        if self.hints != hints {
            self.hints = hints.to_vec();
            self.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    #[test]
    fn test_status_bar_sections() {
        let mut bar = StatusBar::new();
        bar.set_bounds(Rect::new(0, 0, 20, 1));
        bar.set_left("L");
        bar.set_center("mid");
        bar.set_right("R");

        let mut buffer = Buffer::new(20, 1);
        bar.draw(&mut Painter::new(&mut buffer));
        assert_eq!(buffer.row_text(0), "L       mid        R");
    }

    #[test]
    fn test_hints_replace_center() {
        let mut bar = StatusBar::new();
        bar.set_bounds(Rect::new(0, 0, 20, 1));
        bar.set_center("idle");
        bar.focus_changed(None, &[KeyHint::new("Tab", "next")]);
        assert_eq!(bar.center_text(), "Tab next");

        bar.focus_changed(None, &[]);
        assert_eq!(bar.center_text(), "idle");
    }

    #[test]
    fn test_draw_stays_inside_bounds() {
        let mut bar = StatusBar::new();
        bar.set_bounds(Rect::new(0, 1, 4, 1));
        bar.set_left("a very long left section");
        let mut buffer = Buffer::new(4, 2);
        bar.draw(&mut Painter::new(&mut buffer));
        assert_eq!(buffer.row_text(0), "    ");
        assert_eq!(buffer.row_text(1), "a ve");
    }
}
