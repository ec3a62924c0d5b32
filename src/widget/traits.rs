//! The widget contract and its optional capabilities.
//!
//! Every widget implements [`Widget`]. Optional behaviour is exposed as
//! small capability traits that the compositor discovers structurally
//! through the `as_*` accessors: a widget opts in by implementing the
//! capability trait and returning `Some(self)` from the accessor.
//!
//! ```rust,ignore
//! impl Widget for Panel {
//!     // ...
//!     fn as_container(&self) -> Option<&dyn ChildContainer> {
//!         Some(self)
//!     }
//! }
//! ```

use super::id::WidgetId;
use crate::damage::Invalidator;
use crate::input::{KeyEvent, MouseEvent};
use crate::layout::Rect;
use crate::painter::{Edges, Painter};
use std::ops::ControlFlow;

/// The base contract every widget implements.
pub trait Widget: Send {
    /// Stable identity used by focus, capture and observer references.
    fn id(&self) -> WidgetId;

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect;

    /// Set the bounds of this widget.
    fn set_bounds(&mut self, bounds: Rect);

    /// Move the widget without changing its size.
    fn set_position(&mut self, x: i32, y: i32) {
        let bounds = self.bounds().with_position(x, y);
        self.set_bounds(bounds);
    }

    /// Resize the widget in place. Negative dimensions clamp to zero.
    fn resize(&mut self, width: i32, height: i32) {
        let bounds = self.bounds().with_size(width, height);
        self.set_bounds(bounds);
    }

    /// Draw through the painter. The painter's clip is the only bounds
    /// enforcement; widgets draw at absolute surface coordinates.
    fn draw(&self, painter: &mut Painter<'_>);

    /// Handle a key press. Returns `true` if the key was consumed.
    fn handle_key(&mut self, key: &KeyEvent) -> bool;

    /// Whether the widget can take keyboard focus.
    fn focusable(&self) -> bool;

    /// Called when the widget becomes the focus holder.
    fn focus(&mut self) {}

    /// Called when the widget stops being the focus holder.
    fn blur(&mut self) {}

    /// Default hit test: the point lies inside the bounds.
    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.bounds().contains(x, y)
    }

    /// Children, for recursive walks.
    fn as_container(&self) -> Option<&dyn ChildContainer> {
        None
    }

    /// Mutable children, for recursive walks.
    fn as_container_mut(&mut self) -> Option<&mut dyn ChildContainer> {
        None
    }

    /// Deep hit resolution.
    fn as_hit_tester(&self) -> Option<&dyn HitTester> {
        None
    }

    /// Opt-in mouse handling.
    fn as_mouse_aware_mut(&mut self) -> Option<&mut dyn MouseAware> {
        None
    }

    /// Read-only view of the internal tab order.
    fn as_focus_cycler(&self) -> Option<&dyn FocusCycler> {
        None
    }

    /// Internal tab order.
    fn as_focus_cycler_mut(&mut self) -> Option<&mut dyn FocusCycler> {
        None
    }

    /// Exclusive-input overlay state.
    fn as_modal(&self) -> Option<&dyn Modal> {
        None
    }

    /// Exclusive-input overlay control.
    fn as_modal_mut(&mut self) -> Option<&mut dyn Modal> {
        None
    }

    /// Receives the damage-reporting handle.
    fn as_invalidation_aware_mut(&mut self) -> Option<&mut dyn InvalidationAware> {
        None
    }

    /// Draw and hit-test order override.
    fn as_z_indexer(&self) -> Option<&dyn ZIndexer> {
        None
    }

    /// Focus introspection.
    fn as_focus_state(&self) -> Option<&dyn FocusState> {
        None
    }

    /// Key hints for status/help display.
    fn as_key_hints(&self) -> Option<&dyn KeyHintsProvider> {
        None
    }

    /// Border-suppression hints for adjacent children.
    fn as_neighbor_layout(&self) -> Option<&dyn NeighborLayout> {
        None
    }

    /// Enter inserts a newline rather than advancing focus.
    fn as_multi_line(&self) -> Option<&dyn MultiLine> {
        None
    }

    /// Vetoes focus auto-advance.
    fn as_cycle_blocker(&self) -> Option<&dyn CycleBlocker> {
        None
    }

    /// Notified when the focus pointer changes.
    fn as_focus_observer_mut(&mut self) -> Option<&mut dyn FocusObserver> {
        None
    }
}

/// A widget that owns children.
///
/// Visitors return [`ControlFlow::Break`] to stop the walk early; the
/// container must stop visiting and propagate the break.
pub trait ChildContainer {
    /// Visit each direct child in order.
    fn visit_children(&self, visit: &mut dyn FnMut(&dyn Widget) -> ControlFlow<()>) -> ControlFlow<()>;

    /// Visit each direct child mutably in order.
    fn visit_children_mut(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Widget) -> ControlFlow<()>,
    ) -> ControlFlow<()>;
}

/// Deep hit resolution, bypassing the default bounding-box test.
pub trait HitTester {
    /// The deepest widget at (x, y), possibly the widget itself.
    fn widget_at(&self, x: i32, y: i32) -> Option<WidgetId>;
}

/// Opt-in mouse handling.
pub trait MouseAware {
    /// Handle a mouse event. Returns `true` if consumed.
    fn handle_mouse(&mut self, event: &MouseEvent) -> bool;
}

/// A widget with its own internal tab order.
pub trait FocusCycler {
    /// Move focus to the next (or previous) internal stop.
    ///
    /// Returns `false` at either end of the order, without wrapping, so the
    /// caller can continue cycling outward.
    fn cycle_focus(&mut self, forward: bool) -> bool;

    /// Focus has just arrived from outside: land on the first internal stop
    /// (or the last when moving backward). Returns `true` if a stop took focus.
    fn enter_focus(&mut self, forward: bool) -> bool {
        let _ = forward;
        false
    }

    /// Whether focus must stay inside this widget when cycling hits an end.
    fn traps_focus(&self) -> bool {
        false
    }
}

/// Exclusive-input overlay behaviour.
pub trait Modal {
    /// Whether the widget currently acts as a modal.
    fn is_modal(&self) -> bool;

    /// Close the overlay; afterwards `is_modal` should report `false`.
    fn dismiss_modal(&mut self);
}

/// Receives the damage-reporting handle when added to a compositor.
pub trait InvalidationAware {
    /// Store the handle; call [`Invalidator::invalidate`] on every mutation
    /// that changes what the widget draws.
    fn set_invalidator(&mut self, invalidator: Invalidator);
}

/// Draw/hit order override.
pub trait ZIndexer {
    /// Higher draws later and is hit first. Widgets without this are at 0.
    fn z_index(&self) -> i32;
}

/// Focus introspection.
pub trait FocusState {
    /// Whether this widget currently holds keyboard focus.
    fn is_focused(&self) -> bool;
}

/// A key binding advertised for external display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key, as shown to the user (e.g. `"Enter"`).
    pub key: String,
    /// What it does.
    pub label: String,
}

impl KeyHint {
    /// Create a key hint.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }
}

/// Advertises key bindings while focused.
pub trait KeyHintsProvider {
    /// Current bindings.
    fn key_hints(&self) -> Vec<KeyHint>;
}

/// A container that knows which sides of a child border a sibling.
pub trait NeighborLayout {
    /// Edges of `child` shared with an adjacent sibling.
    fn neighbors(&self, child: WidgetId) -> Edges;
}

/// Marks widgets whose Enter key is content, not navigation.
pub trait MultiLine {
    /// Whether the widget currently edits multiple lines.
    fn is_multiline(&self) -> bool;
}

/// Lets a widget veto focus auto-advance, e.g. while its input is invalid.
pub trait CycleBlocker {
    /// Whether focus must not advance away on Enter.
    fn blocks_cycling(&self) -> bool;
}

/// Notified synchronously whenever the focus pointer changes.
pub trait FocusObserver {
    /// `focused` is the new holder (if any) and `hints` its key hints.
    fn focus_changed(&mut self, focused: Option<WidgetId>, hints: &[KeyHint]);
}

/// Z-index of any widget, 0 when it does not override it.
pub fn z_index_of(widget: &dyn Widget) -> i32 {
    widget.as_z_indexer().map_or(0, |z| z.z_index())
}

/// Whether the widget is currently an active modal.
pub fn is_active_modal(widget: &dyn Widget) -> bool {
    widget.as_modal().is_some_and(|m| m.is_modal())
}

/// Whether the widget reports itself focused.
pub fn reports_focus(widget: &dyn Widget) -> bool {
    widget.as_focus_state().is_some_and(|f| f.is_focused())
}
