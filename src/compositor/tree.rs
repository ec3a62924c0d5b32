//! Tree state and recursive walks.
//!
//! [`Tree`] is everything guarded by the compositor's tree lock: the
//! top-level widget list, the status bar slot, the focus and capture
//! pointers, the observer list and the frame buffer. Its methods assume
//! the lock is held and never touch it themselves.

use crate::buffer::Buffer;
use crate::damage::Invalidator;
use crate::input::MouseButtons;
use crate::layout::Rect;
use crate::widget::{is_active_modal, reports_focus, z_index_of, Widget, WidgetId};
use std::ops::ControlFlow;

/// Pre-order walk over `widget` and all its descendants.
pub fn walk(widget: &dyn Widget, visit: &mut dyn FnMut(&dyn Widget) -> ControlFlow<()>) -> ControlFlow<()> {
    visit(widget)?;
    if let Some(container) = widget.as_container() {
        container.visit_children(&mut |child| walk(child, &mut *visit))?;
    }
    ControlFlow::Continue(())
}

/// Mutable pre-order walk over `widget` and all its descendants.
pub fn walk_mut(
    widget: &mut dyn Widget,
    visit: &mut dyn FnMut(&mut dyn Widget) -> ControlFlow<()>,
) -> ControlFlow<()> {
    visit(&mut *widget)?;
    if let Some(container) = widget.as_container_mut() {
        container.visit_children_mut(&mut |child| walk_mut(child, &mut *visit))?;
    }
    ControlFlow::Continue(())
}

/// Whether `id` is `widget` itself or one of its descendants.
pub fn subtree_contains(widget: &dyn Widget, id: WidgetId) -> bool {
    walk(widget, &mut |w| {
        if w.id() == id {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

/// The leaf-most widget under `widget` that reports itself focused.
///
/// Children are searched before their parent, depth first.
pub fn deepest_focused_in(widget: &dyn Widget) -> Option<WidgetId> {
    let mut found = None;
    if let Some(container) = widget.as_container() {
        let _ = container.visit_children(&mut |child| match deepest_focused_in(child) {
            Some(id) => {
                found = Some(id);
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        });
    }
    found.or_else(|| reports_focus(widget).then_some(widget.id()))
}

/// Hand `invalidator` to every invalidation-aware widget in the subtree.
pub fn propagate_invalidator(widget: &mut dyn Widget, invalidator: &Invalidator) {
    let _ = walk_mut(widget, &mut |w| {
        if let Some(aware) = w.as_invalidation_aware_mut() {
            aware.set_invalidator(invalidator.clone());
        }
        ControlFlow::Continue(())
    });
}

/// State guarded by the tree lock.
pub struct Tree {
    /// Top-level widgets in insertion order.
    pub widgets: Vec<Box<dyn Widget>>,
    /// Fixed bottom overlay, outside the top-level list.
    pub status: Option<Box<dyn Widget>>,
    /// Whether the status bar is drawn and reserves its strip.
    pub status_visible: bool,
    /// Rows reserved for the status bar.
    pub status_height: u16,
    /// The widget that fills the content area.
    pub root: Option<WidgetId>,
    /// Focus pointer.
    pub focus: Option<WidgetId>,
    /// Mouse capture pointer.
    pub capture: Option<WidgetId>,
    /// Buttons held at the previous mouse event.
    pub last_buttons: MouseButtons,
    /// Focus observers, de-duplicated.
    pub observers: Vec<WidgetId>,
    /// Frame buffer, rebuilt lazily after a resize.
    pub frame: Option<Buffer>,
    /// Surface width.
    pub width: u16,
    /// Surface height.
    pub height: u16,
}

impl Tree {
    /// An empty tree for a surface of the given size.
    pub fn new(width: u16, height: u16, status_height: u16) -> Self {
        Self {
            widgets: Vec::new(),
            status: None,
            status_visible: true,
            status_height,
            root: None,
            focus: None,
            capture: None,
            last_buttons: MouseButtons::empty(),
            observers: Vec::new(),
            frame: None,
            width,
            height,
        }
    }

    /// Top-level widgets followed by the status bar.
    pub fn roots(&self) -> impl Iterator<Item = &(dyn Widget + 'static)> {
        self.widgets.iter().map(|w| &**w).chain(self.status.as_deref())
    }

    /// Mutable top-level widgets followed by the status bar.
    pub fn roots_mut(&mut self) -> impl Iterator<Item = &mut (dyn Widget + 'static)> {
        self.widgets.iter_mut().map(|w| &mut **w).chain(self.status.as_deref_mut())
    }

    /// Run `f` on the widget with `id`, wherever it sits in the tree.
    pub fn with_widget<R>(&self, id: WidgetId, f: impl FnOnce(&dyn Widget) -> R) -> Option<R> {
        let mut f = Some(f);
        let mut out = None;
        for root in self.roots() {
            let flow = walk(root, &mut |w| {
                if w.id() != id {
                    return ControlFlow::Continue(());
                }
                if let Some(f) = f.take() {
                    out = Some(f(w));
                }
                ControlFlow::Break(())
            });
            if flow.is_break() {
                break;
            }
        }
        out
    }

    /// Run `f` on the widget with `id` mutably, wherever it sits in the tree.
    pub fn with_widget_mut<R>(&mut self, id: WidgetId, f: impl FnOnce(&mut dyn Widget) -> R) -> Option<R> {
        let mut f = Some(f);
        let mut out = None;
        for root in self.roots_mut() {
            let flow = walk_mut(root, &mut |w| {
                if w.id() != id {
                    return ControlFlow::Continue(());
                }
                if let Some(f) = f.take() {
                    out = Some(f(w));
                }
                ControlFlow::Break(())
            });
            if flow.is_break() {
                break;
            }
        }
        out
    }

    /// Whether `id` is anywhere in the tree.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.with_widget(id, |_| ()).is_some()
    }

    /// Index of the top-level widget whose subtree holds `id`.
    pub fn top_level_index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| subtree_contains(w.as_ref(), id))
    }

    /// Deepest focused widget across the top-level list.
    pub fn deepest_focused(&self) -> Option<WidgetId> {
        self.widgets.iter().find_map(|w| deepest_focused_in(w.as_ref()))
    }

    /// Top-level indices in ascending z order, insertion order within a z.
    pub fn z_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.widgets.len()).collect();
        order.sort_by_key(|&i| z_index_of(self.widgets[i].as_ref()));
        order
    }

    /// The top-level widget hit first at (x, y): highest z, and among
    /// equal z the one drawn last.
    pub fn topmost_at(&self, x: i32, y: i32) -> Option<usize> {
        self.z_order().into_iter().rev().find(|&i| self.widgets[i].hit_test(x, y))
    }

    /// Deep hit resolution below the top-level widget at `index`.
    pub fn resolve_hit(&self, index: usize, x: i32, y: i32) -> WidgetId {
        let widget = self.widgets[index].as_ref();
        widget
            .as_hit_tester()
            .and_then(|tester| tester.widget_at(x, y))
            .unwrap_or_else(|| widget.id())
    }

    /// The outermost active modal whose subtree holds `id`, if any.
    pub fn modal_scope_of(&self, id: WidgetId) -> Option<WidgetId> {
        let index = self.top_level_index_of(id)?;
        let mut scope = None;
        let _ = walk(self.widgets[index].as_ref(), &mut |w| {
            if is_active_modal(w) && subtree_contains(w, id) {
                scope = Some(w.id());
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        scope
    }

    /// Rows taken by the status bar right now.
    pub fn status_rows(&self) -> u16 {
        if self.status.is_some() && self.status_visible {
            self.status_height.min(self.height)
        } else {
            0
        }
    }

    /// The surface minus the status strip.
    pub fn content_area(&self) -> Rect {
        Rect::from_size(self.width, self.height - self.status_rows())
    }

    /// The reserved bottom strip.
    pub fn status_area(&self) -> Rect {
        let rows = self.status_rows();
        Rect::new(0, i32::from(self.height - rows), i32::from(self.width), i32::from(rows))
    }

    /// Fit the root to the content area and the status bar to its strip.
    pub fn relayout(&mut self) {
        let content = self.content_area();
        let strip = self.status_area();
        if let Some(root) = self.root {
            if let Some(widget) = self.widgets.iter_mut().find(|w| w.id() == root) {
                widget.set_bounds(content);
            }
        }
        if let Some(status) = self.status.as_deref_mut() {
            status.set_bounds(strip);
        }
    }

    /// Drop every pointer into the subtree of a widget about to leave.
    pub fn forget_subtree(&mut self, widget: &dyn Widget) {
        let gone = |id: Option<WidgetId>| id.is_some_and(|id| subtree_contains(widget, id));
        if gone(self.focus) {
            self.focus = None;
        }
        if gone(self.capture) {
            // Held buttons stay tracked so the rest of the gesture is not
            // mistaken for a fresh press.
            self.capture = None;
        }
        if gone(self.root) {
            self.root = None;
        }
        self.observers.retain(|&id| !subtree_contains(widget, id));
    }
}
