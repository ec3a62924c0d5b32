//! The compositor: widget tree, focus, dispatch and rendering.
//!
//! A [`Compositor`] owns the widget tree behind one lock (the tree scope)
//! and the [`DamageTracker`] behind another (the damage scope). Methods
//! take `&self`, so a compositor can be shared through an `Arc` between an
//! input thread and a redraw thread.
//!
//! The damage scope may be taken while the tree scope is held, never the
//! other way round. Widgets report damage through their [`Invalidator`],
//! which only touches the damage scope.
//!
//! # Example
//!
//! ```rust,ignore
//! use weave::{Compositor, CompositorConfig};
//! use weave::widgets::TextInput;
//!
//! let compositor = Compositor::new(80, 24, CompositorConfig::default());
//! let input = compositor.add(TextInput::new(Rect::new(0, 0, 40, 1)));
//! compositor.focus(input);
//! let frame = compositor.render();
//! ```

mod config;
mod dispatch;
mod focus;
mod render;
mod tree;

#[cfg(test)]
mod fixtures;

pub use config::CompositorConfig;
pub use render::{Damage, Frame};

use crate::damage::{DamageTracker, Invalidator};
use crate::input::{InputEvent, KeyCode, KeyEvent, MouseEvent};
use crate::layout::Rect;
use crate::widget::{KeyHint, Widget, WidgetId};
use crossbeam_channel::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
pub(crate) use tree::{deepest_focused_in, propagate_invalidator};
use tree::Tree;

/// A single-surface widget compositor.
pub struct Compositor {
    tree: Mutex<Tree>,
    damage: Arc<DamageTracker>,
    config: CompositorConfig,
}

impl Compositor {
    /// Create a compositor for a surface of `width` x `height` cells.
    pub fn new(width: u16, height: u16, config: CompositorConfig) -> Self {
        Self {
            tree: Mutex::new(Tree::new(width, height, config.status_bar_height)),
            damage: Arc::new(DamageTracker::new()),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The configuration this compositor was built with.
    pub const fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Current surface size.
    pub fn size(&self) -> (u16, u16) {
        let tree = self.lock();
        (tree.width, tree.height)
    }

    /// Resize the surface. Negative dimensions clamp to zero.
    ///
    /// The root and status bar are laid out again and the next render
    /// rebuilds the frame buffer with a full pass.
    pub fn resize(&self, width: i32, height: i32) {
        let clamp = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
        let (width, height) = (clamp(width), clamp(height));
        {
            let mut tree = self.lock();
            if tree.width == width && tree.height == height {
                return;
            }
            tree.width = width;
            tree.height = height;
            tree.relayout();
        }
        tracing::debug!(width, height, "surface resized");
        self.damage.request_refresh();
    }

    /// The surface minus the status bar strip.
    pub fn content_area(&self) -> Rect {
        self.lock().content_area()
    }

    /// Add a top-level widget.
    pub fn add<W: Widget + 'static>(&self, widget: W) -> WidgetId {
        self.add_boxed(Box::new(widget))
    }

    /// Add an already boxed top-level widget.
    pub fn add_boxed(&self, mut widget: Box<dyn Widget>) -> WidgetId {
        propagate_invalidator(widget.as_mut(), &self.invalidator());
        let id = widget.id();
        let bounds = widget.bounds();
        self.lock().widgets.push(widget);
        self.damage.invalidate(bounds);
        id
    }

    /// Remove a top-level widget, clearing every focus, capture, observer
    /// and root reference into its subtree.
    pub fn remove(&self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let widget = {
            let mut tree = self.lock();
            let index = tree.widgets.iter().position(|w| w.id() == id)?;
            let widget = tree.widgets.remove(index);
            let had_focus = tree.focus;
            tree.forget_subtree(widget.as_ref());
            if tree.focus != had_focus {
                tree.notify_focus_observers();
            }
            widget
        };
        self.damage.invalidate(widget.bounds());
        Some(widget)
    }

    /// Make `widget` the root, filling the content area. Any previous root
    /// is removed and dropped.
    pub fn set_root<W: Widget + 'static>(&self, widget: W) -> WidgetId {
        let mut widget: Box<dyn Widget> = Box::new(widget);
        propagate_invalidator(widget.as_mut(), &self.invalidator());
        let id = widget.id();
        let area = {
            let mut tree = self.lock();
            if let Some(old) = tree.root {
                if let Some(index) = tree.widgets.iter().position(|w| w.id() == old) {
                    let old = tree.widgets.remove(index);
                    let had_focus = tree.focus;
                    tree.forget_subtree(old.as_ref());
                    if tree.focus != had_focus {
                        tree.notify_focus_observers();
                    }
                }
            }
            tree.widgets.push(widget);
            tree.root = Some(id);
            tree.relayout();
            tree.content_area()
        };
        self.damage.invalidate(area);
        id
    }

    /// The current root, if any.
    pub fn root(&self) -> Option<WidgetId> {
        self.lock().root
    }

    /// Replace the fixed bottom status bar, returning the previous one.
    pub fn set_status_bar(&self, status: Option<Box<dyn Widget>>) -> Option<Box<dyn Widget>> {
        let mut status = status;
        if let Some(widget) = status.as_deref_mut() {
            propagate_invalidator(widget, &self.invalidator());
        }
        let (previous, dirty) = {
            let mut tree = self.lock();
            let rows_before = tree.status_rows();
            let strip_before = tree.status_area();
            let previous = std::mem::replace(&mut tree.status, status);
            if let Some(old) = previous.as_deref() {
                tree.forget_subtree(old);
            }
            tree.relayout();
            (previous, Self::strip_damage(&tree, rows_before, strip_before))
        };
        // Tree scope released before touching the damage scope.
        self.damage.invalidate(dirty);
        previous
    }

    /// Show or hide the status bar. Hidden, it reserves no rows.
    pub fn set_status_bar_visible(&self, visible: bool) {
        let dirty = {
            let mut tree = self.lock();
            if tree.status_visible == visible {
                return;
            }
            let rows_before = tree.status_rows();
            let strip_before = tree.status_area();
            tree.status_visible = visible;
            tree.relayout();
            Self::strip_damage(&tree, rows_before, strip_before)
        };
        self.damage.invalidate(dirty);
    }

    /// The status bar strip, or the whole surface when the content area
    /// changed size.
    fn strip_damage(tree: &Tree, rows_before: u16, strip_before: Rect) -> Rect {
        if tree.status_rows() == rows_before {
            strip_before.union(&tree.status_area())
        } else {
            Rect::from_size(tree.width, tree.height)
        }
    }

    /// The status bar's id, if one is set.
    pub fn status_bar(&self) -> Option<WidgetId> {
        self.lock().status.as_ref().map(|w| w.id())
    }

    /// Run `f` on the widget with `id`, wherever it is in the tree.
    pub fn with_widget<R>(&self, id: WidgetId, f: impl FnOnce(&dyn Widget) -> R) -> Option<R> {
        self.lock().with_widget(id, f)
    }

    /// Run `f` on the widget with `id` mutably. Its bounds before and after
    /// are marked dirty.
    pub fn with_widget_mut<R>(&self, id: WidgetId, f: impl FnOnce(&mut dyn Widget) -> R) -> Option<R> {
        let (out, before, after) = {
            let mut tree = self.lock();
            tree.with_widget_mut(id, |w| {
                let before = w.bounds();
                let out = f(w);
                (out, before, w.bounds())
            })?
        };
        self.damage.invalidate(before);
        if after != before {
            self.damage.invalidate(after);
        }
        Some(out)
    }

    /// Focus `id`. Returns `false` if nothing changed.
    pub fn focus(&self, id: WidgetId) -> bool {
        self.lock().focus(id)
    }

    /// Blur the focus holder. Returns `false` if nothing was focused.
    pub fn blur(&self) -> bool {
        self.lock().blur()
    }

    /// The focus pointer, as of the last resync.
    pub fn focused(&self) -> Option<WidgetId> {
        self.lock().focus
    }

    /// The leaf-most widget reporting itself focused, searched now.
    pub fn deepest_focused(&self) -> Option<WidgetId> {
        self.lock().deepest_focused()
    }

    /// Move focus forward or backward. Returns `true` if consumed.
    pub fn cycle_focus(&self, forward: bool) -> bool {
        self.lock().cycle_focus(forward)
    }

    /// The widget holding mouse capture, if a gesture is in progress.
    pub fn captured(&self) -> Option<WidgetId> {
        self.lock().capture
    }

    /// Key hints of the focus holder.
    pub fn key_hints(&self) -> Vec<KeyHint> {
        self.lock().key_hints()
    }

    /// Register `id` (which must already be in the tree, status bar
    /// included) as a focus observer.
    pub fn add_focus_observer(&self, id: WidgetId) -> bool {
        self.lock().add_focus_observer(id)
    }

    /// Unregister a focus observer.
    pub fn remove_focus_observer(&self, id: WidgetId) -> bool {
        self.lock().remove_focus_observer(id)
    }

    /// Mark `rect` dirty.
    pub fn invalidate(&self, rect: Rect) {
        self.damage.invalidate(rect);
    }

    /// A damage-reporting handle for code outside the tree.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator::new(self.damage.clone())
    }

    /// Best-effort notification that a render is wanted.
    pub fn refresh_signal(&self) -> Receiver<()> {
        self.damage.refresh_signal()
    }

    /// Compose the next frame.
    ///
    /// With no pending damage the whole surface is redrawn.
    pub fn render(&self) -> Frame {
        let mut tree = self.lock();
        let dirty = self.damage.take();
        tree.compose(dirty, self.config.background)
    }

    /// Dispatch a key press.
    pub fn handle_key(&self, key: &KeyEvent) -> bool {
        self.lock().handle_key(key, self.config.auto_advance_on_enter)
    }

    /// Dispatch a mouse event.
    pub fn handle_mouse(&self, event: &MouseEvent) -> bool {
        self.lock().handle_mouse(event)
    }

    /// Route any input event. Pasted text is typed one character at a time.
    pub fn handle_event(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize { width, height } => {
                self.resize(i32::from(*width), i32::from(*height));
                true
            }
            InputEvent::Paste(text) => {
                let mut tree = self.lock();
                text.chars()
                    .filter(|c| !c.is_control())
                    .fold(false, |handled, c| tree.handle_key(&KeyEvent::new(KeyCode::Char(c)), false) || handled)
            }
            InputEvent::FocusGained | InputEvent::FocusLost | InputEvent::Error(_) | InputEvent::Shutdown => false,
        }
    }
}
