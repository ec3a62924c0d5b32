//! Focus state machine.
//!
//! The focus pointer names at most one widget. Containers may move focus
//! between their own descendants without telling the compositor, so the
//! pointer is resynced to the deepest focused widget before it is trusted.

use super::tree::{deepest_focused_in, subtree_contains, Tree};
use crate::widget::{reports_focus, KeyHint, WidgetId};

impl Tree {
    /// Give focus to `id`.
    ///
    /// No-op (returning `false`) when `id` already holds focus (itself or
    /// through a descendant), is not in the top-level tree, or is not
    /// focusable. Afterwards the pointer names the deepest focused widget.
    pub fn focus(&mut self, id: WidgetId) -> bool {
        self.resync_deepest();
        let held = self
            .focus
            .is_some_and(|holder| self.with_widget(id, |w| subtree_contains(w, holder)).unwrap_or(false));
        if held || self.top_level_index_of(id).is_none() {
            return false;
        }
        if !self.with_widget(id, |w| w.focusable()).unwrap_or(false) {
            return false;
        }

        self.blur_holder_except(Some(id));
        self.with_widget_mut(id, |w| {
            if !reports_focus(w) {
                w.focus();
            }
        });
        self.focus = self.deepest_focused().or(Some(id));
        tracing::debug!(widget = ?id, focus = ?self.focus, "focus");
        self.notify_focus_observers();
        true
    }

    /// Blur the current holder and clear the pointer.
    pub fn blur(&mut self) -> bool {
        self.resync_deepest();
        if self.focus.is_none() {
            return false;
        }
        self.blur_holder_except(None);
        tracing::debug!("blur");
        self.notify_focus_observers();
        true
    }

    /// Clear the pointer, blurring whatever it held unless `keep` is the
    /// widget that is focused right now.
    ///
    /// When `keep` lives inside the holder's subtree only the focused leaf
    /// is blurred, so the container stays entered.
    pub(crate) fn blur_holder_except(&mut self, keep: Option<WidgetId>) {
        let Some(holder) = self.focus.take() else {
            return;
        };
        let leaf = self.with_widget(holder, |w| deepest_focused_in(w)).flatten().unwrap_or(holder);
        if Some(leaf) == keep {
            return;
        }
        let inside = keep.is_some_and(|keep| self.with_widget(holder, |w| subtree_contains(w, keep)).unwrap_or(false));
        let target = if inside { leaf } else { holder };
        self.with_widget_mut(target, |w| w.blur());
    }

    /// Move the pointer to the deepest widget that reports itself focused.
    ///
    /// Does nothing when no widget reports focus, so widgets without
    /// [`FocusState`](crate::widget::FocusState) keep the pointer.
    pub fn resync_deepest(&mut self) {
        let deepest = self.deepest_focused();
        if deepest.is_some() && deepest != self.focus {
            tracing::debug!(from = ?self.focus, to = ?deepest, "focus resync");
            self.focus = deepest;
            self.notify_focus_observers();
        }
    }

    /// Move focus to the next (or previous) stop.
    ///
    /// The holder cycles first, then the top-level cycler enclosing it,
    /// then the top-level list itself with wrap-around. Returns `true` when
    /// the cycle was consumed, including by a trapping cycler at one of its
    /// ends.
    pub fn cycle_focus(&mut self, forward: bool) -> bool {
        self.resync_deepest();
        if let Some(holder) = self.focus {
            if let Some(consumed) = self.try_cycle(holder, forward) {
                return consumed;
            }
            if let Some(index) = self.top_level_index_of(holder) {
                let top = self.widgets[index].id();
                if top != holder {
                    if let Some(consumed) = self.try_cycle(top, forward) {
                        return consumed;
                    }
                }
            }
        }
        self.cycle_top_level(forward)
    }

    /// Ask the cycler `id` to move. `None` means escalate outward.
    fn try_cycle(&mut self, id: WidgetId, forward: bool) -> Option<bool> {
        let (moved, traps) = self
            .with_widget_mut(id, |w| w.as_focus_cycler_mut().map(|c| (c.cycle_focus(forward), c.traps_focus())))
            .flatten()?;
        if moved {
            self.focus = self.deepest_focused().or(Some(id));
            tracing::debug!(cycler = ?id, focus = ?self.focus, forward, "focus cycled");
            self.notify_focus_observers();
            Some(true)
        } else if traps {
            Some(true)
        } else {
            None
        }
    }

    fn cycle_top_level(&mut self, forward: bool) -> bool {
        let count = self.widgets.len();
        if count == 0 {
            return false;
        }
        let current = self.focus.and_then(|id| self.top_level_index_of(id));
        let candidates: Vec<usize> = match current {
            Some(cur) if forward => (1..=count).map(|step| (cur + step) % count).collect(),
            Some(cur) => (1..=count).map(|step| (cur + count - step) % count).collect(),
            None if forward => (0..count).collect(),
            None => (0..count).rev().collect(),
        };
        let Some(target) = candidates.into_iter().find(|&i| self.widgets[i].focusable()) else {
            return false;
        };

        let id = self.widgets[target].id();
        if Some(target) == current {
            // Wrapped around to the only stop: re-enter it if it has an order.
            let entered = self
                .with_widget_mut(id, |w| w.as_focus_cycler_mut().map(|c| c.enter_focus(forward)))
                .flatten()
                .unwrap_or(false);
            if entered {
                self.focus = self.deepest_focused().or(Some(id));
                self.notify_focus_observers();
            }
            return entered;
        }

        self.blur_holder_except(Some(id));
        self.with_widget_mut(id, |w| {
            if !reports_focus(w) {
                w.focus();
            }
            if let Some(cycler) = w.as_focus_cycler_mut() {
                cycler.enter_focus(forward);
            }
        });
        self.focus = self.deepest_focused().or(Some(id));
        tracing::debug!(widget = ?id, focus = ?self.focus, forward, "focus moved to top-level widget");
        self.notify_focus_observers();
        true
    }

    /// Key hints of the focus holder, empty when it has none.
    pub fn key_hints(&self) -> Vec<KeyHint> {
        self.focus
            .and_then(|id| self.with_widget(id, |w| w.as_key_hints().map(|p| p.key_hints())).flatten())
            .unwrap_or_default()
    }

    /// Register `id` as a focus observer. Returns `false` if already present
    /// or not in the tree.
    pub fn add_focus_observer(&mut self, id: WidgetId) -> bool {
        if self.observers.contains(&id) || !self.contains(id) {
            return false;
        }
        self.observers.push(id);
        true
    }

    /// Unregister a focus observer.
    pub fn remove_focus_observer(&mut self, id: WidgetId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|&o| o != id);
        self.observers.len() != before
    }

    /// Tell every observer about the current holder, synchronously.
    pub(crate) fn notify_focus_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let focused = self.focus;
        let hints = self.key_hints();
        for id in self.observers.clone() {
            self.with_widget_mut(id, |w| {
                if let Some(observer) = w.as_focus_observer_mut() {
                    observer.focus_changed(focused, &hints);
                }
            });
        }
    }
}
