//! Keyboard and mouse dispatch.
//!
//! Keys go to the focus holder first. Mouse gestures are routed by hit
//! testing on the press and by capture until every button is released.

use super::tree::Tree;
use crate::input::{KeyCode, KeyEvent, MouseButtons, MouseEvent};
use crate::widget::{is_active_modal, WidgetId};

impl Tree {
    /// Dispatch one key press. Returns `true` if something consumed it.
    ///
    /// With `auto_advance`, a handled Enter moves focus forward unless the
    /// deepest focused widget edits multiple lines, is an active modal, or
    /// blocks cycling.
    pub fn handle_key(&mut self, key: &KeyEvent, auto_advance: bool) -> bool {
        self.resync_deepest();
        let Some(holder) = self.focus else {
            return self.cycle_on_tab(key);
        };

        if let Some(modal) = self.modal_scope_of(holder) {
            // The modal keeps the key whatever the outcome. A modal
            // container routes it down to its focused descendant itself.
            let handled = self.with_widget_mut(modal, |w| w.handle_key(key)).unwrap_or(false);
            self.resync_deepest();
            return handled;
        }

        let handled = self.with_widget_mut(holder, |w| w.handle_key(key)).unwrap_or(false);
        if !handled {
            return self.cycle_on_tab(key);
        }

        self.resync_deepest();
        if auto_advance && key.code == KeyCode::Enter && !self.enter_is_pinned(holder) {
            self.cycle_focus(true);
        }
        true
    }

    fn cycle_on_tab(&mut self, key: &KeyEvent) -> bool {
        if key.is_focus_next() {
            self.cycle_focus(true)
        } else if key.is_focus_prev() {
            self.cycle_focus(false)
        } else {
            false
        }
    }

    /// Whether the deepest focused widget keeps Enter from advancing focus.
    fn enter_is_pinned(&self, holder: WidgetId) -> bool {
        let deepest = self.deepest_focused().unwrap_or(holder);
        self.with_widget(deepest, |w| {
            w.as_multi_line().is_some_and(|m| m.is_multiline())
                || is_active_modal(w)
                || w.as_cycle_blocker().is_some_and(|b| b.blocks_cycling())
        })
        .unwrap_or(false)
    }

    /// Dispatch one mouse event. Returns `true` if a widget consumed it.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        let (x, y) = event.position();
        let held = event.buttons & MouseButtons::PRESSABLE;
        let pressed = !self.last_buttons.any_pressed() && held.any_pressed();
        self.last_buttons = held;

        if let Some(target) = self.capture {
            let handled = self.forward_mouse(target, event);
            if !held.any_pressed() {
                tracing::debug!(widget = ?target, "mouse capture released");
                self.capture = None;
            }
            return handled;
        }

        if pressed {
            return self.press(event, x, y);
        }
        if held.any_pressed() {
            // A drag whose press landed on nothing.
            return false;
        }

        // Wheel and hover go to whatever is under the cursor, without
        // touching focus or capture.
        match self.topmost_at(x, y) {
            Some(index) => {
                let id = self.widgets[index].id();
                self.forward_mouse(id, event)
            }
            None => false,
        }
    }

    fn press(&mut self, event: &MouseEvent, x: i32, y: i32) -> bool {
        self.resync_deepest();
        let before = self.focus;

        if let Some(modal) = before.and_then(|holder| self.modal_scope_of(holder)) {
            if self.with_widget(modal, |w| w.hit_test(x, y)).unwrap_or(false) {
                self.forward_mouse(modal, event);
                self.capture = Some(modal);
                tracing::debug!(widget = ?modal, "mouse captured by modal");
                // The modal may have moved focus between its children.
                self.resync_deepest();
                return true;
            }
            self.with_widget_mut(modal, |w| {
                if let Some(m) = w.as_modal_mut() {
                    m.dismiss_modal();
                }
            });
            tracing::debug!(widget = ?modal, "modal dismissed by outside press");
        }

        let Some(index) = self.topmost_at(x, y) else {
            return false;
        };
        let top = self.widgets[index].id();

        self.blur_holder_except(None);
        self.forward_mouse(top, event);

        // The widget may have rearranged itself; hit again.
        let hit = self.topmost_at(x, y).map(|index| self.resolve_hit(index, x, y));
        let focusable = hit.and_then(|id| self.with_widget(id, |w| w.focusable())).unwrap_or(false);
        match hit {
            Some(id) if focusable => {
                self.with_widget_mut(id, |w| {
                    if !crate::widget::reports_focus(w) {
                        w.focus();
                    }
                });
                self.focus = self.deepest_focused().or(Some(id));
            }
            _ => self.focus = self.deepest_focused(),
        }

        self.capture = Some(top);
        tracing::debug!(widget = ?top, focus = ?self.focus, "mouse captured");
        if self.focus != before {
            self.notify_focus_observers();
        }
        true
    }

    fn forward_mouse(&mut self, id: WidgetId, event: &MouseEvent) -> bool {
        self.with_widget_mut(id, |w| w.as_mouse_aware_mut().is_some_and(|m| m.handle_mouse(event)))
            .unwrap_or(false)
    }
}
