//! Test widgets shared by the compositor tests.

use crate::damage::Invalidator;
use crate::input::{KeyEvent, MouseEvent};
use crate::layout::Rect;
use crate::painter::Painter;
use crate::widget::{
    CycleBlocker, FocusObserver, FocusState, InvalidationAware, KeyHint, KeyHintsProvider, Modal, MouseAware,
    MultiLine, Widget, WidgetId, ZIndexer,
};
use crate::buffer::Style;
use std::sync::{Arc, Mutex};

/// What a [`Probe`] saw.
#[derive(Debug, Default)]
pub struct ProbeLog {
    pub keys: Vec<KeyEvent>,
    pub mouse: Vec<MouseEvent>,
    pub observed: Vec<Option<WidgetId>>,
    pub hints: Vec<Vec<KeyHint>>,
}

/// A leaf that implements every leaf capability and records its input.
pub struct Probe {
    id: WidgetId,
    bounds: Rect,
    glyph: char,
    focusable: bool,
    focused: bool,
    consumes_keys: bool,
    z: i32,
    modal: bool,
    multiline: bool,
    blocks: bool,
    hints: Vec<KeyHint>,
    invalidator: Option<Invalidator>,
    log: Arc<Mutex<ProbeLog>>,
}

impl Probe {
    pub fn new(bounds: Rect) -> Self {
        Self {
            id: WidgetId::next(),
            bounds,
            glyph: '#',
            focusable: true,
            focused: false,
            consumes_keys: false,
            z: 0,
            modal: false,
            multiline: false,
            blocks: false,
            hints: Vec::new(),
            invalidator: None,
            log: Arc::default(),
        }
    }

    pub fn log(&self) -> Arc<Mutex<ProbeLog>> {
        self.log.clone()
    }

    pub fn unfocusable(mut self) -> Self {
        self.focusable = false;
        self
    }

    pub fn glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn consuming(mut self) -> Self {
        self.consumes_keys = true;
        self
    }

    pub fn with_hint(mut self, key: &str, label: &str) -> Self {
        self.hints.push(KeyHint::new(key, label));
        self
    }
}

impl Widget for Probe {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        painter.fill(self.bounds, self.glyph, Style::DEFAULT);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        self.log.lock().unwrap().keys.push(*key);
        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate(self.bounds);
        }
        self.consumes_keys
    }

    fn focusable(&self) -> bool {
        self.focusable
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn as_mouse_aware_mut(&mut self) -> Option<&mut dyn MouseAware> {
        Some(self)
    }

    fn as_modal(&self) -> Option<&dyn Modal> {
        Some(self)
    }

    fn as_modal_mut(&mut self) -> Option<&mut dyn Modal> {
        Some(self)
    }

    fn as_invalidation_aware_mut(&mut self) -> Option<&mut dyn InvalidationAware> {
        Some(self)
    }

    fn as_z_indexer(&self) -> Option<&dyn ZIndexer> {
        Some(self)
    }

    fn as_focus_state(&self) -> Option<&dyn FocusState> {
        Some(self)
    }

    fn as_key_hints(&self) -> Option<&dyn KeyHintsProvider> {
        Some(self)
    }

    fn as_multi_line(&self) -> Option<&dyn MultiLine> {
        Some(self)
    }

    fn as_cycle_blocker(&self) -> Option<&dyn CycleBlocker> {
        Some(self)
    }

    fn as_focus_observer_mut(&mut self) -> Option<&mut dyn FocusObserver> {
        Some(self)
    }
}

impl MouseAware for Probe {
    fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        self.log.lock().unwrap().mouse.push(*event);
        true
    }
}

impl Modal for Probe {
    fn is_modal(&self) -> bool {
        self.modal
    }

    fn dismiss_modal(&mut self) {
        self.modal = false;
    }
}

impl InvalidationAware for Probe {
    fn set_invalidator(&mut self, invalidator: Invalidator) {
        self.invalidator = Some(invalidator);
    }
}

impl ZIndexer for Probe {
    fn z_index(&self) -> i32 {
        self.z
    }
}

impl FocusState for Probe {
    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl KeyHintsProvider for Probe {
    fn key_hints(&self) -> Vec<KeyHint> {
        self.hints.clone()
    }
}

impl MultiLine for Probe {
    fn is_multiline(&self) -> bool {
        self.multiline
    }
}

impl CycleBlocker for Probe {
    fn blocks_cycling(&self) -> bool {
        self.blocks
    }
}

impl FocusObserver for Probe {
    fn focus_changed(&mut self, focused: Option<WidgetId>, hints: &[KeyHint]) {
        let mut log = self.log.lock().unwrap();
        log.observed.push(focused);
        log.hints.push(hints.to_vec());
    }
}
