//! Panel Widget: a bordered container with its own tab order.
//!
//! Children are either placed by the caller or stacked in rows/columns.
//! Stacked children can be separated by single-cell rules; each rule is
//! drawn once, by the child above or to the left of it.

use crate::buffer::Style;
use crate::compositor::{deepest_focused_in, propagate_invalidator};
use crate::damage::Invalidator;
use crate::input::{KeyEvent, MouseEvent};
use crate::layout::Rect;
use crate::painter::{BorderCharset, Edges, Painter};
use crate::widget::{
    ChildContainer, FocusCycler, HitTester, InvalidationAware, Modal, MouseAware, NeighborLayout, Widget, WidgetId,
    ZIndexer,
};
use std::ops::ControlFlow;

/// How a panel places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelLayout {
    /// Children keep the bounds they were given.
    #[default]
    Manual,
    /// Children share the inner height, top to bottom.
    Rows,
    /// Children share the inner width, left to right.
    Columns,
}

/// A container of child widgets.
pub struct Panel {
    id: WidgetId,
    bounds: Rect,
    children: Vec<Box<dyn Widget>>,
    /// Child that takes focus when the panel is entered without direction.
    current: usize,
    /// Child that received the last press, for the rest of the gesture.
    pressed: Option<usize>,
    layout: PanelLayout,
    bordered: bool,
    separators: bool,
    charset: BorderCharset,
    border_style: Style,
    trap: bool,
    modal: bool,
    z: i32,
    invalidator: Option<Invalidator>,
}

impl Panel {
    /// An empty, borderless panel with manual layout.
    pub fn new(bounds: Rect) -> Self {
        Self {
            id: WidgetId::next(),
            bounds,
            children: Vec::new(),
            current: 0,
            pressed: None,
            layout: PanelLayout::Manual,
            bordered: false,
            separators: false,
            charset: BorderCharset::default(),
            border_style: Style::DEFAULT,
            trap: false,
            modal: false,
            z: 0,
            invalidator: None,
        }
    }

    /// Draw a box around the panel; children are laid out inside it.
    #[must_use]
    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self.relayout();
        self
    }

    /// Border glyphs and style.
    #[must_use]
    pub const fn border(mut self, charset: BorderCharset, style: Style) -> Self {
        self.charset = charset;
        self.border_style = style;
        self
    }

    /// Stack children and optionally rule a line between neighbors.
    #[must_use]
    pub fn layout(mut self, layout: PanelLayout, separators: bool) -> Self {
        self.layout = layout;
        self.separators = separators;
        self.relayout();
        self
    }

    /// Keep focus inside the panel when cycling reaches either end.
    #[must_use]
    pub const fn trap_focus(mut self, trap: bool) -> Self {
        self.trap = trap;
        self
    }

    /// Start as an active modal overlay.
    #[must_use]
    pub const fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Draw and hit order among top-level widgets.
    #[must_use]
    pub const fn z_index(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Add a child, returning its id.
    pub fn push<W: Widget + 'static>(&mut self, child: W) -> WidgetId {
        let mut child: Box<dyn Widget> = Box::new(child);
        if let Some(invalidator) = &self.invalidator {
            propagate_invalidator(child.as_mut(), invalidator);
        }
        let id = child.id();
        self.children.push(child);
        self.relayout();
        self.invalidate();
        id
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the panel has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Reopen (or close) the panel as a modal overlay.
    pub fn set_modal(&mut self, modal: bool) {
        if self.modal != modal {
            self.modal = modal;
            self.invalidate();
        }
    }

    fn invalidate(&self) {
        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate(self.bounds);
        }
    }

    /// The area inside the border.
    fn inner(&self) -> Rect {
        if self.bordered {
            self.bounds.shrink(1)
        } else {
            self.bounds
        }
    }

    fn relayout(&mut self) {
        let count = i32::try_from(self.children.len()).unwrap_or(i32::MAX);
        if self.layout == PanelLayout::Manual || count == 0 {
            return;
        }
        let inner = self.inner();
        let gap = i32::from(self.separators);
        let total = match self.layout {
            PanelLayout::Rows => inner.height,
            _ => inner.width,
        };
        let share = ((total - gap * (count - 1)) / count).max(0);
        let mut offset = 0;
        let last = self.children.len() - 1;
        for (i, child) in self.children.iter_mut().enumerate() {
            let span = if i == last { (total - offset).max(0) } else { share };
            let rect = match self.layout {
                PanelLayout::Rows => Rect::new(inner.x, inner.y + offset, inner.width, span),
                _ => Rect::new(inner.x + offset, inner.y, span, inner.height),
            };
            child.set_bounds(rect);
            offset += span + gap;
        }
    }

    /// Index of the child whose subtree holds focus.
    fn active(&self) -> Option<usize> {
        self.children.iter().position(|c| deepest_focused_in(c.as_ref()).is_some())
    }

    fn child_at(&self, x: i32, y: i32) -> Option<usize> {
        self.children.iter().rposition(|c| c.hit_test(x, y))
    }

    /// Next focusable child after (or before) `from`, without wrapping.
    fn step(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let focusable = |&i: &usize| self.children[i].focusable();
        match (from, forward) {
            (Some(i), true) => (i + 1..self.children.len()).find(focusable),
            (Some(i), false) => (0..i).rev().find(focusable),
            (None, true) => (0..self.children.len()).find(focusable),
            (None, false) => (0..self.children.len()).rev().find(focusable),
        }
    }

    /// Move focus from the active child to `target`.
    fn focus_child(&mut self, target: usize, forward: Option<bool>) {
        if let Some(active) = self.active() {
            if active != target {
                self.children[active].blur();
            }
        }
        let child = &mut self.children[target];
        if deepest_focused_in(child.as_ref()).is_none() {
            child.focus();
        }
        if let (Some(forward), Some(cycler)) = (forward, child.as_focus_cycler_mut()) {
            cycler.enter_focus(forward);
        }
        self.current = target;
    }
}

impl Widget for Panel {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        if self.layout == PanelLayout::Manual {
            let (dx, dy) = (bounds.x - self.bounds.x, bounds.y - self.bounds.y);
            for child in &mut self.children {
                let b = child.bounds();
                child.set_position(b.x + dx, b.y + dy);
            }
        }
        self.invalidate();
        self.bounds = bounds;
        self.relayout();
        self.invalidate();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        if self.bordered {
            painter.draw_border(self.bounds, self.border_style, &self.charset);
        }
        painter.clipped(self.inner(), |painter| {
            for child in &self.children {
                child.draw(painter);
            }
            if self.separators {
                for child in &self.children {
                    let edges = self.neighbors(child.id()) & (Edges::BOTTOM | Edges::RIGHT);
                    let b = child.bounds();
                    let rule = Rect::new(b.x, b.y, b.width + 1, b.height + 1);
                    painter.draw_separators(rule, self.border_style, &self.charset, edges);
                }
            }
        });
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if let Some(active) = self.active() {
            if self.children[active].handle_key(key) {
                return true;
            }
        }
        // An open modal panel cycles within itself, wrapping at the ends.
        if self.modal && (key.is_focus_next() || key.is_focus_prev()) {
            let forward = key.is_focus_next();
            if !self.cycle_focus(forward) {
                self.enter_focus(forward);
            }
            return true;
        }
        false
    }

    fn focusable(&self) -> bool {
        self.children.iter().any(|c| c.focusable())
    }

    fn focus(&mut self) {
        if self.active().is_some() {
            return;
        }
        let target = if self.children.get(self.current).is_some_and(|c| c.focusable()) {
            Some(self.current)
        } else {
            self.step(None, true)
        };
        if let Some(target) = target {
            self.focus_child(target, None);
        }
    }

    fn blur(&mut self) {
        if let Some(active) = self.active() {
            self.children[active].blur();
        }
    }

    fn as_container(&self) -> Option<&dyn ChildContainer> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn ChildContainer> {
        Some(self)
    }

    fn as_hit_tester(&self) -> Option<&dyn HitTester> {
        Some(self)
    }

    fn as_mouse_aware_mut(&mut self) -> Option<&mut dyn MouseAware> {
        Some(self)
    }

    fn as_focus_cycler(&self) -> Option<&dyn FocusCycler> {
        Some(self)
    }

    fn as_focus_cycler_mut(&mut self) -> Option<&mut dyn FocusCycler> {
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

    fn as_neighbor_layout(&self) -> Option<&dyn NeighborLayout> {
        Some(self)
    }
}

impl ChildContainer for Panel {
    fn visit_children(&self, visit: &mut dyn FnMut(&dyn Widget) -> ControlFlow<()>) -> ControlFlow<()> {
        for child in &self.children {
            visit(child.as_ref())?;
        }
        ControlFlow::Continue(())
    }

    fn visit_children_mut(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Widget) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        for child in &mut self.children {
            visit(child.as_mut())?;
        }
        ControlFlow::Continue(())
    }
}

impl HitTester for Panel {
    fn widget_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let Some(index) = self.child_at(x, y) else {
            return Some(self.id);
        };
        let child = self.children[index].as_ref();
        child
            .as_hit_tester()
            .and_then(|tester| tester.widget_at(x, y))
            .or(Some(child.id()))
    }
}

impl MouseAware for Panel {
    fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        let (x, y) = event.position();
        let target = if event.buttons.any_pressed() {
            // The child under the press keeps the gesture.
            let target = self.pressed.or_else(|| self.child_at(x, y));
            if self.pressed.is_none() {
                if let Some(index) = target.filter(|&i| self.children[i].focusable()) {
                    self.focus_child(index, None);
                }
            }
            self.pressed = target;
            target
        } else {
            self.pressed.take().or_else(|| self.child_at(x, y))
        };
        match target {
            Some(index) => {
                let child = &mut self.children[index];
                child.as_mouse_aware_mut().is_some_and(|m| m.handle_mouse(event)) || self.bounds.contains(x, y)
            }
            None => self.bounds.contains(x, y),
        }
    }
}

impl FocusCycler for Panel {
    fn cycle_focus(&mut self, forward: bool) -> bool {
        let Some(active) = self.active() else {
            return self.enter_focus(forward);
        };
        if let Some(cycler) = self.children[active].as_focus_cycler_mut() {
            if cycler.cycle_focus(forward) {
                return true;
            }
        }
        match self.step(Some(active), forward) {
            Some(next) => {
                self.focus_child(next, Some(forward));
                true
            }
            None => false,
        }
    }

    fn enter_focus(&mut self, forward: bool) -> bool {
        match self.step(None, forward) {
            Some(target) => {
                self.focus_child(target, Some(forward));
                true
            }
            None => false,
        }
    }

    fn traps_focus(&self) -> bool {
        self.trap
    }
}

impl Modal for Panel {
    fn is_modal(&self) -> bool {
        self.modal
    }

    fn dismiss_modal(&mut self) {
        self.set_modal(false);
    }
}

impl InvalidationAware for Panel {
    fn set_invalidator(&mut self, invalidator: Invalidator) {
        self.invalidator = Some(invalidator);
    }
}

impl ZIndexer for Panel {
    fn z_index(&self) -> i32 {
        self.z
    }
}

impl NeighborLayout for Panel {
    /// Siblings one rule-width away, sharing some extent.
    fn neighbors(&self, child: WidgetId) -> Edges {
        let Some(c) = self.children.iter().find(|w| w.id() == child).map(|w| w.bounds()) else {
            return Edges::empty();
        };
        let gap = i32::from(self.separators);
        let mut edges = Edges::empty();
        for s in self.children.iter().filter(|w| w.id() != child).map(|w| w.bounds()) {
            let share_columns = s.x < c.right() && c.x < s.right();
            let share_rows = s.y < c.bottom() && c.y < s.bottom();
            if share_columns && s.y == c.bottom() + gap {
                edges |= Edges::BOTTOM;
            }
            if share_columns && c.y == s.bottom() + gap {
                edges |= Edges::TOP;
            }
            if share_rows && s.x == c.right() + gap {
                edges |= Edges::RIGHT;
            }
            if share_rows && c.x == s.right() + gap {
                edges |= Edges::LEFT;
            }
        }
        edges
    }
}
