//! The render pass.
//!
//! A pass is either full (background plus every widget) or partial
//! (merged dirty rectangles, each redrawn under its own clip). Modal
//! overlays and the status bar are then redrawn unclipped on top.

use super::tree::{walk, Tree};
use crate::buffer::{Buffer, Cell, Style};
use crate::layout::{merge_rects, Rect};
use crate::painter::Painter;
use crate::widget::is_active_modal;
use std::ops::ControlFlow;

/// Which parts of a [`Frame`] were written by the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Damage {
    /// The whole surface was redrawn.
    Full,
    /// Only these regions were written, already clipped to the surface.
    Partial(Vec<Rect>),
}

impl Damage {
    /// Whether this pass redrew everything.
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// The written regions, with [`Damage::Full`] expanded to `surface`.
    pub fn rects(&self, surface: Rect) -> Vec<Rect> {
        match self {
            Self::Full => vec![surface],
            Self::Partial(rects) => rects.clone(),
        }
    }
}

/// The result of one render pass.
#[derive(Debug, Clone)]
pub struct Frame {
    /// A snapshot of the composed frame buffer.
    pub buffer: Buffer,
    /// What changed since the previous frame.
    pub damage: Damage,
}

impl Tree {
    /// Make the frame buffer match the surface. Returns `true` if it had
    /// to be rebuilt.
    pub(crate) fn ensure_frame(&mut self) -> bool {
        let matches = self
            .frame
            .as_ref()
            .is_some_and(|frame| frame.width() == self.width && frame.height() == self.height);
        if !matches {
            self.frame = Some(Buffer::new(self.width, self.height));
        }
        !matches
    }

    /// Compose a frame from the given dirty list.
    pub(crate) fn compose(&mut self, dirty: Vec<Rect>, background: Style) -> Frame {
        let rebuilt = self.ensure_frame();
        let mut buffer = self.frame.take().unwrap_or_else(|| Buffer::new(self.width, self.height));
        let fill = Cell::styled(' ', background);

        let mut damage = if rebuilt || dirty.is_empty() {
            self.full_pass(&mut buffer, fill);
            Damage::Full
        } else {
            Damage::Partial(self.partial_pass(&mut buffer, dirty, fill))
        };

        let overlays = self.overlay_pass(&mut buffer);
        let status = self.status_pass(&mut buffer);
        if let Damage::Partial(rects) = &mut damage {
            let (width, height) = (self.width, self.height);
            rects.extend(overlays.into_iter().chain(status).filter_map(|r| r.clip_to(width, height)));
        }

        tracing::debug!(
            full = damage.is_full(),
            regions = match &damage {
                Damage::Full => 1,
                Damage::Partial(rects) => rects.len(),
            },
            "render pass"
        );

        let frame = Frame { buffer: buffer.clone(), damage };
        self.frame = Some(buffer);
        frame
    }

    fn full_pass(&self, buffer: &mut Buffer, fill: Cell) {
        buffer.fill_rect(buffer.area(), fill);
        let mut painter = Painter::new(buffer);
        for index in self.z_order() {
            self.widgets[index].draw(&mut painter);
        }
    }

    fn partial_pass(&self, buffer: &mut Buffer, dirty: Vec<Rect>, fill: Cell) -> Vec<Rect> {
        let (width, height) = (self.width, self.height);
        let order = self.z_order();
        let mut written = Vec::new();
        for clip in merge_rects(dirty).into_iter().filter_map(|r| r.clip_to(width, height)) {
            buffer.fill_rect(clip, fill);
            let mut painter = Painter::with_clip(buffer, clip);
            for &index in &order {
                let widget = self.widgets[index].as_ref();
                if widget.bounds().overlaps(&clip) {
                    widget.draw(&mut painter);
                }
            }
            written.push(clip);
        }
        written
    }

    /// Redraw every active modal over the whole surface, in z order.
    fn overlay_pass(&self, buffer: &mut Buffer) -> Vec<Rect> {
        let mut painter = Painter::new(buffer);
        let mut drawn = Vec::new();
        for index in self.z_order() {
            let _ = walk(self.widgets[index].as_ref(), &mut |w| {
                if is_active_modal(w) {
                    w.draw(&mut painter);
                    drawn.push(w.bounds());
                }
                ControlFlow::Continue(())
            });
        }
        drawn
    }

    fn status_pass(&self, buffer: &mut Buffer) -> Option<Rect> {
        if self.status_rows() == 0 {
            return None;
        }
        let status = self.status.as_deref()?;
        status.draw(&mut Painter::new(buffer));
        Some(status.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Probe;
    use super::*;
    use crate::widget::Widget;

    fn add(tree: &mut Tree, widget: impl Widget + 'static) {
        tree.widgets.push(Box::new(widget));
    }

    #[test]
    fn test_first_render_is_full() {
        let mut tree = Tree::new(6, 2, 0);
        add(&mut tree, Probe::new(Rect::new(1, 0, 2, 1)).glyph('a'));
        let frame = tree.compose(vec![Rect::new(0, 0, 1, 1)], Style::DEFAULT);
        assert_eq!(frame.damage, Damage::Full);
        assert_eq!(frame.buffer.row_text(0), " aa   ");
    }

    #[test]
    fn test_partial_only_touches_clip() {
        let mut tree = Tree::new(6, 2, 0);
        add(&mut tree, Probe::new(Rect::new(0, 0, 6, 2)).glyph('a'));
        tree.compose(Vec::new(), Style::DEFAULT);

        // Change what the widget would draw, but only report one cell.
        tree.widgets.clear();
        add(&mut tree, Probe::new(Rect::new(0, 0, 6, 2)).glyph('b'));
        let frame = tree.compose(vec![Rect::new(2, 1, 1, 1)], Style::DEFAULT);

        assert_eq!(frame.damage, Damage::Partial(vec![Rect::new(2, 1, 1, 1)]));
        assert_eq!(frame.buffer.row_text(0), "aaaaaa");
        assert_eq!(frame.buffer.row_text(1), "aabaaa");
    }

    #[test]
    fn test_partial_merges_and_clips() {
        let mut tree = Tree::new(4, 4, 0);
        tree.compose(Vec::new(), Style::DEFAULT);
        let frame = tree.compose(
            vec![Rect::new(-2, -2, 3, 3), Rect::new(1, 1, 1, 1), Rect::new(10, 10, 2, 2)],
            Style::DEFAULT,
        );
        assert_eq!(frame.damage, Damage::Partial(vec![Rect::new(0, 0, 2, 2)]));
    }

    #[test]
    fn test_draw_order_ascending_z() {
        let mut tree = Tree::new(4, 1, 0);
        add(&mut tree, Probe::new(Rect::new(0, 0, 4, 1)).glyph('h').z(5));
        add(&mut tree, Probe::new(Rect::new(0, 0, 4, 1)).glyph('l'));
        let frame = tree.compose(Vec::new(), Style::DEFAULT);
        assert_eq!(frame.buffer.row_text(0), "hhhh");
    }

    #[test]
    fn test_modal_overlay_escapes_partial_clip() {
        let mut tree = Tree::new(8, 2, 0);
        add(&mut tree, Probe::new(Rect::new(0, 0, 8, 2)).glyph('.'));
        add(&mut tree, Probe::new(Rect::new(4, 0, 4, 2)).glyph('m').modal());
        tree.compose(Vec::new(), Style::DEFAULT);

        let frame = tree.compose(vec![Rect::new(0, 0, 1, 1)], Style::DEFAULT);
        assert_eq!(frame.buffer.row_text(0), "....mmmm");
        assert_eq!(
            frame.damage,
            Damage::Partial(vec![Rect::new(0, 0, 1, 1), Rect::new(4, 0, 4, 2)])
        );
    }

    #[test]
    fn test_status_bar_drawn_last() {
        let mut tree = Tree::new(4, 3, 1);
        add(&mut tree, Probe::new(Rect::new(0, 0, 4, 3)).glyph('w'));
        tree.status = Some(Box::new(Probe::new(Rect::ZERO).glyph('s')));
        tree.relayout();
        let frame = tree.compose(Vec::new(), Style::DEFAULT);
        assert_eq!(frame.buffer.row_text(1), "wwww");
        assert_eq!(frame.buffer.row_text(2), "ssss");
    }

    #[test]
    fn test_resize_forces_full_pass() {
        let mut tree = Tree::new(4, 1, 0);
        tree.compose(Vec::new(), Style::DEFAULT);
        tree.width = 6;
        let frame = tree.compose(vec![Rect::new(0, 0, 1, 1)], Style::DEFAULT);
        assert!(frame.damage.is_full());
        assert_eq!(frame.buffer.width(), 6);
    }
}
