//! Frame diffing: minimal ANSI output to turn one frame into the next.
//!
//! Only cells inside the given regions are compared. Cursor moves are
//! skipped for adjacent writes and SGR sequences are only emitted when
//! the style actually changes.

use super::output::OutputBuffer;
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::layout::Rect;
use unicode_width::UnicodeWidthChar;

/// What the terminal is known to show right now.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Unknown terminal state: the first write always moves the cursor
    /// and sets every attribute.
    pub const fn new() -> Self {
        Self {
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything, e.g. after output was written behind our back.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Statistics of one diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Cells written.
    pub cells_changed: usize,
    /// Cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Color and attribute sequences emitted.
    pub style_changes: usize,
}

/// Write the cells of `next` that differ from `current` within `regions`.
///
/// Regions are clipped to the buffers; both buffers must have the same size.
pub fn render_diff(
    current: &Buffer,
    next: &Buffer,
    regions: &[Rect],
    out: &mut OutputBuffer,
    state: &mut DiffState,
) -> DiffStats {
    debug_assert_eq!((current.width(), current.height()), (next.width(), next.height()));
    let mut stats = DiffStats::default();
    for region in regions {
        let Some(region) = region.clip_to(next.width(), next.height()) else {
            continue;
        };
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                let (Some(old), Some(new)) = (current.get(x, y), next.get(x, y)) else {
                    continue;
                };
                if old == new || new.is_wide_continuation() {
                    continue;
                }
                emit_cell(out, state, &mut stats, x, y, new);
            }
        }
    }
    stats
}

/// Redraw every cell of `buffer` from scratch.
pub fn render_full(buffer: &Buffer, out: &mut OutputBuffer, state: &mut DiffState) -> DiffStats {
    state.reset();
    out.cursor_hide();
    out.reset_attrs();
    let mut stats = DiffStats::default();
    for y in 0..i32::from(buffer.height()) {
        for x in 0..i32::from(buffer.width()) {
            match buffer.get(x, y) {
                Some(cell) if !cell.is_wide_continuation() => emit_cell(out, state, &mut stats, x, y, cell),
                _ => {}
            }
        }
    }
    out.reset_attrs();
    state.fg = None;
    state.bg = None;
    state.modifiers = None;
    stats
}

fn emit_cell(out: &mut OutputBuffer, state: &mut DiffState, stats: &mut DiffStats, x: i32, y: i32, cell: &Cell) {
    // Coordinates come from a u16-sized buffer.
    let (x, y) = (u16::try_from(x).unwrap_or(u16::MAX), u16::try_from(y).unwrap_or(u16::MAX));
    stats.cells_changed += 1;
    if state.cursor_x != x || state.cursor_y != y {
        out.cursor_move(x, y);
        state.cursor_x = x;
        state.cursor_y = y;
        stats.cursor_moves += 1;
    }
    emit_style(out, state, stats, cell.style());
    out.write_char(cell.symbol());
    let advance = cell.symbol().width().unwrap_or(1).clamp(1, 2);
    state.cursor_x = state.cursor_x.saturating_add(u16::try_from(advance).unwrap_or(1));
}

fn emit_style(out: &mut OutputBuffer, state: &mut DiffState, stats: &mut DiffStats, style: Style) {
    // Attributes can only be turned off by a full reset, which also
    // drops the colors.
    let current = state.modifiers.unwrap_or_else(Modifiers::empty);
    if !current.difference(style.modifiers).is_empty() {
        out.reset_attrs();
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
        stats.style_changes += 1;
    }
    if state.fg != Some(style.fg) {
        out.set_fg(style.fg);
        state.fg = Some(style.fg);
        stats.style_changes += 1;
    }
    if state.bg != Some(style.bg) {
        out.set_bg(style.bg);
        state.bg = Some(style.bg);
        stats.style_changes += 1;
    }
    if state.modifiers != Some(style.modifiers) {
        let added = style.modifiers.difference(state.modifiers.unwrap_or_else(Modifiers::empty));
        out.set_modifiers(added);
        state.modifiers = Some(style.modifiers);
        stats.style_changes += 1;
    }
}
