//! # Weave
//!
//! A terminal-cell UI compositor.
//!
//! Weave arranges independently written widgets on one character-cell
//! surface: it decides who draws where and in what order, who receives
//! each key and mouse event, and which parts of the surface must be
//! redrawn after something changes.
//!
//! ## Core Concepts
//!
//! - **Capabilities, not inheritance**: a widget implements the small
//!   [`Widget`] trait and opts into containers, hit testing, focus cycling,
//!   modality or z-ordering through `as_*` accessors
//! - **Damage tracking**: widgets report dirty rectangles through an
//!   [`Invalidator`]; a render pass redraws only the merged regions
//! - **Focus state machine**: focus, blur and Tab cycling escalate from
//!   the innermost widget outward, with modal and trapping scopes
//! - **Actor threads**: input polling and redraw run on their own threads,
//!   sharing the compositor through an `Arc`
//!
//! ## Example
//!
//! ```rust,ignore
//! use weave::{Compositor, CompositorConfig, Rect};
//! use weave::widgets::TextInput;
//!
//! let compositor = Compositor::new(80, 24, CompositorConfig::default());
//! let input = compositor.set_root(TextInput::new(Rect::new(0, 0, 80, 1)));
//! compositor.focus(input);
//!
//! let frame = compositor.render();
//! assert!(frame.damage.is_full());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod compositor;
pub mod damage;
pub mod input;
pub mod layout;
pub mod painter;
pub mod present;
pub mod widget;
pub mod widgets;

// Re-exports for convenience
pub use buffer::{Buffer, Cell, CellFlags, Modifiers, Rgb, Style};
pub use compositor::{Compositor, CompositorConfig, Damage, Frame};
pub use damage::{DamageTracker, Invalidator};
pub use input::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButtons, MouseEvent};
pub use layout::{merge_rects, Rect};
pub use painter::{BorderCharset, Edges, Painter};
pub use present::{DriverConfig, Presenter, RedrawDriver};
pub use widget::{
    ChildContainer, CycleBlocker, FocusCycler, FocusObserver, FocusState, HitTester,
    InvalidationAware, KeyHint, KeyHintsProvider, Modal, MouseAware, MultiLine, NeighborLayout,
    Widget, WidgetId, ZIndexer,
};
