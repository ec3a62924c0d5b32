//! Widget contract: the base [`Widget`] trait and its optional capabilities.
//!
//! Concrete widgets live outside the compositor core; see
//! [`crate::widgets`] for the small reference set used by the demo.

mod id;
mod traits;

pub use id::WidgetId;
pub use traits::{
    is_active_modal, reports_focus, z_index_of, ChildContainer, CycleBlocker, FocusCycler,
    FocusObserver, FocusState, HitTester, InvalidationAware, KeyHint, KeyHintsProvider, Modal,
    MouseAware, MultiLine, NeighborLayout, Widget, ZIndexer,
};
