// Public library interface for squaremap-rs.
// The debug-layout tool drives the same modules headless.

pub mod adapter;
pub mod colors;
pub mod error;
pub mod format;
pub mod layout;
pub mod memory;
pub mod profile;
pub mod scanner;
pub mod tree;
pub mod view;

pub use adapter::TreeAdapter;
pub use error::{BuildError, LayoutError};
pub use layout::{compute_layout, Hit, HotEntry, HotMap, LayoutConfig, Rect, SplitStrategy, MAX_LAYOUT_DEPTH};
pub use view::ViewState;
