pub mod hotmap;
pub mod squarify;

pub use hotmap::{Hit, HotEntry, HotMap};
pub use squarify::compute_layout;

/// Axis-aligned rectangle in layout units (usually pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True when the rectangle covers no area (or is not a number).
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0) || !self.x.is_finite() || !self.y.is_finite()
    }

    /// Half-open containment: the left and top edges belong to the
    /// rectangle, the right and bottom edges to its neighbour.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrink by `pad` on every side and drop `header` from the top.
    /// Sizes never go negative.
    pub fn inset(&self, pad: f64, header: f64) -> Rect {
        let w = (self.w - 2.0 * pad).max(0.0);
        let h = (self.h - 2.0 * pad - header).max(0.0);
        Rect::new(self.x + pad, self.y + pad + header, w, h)
    }
}

/// How a node's content rectangle is divided among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitStrategy {
    /// Largest child first, always cutting the longer side of what is left.
    #[default]
    Greedy,
    /// Row-based squarification: children are grouped into strips along
    /// the shorter side while that keeps the worst aspect ratio falling.
    Rows,
}

/// Hard limit on nesting depth. Layout recurses once per level, and a
/// single-child chain does not shrink without padding or header.
pub const MAX_LAYOUT_DEPTH: u16 = 512;

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Border kept free inside every box (px)
    pub padding: f64,
    /// Strip at the top of every box reserved for its label (px)
    pub header: f64,
    /// Content narrower or shorter than this is not subdivided (px)
    pub min_side: f64,
    /// Boxes at this depth are drawn flat; the root is depth 0.
    /// Values above [`MAX_LAYOUT_DEPTH`] are clamped to it.
    pub max_depth: u16,
    pub strategy: SplitStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 2.0,
            header: 14.0,
            min_side: 1.0,
            max_depth: 64,
            strategy: SplitStrategy::Greedy,
        }
    }
}

impl LayoutConfig {
    /// `max_depth` clamped to [`MAX_LAYOUT_DEPTH`].
    pub fn depth_limit(&self) -> u16 {
        self.max_depth.min(MAX_LAYOUT_DEPTH)
    }

    /// A config without padding or header, handy when only the
    /// proportional split matters.
    pub fn flush() -> Self {
        Self {
            padding: 0.0,
            header: 0.0,
            ..Self::default()
        }
    }
}
