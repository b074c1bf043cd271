use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

use crate::tree::extensions::FileCategory;

/// RGB color handed to the renderer, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Back to 8-bit channels (rounded).
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Lighter variant used for highlighted (hovered/selected) boxes.
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}

/// Color for a box at `depth` when the adapter has no notion of category.
pub fn depth_color(depth: u16) -> AppColor {
    let d = depth as u32 * 10;
    AppColor::from_rgb8((d % 255) as u8, ((255 - d % 255) % 255) as u8, 255)
}

/// Color assigned to the `n`-th distinct category an adapter has seen.
pub fn sequence_color(n: usize) -> AppColor {
    let red = (n * 10) % 255;
    let green = 200 - ((n * 5) % 200);
    let blue = (n * 25) % 200;
    AppColor::from_rgb8(red as u8, green as u8, blue as u8)
}

/// Per-adapter memo of category → color.
///
/// Colors are handed out in first-seen order, so the same category always
/// gets the same color for the lifetime of the adapter regardless of its
/// content. Uses a `RefCell`; not shareable across threads.
#[derive(Debug)]
pub struct ColorMemo<K> {
    assigned: RefCell<HashMap<K, AppColor>>,
}

impl<K: Eq + Hash> Default for ColorMemo<K> {
    fn default() -> Self {
        Self {
            assigned: RefCell::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash> ColorMemo<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&self, key: K) -> AppColor {
        let mut assigned = self.assigned.borrow_mut();
        let next = assigned.len();
        *assigned.entry(key).or_insert_with(|| sequence_color(next))
    }

    /// Number of distinct categories seen so far.
    pub fn len(&self) -> usize {
        self.assigned.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.borrow().is_empty()
    }
}

/// Palette for file categories in the filesystem view.
pub fn category_color(category: FileCategory) -> AppColor {
    match category {
        FileCategory::Image => hsv_to_rgb(190.0 / 360.0, 0.68, 0.92),
        FileCategory::Media => hsv_to_rgb(15.0 / 360.0, 0.75, 0.90),
        FileCategory::Document => hsv_to_rgb(220.0 / 360.0, 0.62, 0.90),
        FileCategory::Archive => hsv_to_rgb(40.0 / 360.0, 0.78, 0.92),
        FileCategory::Code => hsv_to_rgb(130.0 / 360.0, 0.66, 0.87),
        FileCategory::Binary => hsv_to_rgb(0.0, 0.80, 0.82),
        FileCategory::Config => hsv_to_rgb(55.0 / 360.0, 0.76, 0.92),
        FileCategory::Data => hsv_to_rgb(245.0 / 360.0, 0.45, 0.82),
        FileCategory::Other => AppColor::new(0.50, 0.50, 0.55),
    }
}

/// Directories get a muted grey-ish tone, varied by name so neighbours
/// stay distinguishable, fading slightly with depth.
pub fn directory_color(name: &str, depth: u16) -> AppColor {
    let h = fnv1a(name);
    let r = 0.36 + ((h & 0xFF) as f32 / 255.0) * 0.26;
    let g = 0.34 + (((h >> 8) & 0xFF) as f32 / 255.0) * 0.24;
    let b = 0.38 + (((h >> 16) & 0xFF) as f32 / 255.0) * 0.22;
    let fade = (depth as f32 * 0.01).min(0.10);
    AppColor::new((r - fade).max(0.20), (g - fade).max(0.20), (b - fade).max(0.22))
}

fn fnv1a(s: &str) -> u32 {
    let mut h: u32 = 2166136261;
    for &b in s.as_bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    h
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> AppColor {
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as i32;
    let f = h6 - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    AppColor::new(r, g, b)
}
