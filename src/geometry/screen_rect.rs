/// Screen-space scissor rectangles
///
/// Inclusive pixel bounds. A rect is empty once either axis inverts, which
/// is what intersecting two disjoint rects produces.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ScreenRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rect that unions into anything and intersects to nothing
    pub fn cleared() -> Self {
        Self {
            x1: i32::MAX,
            y1: i32::MAX,
            x2: i32::MIN,
            y2: i32::MIN,
        }
    }

    /// Whole viewport of the given size
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width - 1,
            y2: height - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    pub fn intersect(&mut self, other: &ScreenRect) {
        self.x1 = self.x1.max(other.x1);
        self.y1 = self.y1.max(other.y1);
        self.x2 = self.x2.min(other.x2);
        self.y2 = self.y2.min(other.y2);
    }

    pub fn intersected(&self, other: &ScreenRect) -> ScreenRect {
        let mut rect = *self;
        rect.intersect(other);
        rect
    }

    pub fn union(&mut self, other: &ScreenRect) {
        self.x1 = self.x1.min(other.x1);
        self.y1 = self.y1.min(other.y1);
        self.x2 = self.x2.max(other.x2);
        self.y2 = self.y2.max(other.y2);
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.x2 - self.x1 + 1
        }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.y2 - self.y1 + 1
        }
    }
}

impl Default for ScreenRect {
    fn default() -> Self {
        Self::cleared()
    }
}
