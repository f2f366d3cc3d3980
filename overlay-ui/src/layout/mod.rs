//! Layout containers and the shared alignment vocabulary.

mod boxes;
mod grid;

pub use boxes::{BoxItem, BoxLayout};
pub use grid::{Grid, GridItem};

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Size};

/// Placement of a child within the space a container gives it.
///
/// `Fill` is not a size preference: the container overrides the child's size
/// to the full extent after measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Middle,
    End,
    Fill,
}

/// Main axis of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn main(self, size: Size) -> i32 {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    pub fn cross(self, size: Size) -> i32 {
        match self {
            Orientation::Vertical => size.width,
            Orientation::Horizontal => size.height,
        }
    }

    /// Build a size from main and cross extents.
    pub fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Orientation::Vertical => Size::new(cross, main),
            Orientation::Horizontal => Size::new(main, cross),
        }
    }

    /// Build a point from main and cross coordinates.
    pub fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Orientation::Vertical => Point::new(cross, main),
            Orientation::Horizontal => Point::new(main, cross),
        }
    }
}

/// Inner spacing on each side of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Padding {
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    pub const fn uniform(amount: i32) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// (leading, trailing) padding along the main axis.
    pub fn main(&self, orientation: Orientation) -> (i32, i32) {
        match orientation {
            Orientation::Vertical => (self.top, self.bottom),
            Orientation::Horizontal => (self.left, self.right),
        }
    }

    /// (leading, trailing) padding along the cross axis.
    pub fn cross(&self, orientation: Orientation) -> (i32, i32) {
        match orientation {
            Orientation::Vertical => (self.left, self.right),
            Orientation::Horizontal => (self.top, self.bottom),
        }
    }
}
