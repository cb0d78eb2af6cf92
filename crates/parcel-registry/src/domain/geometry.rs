//! # Fork Geometry
//!
//! Splits a parcel outline into two edge-adjacent children along one axis.
//!
//! ```text
//!   vertical (x = d)            horizontal (y = d)
//!   TL ----+---- TR             TL ---------- TR
//!   |  c1  |  c2  |             |      c1      |
//!   |      |      |             +--------------+  y = d
//!   BL ----+---- BR             |      c2      |
//!          x = d                BL ---------- BR
//! ```

use super::entities::{Boundary, Point};
use std::fmt;
use std::str::FromStr;

/// Direction of the dividing line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Divide along a vertical line at `xdivcentre`.
    Vertical,
    /// Divide along a horizontal line at `ydivcentre`.
    Horizontal,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "v",
            Self::Horizontal => "h",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v" => Ok(Self::Vertical),
            "h" => Ok(Self::Horizontal),
            other => Err(format!("axis must be \"v\" or \"h\", got {other:?}")),
        }
    }
}

/// The dividing line of a fork.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitLine {
    pub axis: Axis,
    pub x_divider: i64,
    pub y_divider: i64,
}

impl SplitLine {
    /// Coordinate used by `axis`; the other divider is ignored.
    pub fn divider(&self) -> i64 {
        match self.axis {
            Axis::Vertical => self.x_divider,
            Axis::Horizontal => self.y_divider,
        }
    }

    /// Whether the divider cuts `parent` into two non-empty pieces.
    ///
    /// Unset outlines have no span to cut and accept any divider.
    pub fn fits(&self, parent: &Boundary) -> bool {
        if parent.is_unset() {
            return true;
        }
        let (lo, hi) = match self.axis {
            Axis::Vertical => ordered(parent.top_left().x(), parent.top_right().x()),
            Axis::Horizontal => ordered(parent.bottom_left().y(), parent.top_left().y()),
        };
        if lo == hi {
            return true;
        }
        lo < self.divider() && self.divider() < hi
    }

    /// Compute the two child outlines.
    pub fn split(&self, parent: &Boundary) -> (Boundary, Boundary) {
        let tl = parent.top_left();
        let tr = parent.top_right();
        let br = parent.bottom_right();
        let bl = parent.bottom_left();

        match self.axis {
            Axis::Vertical => {
                let x = self.x_divider;
                (
                    Boundary::new(tl, Point::new(x, tl.y()), Point::new(x, bl.y()), bl),
                    Boundary::new(Point::new(x, tl.y()), tr, br, Point::new(x, bl.y())),
                )
            }
            Axis::Horizontal => {
                let y = self.y_divider;
                (
                    Boundary::new(tl, tr, Point::new(tr.x(), y), Point::new(bl.x(), y)),
                    Boundary::new(Point::new(tl.x(), y), Point::new(tr.x(), y), br, bl),
                )
            }
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
