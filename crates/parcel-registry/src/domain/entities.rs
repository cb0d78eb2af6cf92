//! # Domain Entities for the Parcel Registry
//!
//! ## Wire Encoding
//!
//! Parcels are stored in the ledger as JSON objects:
//!
//! ```text
//! {"rlregistry":"Colombo","extent":50,"parentlandid":"nil","owner":"Tomoko",
//!  "boundaries":[[0,20],[10,20],[10,0],[0,0]]}
//! ```
//!
//! The ledger key is the parcel id and is not repeated inside the record.

use serde::{Deserialize, Serialize};

/// Parent id carried by root parcels.
pub const ROOT_PARENT_ID: &str = "nil";

/// A two-dimensional integer coordinate, encoded on the wire as `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point(pub i64, pub i64);

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self(x, y)
    }

    pub const fn x(&self) -> i64 {
        self.0
    }

    pub const fn y(&self) -> i64 {
        self.1
    }
}

/// Quadrilateral outline of a parcel.
///
/// Corners are kept in a fixed winding order: top-left, top-right,
/// bottom-right, bottom-left. The fork geometry relies on this order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boundary(pub [Point; 4]);

impl Boundary {
    pub const fn new(
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
        bottom_left: Point,
    ) -> Self {
        Self([top_left, top_right, bottom_right, bottom_left])
    }

    pub const fn top_left(&self) -> Point {
        self.0[0]
    }

    pub const fn top_right(&self) -> Point {
        self.0[1]
    }

    pub const fn bottom_right(&self) -> Point {
        self.0[2]
    }

    pub const fn bottom_left(&self) -> Point {
        self.0[3]
    }

    /// True for the zero-value outline written by `createLand`.
    pub fn is_unset(&self) -> bool {
        self.0.iter().all(|p| *p == Point::default())
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> (i64, i64, i64, i64) {
        let xs = self.0.iter().map(Point::x);
        let ys = self.0.iter().map(Point::y);
        (
            xs.clone().min().unwrap_or_default(),
            ys.clone().min().unwrap_or_default(),
            xs.max().unwrap_or_default(),
            ys.max().unwrap_or_default(),
        )
    }
}

/// A land parcel record.
///
/// ## Fields
///
/// - `registry_name`: land registry the parcel is recorded in
/// - `extent`: size/area measure; unsigned, so it can never go below zero
/// - `parent_id`: [`ROOT_PARENT_ID`] for root parcels, else the forked parent
/// - `owner`: current owner
/// - `boundaries`: outline, zero-valued until set by seeding or a fork
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    #[serde(rename = "rlregistry")]
    pub registry_name: String,
    pub extent: u64,
    #[serde(rename = "parentlandid")]
    pub parent_id: String,
    pub owner: String,
    #[serde(default)]
    pub boundaries: Boundary,
}

impl Parcel {
    /// Create a parcel with an unset boundary.
    pub fn new(
        registry_name: impl Into<String>,
        extent: u64,
        parent_id: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            registry_name: registry_name.into(),
            extent,
            parent_id: parent_id.into(),
            owner: owner.into(),
            boundaries: Boundary::default(),
        }
    }

    #[must_use]
    pub fn with_boundaries(mut self, boundaries: Boundary) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
