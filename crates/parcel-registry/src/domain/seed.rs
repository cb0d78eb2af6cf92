//! # Bootstrap Parcels
//!
//! The fixed seed set written on instantiation and by `initLedger`.

use super::entities::{Boundary, Parcel, Point, ROOT_PARENT_ID};

/// Key prefix of the seed convention (`LAND0`, `LAND1`, ...).
pub const SEED_KEY_PREFIX: &str = "LAND";

/// Outline shared by every seed parcel.
pub const SEED_BOUNDARY: Boundary = Boundary::new(
    Point::new(0, 20),
    Point::new(10, 20),
    Point::new(10, 0),
    Point::new(0, 0),
);

/// `(registry name, extent, owner)` of each seed parcel, in key order.
pub const SEED_PARCELS: [(&str, u64, &str); 10] = [
    ("Colombo", 50, "Tomoko"),
    ("Delkanda", 25, "Brad"),
    ("Avissawella", 75, "Jin Soo"),
    ("Homagama", 40, "Max"),
    ("Galle", 30, "Adriana"),
    ("Balapitiya", 35, "Michel"),
    ("Elpitiya", 45, "Aarav"),
    ("Hambantota", 20, "Pari"),
    ("Tangalle", 25, "Valeria"),
    ("Colombo", 60, "Shotaro"),
];

/// Seed records keyed as `<prefix><index>`.
pub fn seed_parcels(prefix: &str) -> Vec<(String, Parcel)> {
    SEED_PARCELS
        .iter()
        .enumerate()
        .map(|(i, (registry, extent, owner))| {
            (
                format!("{prefix}{i}"),
                Parcel::new(*registry, *extent, ROOT_PARENT_ID, *owner)
                    .with_boundaries(SEED_BOUNDARY),
            )
        })
        .collect()
}
