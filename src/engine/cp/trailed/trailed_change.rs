use super::TrailedInteger;
use super::TrailedSet;

/// The inverse of a change to a trailed value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TrailedChange {
    Integer {
        reference: TrailedInteger,
        old_value: i64,
    },
    Inserted {
        reference: TrailedSet,
        element: usize,
    },
    Removed {
        reference: TrailedSet,
        element: usize,
    },
}
