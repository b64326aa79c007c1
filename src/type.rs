use std::fmt::Debug;

use num_traits::{Float, FromPrimitive, NumCast};

/// A trait for types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Points are hashed by their
/// raw bytes for duplicate detection and exact-match lookups, which is only sound for the plain
/// IEEE float types.
pub trait Coordinate:
    private::Sealed
    + Float
    + FromPrimitive
    + NumCast
    + Default
    + Debug
    + Send
    + Sync
    + bytemuck::Pod
{
}

impl Coordinate for f32 {}

impl Coordinate for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
