//! Coordinate helpers.
//!
//! Kept to plain arrays so the scene model does not pull in a math library.

/// Map a host Z-up vector to glTF's Y-up convention.
///
/// `out.x = in.x`, `out.y = in.z`, `out.z = -in.y`. Applies equally to points and directions.
#[inline]
pub fn to_y_up(v: [f32; 3]) -> [f32; 3] {
    [v[0], v[2], -v[1]]
}
