/// 4×4 transform, column-major (GLSL `mat4` layout).
pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Flattens a row-indexed matrix (`rows[row][col]`) into column-major order.
///
/// Engine-side matrix types are usually indexed as `m[row, col]`; the draw
/// shader consumes them untransposed, so element `(row, col)` lands at
/// `row + col * 4`.
pub fn mat4_from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    let mut out = [0.0; 16];
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            out[row + col * 4] = *value;
        }
    }
    out
}
