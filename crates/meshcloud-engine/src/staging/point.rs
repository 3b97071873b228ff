use bytemuck::{Pod, Zeroable};

/// One vertex attribute record: four packed `f32`s.
///
/// Used for both streams; the color stream stores RGBA in `x, y, z, w`.
/// The layout matches a GLSL `vec4` in a std430 storage buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PointXYZW {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl PointXYZW {
    /// Size of one record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl From<[f32; 4]> for PointXYZW {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self { x, y, z, w }
    }
}

impl From<PointXYZW> for [f32; 4] {
    fn from(p: PointXYZW) -> Self {
        [p.x, p.y, p.z, p.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_sixteen_bytes() {
        assert_eq!(PointXYZW::SIZE, 16);
        assert_eq!(std::mem::align_of::<PointXYZW>(), 4);
    }

    #[test]
    fn bytes_are_packed_in_field_order() {
        let p = PointXYZW::new(1.0, 2.0, 3.0, 4.0);
        let bytes = bytemuck::bytes_of(&p);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &4.0f32.to_ne_bytes());
    }
}
