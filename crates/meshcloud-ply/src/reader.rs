use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::PlyError;
use crate::header::{Element, Format, Header, PropertyKind, ScalarType};

/// Upper bound on rows reserved up front; larger clouds grow while reading.
const MAX_RESERVED_ROWS: usize = 1 << 20;

/// Decoded vertices: positions are `[x, y, z, 1]`, colors are RGBA.
///
/// Positions are relative to the first vertex, which lands on the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 4]>,
    pub colors: Vec<[f32; 4]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Opens and decodes a `.ply` file.
pub fn load_path(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some("ply") {
        return Err(PlyError::NotPly(path.to_path_buf()));
    }
    read_ply(BufReader::new(File::open(path)?))
}

/// Decodes a binary little-endian PLY stream.
pub fn read_ply<R: BufRead>(mut reader: R) -> Result<PointCloud, PlyError> {
    let header = Header::read(&mut reader)?;
    match header.format {
        Format::BinaryLittleEndian => {}
        Format::BinaryBigEndian => {
            return Err(PlyError::Unsupported("binary_big_endian body".into()));
        }
        Format::Ascii => return Err(PlyError::Unsupported("ascii body".into())),
    }

    let Some(vertex_at) = header.elements.iter().position(|e| e.name == "vertex") else {
        return Ok(PointCloud::default());
    };

    // Body rows are stored element by element in header order.
    for element in &header.elements[..vertex_at] {
        let row = element.row_size().ok_or_else(|| {
            PlyError::Unsupported(format!("list property in `{}` before vertices", element.name))
        })?;
        skip(&mut reader, element, row)?;
    }

    read_vertices(&mut reader, &header.elements[vertex_at])
}

/// Field positions of the attributes we keep within one vertex row.
#[derive(Default)]
struct VertexLayout {
    xyz: [Option<usize>; 3],
    rgba: [Option<usize>; 4],
    row: usize,
}

impl VertexLayout {
    fn of(element: &Element) -> Result<Self, PlyError> {
        let mut layout = Self::default();
        for property in &element.properties {
            let offset = layout.row;
            let ty = match property.kind {
                PropertyKind::Scalar(ty) => ty,
                PropertyKind::List { .. } => {
                    return Err(PlyError::Unsupported(format!(
                        "list property `{}` on vertices",
                        property.name
                    )));
                }
            };

            let slot = match (ty, property.name.as_str()) {
                (ScalarType::Float32, "x") => Some(&mut layout.xyz[0]),
                (ScalarType::Float32, "y") => Some(&mut layout.xyz[1]),
                (ScalarType::Float32, "z") => Some(&mut layout.xyz[2]),
                (ScalarType::UInt8, "red") => Some(&mut layout.rgba[0]),
                (ScalarType::UInt8, "green") => Some(&mut layout.rgba[1]),
                (ScalarType::UInt8, "blue") => Some(&mut layout.rgba[2]),
                (ScalarType::UInt8, "alpha") => Some(&mut layout.rgba[3]),
                _ => None,
            };
            if let Some(slot) = slot {
                *slot = Some(offset);
            }
            layout.row += ty.size();
        }
        Ok(layout)
    }

    fn position(&self, row: &[u8]) -> [f32; 3] {
        self.xyz.map(|at| {
            at.map_or(0.0, |i| f32::from_le_bytes([row[i], row[i + 1], row[i + 2], row[i + 3]]))
        })
    }

    fn color(&self, row: &[u8]) -> [f32; 4] {
        let mut rgba = self.rgba.map(|at| at.map_or(0.0, |i| channel(row[i])));
        // Clouds without alpha are opaque.
        if self.rgba[3].is_none() {
            rgba[3] = 1.0;
        }
        rgba
    }
}

/// 0 and 1 are taken as already normalized; anything larger is a byte value.
fn channel(value: u8) -> f32 {
    if value > 1 {
        f32::from(value) / 255.0
    } else {
        f32::from(value)
    }
}

fn read_vertices<R: Read>(reader: &mut R, element: &Element) -> Result<PointCloud, PlyError> {
    let layout = VertexLayout::of(element)?;
    let expected = element.count;
    if layout.row == 0 && expected > 0 {
        return Err(PlyError::Unsupported("vertex element without properties".into()));
    }

    // The count is untrusted; a short body ends the loop with `UnexpectedEof`.
    let reserve = expected.min(MAX_RESERVED_ROWS);
    let mut cloud = PointCloud {
        positions: Vec::with_capacity(reserve),
        colors: Vec::with_capacity(reserve),
    };
    let mut origin = None;
    let mut row = vec![0u8; layout.row];

    for vertex in 0..expected {
        reader.read_exact(&mut row).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => PlyError::UnexpectedEof {
                element: element.name.clone(),
                row: vertex,
                expected,
            },
            _ => PlyError::Io(err),
        })?;

        let [x, y, z] = layout.position(&row);
        let [ox, oy, oz] = *origin.get_or_insert([x, y, z]);
        cloud.positions.push([x - ox, y - oy, z - oz, 1.0]);
        cloud.colors.push(layout.color(&row));
    }

    Ok(cloud)
}

/// Consumes every row of `element`, each `row` bytes wide.
fn skip<R: Read>(reader: &mut R, element: &Element, row: usize) -> Result<(), PlyError> {
    let bytes = row
        .checked_mul(element.count)
        .and_then(|bytes| u64::try_from(bytes).ok())
        .ok_or_else(|| {
            PlyError::Unsupported(format!(
                "element `{}` with {} rows of {row} bytes is too large",
                element.name, element.count
            ))
        })?;

    let skipped = io::copy(&mut reader.by_ref().take(bytes), &mut io::sink())?;
    if skipped < bytes {
        // `row` is non-zero here: a zero-width element skips zero bytes.
        return Err(PlyError::UnexpectedEof {
            element: element.name.clone(),
            row: (skipped / row as u64) as usize,
            expected: element.count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XYZ_RGBA: &str = "ply\nformat binary_little_endian 1.0\nelement vertex {n}\n\
        property float x\nproperty float y\nproperty float z\n\
        property uchar red\nproperty uchar green\nproperty uchar blue\nproperty uchar alpha\n\
        end_header\n";

    fn body(vertices: &[([f32; 3], [u8; 4])]) -> Vec<u8> {
        let mut bytes = XYZ_RGBA.replace("{n}", &vertices.len().to_string()).into_bytes();
        for (xyz, rgba) in vertices {
            for v in xyz {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
            bytes.extend_from_slice(rgba);
        }
        bytes
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn recentres_on_first_vertex() {
        let bytes = body(&[
            ([10.0, 20.0, 30.0], [255, 0, 0, 255]),
            ([11.0, 18.0, 30.5], [0, 255, 0, 255]),
        ]);
        let cloud = read_ply(&bytes[..]).unwrap();

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions[0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(cloud.positions[1], [1.0, -2.0, 0.5, 1.0]);
    }

    #[test]
    fn normalizes_color_bytes() {
        let bytes = body(&[([0.0; 3], [255, 1, 0, 51])]);
        let cloud = read_ply(&bytes[..]).unwrap();
        // 1 and 0 pass through unscaled.
        assert_eq!(cloud.colors[0], [1.0, 1.0, 0.0, 0.2]);
    }

    #[test]
    fn skips_unused_properties_by_width() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\n\
            property double time\nproperty float x\nproperty float nx\nproperty float y\n\
            property float z\nproperty short label\nproperty uchar red\nend_header\n"
            .to_vec();
        bytes.extend_from_slice(&9.5f64.to_le_bytes());
        for v in [1.0f32, 7.0, 2.0, 3.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&(-4i16).to_le_bytes());
        bytes.push(255);

        let cloud = read_ply(&bytes[..]).unwrap();
        assert_eq!(cloud.positions, [[0.0, 0.0, 0.0, 1.0]]);
        assert_eq!(cloud.colors, [[1.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn elements_before_vertices_are_skipped() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement camera 2\n\
            property float fov\nelement vertex 1\nproperty float x\nproperty float y\n\
            property float z\nelement face 1\nproperty list uchar int vertex_indices\n\
            end_header\n"
            .to_vec();
        for v in [90.0f32, 60.0, 4.0, 5.0, 6.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }

        let cloud = read_ply(&bytes[..]).unwrap();
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud.colors[0], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn no_vertex_element_is_empty() {
        let cloud = read_ply(&b"ply\nelement face 0\nend_header\n"[..]).unwrap();
        assert!(cloud.is_empty());
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn truncated_body_reports_vertex() {
        let mut bytes = body(&[([1.0; 3], [0; 4]), ([2.0; 3], [0; 4])]);
        bytes.truncate(bytes.len() - 3);

        match read_ply(&bytes[..]).unwrap_err() {
            PlyError::UnexpectedEof { element, row, expected } => {
                assert_eq!((element.as_str(), row, expected), ("vertex", 1, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn truncated_leading_element_names_that_element() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement camera 3\n\
            property float fov\nelement vertex 5\nproperty float x\nend_header\n"
            .to_vec();
        bytes.extend_from_slice(&90.0f32.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);

        match read_ply(&bytes[..]).unwrap_err() {
            PlyError::UnexpectedEof { element, row, expected } => {
                assert_eq!((element.as_str(), row, expected), ("camera", 1, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn huge_vertex_count_fails_without_reserving_it() {
        let bytes = b"ply\nformat binary_little_endian 1.0\n\
            element vertex 1152921504606846976\nproperty float x\nend_header\n";

        match read_ply(&bytes[..]).unwrap_err() {
            PlyError::UnexpectedEof { element, row, .. } => {
                assert_eq!((element.as_str(), row), ("vertex", 0));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn oversized_leading_element_is_rejected() {
        let bytes = b"ply\nformat binary_little_endian 1.0\nelement cam 4611686018427387904\n\
            property double a\nelement vertex 1\nproperty float x\nend_header\n";

        let err = read_ply(&bytes[..]).unwrap_err();
        assert!(matches!(err, PlyError::Unsupported(ref what) if what.contains("`cam`")), "{err:?}");
    }

    #[test]
    fn vertices_without_properties_are_unsupported() {
        let err = read_ply(&b"ply\nelement vertex 3\nend_header\n"[..]).unwrap_err();
        assert!(matches!(err, PlyError::Unsupported(_)));
    }

    #[test]
    fn ascii_is_unsupported() {
        let err = read_ply(&b"ply\nformat ascii 1.0\nelement vertex 0\nend_header\n"[..])
            .unwrap_err();
        assert!(matches!(err, PlyError::Unsupported(_)));
    }

    #[test]
    fn vertex_lists_are_unsupported() {
        let err = read_ply(
            &b"ply\nelement vertex 1\nproperty list uchar float x\nend_header\n"[..],
        )
        .unwrap_err();
        assert!(matches!(err, PlyError::Unsupported(_)));
    }

    #[test]
    fn non_ply_path_is_rejected() {
        let err = load_path("cloud.xyz").unwrap_err();
        assert!(matches!(err, PlyError::NotPly(p) if p.ends_with("cloud.xyz")));
    }
}
