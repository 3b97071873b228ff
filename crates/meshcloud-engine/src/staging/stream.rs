use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use super::PointXYZW;

/// A run of vertex records the backend uploads on every draw.
///
/// Host-supplied arrays are never copied: [`VertexStream::from_host`] keeps a
/// raw view into memory the host owns. Rust callers without such a contract
/// hand over an owned, shared slice instead. Cloning a stream clones the view
/// (or bumps the `Arc`), never the records.
#[derive(Clone, Default)]
pub enum VertexStream {
    #[default]
    Empty,
    Host(HostView),
    Owned(Arc<[PointXYZW]>),
}

/// Unowned view into host memory.
#[derive(Clone, Copy)]
pub struct HostView {
    ptr: NonNull<PointXYZW>,
    len: usize,
}

impl VertexStream {
    /// Wraps a host array without copying it.
    ///
    /// A null `ptr` or a zero `len` yields [`VertexStream::Empty`].
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` initialized, properly aligned records that stay
    /// valid and unmodified until they are consumed by the next buffer
    /// initialization or draw that reads this stream.
    pub unsafe fn from_host(ptr: *const PointXYZW, len: usize) -> Self {
        match NonNull::new(ptr.cast_mut()) {
            Some(ptr) if len > 0 => Self::Host(HostView { ptr, len }),
            _ => Self::Empty,
        }
    }

    pub fn owned(points: impl Into<Arc<[PointXYZW]>>) -> Self {
        let points = points.into();
        if points.is_empty() {
            Self::Empty
        } else {
            Self::Owned(points)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Host(view) => view.len,
            Self::Owned(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[PointXYZW] {
        match self {
            Self::Empty => &[],
            // SAFETY: `from_host` requires the view to stay valid while it is in use.
            Self::Host(view) => unsafe { std::slice::from_raw_parts(view.ptr.as_ptr(), view.len) },
            Self::Owned(points) => &points[..],
        }
    }

    /// The first `count` records as bytes, clamped to the stream length.
    pub fn prefix_bytes(&self, count: usize) -> &[u8] {
        let points = self.as_slice();
        bytemuck::cast_slice(&points[..count.min(points.len())])
    }
}

impl fmt::Debug for VertexStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("VertexStream::Empty"),
            Self::Host(view) => write!(f, "VertexStream::Host({} records @ {:p})", view.len, view.ptr),
            Self::Owned(points) => write!(f, "VertexStream::Owned({} records)", points.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<PointXYZW> {
        (0..n).map(|i| PointXYZW::new(i as f32, 0.0, 0.0, 1.0)).collect()
    }

    #[test]
    fn null_host_pointer_is_empty() {
        let stream = unsafe { VertexStream::from_host(std::ptr::null(), 12) };
        assert!(stream.is_empty());
        assert!(stream.as_slice().is_empty());
    }

    #[test]
    fn host_view_reads_without_copying() {
        let data = points(3);
        let stream = unsafe { VertexStream::from_host(data.as_ptr(), data.len()) };
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.as_slice().as_ptr(), data.as_ptr());
        assert_eq!(stream.as_slice()[2].x, 2.0);
    }

    #[test]
    fn owned_empty_collapses_to_empty() {
        assert!(matches!(VertexStream::owned(Vec::new()), VertexStream::Empty));
    }

    #[test]
    fn prefix_bytes_is_clamped() {
        let stream = VertexStream::owned(points(2));
        assert_eq!(stream.prefix_bytes(1).len(), PointXYZW::SIZE);
        assert_eq!(stream.prefix_bytes(2).len(), 2 * PointXYZW::SIZE);
        assert_eq!(stream.prefix_bytes(10).len(), 2 * PointXYZW::SIZE);
        assert!(stream.prefix_bytes(0).is_empty());
    }
}
