use super::{Mat4, VertexStream, IDENTITY};

/// Most recently supplied draw inputs.
///
/// Values persist until the matching setter is called again; nothing here is
/// consumed by a dispatch. The host must not change the memory behind a
/// host-backed [`VertexStream`] while a draw that reads it is in flight.
#[derive(Debug, Clone)]
pub struct FrameStaging {
    positions: VertexStream,
    colors: VertexStream,
    vertex_count: usize,

    point_size: f32,
    workgroups: u32,

    projection: Mat4,
    view: Mat4,
    model: Mat4,
}

impl Default for FrameStaging {
    fn default() -> Self {
        Self {
            positions: VertexStream::Empty,
            colors: VertexStream::Empty,
            vertex_count: 0,
            point_size: 1.0,
            workgroups: 0,
            projection: IDENTITY,
            view: IDENTITY,
            model: IDENTITY,
        }
    }
}

impl FrameStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages the position and color streams.
    ///
    /// Both streams must hold the same number of records; that count becomes
    /// the vertex count. A mismatch is a caller bug and is not corrected.
    pub fn set_points(&mut self, positions: VertexStream, colors: VertexStream) {
        debug_assert_eq!(
            positions.len(),
            colors.len(),
            "position and color streams must have equal length"
        );
        self.vertex_count = positions.len();
        self.positions = positions;
        self.colors = colors;
    }

    pub fn set_draw_params(&mut self, point_size: f32, workgroups: u32) {
        self.point_size = point_size;
        self.workgroups = workgroups;
    }

    /// Copies the three matrices; the caller's storage is not retained.
    pub fn set_matrices(&mut self, projection: &Mat4, view: &Mat4, model: &Mat4) {
        self.projection = *projection;
        self.view = *view;
        self.model = *model;
    }

    /// Resets everything to defaults, dropping any host views.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn positions(&self) -> &VertexStream {
        &self.positions
    }

    pub fn colors(&self) -> &VertexStream {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn workgroups(&self) -> u32 {
        self.workgroups
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }
}
