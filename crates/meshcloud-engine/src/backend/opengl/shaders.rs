//! GLSL sources for the point-cloud mesh program and the CPU-side mirror of
//! the mesh shader's indexing.
//!
//! Each mesh workgroup runs [`LOCAL_SIZE`] invocations and always declares
//! [`MAX_PRIMITIVES`] point primitives. Workgroup `g` reads records starting
//! at `g * WORKGROUP_STRIDE`; the stride is one larger than the number of
//! records a workgroup emits, so one record between consecutive workgroups is
//! never drawn, and a final partial workgroup still declares the full
//! primitive count.

/// Invocations per mesh workgroup (`local_size_x`).
pub const LOCAL_SIZE: u32 = 32;

/// Points emitted per workgroup (`max_vertices`, `max_primitives`, `gl_PrimitiveCountNV`).
pub const MAX_PRIMITIVES: u32 = 256;

/// Distance between the first records of consecutive workgroups.
pub const WORKGROUP_STRIDE: u32 = MAX_PRIMITIVES + 1;

/// Loop iterations each invocation runs.
pub const LOOPS_PER_INVOCATION: u32 = if MAX_PRIMITIVES / LOCAL_SIZE > 1 {
    MAX_PRIMITIVES / LOCAL_SIZE
} else {
    1
};

/// Record index read by `local_vertex` (0..MAX_PRIMITIVES) of `workgroup`.
pub const fn global_index(workgroup: u32, local_vertex: u32) -> u32 {
    local_vertex + workgroup * WORKGROUP_STRIDE
}

/// Smallest workgroup count that draws every record below `vertex_count`
/// any workgroup can read. Records on a skipped stride slot need no group.
pub const fn workgroups_to_cover(vertex_count: u32) -> u32 {
    if vertex_count == 0 {
        return 0;
    }
    let mut last = vertex_count - 1;
    if last % WORKGROUP_STRIDE == MAX_PRIMITIVES {
        last -= 1;
    }
    last / WORKGROUP_STRIDE + 1
}

pub const MESH_SHADER: &str = r#"#version 450
#extension GL_NV_mesh_shader : require

layout(local_size_x = 32) in;
layout(points, max_vertices = 256, max_primitives = 256) out;

layout (std430, binding = 1) buffer _vertices {
    vec4 vertices[];
} vbPosition;

layout (std430, binding = 2) buffer _colors {
    vec4 vertices[];
} vbColor;

out PerVertexData {
    vec4 color;
} outColor[];

uniform mat4 projectionMatrix;
uniform mat4 viewMatrix;
uniform mat4 modelMatrix;

void main() {
    uint local_thread_id = gl_LocalInvocationID.x;
    uint workgroup_id = gl_WorkGroupID.x;

    uint primAmount = 256;
    uint groupSize = gl_WorkGroupSize.x;
    uint primLoops = max(1, primAmount / groupSize);

    for (uint i = 0; i < primLoops; i++) {
        uint localVertexIndex = local_thread_id + i * groupSize;
        uint globalVertexIndex = localVertexIndex + (workgroup_id * (primAmount + 1));

        gl_MeshVerticesNV[localVertexIndex].gl_Position =
            projectionMatrix * viewMatrix * modelMatrix * vbPosition.vertices[globalVertexIndex];

        outColor[localVertexIndex].color = vbColor.vertices[globalVertexIndex];

        gl_PrimitiveIndicesNV[localVertexIndex] = localVertexIndex;
    }
    gl_PrimitiveCountNV = primAmount;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 450
#extension GL_NV_fragment_shader_barycentric : enable

in PerVertexData {
    vec4 color;
} inColor;

layout(location = 0) out vec4 outColor;

void main() {
    outColor = inColor.color;
}
"#;

/// Uniform names the mesh shader declares, in upload order.
pub const PROJECTION_UNIFORM: &str = "projectionMatrix";
pub const VIEW_UNIFORM: &str = "viewMatrix";
pub const MODEL_UNIFORM: &str = "modelMatrix";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants_match_glsl() {
        assert!(MESH_SHADER.contains(&format!("local_size_x = {LOCAL_SIZE}")));
        assert!(MESH_SHADER.contains(&format!(
            "max_vertices = {MAX_PRIMITIVES}, max_primitives = {MAX_PRIMITIVES}"
        )));
        assert!(MESH_SHADER.contains(&format!("uint primAmount = {MAX_PRIMITIVES};")));
        assert!(MESH_SHADER.contains("binding = 1"));
        assert!(MESH_SHADER.contains("binding = 2"));
    }

    #[test]
    fn every_invocation_loop_covers_the_primitive_budget() {
        assert_eq!(LOOPS_PER_INVOCATION * LOCAL_SIZE, MAX_PRIMITIVES);
    }

    #[test]
    fn primitive_count_is_unconditional() {
        // The shader declares the full budget even for a short final workgroup.
        assert!(MESH_SHADER.contains("gl_PrimitiveCountNV = primAmount;"));
    }

    #[test]
    fn stride_skips_one_record_per_workgroup() {
        assert_eq!(global_index(0, MAX_PRIMITIVES - 1), 255);
        assert_eq!(global_index(1, 0), 257);
        // Record 256 is read by no workgroup.
        assert!((0..4).all(|g| (0..MAX_PRIMITIVES).all(|l| global_index(g, l) != 256)));
    }

    #[test]
    fn workgroups_to_cover_counts_partial_groups() {
        assert_eq!(workgroups_to_cover(0), 0);
        assert_eq!(workgroups_to_cover(1), 1);
        assert_eq!(workgroups_to_cover(256), 1);
        // The 257th record sits on the skipped slot; no second group draws it.
        assert_eq!(workgroups_to_cover(257), 1);
        assert_eq!(workgroups_to_cover(258), 2);
        // Not a multiple of the budget: the last group over-emits degenerate points.
        assert_eq!(workgroups_to_cover(300), 2);
        assert_eq!(workgroups_to_cover(513), 2);
        assert_eq!(workgroups_to_cover(514), 2);
        assert_eq!(workgroups_to_cover(515), 3);
    }

    #[test]
    fn workgroups_to_cover_is_minimal() {
        let drawn = |groups: u32, record: u32| {
            let (g, l) = (record / WORKGROUP_STRIDE, record % WORKGROUP_STRIDE);
            g < groups && l < MAX_PRIMITIVES && global_index(g, l) == record
        };
        let reachable = |record: u32| record % WORKGROUP_STRIDE != MAX_PRIMITIVES;

        for n in 1..1200 {
            let groups = workgroups_to_cover(n);
            assert!(
                (0..n).filter(|&r| reachable(r)).all(|r| drawn(groups, r)),
                "{n} records, {groups} groups leave a record undrawn"
            );
            assert!(
                (0..n).filter(|&r| reachable(r)).any(|r| !drawn(groups - 1, r)),
                "{n} records need fewer than {groups} groups"
            );
        }
    }
}
