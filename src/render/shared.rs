use crate::transform::{UNIT_BOX_CORNERS, UNIT_BOX_EDGES};

pub(crate) const SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
}

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let world_pos = object.model * vec4<f32>(input.position, 1.0);
    output.position = globals.view_proj * world_pos;
    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;
    output.normal = normalize(world_normal);
    output.world_pos = world_pos.xyz;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(globals.light_position.xyz - input.world_pos);
    let normal = normalize(input.normal);
    let diffuse = max(dot(normal, light_dir), 0.0);
    let ambient = 0.15;
    let intensity = globals.light_color.w;
    let light_color = globals.light_color.xyz;
    let lit_color = (ambient + diffuse * intensity) * object.color.rgb * light_color;
    return vec4<f32>(lit_color, object.color.a);
}

@vertex
fn vs_flat(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let world_pos = object.model * vec4<f32>(input.position, 1.0);
    output.position = globals.view_proj * world_pos;
    output.normal = vec3<f32>(0.0, 0.0, 1.0);
    output.world_pos = world_pos.xyz;
    return output;
}

@fragment
fn fs_flat(input: VertexOutput) -> @location(0) vec4<f32> {
    return object.color;
}
"#;

pub(crate) const DEFAULT_CUBE_VERTICES: &[f32] = &[
    // positions        // normals
    -0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5, 0.0, 0.0, 1.0,
    -0.5, 0.5, 0.5, 0.0, 0.0, 1.0, -0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 0.5, -0.5, -0.5, 0.0, 0.0,
    -1.0, 0.5, 0.5, -0.5, 0.0, 0.0, -1.0, -0.5, 0.5, -0.5, 0.0, 0.0, -1.0, -0.5, -0.5, -0.5, -1.0,
    0.0, 0.0, -0.5, -0.5, 0.5, -1.0, 0.0, 0.0, -0.5, 0.5, 0.5, -1.0, 0.0, 0.0, -0.5, 0.5, -0.5,
    -1.0, 0.0, 0.0, 0.5, -0.5, -0.5, 1.0, 0.0, 0.0, 0.5, -0.5, 0.5, 1.0, 0.0, 0.0, 0.5, 0.5, 0.5,
    1.0, 0.0, 0.0, 0.5, 0.5, -0.5, 1.0, 0.0, 0.0, -0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 0.5, -0.5,
    -0.5, 0.0, -1.0, 0.0, 0.5, -0.5, 0.5, 0.0, -1.0, 0.0, -0.5, -0.5, 0.5, 0.0, -1.0, 0.0, -0.5,
    0.5, -0.5, 0.0, 1.0, 0.0, 0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 0.5, 0.5, 0.5, 0.0, 1.0, 0.0, -0.5,
    0.5, 0.5, 0.0, 1.0, 0.0,
];

pub(crate) const DEFAULT_CUBE_INDICES: &[u32] = &[
    0, 1, 2, 0, 2, 3, // front
    4, 6, 5, 4, 7, 6, // back
    8, 9, 10, 8, 10, 11, // left
    12, 14, 13, 12, 15, 14, // right
    16, 18, 17, 16, 19, 18, // bottom
    20, 21, 22, 20, 22, 23, // top
];

/// Unit box corners laid out like the cube vertices, with zero normals.
pub(crate) fn wireframe_vertices() -> Vec<f32> {
    UNIT_BOX_CORNERS
        .iter()
        .flat_map(|corner| [corner.x, corner.y, corner.z, 0.0, 0.0, 0.0])
        .collect()
}

/// Line-list indices for the twelve box edges.
pub(crate) fn wireframe_indices() -> Vec<u32> {
    UNIT_BOX_EDGES
        .iter()
        .flat_map(|&(a, b)| [a as u32, b as u32])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_mesh_is_consistent() {
        assert_eq!(DEFAULT_CUBE_VERTICES.len(), 24 * 6);
        assert!(DEFAULT_CUBE_INDICES.iter().all(|&index| index < 24));
    }

    #[test]
    fn wireframe_has_twelve_edges() {
        assert_eq!(wireframe_vertices().len(), 8 * 6);
        let indices = wireframe_indices();
        assert_eq!(indices.len(), 24);
        assert!(indices.iter().all(|&index| index < 8));
    }
}
