//! Types for mesh packing

use strata_gltf::Bounds;

/// Deduplication key for one packed vertex.
///
/// Two face corners share a packed vertex only when the source vertex, the split normal and
/// the UV are all equal. Floats are stored as their bit patterns so the key is `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub vertex: u32,
    normal: Option<[u32; 3]>,
    uv: Option<[u32; 2]>,
}

impl FaceVertex {
    pub fn new(vertex: u32, normal: Option<[f32; 3]>, uv: Option<[f32; 2]>) -> Self {
        Self {
            vertex,
            normal: normal.map(|n| n.map(f32::to_bits)),
            uv: uv.map(|t| t.map(f32::to_bits)),
        }
    }

    /// Split normal carried by flat-shaded corners
    pub fn normal(&self) -> Option<[f32; 3]> {
        self.normal.map(|n| n.map(f32::from_bits))
    }

    pub fn uv(&self) -> Option<[f32; 2]> {
        self.uv.map(|t| t.map(f32::from_bits))
    }
}

/// Triangle indices sharing one material slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submesh {
    /// Index into the owning object's material slots
    pub material_index: u32,
    pub indices: Vec<u32>,
}

/// Frozen mesh, ready to be packed into accessors.
///
/// Every per-vertex array has [`Mesh::vertex_count`] entries and every submesh index is below
/// that count.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub position_bounds: Bounds<3>,
    pub normals: Vec<[f32; 3]>,
    pub normal_bounds: Bounds<3>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub uv_bounds: Option<Bounds<2>>,
    /// Joint indices into the skin's joint list; present only for skinned meshes
    pub joints: Option<Vec<[u16; 4]>>,
    pub weights: Option<Vec<[f32; 4]>>,
    pub submeshes: Vec<Submesh>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
