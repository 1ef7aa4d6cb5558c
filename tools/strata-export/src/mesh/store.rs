//! Mutable mesh builder with face-vertex deduplication

use super::skinning::{JointRemap, VertexInfluences};
use super::types::{FaceVertex, Mesh, Submesh};
use crate::error::MeshError;
use hashbrown::HashMap;
use strata_gltf::Bounds;
use strata_shared::{HostFace, HostMesh, to_y_up};

/// Collects the faces of one host mesh and assigns packed vertex indices.
///
/// Corners are looked up by [`FaceVertex`]; the first sighting of a key creates a packed
/// vertex, later sightings reuse it. Triangles are appended to the submesh of the face's
/// material index, submeshes being created in order of first use.
#[derive(Debug)]
pub struct MeshStore<'a> {
    mesh: &'a HostMesh,
    group_names: &'a [String],
    keys: Vec<FaceVertex>,
    lookup: HashMap<FaceVertex, u32>,
    submeshes: Vec<Submesh>,
    influences: Option<Vec<VertexInfluences>>,
}

impl<'a> MeshStore<'a> {
    /// Create an empty store over `mesh`.
    ///
    /// With `skinned`, bone influences are collected from the vertex groups right away, so a
    /// vertex with too many influences fails here.
    pub fn new(
        mesh: &'a HostMesh,
        group_names: &'a [String],
        skinned: bool,
    ) -> Result<Self, MeshError> {
        let influences = if skinned {
            Some(VertexInfluences::collect(&mesh.vertices)?)
        } else {
            None
        };

        Ok(Self {
            mesh,
            group_names,
            keys: Vec::new(),
            lookup: HashMap::new(),
            submeshes: Vec::new(),
            influences,
        })
    }

    /// Create a store and ingest every face, using the active UV layer if there is one.
    pub fn from_host(
        mesh: &'a HostMesh,
        group_names: &'a [String],
        skinned: bool,
    ) -> Result<Self, MeshError> {
        let mut store = Self::new(mesh, group_names, skinned)?;

        let uv_layer = mesh.active_uv_layer();
        if let Some(layer) = uv_layer.filter(|l| l.faces.len() != mesh.faces.len()) {
            return Err(MeshError::UvLayerMismatch {
                layer: layer.name.clone(),
            });
        }

        for (i, face) in mesh.faces.iter().enumerate() {
            let uvs = uv_layer.map(|layer| layer.faces[i].as_slice());
            store.add_face(i, face, uvs)?;
        }

        tracing::debug!(
            mesh = mesh.name.as_str(),
            faces = mesh.faces.len(),
            vertices = store.vertex_count(),
            submeshes = store.submeshes.len(),
            "packed mesh faces"
        );
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.mesh.name
    }

    pub fn vertex_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_skinned(&self) -> bool {
        self.influences.is_some()
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Packed index for one face corner, creating the vertex on first sight.
    ///
    /// `vertex` must index the source mesh's vertex list.
    pub fn get_or_add_face(
        &mut self,
        vertex: u32,
        uv: Option<[f32; 2]>,
        normal: Option<[f32; 3]>,
    ) -> Result<u32, MeshError> {
        if vertex as usize >= self.mesh.vertices.len() {
            return Err(MeshError::UnknownVertex { vertex });
        }

        let key = FaceVertex::new(vertex, normal, uv);
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let index = self.keys.len() as u32;
        self.keys.push(key);
        self.lookup.insert(key, index);
        Ok(index)
    }

    /// Ingest one face; quads are split along the (0, 2) diagonal.
    pub fn add_face(
        &mut self,
        face_index: usize,
        face: &HostFace,
        uvs: Option<&[[f32; 2]]>,
    ) -> Result<(), MeshError> {
        let count = face.vertices.len();
        if count != 3 && count != 4 {
            return Err(MeshError::UnsupportedFace {
                face: face_index,
                vertex_count: count,
            });
        }
        if let Some(&vertex) = face
            .vertices
            .iter()
            .find(|&&v| v as usize >= self.mesh.vertices.len())
        {
            return Err(MeshError::VertexOutOfRange {
                face: face_index,
                vertex,
            });
        }
        if uvs.is_some_and(|uvs| uvs.len() != count) {
            let layer = self
                .mesh
                .active_uv_layer()
                .map(|l| l.name.clone())
                .unwrap_or_default();
            return Err(MeshError::UvLayerMismatch { layer });
        }

        // Flat faces split their corners off with the face normal
        let normal = if face.smooth {
            None
        } else {
            Some(to_y_up(face.normal))
        };

        let mut corners = [0u32; 4];
        for (c, &vertex) in face.vertices.iter().enumerate() {
            let uv = uvs.map(|uvs| uvs[c]);
            corners[c] = self.get_or_add_face(vertex, uv, normal)?;
        }

        let submesh = self.submesh_mut(face.material_index);
        submesh.indices.extend_from_slice(&[corners[0], corners[1], corners[2]]);
        if count == 4 {
            submesh.indices.extend_from_slice(&[corners[2], corners[3], corners[0]]);
        }
        Ok(())
    }

    fn submesh_mut(&mut self, material_index: u32) -> &mut Submesh {
        let pos = match self
            .submeshes
            .iter()
            .position(|s| s.material_index == material_index)
        {
            Some(pos) => pos,
            None => {
                self.submeshes.push(Submesh {
                    material_index,
                    indices: Vec::new(),
                });
                self.submeshes.len() - 1
            }
        };
        &mut self.submeshes[pos]
    }

    /// Produce the packed mesh.
    ///
    /// Joints and weights are emitted only for a skinned store with a non-empty joint list;
    /// vertex groups are matched to `joint_names` by name.
    pub fn freeze(&self, joint_names: &[String]) -> Mesh {
        let vertices = &self.mesh.vertices;

        let mut positions = Vec::with_capacity(self.keys.len());
        let mut normals = Vec::with_capacity(self.keys.len());
        let mut position_bounds = Bounds::new();
        let mut normal_bounds = Bounds::new();
        for key in &self.keys {
            let source = &vertices[key.vertex as usize];
            let position = to_y_up(source.position);
            let normal = key.normal().unwrap_or_else(|| to_y_up(source.normal));
            position_bounds.include(&position);
            normal_bounds.include(&normal);
            positions.push(position);
            normals.push(normal);
        }

        let (uvs, uv_bounds) = if self.keys.iter().any(|k| k.uv().is_some()) {
            // Flip to glTF's top-left texture origin
            let uvs: Vec<[f32; 2]> = self
                .keys
                .iter()
                .map(|k| k.uv().map(|[u, v]| [u, 1.0 - v]).unwrap_or([0.0, 0.0]))
                .collect();
            let bounds = Bounds::from_values(&uvs);
            (Some(uvs), Some(bounds))
        } else {
            (None, None)
        };

        let (joints, weights) = match &self.influences {
            Some(influences) if !joint_names.is_empty() => {
                let remap = JointRemap::new(&self.mesh.name, self.group_names, joint_names);
                let (joints, weights): (Vec<_>, Vec<_>) = self
                    .keys
                    .iter()
                    .map(|k| remap.apply(&influences[k.vertex as usize]))
                    .unzip();
                (Some(joints), Some(weights))
            }
            _ => (None, None),
        };

        Mesh {
            name: self.mesh.name.clone(),
            positions,
            position_bounds,
            normals,
            normal_bounds,
            uvs,
            uv_bounds,
            joints,
            weights,
            submeshes: self.submeshes.clone(),
        }
    }
}
