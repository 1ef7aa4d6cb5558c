//! Host scene model.
//!
//! A [`HostScene`] is the complete hand-off from a host editor: a forest of objects plus the
//! materials and images they reference. Entities refer to each other through the handles in
//! [`crate::ids`]; nothing in here is interpreted, it is only stored and looked up.
//!
//! Coordinates are in the host convention (right-handed, Z up). Conversion to glTF's Y-up
//! space happens in the exporter via [`crate::to_y_up`].

use crate::ids::{ImageId, MaterialId, ObjectId};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Errors raised while loading or resolving a host scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene references missing {0}")]
    MissingObject(ObjectId),

    #[error("scene references missing {0}")]
    MissingMaterial(MaterialId),

    #[error("scene references missing {0}")]
    MissingImage(ImageId),

    /// Reached twice while walking the hierarchy: a cycle, or a child listed under two parents.
    #[error("{0} appears more than once in the object hierarchy")]
    RepeatedObject(ObjectId),

    #[error("bone {bone} of armature '{armature}' appears more than once in the bone hierarchy")]
    RepeatedBone { armature: String, bone: usize },

    #[error("failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The complete scene handed over by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostScene {
    /// Every object in the scene; [`ObjectId`] `n` is `objects[n]`.
    pub objects: Vec<HostObject>,
    /// Top-level objects, in the order the host lists them.
    pub roots: Vec<ObjectId>,
    #[serde(default)]
    pub materials: Vec<HostMaterial>,
    #[serde(default)]
    pub images: Vec<HostImage>,
}

impl HostScene {
    /// Parse a scene from its JSON description.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a scene from a JSON stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SceneError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn object(&self, id: ObjectId) -> Result<&HostObject, SceneError> {
        self.objects
            .get(id.index())
            .ok_or(SceneError::MissingObject(id))
    }

    pub fn material(&self, id: MaterialId) -> Result<&HostMaterial, SceneError> {
        self.materials
            .get(id.index())
            .ok_or(SceneError::MissingMaterial(id))
    }

    pub fn image(&self, id: ImageId) -> Result<&HostImage, SceneError> {
        self.images.get(id.index()).ok_or(SceneError::MissingImage(id))
    }

    /// Objects to export when only the selection is wanted.
    ///
    /// Walks the hierarchy from [`HostScene::roots`] in pre-order and returns every selected
    /// object that has no selected ancestor. Each returned object stands for its whole subtree.
    pub fn selected_roots(&self) -> Result<Vec<ObjectId>, SceneError> {
        let mut selected = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(SceneError::RepeatedObject(id));
            }
            let object = self.object(id)?;
            if object.selected {
                selected.push(id);
                continue;
            }
            stack.extend(object.children.iter().rev().copied());
        }
        Ok(selected)
    }
}

/// One object of the host scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostObject {
    pub name: String,
    /// World-space translation of the object.
    #[serde(default)]
    pub translation: [f32; 3],
    pub kind: ObjectKind,
    #[serde(default)]
    pub children: Vec<ObjectId>,
    /// Modifier stack, in evaluation order.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Vertex group names; a [`GroupWeight::group`] indexes this list.
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    /// Material slots; a [`HostFace::material_index`] indexes this list.
    #[serde(default)]
    pub materials: Vec<Option<MaterialId>>,
    #[serde(default)]
    pub selected: bool,
}

impl HostObject {
    /// The armature this object is bound to, if any modifier requests skinning.
    ///
    /// The first armature modifier wins.
    pub fn armature_binding(&self) -> Option<ObjectId> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Armature { object } => Some(*object),
            Modifier::Other { .. } => None,
        })
    }
}

/// What an object carries besides its transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Mesh(HostMesh),
    Armature(HostArmature),
    Empty,
}

/// Entry of an object's modifier stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    /// Deform the mesh with the bones of `object`.
    Armature { object: ObjectId },
    /// Any modifier the exporter does not interpret.
    Other { name: String },
}

/// Polygon mesh data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostMesh {
    pub name: String,
    pub vertices: Vec<HostVertex>,
    pub faces: Vec<HostFace>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
}

impl HostMesh {
    /// The UV layer marked active, if any.
    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.uv_layers.iter().find(|l| l.active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Vertex group memberships.
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    pub group: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostFace {
    /// Vertex indices of the face corners, counter-clockwise.
    pub vertices: Vec<u32>,
    #[serde(default)]
    pub material_index: u32,
    /// Smooth-shaded faces use per-vertex normals, flat faces use [`HostFace::normal`].
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub normal: [f32; 3],
}

/// Per-corner texture coordinates for every face of a mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    /// `faces[f][c]` is the UV of corner `c` of face `f`.
    pub faces: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostArmature {
    pub bones: Vec<HostBone>,
}

impl HostArmature {
    /// Bones without a parent, in list order.
    pub fn root_bones(&self) -> impl Iterator<Item = (usize, &HostBone)> {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent.is_none())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostBone {
    pub name: String,
    /// Head position in armature space.
    pub head: [f32; 3],
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostMaterial {
    pub name: String,
    #[serde(default)]
    pub texture_slots: Vec<Option<TextureSlot>>,
}

/// A texture slot of a host material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureSlot {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub image: Option<ImageId>,
    #[serde(default)]
    pub use_map_color_diffuse: bool,
    #[serde(default)]
    pub use_map_normal: bool,
    #[serde(default)]
    pub use_map_alpha: bool,
    #[serde(default)]
    pub use_stencil: bool,
    #[serde(default = "default_normal_factor")]
    pub normal_factor: f32,
}

fn default_true() -> bool {
    true
}

fn default_normal_factor() -> f32 {
    1.0
}

/// Raw image pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// RGBA floats in `0..=1`, rows stored bottom-to-top.
    pub pixels: Vec<f32>,
}

impl HostImage {
    /// Quantize the float pixels to RGBA8, keeping the host's bottom-to-top row order.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|p| (p.clamp(0.0, 1.0) * 255.0) as u8)
            .collect()
    }
}
