//! glTF document construction

use crate::buffer::{AccessorIndex, BufferManager};
use gltf_json as json;
use gltf_json::validation::Checked::Valid;
use std::collections::BTreeMap;

/// Vertex attribute accessors shared by every primitive of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAccessors {
    pub positions: AccessorIndex,
    pub normals: AccessorIndex,
    pub uvs: Option<AccessorIndex>,
    pub joints: Option<AccessorIndex>,
    pub weights: Option<AccessorIndex>,
}

impl VertexAccessors {
    pub fn new(positions: AccessorIndex, normals: AccessorIndex) -> Self {
        Self {
            positions,
            normals,
            uvs: None,
            joints: None,
            weights: None,
        }
    }

    fn to_json(
        self,
    ) -> BTreeMap<json::validation::Checked<json::mesh::Semantic>, json::Index<json::Accessor>>
    {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            self.positions.as_json_index(),
        );
        attributes.insert(
            Valid(json::mesh::Semantic::Normals),
            self.normals.as_json_index(),
        );

        if let Some(uvs) = self.uvs {
            attributes.insert(
                Valid(json::mesh::Semantic::TexCoords(0)),
                uvs.as_json_index(),
            );
        }

        if let Some(joints) = self.joints {
            attributes.insert(
                Valid(json::mesh::Semantic::Joints(0)),
                joints.as_json_index(),
            );
        }

        if let Some(weights) = self.weights {
            attributes.insert(
                Valid(json::mesh::Semantic::Weights(0)),
                weights.as_json_index(),
            );
        }

        attributes
    }
}

/// One triangle-list primitive: shared vertex attributes, its own indices and material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveAccessors {
    pub attributes: VertexAccessors,
    pub indices: AccessorIndex,
    pub material: Option<u32>,
}

impl PrimitiveAccessors {
    pub fn new(attributes: VertexAccessors, indices: AccessorIndex) -> Self {
        Self {
            attributes,
            indices,
            material: None,
        }
    }

    pub fn with_material(mut self, material: u32) -> Self {
        self.material = Some(material);
        self
    }
}

/// A node with its references already resolved to indices
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub name: String,
    pub translation: Option<[f32; 3]>,
    pub children: Vec<u32>,
    pub mesh: Option<u32>,
    pub skin: Option<u32>,
}

impl NodeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: None,
            children: Vec::new(),
            mesh: None,
            skin: None,
        }
    }

    pub fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_children(mut self, children: Vec<u32>) -> Self {
        self.children = children;
        self
    }

    pub fn with_mesh(mut self, mesh: u32) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_skin(mut self, skin: u32) -> Self {
        self.skin = Some(skin);
        self
    }
}

/// Image, sampler, texture and material records, in index order
#[derive(Debug, Clone, Default)]
pub struct MaterialTables {
    pub images: Vec<json::Image>,
    pub samplers: Vec<json::texture::Sampler>,
    pub textures: Vec<json::Texture>,
    pub materials: Vec<json::Material>,
}

/// Builder for complete glTF documents
///
/// Records are appended in the order they are added and addressed by their position, so the
/// returned indices can be stored in other records straight away.
#[derive(Debug)]
pub struct GltfBuilder {
    generator: String,
    nodes: Vec<json::Node>,
    meshes: Vec<json::Mesh>,
    skins: Vec<json::Skin>,
    scenes: Vec<json::Scene>,
    tables: MaterialTables,
}

impl GltfBuilder {
    pub fn new(generator: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            skins: Vec::new(),
            scenes: Vec::new(),
            tables: MaterialTables::default(),
        }
    }

    /// Add a node
    pub fn add_node(&mut self, node: NodeDesc) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(json::Node {
            camera: None,
            children: if node.children.is_empty() {
                None
            } else {
                Some(node.children.into_iter().map(json::Index::new).collect())
            },
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: node.mesh.map(json::Index::new),
            name: Some(node.name),
            rotation: None,
            scale: None,
            translation: node.translation,
            skin: node.skin.map(json::Index::new),
            weights: None,
        });
        index
    }

    /// Get the current node count
    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Add a mesh with one triangle-list primitive per entry of `primitives`
    pub fn add_mesh(&mut self, name: &str, primitives: &[PrimitiveAccessors]) -> u32 {
        let primitives = primitives
            .iter()
            .map(|p| json::mesh::Primitive {
                attributes: p.attributes.to_json(),
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(p.indices.as_json_index()),
                material: p.material.map(json::Index::new),
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            })
            .collect();

        let index = self.meshes.len() as u32;
        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives,
            weights: None,
        });
        index
    }

    /// Add a skin
    pub fn add_skin(
        &mut self,
        name: &str,
        skeleton_root: u32,
        joints: &[u32],
        inverse_bind_matrices: AccessorIndex,
    ) -> u32 {
        let index = self.skins.len() as u32;
        self.skins.push(json::Skin {
            extensions: Default::default(),
            extras: Default::default(),
            inverse_bind_matrices: Some(inverse_bind_matrices.as_json_index()),
            joints: joints.iter().map(|j| json::Index::new(*j)).collect(),
            name: Some(name.to_string()),
            skeleton: Some(json::Index::new(skeleton_root)),
        });
        index
    }

    /// Add a scene; the first scene added becomes the default scene
    pub fn add_scene(&mut self, name: &str, root_nodes: &[u32]) -> u32 {
        let index = self.scenes.len() as u32;
        self.scenes.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            nodes: root_nodes.iter().map(|n| json::Index::new(*n)).collect(),
        });
        index
    }

    /// Install the image/sampler/texture/material records
    pub fn set_material_tables(&mut self, tables: MaterialTables) {
        self.tables = tables;
    }

    /// Build final glTF root over the buffer manager's blob, views and accessors
    ///
    /// `buffer_uri` is the location of the external `.bin` file, or `None` when the buffer is
    /// embedded in a GLB container.
    pub fn build(self, buffer: &BufferManager, buffer_uri: Option<String>) -> json::Root {
        let buffers = vec![json::Buffer {
            byte_length: buffer.data().len().into(),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri: buffer_uri,
        }];

        json::Root {
            accessors: buffer.accessors().to_vec(),
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(self.generator),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers,
            buffer_views: buffer.views().to_vec(),
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: self.tables.images,
            materials: self.tables.materials,
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: self.tables.samplers,
            scene: if self.scenes.is_empty() {
                None
            } else {
                Some(json::Index::new(0))
            },
            scenes: self.scenes,
            skins: self.skins,
            textures: self.tables.textures,
        }
    }
}
