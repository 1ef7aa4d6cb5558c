//! Scene graph flattening
//!
//! Host objects are walked depth-first and stored in an append-only node arena, so a node's
//! index is assigned before any of its descendants' and parent/child links are plain indices.
//! Armature bones become nodes of their own, parented under the node that first requested
//! the armature's skin.

use crate::error::ExportError;
use crate::mesh::MeshStore;
use glam::{Mat4, Vec3};
use hashbrown::{HashMap, HashSet};
use strata_shared::{
    HostArmature, HostObject, HostScene, MaterialId, ObjectId, ObjectKind, SceneError, to_y_up,
};

/// One node of the flattened scene
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    /// World-space position, already in glTF axes
    pub world: [f32; 3],
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Index into [`SceneGraph::meshes`]
    pub mesh: Option<usize>,
    /// Index into [`SceneGraph::skins`]
    pub skin: Option<usize>,
}

/// Skin created for one host armature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    /// Armature object's name
    pub name: String,
    pub armature: ObjectId,
    /// Node the bone subtree hangs from; the skeleton root
    pub root: usize,
}

/// Mesh-bearing node waiting to be frozen
#[derive(Debug)]
pub struct MeshEntry<'a> {
    pub store: MeshStore<'a>,
    pub material_slots: &'a [Option<MaterialId>],
    pub node: usize,
}

#[derive(Debug)]
pub struct SceneGraph<'a> {
    scene: &'a HostScene,
    nodes: Vec<Node>,
    roots: Vec<usize>,
    meshes: Vec<MeshEntry<'a>>,
    skins: Vec<Skin>,
    skin_lookup: HashMap<ObjectId, usize>,
    visited: HashSet<ObjectId>,
}

impl<'a> SceneGraph<'a> {
    /// Flatten the subtrees of `roots`, in order.
    pub fn build(scene: &'a HostScene, roots: &[ObjectId]) -> Result<Self, ExportError> {
        let mut graph = Self {
            scene,
            nodes: Vec::new(),
            roots: Vec::new(),
            meshes: Vec::new(),
            skins: Vec::new(),
            skin_lookup: HashMap::new(),
            visited: HashSet::new(),
        };

        for &id in roots {
            let node = graph.add_object(id, None)?;
            graph.roots.push(node);
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            meshes = graph.meshes.len(),
            skins = graph.skins.len(),
            "flattened scene graph"
        );
        Ok(graph)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn meshes(&self) -> &[MeshEntry<'a>] {
        &self.meshes
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    fn push_node(&mut self, name: &str, world: [f32; 3], parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            world,
            parent,
            children: Vec::new(),
            mesh: None,
            skin: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    fn add_object(&mut self, id: ObjectId, parent: Option<usize>) -> Result<usize, ExportError> {
        if !self.visited.insert(id) {
            return Err(SceneError::RepeatedObject(id).into());
        }
        let scene = self.scene;
        let object = scene.object(id)?;
        let node = self.push_node(&object.name, to_y_up(object.translation), parent);

        match &object.kind {
            ObjectKind::Mesh(mesh) => {
                let binding = object.armature_binding();
                let store = MeshStore::from_host(mesh, &object.vertex_groups, binding.is_some())
                    .map_err(|source| ExportError::MeshPacking {
                        mesh: mesh.name.clone(),
                        source,
                    })?;

                // A node may only carry a skin together with a mesh
                if store.vertex_count() > 0 {
                    if let Some(armature) = binding {
                        let skin = self.get_or_create_skin(node, object, armature)?;
                        self.nodes[node].skin = Some(skin);
                    }
                    self.nodes[node].mesh = Some(self.meshes.len());
                    self.meshes.push(MeshEntry {
                        store,
                        material_slots: &object.materials,
                        node,
                    });
                }
            }
            ObjectKind::Armature(_) => {
                self.get_or_create_skin(node, object, id)?;
            }
            ObjectKind::Empty => {}
        }

        for &child in &object.children {
            self.add_object(child, Some(node))?;
        }
        Ok(node)
    }

    /// Skin for `armature`, creating it (and its bone nodes under `node`) on first request
    fn get_or_create_skin(
        &mut self,
        node: usize,
        requester: &HostObject,
        armature: ObjectId,
    ) -> Result<usize, ExportError> {
        if let Some(&skin) = self.skin_lookup.get(&armature) {
            return Ok(skin);
        }

        let scene = self.scene;
        let armature_object = scene.object(armature)?;
        let bones = match &armature_object.kind {
            ObjectKind::Armature(bones) => bones,
            _ => {
                return Err(ExportError::NotAnArmature {
                    object: requester.name.clone(),
                    target: armature_object.name.clone(),
                });
            }
        };

        let skin = self.skins.len();
        self.skins.push(Skin {
            name: armature_object.name.clone(),
            armature,
            root: node,
        });
        self.skin_lookup.insert(armature, skin);

        let origin = to_y_up(armature_object.translation);
        let mut placed = HashSet::new();
        for (bone, _) in bones.root_bones() {
            self.add_bone(&armature_object.name, bones, bone, origin, node, &mut placed)?;
        }

        tracing::debug!(
            armature = armature_object.name.as_str(),
            bones = bones.bones.len(),
            "created skin"
        );
        Ok(skin)
    }

    fn add_bone(
        &mut self,
        name: &str,
        armature: &HostArmature,
        bone: usize,
        origin: [f32; 3],
        parent: usize,
        placed: &mut HashSet<usize>,
    ) -> Result<(), SceneError> {
        if !placed.insert(bone) {
            return Err(SceneError::RepeatedBone {
                armature: name.to_string(),
                bone,
            });
        }
        let host = &armature.bones[bone];
        let head = Vec3::from(origin) + Vec3::from(to_y_up(host.head));
        let node = self.push_node(&host.name, head.to_array(), Some(parent));
        for &child in &host.children {
            if child < armature.bones.len() {
                self.add_bone(name, armature, child, origin, node, placed)?;
            }
        }
        Ok(())
    }

    /// Pre-order traversal of the subtree rooted at `root`
    pub fn traverse(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        order
    }

    /// Node position relative to its parent (no rotation or scale is carried)
    pub fn local_translation(&self, node: usize) -> [f32; 3] {
        let node = &self.nodes[node];
        let world = Vec3::from(node.world);
        match node.parent {
            Some(parent) => (world - Vec3::from(self.nodes[parent].world)).to_array(),
            None => world.to_array(),
        }
    }

    /// Joint node indices of a skin
    pub fn joints(&self, skin: usize) -> Vec<usize> {
        self.traverse(self.skins[skin].root)
    }

    pub fn joint_names(&self, skin: usize) -> Vec<String> {
        self.joints(skin)
            .into_iter()
            .map(|j| self.nodes[j].name.clone())
            .collect()
    }

    /// One translation-only inverse bind matrix per joint, column-major
    pub fn inverse_bind_matrices(&self, skin: usize) -> Vec<[f32; 16]> {
        self.joints(skin)
            .into_iter()
            .map(|j| Mat4::from_translation(-Vec3::from(self.nodes[j].world)).to_cols_array())
            .collect()
    }
}
