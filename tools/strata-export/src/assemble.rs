//! Document assembly: scene graph -> buffers, accessors and glTF records
//!
//! Everything is pushed in a fixed order so identical scenes produce identical bytes:
//! per mesh its vertex attributes (POSITION, NORMAL, TEXCOORD_0, JOINTS_0, WEIGHTS_0), then
//! per submesh its indices followed by its material (which may append a PNG view); after all
//! meshes, one inverse-bind-matrix accessor per skin.

use crate::error::ExportError;
use crate::material::MaterialStore;
use crate::mesh::Mesh;
use crate::scene::SceneGraph;
use crate::settings::ExportSettings;
use strata_gltf::{
    AccessorIndex, BufferManager, GltfBuilder, GltfError, NodeDesc, PrimitiveAccessors,
    VertexAccessors, json,
};
use strata_shared::HostScene;

/// Assembled document plus the buffer it describes
#[derive(Debug)]
pub struct Assembled {
    pub root: json::Root,
    pub buffer: BufferManager,
}

/// Freeze every mesh and build the glTF document for `graph`.
///
/// `buffer_uri` is the external `.bin` location, `None` for GLB.
pub fn to_gltf(
    scene: &HostScene,
    graph: &SceneGraph<'_>,
    settings: &ExportSettings,
    buffer_uri: Option<String>,
) -> Result<Assembled, ExportError> {
    let mut buffer = BufferManager::new();
    let mut materials = MaterialStore::new(scene);
    let mut gltf = GltfBuilder::new(settings.generator.as_str());

    for entry in graph.meshes() {
        let joint_names = match graph.nodes()[entry.node].skin {
            Some(skin) if entry.store.is_skinned() => graph.joint_names(skin),
            _ => Vec::new(),
        };
        let mesh = entry.store.freeze(&joint_names);
        let attributes = push_attributes(&mut buffer, &mesh)?;

        let mut primitives = Vec::with_capacity(mesh.submeshes.len());
        for submesh in &mesh.submeshes {
            let indices = buffer
                .push(&format!("{}.INDICES", mesh.name), &submesh.indices, None, None)
                .map_err(packing)?;

            let slot = match entry.material_slots.get(submesh.material_index as usize) {
                Some(slot) => *slot,
                None => {
                    tracing::warn!(
                        mesh = mesh.name.as_str(),
                        material_index = submesh.material_index,
                        "material index past the slot list, using the default material"
                    );
                    None
                }
            };
            let material = materials.get_or_add_material(slot, &mut buffer)?;
            primitives.push(PrimitiveAccessors::new(attributes, indices).with_material(material));
        }

        gltf.add_mesh(&mesh.name, &primitives);
        tracing::debug!(
            mesh = mesh.name.as_str(),
            vertices = mesh.vertex_count(),
            primitives = primitives.len(),
            "packed mesh"
        );
    }

    for (index, skin) in graph.skins().iter().enumerate() {
        let root_name = &graph.nodes()[skin.root].name;
        let matrices = graph.inverse_bind_matrices(index);
        let ibm = buffer
            .push(&format!("{root_name}.inverseBindMatrices"), &matrices, None, None)
            .map_err(packing)?;
        let joints: Vec<u32> = graph.joints(index).into_iter().map(|j| j as u32).collect();
        gltf.add_skin(&skin.name, skin.root as u32, &joints, ibm);
        tracing::debug!(skin = skin.name.as_str(), joints = joints.len(), "packed skin");
    }

    for (index, node) in graph.nodes().iter().enumerate() {
        let mut desc = NodeDesc::new(node.name.as_str())
            .with_translation(graph.local_translation(index))
            .with_children(node.children.iter().map(|&c| c as u32).collect());
        if let Some(mesh) = node.mesh {
            desc = desc.with_mesh(mesh as u32);
        }
        if let Some(skin) = node.skin {
            desc = desc.with_skin(skin as u32);
        }
        gltf.add_node(desc);
    }

    let roots: Vec<u32> = graph.roots().iter().map(|&r| r as u32).collect();
    gltf.add_scene(&settings.scene_name, &roots);
    gltf.set_material_tables(materials.into_tables());

    let root = gltf.build(&buffer, buffer_uri);
    Ok(Assembled { root, buffer })
}

fn packing(source: GltfError) -> ExportError {
    ExportError::BufferPacking { source }
}

/// Push the per-vertex arrays of a frozen mesh, shared by all its primitives
fn push_attributes(buffer: &mut BufferManager, mesh: &Mesh) -> Result<VertexAccessors, ExportError> {
    let name = &mesh.name;
    let positions = buffer
        .push(
            &format!("{name}.POSITION"),
            &mesh.positions,
            Some(&mesh.position_bounds.min),
            Some(&mesh.position_bounds.max),
        )
        .map_err(packing)?;
    let normals = buffer
        .push(
            &format!("{name}.NORMAL"),
            &mesh.normals,
            Some(&mesh.normal_bounds.min),
            Some(&mesh.normal_bounds.max),
        )
        .map_err(packing)?;

    let mut attributes = VertexAccessors::new(positions, normals);

    if let (Some(uvs), Some(bounds)) = (&mesh.uvs, &mesh.uv_bounds) {
        attributes.uvs = Some(
            buffer
                .push(&format!("{name}.TEXCOORD_0"), uvs, Some(&bounds.min), Some(&bounds.max))
                .map_err(packing)?,
        );
    }

    if let (Some(joints), Some(weights)) = (&mesh.joints, &mesh.weights) {
        attributes.joints = Some(push_bounded(buffer, &format!("{name}.JOINTS_0"), joints)?);
        attributes.weights = Some(push_bounded(buffer, &format!("{name}.WEIGHTS_0"), weights)?);
    }

    Ok(attributes)
}

/// Push a four-component attribute with its per-component min/max
fn push_bounded<C>(
    buffer: &mut BufferManager,
    name: &str,
    values: &[[C; 4]],
) -> Result<AccessorIndex, ExportError>
where
    C: strata_gltf::Component + Into<f32>,
    [C; 4]: strata_gltf::Element,
{
    let mut min = [f32::MAX; 4];
    let mut max = [f32::MIN; 4];
    for value in values {
        for (i, &c) in value.iter().enumerate() {
            let c: f32 = c.into();
            min[i] = min[i].min(c);
            max[i] = max[i].max(c);
        }
    }
    buffer.push(name, values, Some(&min), Some(&max)).map_err(packing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_gltf::Valid;
    use strata_shared::{
        GroupWeight, HostArmature, HostBone, HostFace, HostMesh, HostObject, HostVertex,
        MaterialId, Modifier, ObjectId, ObjectKind,
    };

    fn object(name: &str, kind: ObjectKind) -> HostObject {
        HostObject {
            name: name.into(),
            translation: [0.0; 3],
            kind,
            children: Vec::new(),
            modifiers: Vec::new(),
            vertex_groups: Vec::new(),
            materials: Vec::new(),
            selected: false,
        }
    }

    fn quad(name: &str, material_indices: [u32; 2]) -> HostMesh {
        let vertex = |position| HostVertex {
            position,
            normal: [0.0, 0.0, 1.0],
            groups: vec![GroupWeight {
                group: 0,
                weight: 1.0,
            }],
        };
        HostMesh {
            name: name.into(),
            vertices: vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([1.0, 1.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
            ],
            faces: vec![
                HostFace {
                    vertices: vec![0, 1, 2],
                    material_index: material_indices[0],
                    smooth: true,
                    normal: [0.0, 0.0, 1.0],
                },
                HostFace {
                    vertices: vec![2, 3, 0],
                    material_index: material_indices[1],
                    smooth: true,
                    normal: [0.0, 0.0, 1.0],
                },
            ],
            uv_layers: Vec::new(),
        }
    }

    fn assemble(scene: &HostScene) -> Assembled {
        let graph = SceneGraph::build(scene, &scene.roots).unwrap();
        to_gltf(scene, &graph, &ExportSettings::default(), None).unwrap()
    }

    fn accessor_names(root: &json::Root) -> Vec<String> {
        root.accessors
            .iter()
            .map(|a| a.name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_attribute_order_and_names() {
        let mut body = object("Body", ObjectKind::Mesh(quad("Plane", [0, 1])));
        body.materials = vec![None, Some(MaterialId(0))];
        let scene = HostScene {
            objects: vec![body],
            roots: vec![ObjectId(0)],
            materials: vec![strata_shared::HostMaterial {
                name: "Paint".into(),
                texture_slots: Vec::new(),
            }],
            ..Default::default()
        };

        let assembled = assemble(&scene);
        let root = &assembled.root;
        assert_eq!(
            accessor_names(root),
            vec!["Plane.POSITION", "Plane.NORMAL", "Plane.INDICES", "Plane.INDICES"]
        );

        let primitives = &root.meshes[0].primitives;
        assert_eq!(primitives.len(), 2);
        // Both primitives share the vertex attributes
        let shared = |p: &json::mesh::Primitive| -> Vec<usize> {
            p.attributes.values().map(|a| a.value()).collect()
        };
        assert_eq!(shared(&primitives[0]), shared(&primitives[1]));
        assert_eq!(shared(&primitives[0]), vec![0, 1]);
        assert_eq!(primitives[0].material.map(|m| m.value()), Some(0));
        assert_eq!(primitives[1].material.map(|m| m.value()), Some(1));
        assert_eq!(root.materials[0].name.as_deref(), Some("default"));
        assert_eq!(root.materials[1].name.as_deref(), Some("Paint"));
        assert_eq!(primitives[0].mode, Valid(json::mesh::Mode::Triangles));
    }

    #[test]
    fn test_material_index_past_slots_uses_default() {
        let scene = HostScene {
            objects: vec![object("Body", ObjectKind::Mesh(quad("Plane", [3, 3])))],
            roots: vec![ObjectId(0)],
            ..Default::default()
        };
        let assembled = assemble(&scene);
        assert_eq!(assembled.root.materials.len(), 1);
        assert_eq!(assembled.root.materials[0].name.as_deref(), Some("default"));
    }

    #[test]
    fn test_skinned_mesh_gets_joints_and_skin() {
        let mut body = object("Body", ObjectKind::Mesh(quad("Plane", [0, 0])));
        body.modifiers = vec![Modifier::Armature {
            object: ObjectId(1),
        }];
        body.vertex_groups = vec!["Hip".into()];
        let rig = object(
            "Rig",
            ObjectKind::Armature(HostArmature {
                bones: vec![HostBone {
                    name: "Hip".into(),
                    head: [0.0, 0.0, 1.0],
                    parent: None,
                    children: Vec::new(),
                }],
            }),
        );
        let scene = HostScene {
            objects: vec![body, rig],
            roots: vec![ObjectId(0), ObjectId(1)],
            ..Default::default()
        };

        let assembled = assemble(&scene);
        let root = &assembled.root;
        assert_eq!(
            accessor_names(root),
            vec![
                "Plane.POSITION",
                "Plane.NORMAL",
                "Plane.JOINTS_0",
                "Plane.WEIGHTS_0",
                "Plane.INDICES",
                "Body.inverseBindMatrices",
            ]
        );

        let skin = &root.skins[0];
        assert_eq!(skin.name.as_deref(), Some("Rig"));
        assert_eq!(skin.skeleton.map(|s| s.value()), Some(0));
        let joints: Vec<usize> = skin.joints.iter().map(|j| j.value()).collect();
        assert_eq!(joints, vec![0, 1]);
        assert_eq!(root.nodes[0].skin.map(|s| s.value()), Some(0));
        assert_eq!(root.nodes[1].name.as_deref(), Some("Hip"));

        // Every vertex is fully weighted to "Hip", joint 1
        let joints_accessor = &root.accessors[2];
        assert_eq!(joints_accessor.count.0, 4);
        let max = joints_accessor.max.as_ref().unwrap();
        assert_eq!(max[0], json::Value::from(1.0f32));
    }

    #[test]
    fn test_node_translations_and_scene() {
        let mut parent = object("Parent", ObjectKind::Empty);
        parent.translation = [1.0, 2.0, 3.0];
        parent.children = vec![ObjectId(1)];
        let mut child = object("Child", ObjectKind::Empty);
        child.translation = [1.0, 2.0, 4.0];
        let scene = HostScene {
            objects: vec![parent, child],
            roots: vec![ObjectId(0)],
            ..Default::default()
        };

        let assembled = assemble(&scene);
        let root = &assembled.root;
        assert_eq!(root.nodes[0].translation, Some([1.0, 3.0, -2.0]));
        assert_eq!(root.nodes[1].translation, Some([0.0, 1.0, 0.0]));
        assert!(root.nodes[1].children.is_none());
        assert!(root.meshes.is_empty());
        assert_eq!(root.scenes[0].name.as_deref(), Some("scene"));
        assert!(assembled.buffer.data().is_empty());
    }
}
