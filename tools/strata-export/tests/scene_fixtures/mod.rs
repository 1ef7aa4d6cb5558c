//! Host scenes for integration tests.
//!
//! `character()` is a small skinned, textured rig:
//! - Character (empty) -> [Body (mesh), Rig (armature)]
//! - Body: a two-quad column, lower quad textured + smooth, upper quad flat with no material
//! - Rig: Hip -> Spine

#![allow(dead_code)]

use strata_shared::{
    GroupWeight, HostArmature, HostBone, HostFace, HostImage, HostMaterial, HostMesh, HostObject,
    HostScene, HostVertex, ImageId, MaterialId, Modifier, ObjectId, ObjectKind, TextureSlot,
    UvLayer,
};

/// Number of nodes in `character()`: Character, Body, Hip, Spine, Rig
pub const CHARACTER_NODES: usize = 5;

/// Bottom row red, top row blue (rows stored bottom first)
pub const CHECKER_PIXELS: [f32; 16] = [
    1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, //
    0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0,
];

fn object(name: &str, kind: ObjectKind) -> HostObject {
    HostObject {
        name: name.to_string(),
        translation: [0.0; 3],
        kind,
        children: Vec::new(),
        modifiers: Vec::new(),
        vertex_groups: Vec::new(),
        materials: Vec::new(),
        selected: false,
    }
}

fn weighted(position: [f32; 3], groups: &[(u32, f32)]) -> HostVertex {
    HostVertex {
        position,
        normal: [0.0, -1.0, 0.0],
        groups: groups
            .iter()
            .map(|&(group, weight)| GroupWeight { group, weight })
            .collect(),
    }
}

fn body_mesh() -> HostMesh {
    HostMesh {
        name: "BodyMesh".to_string(),
        vertices: vec![
            weighted([0.0, 0.0, 0.0], &[(0, 1.0)]),
            weighted([1.0, 0.0, 0.0], &[(0, 1.0)]),
            weighted([0.0, 0.0, 1.0], &[(0, 0.5), (1, 0.5)]),
            weighted([1.0, 0.0, 1.0], &[(0, 0.5), (1, 0.5)]),
            weighted([0.0, 0.0, 2.0], &[(1, 1.0)]),
            weighted([1.0, 0.0, 2.0], &[(1, 1.0)]),
        ],
        faces: vec![
            HostFace {
                vertices: vec![0, 1, 3, 2],
                material_index: 0,
                smooth: true,
                normal: [0.0, -1.0, 0.0],
            },
            HostFace {
                vertices: vec![2, 3, 5, 4],
                material_index: 1,
                smooth: false,
                normal: [0.0, -1.0, 0.0],
            },
        ],
        uv_layers: vec![UvLayer {
            name: "UVMap".to_string(),
            active: true,
            faces: vec![
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 0.5], [0.0, 0.5]],
                vec![[0.0, 0.5], [1.0, 0.5], [1.0, 1.0], [0.0, 1.0]],
            ],
        }],
    }
}

fn rig() -> HostArmature {
    HostArmature {
        bones: vec![
            HostBone {
                name: "Hip".to_string(),
                head: [0.5, 0.0, 0.0],
                parent: None,
                children: vec![1],
            },
            HostBone {
                name: "Spine".to_string(),
                head: [0.5, 0.0, 1.0],
                parent: Some(0),
                children: Vec::new(),
            },
        ],
    }
}

pub fn character() -> HostScene {
    let mut root = object("Character", ObjectKind::Empty);
    root.translation = [0.0, 0.0, 1.0];
    root.children = vec![ObjectId(1), ObjectId(2)];

    let mut body = object("Body", ObjectKind::Mesh(body_mesh()));
    body.translation = [0.0, 0.0, 1.0];
    body.modifiers = vec![
        Modifier::Other {
            name: "Subdivision".to_string(),
        },
        Modifier::Armature {
            object: ObjectId(2),
        },
    ];
    body.vertex_groups = vec!["Hip".to_string(), "Spine".to_string()];
    body.materials = vec![Some(MaterialId(0)), None];
    body.selected = true;

    let mut rig_object = object("Rig", ObjectKind::Armature(rig()));
    rig_object.translation = [0.0, 0.0, 1.0];

    HostScene {
        objects: vec![root, body, rig_object],
        roots: vec![ObjectId(0)],
        materials: vec![HostMaterial {
            name: "Skin".to_string(),
            texture_slots: vec![Some(TextureSlot {
                enabled: true,
                image: Some(ImageId(0)),
                use_map_color_diffuse: true,
                use_map_normal: false,
                use_map_alpha: false,
                use_stencil: false,
                normal_factor: 1.0,
            })],
        }],
        images: vec![HostImage {
            name: "checker".to_string(),
            width: 2,
            height: 2,
            pixels: CHECKER_PIXELS.to_vec(),
        }],
    }
}

/// Single triangle, no UVs, no skin, no materials
pub fn triangle() -> HostScene {
    let vertex = |position| HostVertex {
        position,
        normal: [0.0, 0.0, 1.0],
        groups: Vec::new(),
    };
    let mesh = HostMesh {
        name: "Triangle".to_string(),
        vertices: vec![
            vertex([0.0, 0.0, 0.0]),
            vertex([1.0, 0.0, 0.0]),
            vertex([0.0, 1.0, 0.0]),
        ],
        faces: vec![HostFace {
            vertices: vec![0, 1, 2],
            material_index: 0,
            smooth: true,
            normal: [0.0, 0.0, 1.0],
        }],
        uv_layers: Vec::new(),
    };

    HostScene {
        objects: vec![object("Triangle", ObjectKind::Mesh(mesh))],
        roots: vec![ObjectId(0)],
        ..Default::default()
    }
}
