//! Error types for scene export

use strata_gltf::GltfError;
use strata_shared::SceneError;

/// Unsupported mesh topology or vertex data.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("face {face} has {vertex_count} vertices (only triangles and quads are supported)")]
    UnsupportedFace { face: usize, vertex_count: usize },

    #[error("vertex {vertex} has more than four bone influences (not implemented)")]
    TooManyBoneWeights { vertex: u32 },

    #[error("face {face} references vertex {vertex}, which does not exist")]
    VertexOutOfRange { face: usize, vertex: u32 },

    #[error("vertex {vertex} does not exist")]
    UnknownVertex { vertex: u32 },

    #[error("UV layer '{layer}' does not match the mesh's faces")]
    UvLayerMismatch { layer: String },
}

/// Fatal export failure, tagged with the stage that raised it.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("mesh packing failed for '{mesh}': {source}")]
    MeshPacking {
        mesh: String,
        #[source]
        source: MeshError,
    },

    #[error("buffer packing failed: {source}")]
    BufferPacking {
        #[source]
        source: GltfError,
    },

    #[error("material packing failed for '{material}': {source}")]
    MaterialPacking {
        material: String,
        #[source]
        source: GltfError,
    },

    #[error("container writing failed: {source}")]
    ContainerWriting {
        #[source]
        source: GltfError,
    },

    #[error("armature modifier on '{object}' targets '{target}', which is not an armature")]
    NotAnArmature { object: String, target: String },

    #[error(transparent)]
    Scene(#[from] SceneError),
}
