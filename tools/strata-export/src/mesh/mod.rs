//! Mesh packing (host faces -> deduplicated vertices + per-material index lists)

mod skinning;
mod store;
mod types;

pub use skinning::{JointRemap, VertexInfluences};
pub use store::MeshStore;
pub use types::{FaceVertex, Mesh, Submesh};
