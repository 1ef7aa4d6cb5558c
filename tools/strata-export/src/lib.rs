//! strata-export library
//!
//! Converts a host scene description into a glTF 2.0 asset (`.gltf` + `.bin` or `.glb`).
//! The pipeline is one linear pass: flatten the scene graph, pack meshes, materials and
//! skins into a single binary buffer, assemble the document, then encode the container.

pub mod assemble;
pub mod error;
pub mod export;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod settings;

pub use error::{ExportError, MeshError};
pub use export::{ensure_gltf_extension, export, export_to_memory};
pub use mesh::{FaceVertex, Mesh, MeshStore, Submesh};
pub use scene::SceneGraph;
pub use settings::ExportSettings;

// Re-export the container types callers need alongside export_to_memory
pub use strata_gltf::{Artifacts, OutputFormat, OutputTarget};
