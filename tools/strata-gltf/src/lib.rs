//! glTF 2.0 writing utilities for the strata exporter
//!
//! This library turns already-prepared scene data into a glTF asset:
//! - BinaryBuffer: append-only byte blob with 4-byte alignment
//! - BufferManager: typed arrays -> bufferView + accessor pairs
//! - encode_png: RGBA8 pixels -> PNG bytes for embedded images
//! - GltfBuilder: meshes, nodes, skins, materials -> `gltf_json::Root`
//! - OutputTarget / Artifacts: `.gltf` + `.bin` pair or a single `.glb`
//!
//! # Example
//!
//! ```no_run
//! use strata_gltf::*;
//! use std::path::Path;
//!
//! let mut buffer = BufferManager::new();
//! let positions = [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]];
//! let bounds = Bounds::from_values(&positions);
//! let pos = buffer
//!     .push("Triangle.POSITION", &positions, Some(&bounds.min), Some(&bounds.max))
//!     .unwrap();
//! let nrm = buffer.push("Triangle.NORMAL", &[[0.0f32, 0.0, 1.0]; 3], None, None).unwrap();
//! let idx = buffer.push("Triangle.INDICES", &[0u32, 1, 2], None, None).unwrap();
//!
//! let mut gltf = GltfBuilder::new("example");
//! let mesh = gltf.add_mesh(
//!     "Triangle",
//!     &[PrimitiveAccessors::new(VertexAccessors::new(pos, nrm), idx)],
//! );
//! let node = gltf.add_node(NodeDesc::new("Triangle").with_mesh(mesh));
//! gltf.add_scene("scene", &[node]);
//!
//! let target = OutputTarget::from_path(Path::new("triangle.glb")).unwrap();
//! let root = gltf.build(&buffer, target.buffer_uri());
//! target.encode(&root, buffer.data()).unwrap().write().unwrap();
//! ```

pub mod binary;
pub mod buffer;
pub mod container;
pub mod document;
pub mod error;
pub mod format;
pub mod image;
pub mod utils;

pub use binary::{BinaryBuffer, ByteRange};
pub use buffer::{AccessorIndex, BufferManager, ViewIndex};
pub use container::{Artifacts, OutputFormat, OutputTarget, assemble_glb};
pub use document::{
    GltfBuilder, MaterialTables, NodeDesc, PrimitiveAccessors, VertexAccessors,
};
pub use error::GltfError;
pub use format::{Component, Element, ElementFormat};
pub use image::encode_png;
pub use utils::{Bounds, align_buffer};

// Re-export commonly used gltf-json types
pub use gltf_json as json;
pub use gltf_json::validation::Checked::Valid;
