//! Error type for glTF packing and writing

use std::path::PathBuf;

/// Errors raised while packing buffers, encoding images or writing containers.
#[derive(Debug, thiserror::Error)]
pub enum GltfError {
    /// An attribute array whose element layout has no glTF accessor mapping here.
    #[error("unsupported format for '{name}': {component:?} x {arity}")]
    UnsupportedFormat {
        name: String,
        component: gltf_json::accessor::ComponentType,
        arity: usize,
    },

    #[error("unsupported output format: {0:?} (use .gltf or .glb)")]
    UnsupportedOutput(PathBuf),

    #[error("image '{name}' is {width}x{height} but has {len} RGBA bytes")]
    ImageSize {
        name: String,
        width: u32,
        height: u32,
        len: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
