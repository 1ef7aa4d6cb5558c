//! Output containers: `.gltf` + `.bin` pair or a single binary `.glb`

use crate::error::GltfError;
use crate::utils::{align_buffer, align_buffer_with};
use gltf_json as json;
use std::path::{Path, PathBuf};

/// GLB header magic
pub const GLB_MAGIC: &[u8; 4] = b"glTF";
/// GLB container version
pub const GLB_VERSION: u32 = 2;
/// Chunk type "JSON" as little-endian u32
pub const CHUNK_JSON: u32 = 0x4E4F534A;
/// Chunk type "BIN\0" as little-endian u32
pub const CHUNK_BIN: u32 = 0x004E4942;

/// File layout selected from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON document plus a sibling `.bin` file
    Gltf,
    /// Single binary container with embedded JSON and BIN chunks
    Glb,
}

impl OutputFormat {
    /// Detect the layout from a path, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, GltfError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "gltf" => Ok(Self::Gltf),
            "glb" => Ok(Self::Glb),
            _ => Err(GltfError::UnsupportedOutput(path.to_path_buf())),
        }
    }
}

/// Where and how an asset will be written.
///
/// Resolving a target touches no files; nothing is written until [`Artifacts::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: OutputFormat,
    pub path: PathBuf,
    /// Sibling binary file for [`OutputFormat::Gltf`]
    pub bin_path: Option<PathBuf>,
}

impl OutputTarget {
    pub fn from_path(path: &Path) -> Result<Self, GltfError> {
        let format = OutputFormat::from_path(path)?;
        let bin_path = match format {
            OutputFormat::Gltf => Some(path.with_extension("bin")),
            OutputFormat::Glb => None,
        };
        Ok(Self {
            format,
            path: path.to_path_buf(),
            bin_path,
        })
    }

    /// URI for the buffer record: the `.bin` file name relative to the document, or `None`
    /// for the GLB-embedded buffer.
    pub fn buffer_uri(&self) -> Option<String> {
        self.bin_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Serialize the document and binary blob into the bytes of every output file.
    pub fn encode(&self, root: &json::Root, bin: &[u8]) -> Result<Artifacts, GltfError> {
        let json_bytes = serde_json::to_vec(root)?;
        Ok(match (&self.format, &self.bin_path) {
            (OutputFormat::Gltf, Some(bin_path)) => Artifacts::Gltf {
                json_path: self.path.clone(),
                json: json_bytes,
                bin_path: bin_path.clone(),
                bin: bin.to_vec(),
            },
            _ => Artifacts::Glb {
                path: self.path.clone(),
                bytes: assemble_glb(&json_bytes, bin),
            },
        })
    }
}

/// Fully encoded output, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifacts {
    Gltf {
        json_path: PathBuf,
        json: Vec<u8>,
        bin_path: PathBuf,
        bin: Vec<u8>,
    },
    Glb {
        path: PathBuf,
        bytes: Vec<u8>,
    },
}

impl Artifacts {
    /// Write every file of the asset.
    pub fn write(&self) -> Result<(), GltfError> {
        match self {
            Artifacts::Gltf {
                json_path,
                json,
                bin_path,
                bin,
            } => {
                write_file(bin_path, bin)?;
                write_file(json_path, json)?;
            }
            Artifacts::Glb { path, bytes } => write_file(path, bytes)?,
        }
        Ok(())
    }

    /// Total number of bytes across all files.
    pub fn total_len(&self) -> usize {
        match self {
            Artifacts::Gltf { json, bin, .. } => json.len() + bin.len(),
            Artifacts::Glb { bytes, .. } => bytes.len(),
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), GltfError> {
    std::fs::write(path, bytes).map_err(|source| GltfError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Assemble GLB binary from serialized JSON and buffer data
///
/// The JSON chunk is padded with spaces and the BIN chunk with zeros to 4-byte boundaries.
/// An empty buffer still produces a (zero-length) BIN chunk.
pub fn assemble_glb(json_bytes: &[u8], buffer_data: &[u8]) -> Vec<u8> {
    let mut json_chunk = json_bytes.to_vec();
    align_buffer_with(&mut json_chunk, b' ');

    let mut bin_chunk = buffer_data.to_vec();
    align_buffer(&mut bin_chunk);

    // Total file length
    let total_length = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();

    let mut glb = Vec::with_capacity(total_length);

    // GLB header
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json_chunk);

    // Binary chunk
    glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_chunk);

    glb
}
