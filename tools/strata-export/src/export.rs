//! Export entry points

use crate::assemble::to_gltf;
use crate::error::ExportError;
use crate::scene::SceneGraph;
use crate::settings::ExportSettings;
use std::path::{Path, PathBuf};
use strata_gltf::{Artifacts, OutputFormat, OutputTarget};
use strata_shared::HostScene;

/// Run the whole pipeline in memory and return the encoded files for `target`.
pub fn export_to_memory(
    scene: &HostScene,
    target: &OutputTarget,
    settings: &ExportSettings,
) -> Result<Artifacts, ExportError> {
    let roots = if settings.selected_only {
        scene.selected_roots()?
    } else {
        scene.roots.clone()
    };

    let graph = SceneGraph::build(scene, &roots)?;
    let assembled = to_gltf(scene, &graph, settings, target.buffer_uri())?;

    target
        .encode(&assembled.root, assembled.buffer.data())
        .map_err(|source| ExportError::ContainerWriting { source })
}

/// Export `scene` to `path` (`.gltf` or `.glb`).
///
/// The output extension is checked before any work is done, and files are only written once
/// the complete asset has been built.
pub fn export(
    scene: &HostScene,
    path: &Path,
    settings: &ExportSettings,
) -> Result<(), ExportError> {
    let target =
        OutputTarget::from_path(path).map_err(|source| ExportError::ContainerWriting { source })?;

    let artifacts = export_to_memory(scene, &target, settings)?;
    artifacts
        .write()
        .map_err(|source| ExportError::ContainerWriting { source })?;

    tracing::info!(
        "Exported {:?} ({:?}, {} bytes)",
        path,
        target.format,
        artifacts.total_len()
    );
    Ok(())
}

/// Append `.gltf` unless the path already ends in `.gltf` or `.glb`
pub fn ensure_gltf_extension(path: &Path) -> PathBuf {
    if OutputFormat::from_path(path).is_ok() {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".gltf");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_gltf::GltfError;
    use strata_shared::{HostObject, ObjectId, ObjectKind};

    fn empty(name: &str, selected: bool, children: Vec<ObjectId>) -> HostObject {
        HostObject {
            name: name.into(),
            translation: [0.0; 3],
            kind: ObjectKind::Empty,
            children,
            modifiers: Vec::new(),
            vertex_groups: Vec::new(),
            materials: Vec::new(),
            selected,
        }
    }

    #[test]
    fn test_ensure_extension() {
        assert_eq!(ensure_gltf_extension(Path::new("a.glb")), PathBuf::from("a.glb"));
        assert_eq!(ensure_gltf_extension(Path::new("a.GLTF")), PathBuf::from("a.GLTF"));
        assert_eq!(ensure_gltf_extension(Path::new("out")), PathBuf::from("out.gltf"));
        assert_eq!(
            ensure_gltf_extension(Path::new("dir/out.obj")),
            PathBuf::from("dir/out.obj.gltf")
        );
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.fbx");
        let err = export(&HostScene::default(), &path, &ExportSettings::default()).unwrap_err();

        assert!(matches!(
            err,
            ExportError::ContainerWriting {
                source: GltfError::UnsupportedOutput(_)
            }
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_selected_only_roots() {
        let scene = HostScene {
            objects: vec![
                empty("Root", false, vec![ObjectId(1)]),
                empty("Picked", true, vec![]),
            ],
            roots: vec![ObjectId(0)],
            ..Default::default()
        };
        let target = OutputTarget::from_path(Path::new("scene.gltf")).unwrap();
        let settings = ExportSettings {
            selected_only: true,
            ..Default::default()
        };

        let artifacts = export_to_memory(&scene, &target, &settings).unwrap();
        let Artifacts::Gltf { json, bin, .. } = artifacts else {
            panic!("expected a .gltf pair");
        };
        let root: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(root["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(root["nodes"][0]["name"], "Picked");
        assert_eq!(root["scenes"][0]["nodes"][0], 0);
        assert_eq!(root["buffers"][0]["uri"], "scene.bin");
        assert!(bin.is_empty());
    }
}
