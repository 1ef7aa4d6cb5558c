//! Manifest parsing and build orchestration
//!
//! Parses strata.toml and runs every export it lists.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use strata_gltf::OutputTarget;
use strata_shared::HostScene;

use crate::export::{export, export_to_memory};
use crate::settings::ExportSettings;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub settings: ExportSettings,
    #[serde(default, rename = "export")]
    pub exports: Vec<ExportEntry>,
    /// Directory relative paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ExportEntry {
    /// Host scene description (JSON)
    pub scene: PathBuf,
    /// Output `.gltf` or `.glb` file
    pub output: PathBuf,
    /// Overrides `settings.selected_only` for this entry
    #[serde(default)]
    pub selected_only: Option<bool>,
}

impl Manifest {
    pub fn scene_path(&self, entry: &ExportEntry) -> PathBuf {
        self.base_dir.join(&entry.scene)
    }

    /// Output path of an entry; `output_dir` replaces the entry's directory
    pub fn output_path(&self, entry: &ExportEntry, output_dir: Option<&Path>) -> PathBuf {
        match (output_dir, entry.output.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => self.base_dir.join(&entry.output),
        }
    }

    pub fn settings_for(&self, entry: &ExportEntry) -> ExportSettings {
        let mut settings = self.settings.clone();
        if let Some(selected_only) = entry.selected_only {
            settings.selected_only = selected_only;
        }
        settings
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

/// Load a host scene description
pub fn load_scene(path: &Path) -> Result<HostScene> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open scene: {:?}", path))?;
    HostScene::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse scene: {:?}", path))
}

/// Validate a manifest without writing anything
///
/// Every scene is loaded and run through the full in-memory pipeline.
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.exports.is_empty() {
        tracing::warn!("Manifest lists no exports");
    }

    for entry in &manifest.exports {
        let scene_path = manifest.scene_path(entry);
        let output = manifest.output_path(entry, None);
        let target = OutputTarget::from_path(&output)
            .with_context(|| format!("Invalid output for {:?}", entry.scene))?;

        let scene = load_scene(&scene_path)?;
        let artifacts = export_to_memory(&scene, &target, &manifest.settings_for(entry))
            .with_context(|| format!("Failed to export {:?}", scene_path))?;
        tracing::info!(
            "{:?} -> {:?}: ok ({} bytes)",
            entry.scene,
            entry.output,
            artifacts.total_len()
        );
    }
    Ok(())
}

/// Build all exports from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    for entry in &manifest.exports {
        let scene_path = manifest.scene_path(entry);
        let output = manifest.output_path(entry, output_override);
        tracing::info!("Exporting scene: {:?} -> {:?}", scene_path, output);

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
        }

        let scene = load_scene(&scene_path)?;
        export(&scene, &output, &manifest.settings_for(entry))
            .with_context(|| format!("Failed to export {:?}", scene_path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[settings]
scene_name = "level"

[[export]]
scene = "scenes/hero.json"
output = "out/hero.glb"

[[export]]
scene = "scenes/props.json"
output = "out/props.gltf"
selected_only = true
"#;

    #[test]
    fn test_parse_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.exports.len(), 2);
        assert_eq!(manifest.settings.scene_name, "level");
        assert!(!manifest.settings.selected_only);
        assert_eq!(
            manifest.scene_path(&manifest.exports[0]),
            dir.path().join("scenes/hero.json")
        );

        let props = &manifest.exports[1];
        assert!(manifest.settings_for(props).selected_only);
        assert_eq!(
            manifest.output_path(props, Some(Path::new("build"))),
            PathBuf::from("build/props.gltf")
        );
    }

    #[test]
    fn test_validate_reports_missing_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = load_manifest(&path).unwrap();
        let err = validate(&manifest).unwrap_err();
        assert!(format!("{err:#}").contains("hero.json"));
    }

    #[test]
    fn test_validate_rejects_bad_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, "[[export]]\nscene = \"a.json\"\noutput = \"a.obj\"\n").unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert!(validate(&manifest).is_err());
    }
}
