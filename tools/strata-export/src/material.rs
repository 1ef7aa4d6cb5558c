//! Material and texture deduplication
//!
//! Host materials and images are keyed by handle. The first request for a handle translates
//! it and appends the glTF records; later requests return the cached index. Texture images
//! are PNG-encoded into their own buffer view of the shared binary buffer.

use crate::error::ExportError;
use hashbrown::HashMap;
use strata_gltf::image::PNG_MIME_TYPE;
use strata_gltf::{BufferManager, GltfError, MaterialTables, Valid, encode_png, json};
use strata_shared::{HostImage, HostMaterial, HostScene, ImageId, MaterialId, TextureSlot};

/// Name of the shared material used for empty slots
pub const DEFAULT_MATERIAL_NAME: &str = "default";

const DEFAULT_BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const METALLIC: f32 = 0.0;
const ROUGHNESS: f32 = 0.9;

pub struct MaterialStore<'a> {
    scene: &'a HostScene,
    textures: HashMap<ImageId, u32>,
    materials: HashMap<Option<MaterialId>, u32>,
    tables: MaterialTables,
}

impl<'a> MaterialStore<'a> {
    pub fn new(scene: &'a HostScene) -> Self {
        Self {
            scene,
            textures: HashMap::new(),
            materials: HashMap::new(),
            tables: MaterialTables::default(),
        }
    }

    /// Texture index for a host image, encoding it on first use.
    pub fn get_or_add_texture(
        &mut self,
        id: ImageId,
        image: &HostImage,
        buffer: &mut BufferManager,
    ) -> Result<u32, GltfError> {
        if let Some(&index) = self.textures.get(&id) {
            return Ok(index);
        }

        let png = encode_png(&image.name, image.width, image.height, &image.to_rgba8())?;
        let view = buffer.add_view(&image.name, &png);

        let image_index = self.tables.images.len() as u32;
        self.tables.images.push(json::Image {
            buffer_view: Some(view.as_json_index()),
            mime_type: Some(json::image::MimeType(PNG_MIME_TYPE.to_string())),
            name: Some(image.name.clone()),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        });

        let sampler_index = self.tables.samplers.len() as u32;
        self.tables.samplers.push(json::texture::Sampler {
            mag_filter: Some(Valid(json::texture::MagFilter::Nearest)),
            min_filter: Some(Valid(json::texture::MinFilter::Nearest)),
            wrap_s: Valid(json::texture::WrappingMode::Repeat),
            wrap_t: Valid(json::texture::WrappingMode::Repeat),
            ..Default::default()
        });

        let texture_index = self.tables.textures.len() as u32;
        self.tables.textures.push(json::Texture {
            name: Some(image.name.clone()),
            sampler: Some(json::Index::new(sampler_index)),
            source: json::Index::new(image_index),
            extensions: Default::default(),
            extras: Default::default(),
        });

        tracing::debug!(image = image.name.as_str(), texture_index, "added texture");
        self.textures.insert(id, texture_index);
        Ok(texture_index)
    }

    /// Material index for a slot's material; `None` is the shared default material.
    pub fn get_or_add_material(
        &mut self,
        id: Option<MaterialId>,
        buffer: &mut BufferManager,
    ) -> Result<u32, ExportError> {
        if let Some(&index) = self.materials.get(&id) {
            return Ok(index);
        }

        let material = match id {
            Some(id) => {
                let host = self.scene.material(id)?;
                self.translate(host, buffer)?
            }
            None => default_material(),
        };

        let index = self.tables.materials.len() as u32;
        tracing::debug!(material = ?material.name, index, "added material");
        self.tables.materials.push(material);
        self.materials.insert(id, index);
        Ok(index)
    }

    fn translate(
        &mut self,
        host: &HostMaterial,
        buffer: &mut BufferManager,
    ) -> Result<json::Material, ExportError> {
        let mut base_color_texture = None;
        let mut normal_texture = None;
        let mut alpha_mode = json::material::AlphaMode::Opaque;

        // Only enabled slots with an image take part
        let slots = host
            .texture_slots
            .iter()
            .flatten()
            .filter(|s| s.enabled)
            .filter_map(|s| s.image.map(|image| (s, image)));

        for (slot, image_id) in slots {
            // Colour slots never double as normal maps
            if slot.use_map_color_diffuse {
                if base_color_texture.is_none() {
                    let index = self.texture_for(host, image_id, buffer)?;
                    base_color_texture = Some(texture_info(index));
                    alpha_mode = slot_alpha_mode(slot);
                }
            } else if slot.use_map_normal && normal_texture.is_none() {
                let index = self.texture_for(host, image_id, buffer)?;
                normal_texture = Some(json::material::NormalTexture {
                    index: json::Index::new(index),
                    scale: slot.normal_factor,
                    tex_coord: 0,
                    extensions: Default::default(),
                    extras: Default::default(),
                });
            }
        }

        Ok(json::Material {
            alpha_cutoff: None,
            alpha_mode: Valid(alpha_mode),
            double_sided: false,
            pbr_metallic_roughness: pbr([1.0, 1.0, 1.0, 1.0], base_color_texture),
            normal_texture,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(host.name.clone()),
        })
    }

    fn texture_for(
        &mut self,
        host: &HostMaterial,
        image_id: ImageId,
        buffer: &mut BufferManager,
    ) -> Result<u32, ExportError> {
        let image = self.scene.image(image_id)?;
        self.get_or_add_texture(image_id, image, buffer)
            .map_err(|source| ExportError::MaterialPacking {
                material: host.name.clone(),
                source,
            })
    }

    pub fn material_count(&self) -> usize {
        self.tables.materials.len()
    }

    /// Hand the accumulated records over to the document builder
    pub fn into_tables(self) -> MaterialTables {
        self.tables
    }
}

fn slot_alpha_mode(slot: &TextureSlot) -> json::material::AlphaMode {
    match (slot.use_map_alpha, slot.use_stencil) {
        (false, _) => json::material::AlphaMode::Opaque,
        (true, true) => json::material::AlphaMode::Mask,
        (true, false) => json::material::AlphaMode::Blend,
    }
}

fn texture_info(index: u32) -> json::texture::Info {
    json::texture::Info {
        index: json::Index::new(index),
        tex_coord: 0,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

fn pbr(
    base_color: [f32; 4],
    base_color_texture: Option<json::texture::Info>,
) -> json::material::PbrMetallicRoughness {
    json::material::PbrMetallicRoughness {
        base_color_factor: json::material::PbrBaseColorFactor(base_color),
        base_color_texture,
        metallic_factor: json::material::StrengthFactor(METALLIC),
        roughness_factor: json::material::StrengthFactor(ROUGHNESS),
        metallic_roughness_texture: None,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

fn default_material() -> json::Material {
    json::Material {
        alpha_cutoff: None,
        alpha_mode: Valid(json::material::AlphaMode::Opaque),
        double_sided: false,
        pbr_metallic_roughness: pbr(DEFAULT_BASE_COLOR, None),
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
        name: Some(DEFAULT_MATERIAL_NAME.to_string()),
    }
}
