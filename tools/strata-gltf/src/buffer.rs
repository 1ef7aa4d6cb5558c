//! Typed buffer packing with automatic alignment and accessor creation

use crate::binary::BinaryBuffer;
use crate::error::GltfError;
use crate::format::Element;
use gltf_json as json;
use gltf_json::validation::Checked::Valid;

/// Accessor index returned by buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessorIndex(pub u32);

impl AccessorIndex {
    pub fn as_json_index(&self) -> json::Index<json::Accessor> {
        json::Index::new(self.0)
    }
}

/// Buffer view index returned by [`BufferManager::add_view`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewIndex(pub u32);

impl ViewIndex {
    pub fn as_json_index(&self) -> json::Index<json::buffer::View> {
        json::Index::new(self.0)
    }
}

/// Owner of the single binary buffer plus the bufferView and accessor lists describing it.
///
/// Indices handed out are positions in those lists and never change afterwards.
#[derive(Debug, Default)]
pub struct BufferManager {
    buffer: BinaryBuffer,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BufferManager {
    /// Create a new empty buffer manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current accessor count
    pub fn accessor_count(&self) -> u32 {
        self.accessors.len() as u32
    }

    /// Get the binary buffer data
    pub fn data(&self) -> &[u8] {
        self.buffer.data()
    }

    /// Get the buffer views
    pub fn views(&self) -> &[json::buffer::View] {
        &self.views
    }

    /// Get the accessors
    pub fn accessors(&self) -> &[json::Accessor] {
        &self.accessors
    }

    /// Append raw bytes as a named buffer view (no accessor).
    pub fn add_view(&mut self, name: &str, bytes: &[u8]) -> ViewIndex {
        let range = self.buffer.append(bytes);
        let index = ViewIndex(self.views.len() as u32);

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: range.length.into(),
            byte_offset: Some((range.offset as u64).into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            target: None,
        });

        index
    }

    /// Pack a typed array as a new buffer view plus an accessor over it.
    ///
    /// Component type and accessor type follow from `E`; layouts outside the supported set
    /// fail with [`GltfError::UnsupportedFormat`] before anything is appended. `min`/`max` are
    /// attached only when given (vertex attributes carry them, indices and matrices do not).
    pub fn push<E: Element>(
        &mut self,
        name: &str,
        values: &[E],
        min: Option<&[f32]>,
        max: Option<&[f32]>,
    ) -> Result<AccessorIndex, GltfError> {
        let format = E::format();
        let type_ = format
            .accessor_type()
            .ok_or_else(|| GltfError::UnsupportedFormat {
                name: name.to_string(),
                component: format.component,
                arity: format.arity,
            })?;

        let view = self.add_view(name, bytemuck::cast_slice(values));

        let accessor_idx = self.accessors.len() as u32;
        self.accessors.push(json::Accessor {
            buffer_view: Some(view.as_json_index()),
            byte_offset: Some(0u64.into()),
            count: values.len().into(),
            component_type: Valid(json::accessor::GenericComponentType(format.component)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min: min.map(bounds_value),
            max: max.map(bounds_value),
            name: Some(name.to_string()),
            normalized: false,
            sparse: None,
        });

        tracing::trace!(name, count = values.len(), "packed accessor {}", accessor_idx);
        Ok(AccessorIndex(accessor_idx))
    }

    /// Consume the manager, returning the binary blob.
    pub fn into_data(self) -> Vec<u8> {
        self.buffer.into_data()
    }
}

fn bounds_value(values: &[f32]) -> json::Value {
    json::Value::Array(values.iter().map(|&v| json::Value::from(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gltf_json::accessor::{ComponentType, Type};

    fn view_offset(view: &json::buffer::View) -> u64 {
        view.byte_offset.map(|o| o.0).unwrap_or(0)
    }

    #[test]
    fn test_push_positions_with_bounds() {
        let mut manager = BufferManager::new();
        let positions = [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]];
        let idx = manager
            .push("Tri.POSITION", &positions, Some(&[0.0, 0.0, 0.0]), Some(&[1.0, 1.0, 0.0]))
            .unwrap();

        assert_eq!(idx, AccessorIndex(0));
        assert_eq!(manager.accessor_count(), 1);
        assert_eq!(manager.views().len(), 1);
        // 3 positions * 12 bytes = 36 bytes
        assert_eq!(manager.data().len(), 36);

        let accessor = &manager.accessors()[0];
        assert_eq!(accessor.count.0, 3);
        assert_eq!(accessor.type_, Valid(Type::Vec3));
        assert_eq!(
            accessor.component_type,
            Valid(json::accessor::GenericComponentType(ComponentType::F32))
        );
        assert!(accessor.min.is_some());
        assert!(accessor.max.is_some());
        assert_eq!(accessor.name.as_deref(), Some("Tri.POSITION"));
    }

    #[test]
    fn test_push_indices_without_bounds() {
        let mut manager = BufferManager::new();
        let idx = manager.push("Tri.INDICES", &[0u32, 1, 2], None, None).unwrap();

        assert_eq!(idx, AccessorIndex(0));
        let accessor = &manager.accessors()[0];
        assert_eq!(accessor.type_, Valid(Type::Scalar));
        assert_eq!(
            accessor.component_type,
            Valid(json::accessor::GenericComponentType(ComponentType::U32))
        );
        assert!(accessor.min.is_none());
        assert!(accessor.max.is_none());
        assert_eq!(manager.data().len(), 12);
    }

    #[test]
    fn test_push_joints_and_matrices() {
        let mut manager = BufferManager::new();
        manager.push("joints", &[[0u16, 1, 2, 3]], None, None).unwrap();
        let ibm = [[0.0f32; 16]; 2];
        let idx = manager.push("ibm", &ibm, None, None).unwrap();

        assert_eq!(idx, AccessorIndex(1));
        assert_eq!(manager.accessors()[0].type_, Valid(Type::Vec4));
        assert_eq!(manager.accessors()[1].type_, Valid(Type::Mat4));
        // 8 bytes of joints, then 2 * 64 bytes of matrices
        assert_eq!(manager.data().len(), 8 + 128);
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let mut manager = BufferManager::new();
        let err = manager
            .push("colors", &[[255u8, 0, 0, 255]], None, None)
            .unwrap_err();

        match err {
            GltfError::UnsupportedFormat {
                name,
                component,
                arity,
            } => {
                assert_eq!(name, "colors");
                assert_eq!(component, ComponentType::U8);
                assert_eq!(arity, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
        // Nothing was appended
        assert!(manager.data().is_empty());
        assert!(manager.views().is_empty());
    }

    #[test]
    fn test_view_offsets_are_aligned() {
        let mut manager = BufferManager::new();
        manager.add_view("odd", &[1, 2, 3, 4, 5]);
        manager.push("uv", &[[0.0f32, 1.0]], None, None).unwrap();
        manager.add_view("png", &[0; 3]);
        manager.push("idx", &[0u32], None, None).unwrap();

        for view in manager.views() {
            assert_eq!(view_offset(view) % 4, 0);
        }
        assert_eq!(view_offset(&manager.views()[1]), 8);
    }

    #[test]
    fn test_accessor_points_at_its_view() {
        let mut manager = BufferManager::new();
        manager.add_view("image", &[0; 10]);
        let idx = manager.push("weights", &[[0.25f32; 4]], None, None).unwrap();

        let accessor = &manager.accessors()[idx.0 as usize];
        assert_eq!(accessor.buffer_view.map(|v| v.value()), Some(1));
    }
}
