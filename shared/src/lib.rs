//! Shared types for the strata glTF tools.
//!
//! This crate holds the host scene model: the plain-data description of a 3D scene as a host
//! editor hands it over (objects, meshes, armatures, materials, images). Everything here is
//! serializable so scenes can be stored on disk and replayed through the exporter without the
//! editor being present.

pub mod ids;
pub mod math;
pub mod scene;

pub use ids::{ImageId, MaterialId, ObjectId};
pub use math::to_y_up;
pub use scene::{
    GroupWeight, HostArmature, HostBone, HostFace, HostImage, HostMaterial, HostMesh, HostObject,
    HostScene, HostVertex, Modifier, ObjectKind, SceneError, TextureSlot, UvLayer,
};
