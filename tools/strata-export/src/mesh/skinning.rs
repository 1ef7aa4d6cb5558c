//! Bone influences per source vertex and their remap to skin joints

use crate::error::MeshError;
use strata_shared::HostVertex;

/// Maximum number of bone influences per vertex (one JOINTS_0/WEIGHTS_0 set)
pub const MAX_INFLUENCES: usize = 4;

/// Up to four `(vertex group, weight)` pairs of one source vertex, in first-free-slot order
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexInfluences {
    slots: [Option<(u32, f32)>; MAX_INFLUENCES],
}

impl VertexInfluences {
    /// Record `weight` for `group`.
    ///
    /// A group already present has its weight replaced. A fifth distinct group fails.
    pub fn add(&mut self, vertex: u32, group: u32, weight: f32) -> Result<(), MeshError> {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|(g, _)| *g == group)
        {
            slot.1 = weight;
            return Ok(());
        }

        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(free) => {
                *free = Some((group, weight));
                Ok(())
            }
            None => Err(MeshError::TooManyBoneWeights { vertex }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Collect the positive group weights of every vertex
    pub fn collect(vertices: &[HostVertex]) -> Result<Vec<Self>, MeshError> {
        vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut influences = Self::default();
                for gw in v.groups.iter().filter(|gw| gw.weight > 0.0) {
                    influences.add(i as u32, gw.group, gw.weight)?;
                }
                Ok(influences)
            })
            .collect()
    }
}

/// Maps vertex-group numbers to positions in a skin's joint list, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointRemap {
    by_group: Vec<Option<u16>>,
}

impl JointRemap {
    /// Each group maps to the first joint carrying its name. Groups naming no joint are
    /// dropped.
    pub fn new(mesh: &str, group_names: &[String], joint_names: &[String]) -> Self {
        let by_group = group_names
            .iter()
            .map(|group| {
                let joint = joint_names
                    .iter()
                    .position(|j| j == group)
                    .and_then(|j| u16::try_from(j).ok());
                if joint.is_none() {
                    tracing::warn!(mesh, group = group.as_str(), "vertex group names no joint");
                }
                joint
            })
            .collect();
        Self { by_group }
    }

    /// Pack the influences that survive the remap; unused slots stay zero.
    pub fn apply(&self, influences: &VertexInfluences) -> ([u16; 4], [f32; 4]) {
        let mut joints = [0u16; 4];
        let mut weights = [0f32; 4];
        let mapped = influences.iter().filter_map(|(group, weight)| {
            self.by_group
                .get(group as usize)
                .copied()
                .flatten()
                .map(|joint| (joint, weight))
        });
        for (slot, (joint, weight)) in mapped.enumerate() {
            joints[slot] = joint;
            weights[slot] = weight;
        }
        (joints, weights)
    }
}
