//! Renderable instance storage.
//!
//! The trimmer writes one model matrix per weed into a fixed-capacity sink. The
//! default sink, [`InstanceBuffer`], keeps GPU-ready matrices (64 bytes each,
//! column-major) that a renderer can upload with a single `cast_slice`.

use bytemuck::{Pod, Zeroable};

use crate::core::types::Mat4;

/// Write-only destination for per-instance transforms.
pub trait InstanceSink {
    /// Number of slots. Never changes after construction.
    fn capacity(&self) -> usize;

    /// Overwrite the transform stored at `slot`.
    fn set_transform(&mut self, slot: usize, transform: Mat4);
}

/// One instance matrix as laid out in the instance vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuInstance {
    pub model: [[f32; 4]; 4],
}

impl GpuInstance {
    pub fn from_mat4(m: Mat4) -> Self {
        Self { model: m.to_cols_array_2d() }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// A zero-scale instance: its basis columns are all zero so it rasterises to nothing.
    pub fn is_hidden(&self) -> bool {
        self.model[..3].iter().all(|col| col[..3] == [0.0; 3])
    }
}

/// Fixed-capacity instance buffer. Every slot starts hidden.
pub struct InstanceBuffer {
    instances: Vec<GpuInstance>,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: vec![GpuInstance::zeroed(); capacity],
            dirty: true,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&GpuInstance> {
        self.instances.get(slot)
    }

    pub fn instances(&self) -> &[GpuInstance] {
        &self.instances
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Slots currently showing a weed.
    pub fn visible_count(&self) -> usize {
        self.instances.iter().filter(|i| !i.is_hidden()).count()
    }

    /// Returns whether anything was written since the last call, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl InstanceSink for InstanceBuffer {
    fn capacity(&self) -> usize {
        self.instances.len()
    }

    fn set_transform(&mut self, slot: usize, transform: Mat4) {
        match self.instances.get_mut(slot) {
            Some(instance) => {
                *instance = GpuInstance::from_mat4(transform);
                self.dirty = true;
            }
            None => log::warn!(
                "Dropped instance write to slot {} (capacity {})",
                slot, self.instances.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Quat, Vec3};

    #[test]
    fn test_gpu_instance_size() {
        assert_eq!(std::mem::size_of::<GpuInstance>(), 64);
    }

    #[test]
    fn test_new_buffer_all_hidden() {
        let buf = InstanceBuffer::new(8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.visible_count(), 0);
        assert_eq!(buf.as_bytes().len(), 8 * 64);
    }

    #[test]
    fn test_set_transform_roundtrip_and_hide() {
        let mut buf = InstanceBuffer::new(2);
        buf.take_dirty();
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.5),
            Quat::from_rotation_y(1.0),
            Vec3::new(1.0, 0.0, 2.0),
        );
        buf.set_transform(1, m);
        assert!(buf.take_dirty());
        assert_eq!(buf.get(1).unwrap().to_mat4(), m);
        assert_eq!(buf.visible_count(), 1);

        let hidden = Mat4::from_scale_rotation_translation(Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 0.0, 2.0));
        buf.set_transform(1, hidden);
        assert!(buf.get(1).unwrap().is_hidden());
        assert_eq!(buf.visible_count(), 0);
    }

    #[test]
    fn test_out_of_range_write_ignored() {
        let mut buf = InstanceBuffer::new(1);
        buf.take_dirty();
        buf.set_transform(5, Mat4::IDENTITY);
        assert!(!buf.take_dirty());
        assert_eq!(buf.visible_count(), 0);
    }
}
