use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::scene::SlotRegistry;

/// Packs the live records of a registry in ascending slot order.
///
/// Tombstoned slots are skipped; the result length equals the registry's
/// `active_count`.
pub(crate) fn pack_active<R, T>(registry: &SlotRegistry<R>, pack: impl Fn(&R) -> T) -> Vec<T> {
    let mut packed = Vec::with_capacity(registry.active_count());
    for (_, record) in registry.iter_active() {
        packed.push(pack(record));
    }
    packed
}

/// GPU-side mirror of one registry: a packed storage buffer rebuilt from
/// scratch whenever the registry is dirty.
///
/// Publication rules:
/// - clean registry: no work, the previous buffer stays valid and bound
/// - dirty + empty: the previous buffer is released and nothing is
///   published (`len` = 0); the kernel is gated by a count uniform
/// - dirty + non-empty: a fresh buffer of exactly `active_count` records,
///   live slots in ascending index order
///
/// The mirror exclusively owns its buffer; dropping the old `wgpu::Buffer`
/// is the release.
pub struct GpuMirror<T> {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    len: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> GpuMirror<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Resynchronizes the mirror against `registry`.
    ///
    /// Returns `true` when the published buffer changed (so the caller must
    /// rebuild any bind group referencing it), `false` when the registry was
    /// clean and nothing happened.
    pub fn sync<R>(
        &mut self,
        device: &wgpu::Device,
        registry: &mut SlotRegistry<R>,
        pack: impl Fn(&R) -> T,
    ) -> bool {
        if !registry.is_dirty() {
            return false;
        }

        // Release the previous publication unconditionally.
        self.buffer = None;
        self.len = 0;

        if registry.active_count() > 0 {
            let packed = pack_active(registry, pack);
            self.buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(self.label),
                contents: bytemuck::cast_slice(&packed),
                usage: wgpu::BufferUsages::STORAGE,
            }));
            self.len = packed.len() as u32;
            log::debug!("{}: republished {} records", self.label, self.len);
        } else {
            log::debug!("{}: empty, left unpublished", self.label);
        }

        registry.clear_dirty();
        true
    }

    /// The published buffer, if any. `None` while the mirrored registry has
    /// no active records.
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Element count at last synchronization.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The GPU half of sync() is a straight create_buffer_init; the contract
    // worth pinning down is the packing pass, which is pure.

    #[test]
    fn pack_length_equals_survivors() {
        let mut reg = SlotRegistry::new();
        let mut ids = Vec::new();
        for i in 0..6u32 {
            ids.push(reg.register(i));
        }
        reg.deregister(ids[1]);
        reg.deregister(ids[4]);

        let packed = pack_active(&reg, |v| *v);
        assert_eq!(packed.len(), 4);
        assert_eq!(packed, vec![0, 2, 3, 5]);
    }

    #[test]
    fn pack_follows_ascending_slot_order_after_reuse() {
        // Register A (slot 0) and B (slot 1), drop A, register C: C reuses
        // slot 0, so the packed stream is [C, B].
        let mut reg = SlotRegistry::new();
        let a = reg.register("A");
        let _b = reg.register("B");
        reg.deregister(a);
        let c = reg.register("C");
        assert_eq!(c.index(), 0);

        let packed = pack_active(&reg, |v| *v);
        assert_eq!(packed, vec!["C", "B"]);
    }

    #[test]
    fn pack_skips_middle_tombstone() {
        let mut reg = SlotRegistry::new();
        let _a = reg.register(10);
        let b = reg.register(20);
        let _c = reg.register(30);
        reg.deregister(b);

        assert_eq!(reg.slot_count(), 3);
        assert_eq!(reg.active_count(), 2);
        let packed = pack_active(&reg, |v| *v);
        assert_eq!(packed, vec![10, 30]);
    }

    #[test]
    fn pack_of_empty_registry_is_empty() {
        let reg = SlotRegistry::<u32>::new();
        assert!(pack_active(&reg, |v| *v).is_empty());
    }
}
