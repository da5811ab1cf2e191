use super::registry::{SlotId, SlotRegistry};

/// Per-tick change detection over a registry's live records.
///
/// Keeps a per-slot baseline of the last observed state. A probe compares
/// every live record against its baseline and marks the registry dirty on
/// any difference, then updates the baseline. Plain compare-and-flag; no
/// events, no callbacks.
///
/// Probes run once per logical update tick, before the render tick, so a
/// mutation made mid-frame is guaranteed visible by the next render.
#[derive(Debug)]
pub struct ChangeTracker<T> {
    baseline: Vec<Option<T>>,
}

impl<T> Default for ChangeTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeTracker<T> {
    pub fn new() -> Self {
        Self { baseline: Vec::new() }
    }
}

impl<T: Clone + PartialEq> ChangeTracker<T> {
    /// Diffs the registry against the cached baseline.
    ///
    /// Structural changes (register/deregister) already dirty the registry
    /// themselves; the probe only needs to catch in-place mutations. Newly
    /// appeared or vanished slots simply refresh the baseline.
    pub fn probe(&mut self, registry: &mut SlotRegistry<T>) {
        let len = registry.slot_count();
        self.baseline.truncate(len);
        self.baseline.resize(len, None);

        let mut changed = false;
        for index in 0..len {
            match registry.get(SlotId::from_index(index)) {
                Some(record) => {
                    if self.baseline[index].as_ref() != Some(record) {
                        if self.baseline[index].is_some() {
                            changed = true;
                        }
                        self.baseline[index] = Some(record.clone());
                    }
                }
                None => self.baseline[index] = None,
            }
        }

        if changed {
            registry.mark_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Light {
        range: f32,
        intensity: f32,
    }

    #[test]
    fn unchanged_records_stay_clean() {
        let mut reg = SlotRegistry::new();
        let mut tracker = ChangeTracker::new();
        reg.register(Light { range: 5.0, intensity: 1.0 });

        tracker.probe(&mut reg);
        reg.clear_dirty();
        tracker.probe(&mut reg);
        assert!(!reg.is_dirty());
    }

    #[test]
    fn in_place_mutation_dirties_on_next_probe() {
        let mut reg = SlotRegistry::new();
        let mut tracker = ChangeTracker::new();
        let id = reg.register(Light { range: 5.0, intensity: 1.0 });

        // Settle the baseline, then mutate without re-registering.
        tracker.probe(&mut reg);
        reg.clear_dirty();
        reg.get_mut(id).unwrap().range = 8.0;
        assert!(!reg.is_dirty());

        tracker.probe(&mut reg);
        assert!(reg.is_dirty());
        assert_eq!(reg.get(id).unwrap().range, 8.0);
    }

    #[test]
    fn repeated_probes_after_mutation_stay_clean() {
        let mut reg = SlotRegistry::new();
        let mut tracker = ChangeTracker::new();
        let id = reg.register(Light { range: 5.0, intensity: 1.0 });

        tracker.probe(&mut reg);
        reg.get_mut(id).unwrap().intensity = 2.0;
        tracker.probe(&mut reg);
        reg.clear_dirty();

        tracker.probe(&mut reg);
        assert!(!reg.is_dirty());
    }

    #[test]
    fn baseline_survives_slot_churn() {
        let mut reg = SlotRegistry::new();
        let mut tracker = ChangeTracker::new();
        let a = reg.register(Light { range: 1.0, intensity: 1.0 });
        let b = reg.register(Light { range: 2.0, intensity: 1.0 });
        tracker.probe(&mut reg);
        reg.clear_dirty();

        // Tombstone a, reuse its slot; the replacement must not be reported
        // as an in-place change of the old registrant.
        reg.deregister(a);
        tracker.probe(&mut reg);
        reg.clear_dirty();
        reg.register(Light { range: 9.0, intensity: 9.0 });
        reg.clear_dirty();
        tracker.probe(&mut reg);
        assert!(!reg.is_dirty());

        // The surviving registrant still diffs normally.
        reg.get_mut(b).unwrap().range = 3.0;
        tracker.probe(&mut reg);
        assert!(reg.is_dirty());
    }
}
