/// Identifier of a slot in a [`SlotRegistry`].
///
/// A `SlotId` handed out by [`SlotRegistry::register`] refers to the same
/// registrant until that registrant is deregistered. It is never reassigned
/// to another record while the original is still live.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SlotId(u32);

impl SlotId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw index into the registry's backing sequence.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// State of one position in the registry's backing sequence.
///
/// An `Empty` slot is a tombstone: left behind by removing a non-last record,
/// eligible for reuse by the next registration.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Empty,
    Occupied(T),
}

impl<T> Slot<T> {
    #[inline]
    fn record(&self) -> Option<&T> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(v) => Some(v),
        }
    }
}

/// Index-stable registry of renderable records with gap-filling reuse.
///
/// Removal of a non-last slot tombstones it (the backing length is
/// unchanged); removal of the last slot truncates by one. Registration
/// reuses the lowest tombstoned index before appending, so `slot_count`
/// only grows while any registrant is churning in the middle.
///
/// The registry carries its own dirty flag: any add, remove, or explicit
/// [`mark_dirty`] sets it, and only a buffer synchronization clears it.
///
/// [`mark_dirty`]: SlotRegistry::mark_dirty
#[derive(Debug)]
pub struct SlotRegistry<T> {
    slots: Vec<Slot<T>>,
    active: usize,
    dirty: bool,
}

impl<T> Default for SlotRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            active: 0,
            dirty: false,
        }
    }

    /// Number of live (non-tombstoned) records.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Length of the backing sequence, tombstones included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the registry as needing resynchronization without touching
    /// contents. Idempotent; used by registrants reporting an in-place
    /// mutation rather than a structural change.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Cleared only after a successful buffer resynchronization.
    #[inline]
    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Stores `record` and returns its slot id.
    ///
    /// Reuses the lowest tombstoned slot when one exists, otherwise appends.
    /// Never fails; growth is unbounded.
    pub fn register(&mut self, record: T) -> SlotId {
        let id = if self.active < self.slots.len() {
            // Gaps exist; fill the lowest one.
            let index = self
                .slots
                .iter()
                .position(|s| matches!(s, Slot::Empty))
                .expect("active_count < slot_count implies a tombstone");
            self.slots[index] = Slot::Occupied(record);
            log::trace!("registry: reusing slot {index}");
            SlotId::from_index(index)
        } else {
            let index = self.slots.len();
            self.slots.push(Slot::Occupied(record));
            log::trace!("registry: appending slot {index}");
            SlotId::from_index(index)
        };

        self.active += 1;
        self.dirty = true;
        id
    }

    /// Removes the record at `id`.
    ///
    /// Out-of-range or already-empty ids are silently ignored. Removing the
    /// last slot truncates the backing sequence; removing any other slot
    /// leaves a tombstone behind.
    pub fn deregister(&mut self, id: SlotId) {
        let index = id.index();
        if index >= self.slots.len() {
            log::trace!("registry: deregister of out-of-range slot {index} ignored");
            return;
        }
        if matches!(self.slots[index], Slot::Empty) {
            log::trace!("registry: deregister of empty slot {index} ignored");
            return;
        }

        if index == self.slots.len() - 1 {
            self.slots.pop();
            log::trace!("registry: truncating slot {index}");
        } else {
            self.slots[index] = Slot::Empty;
            log::trace!("registry: tombstoning slot {index}");
        }

        self.active -= 1;
        self.dirty = true;
    }

    /// Returns the record at `id`, if that slot is live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Slot::record)
    }

    /// Mutable access to the record at `id`.
    ///
    /// Deliberately does not set the dirty flag: in-place mutations are
    /// picked up by the per-tick change tracker, or reported explicitly via
    /// [`mark_dirty`](Self::mark_dirty).
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(v)) => Some(v),
            _ => None,
        }
    }

    /// Live records in ascending slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.record().map(|v| (SlotId::from_index(i), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<T>(reg: &SlotRegistry<T>) -> Vec<usize> {
        reg.iter_active().map(|(id, _)| id.index()).collect()
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn active_count_tracks_registrations() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let b = reg.register("b");
        let _c = reg.register("c");
        assert_eq!(reg.active_count(), 3);

        reg.deregister(a);
        reg.deregister(b);
        assert_eq!(reg.active_count(), 1);

        reg.register("d");
        assert_eq!(reg.active_count(), 2);
    }

    #[test]
    fn first_registration_lands_at_slot_zero() {
        let mut reg = SlotRegistry::new();
        let id = reg.register(1u32);
        assert_eq!(id.index(), 0);
        assert_eq!(reg.slot_count(), 1);
    }

    // ── slot stability ────────────────────────────────────────────────────

    #[test]
    fn live_ids_are_never_aliased() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let b = reg.register("b");
        let c = reg.register("c");

        // Churn around the live registrants.
        reg.deregister(b);
        let d = reg.register("d");
        let e = reg.register("e");

        assert_ne!(d, a);
        assert_ne!(d, c);
        assert_ne!(e, a);
        assert_ne!(e, c);
        assert_ne!(e, d);
        assert_eq!(reg.get(a), Some(&"a"));
        assert_eq!(reg.get(c), Some(&"c"));
    }

    // ── tombstoning and truncation ────────────────────────────────────────

    #[test]
    fn removing_middle_slot_leaves_tombstone() {
        let mut reg = SlotRegistry::new();
        let _a = reg.register("a");
        let b = reg.register("b");
        let _c = reg.register("c");

        reg.deregister(b);
        assert_eq!(reg.slot_count(), 3);
        assert_eq!(reg.active_count(), 2);
        assert_eq!(ids(&reg), vec![0, 2]);
    }

    #[test]
    fn removing_last_slot_truncates() {
        let mut reg = SlotRegistry::new();
        let _a = reg.register("a");
        let b = reg.register("b");

        reg.deregister(b);
        assert_eq!(reg.slot_count(), 1);
        assert_eq!(reg.active_count(), 1);
    }

    #[test]
    fn tombstone_is_reused_by_next_registration() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let _b = reg.register("b");
        reg.deregister(a);

        let c = reg.register("c");
        assert_eq!(c.index(), 0);
        assert_eq!(reg.slot_count(), 2);
        assert_eq!(reg.get(c), Some(&"c"));
    }

    #[test]
    fn lowest_tombstone_wins() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let b = reg.register("b");
        let _c = reg.register("c");
        reg.deregister(b);
        reg.deregister(a);

        let d = reg.register("d");
        assert_eq!(d.index(), 0);
        let e = reg.register("e");
        assert_eq!(e.index(), 1);
    }

    // ── defensive deregistration ──────────────────────────────────────────

    #[test]
    fn out_of_range_deregister_is_a_no_op() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        reg.deregister(SlotId::from_index(17));
        assert_eq!(reg.active_count(), 1);
        assert_eq!(reg.get(a), Some(&"a"));
    }

    #[test]
    fn double_deregister_is_a_no_op() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let _b = reg.register("b");
        reg.deregister(a);
        let count = reg.active_count();
        reg.deregister(a);
        assert_eq!(reg.active_count(), count);
        assert_eq!(reg.slot_count(), 2);
    }

    // ── dirty flag ────────────────────────────────────────────────────────

    #[test]
    fn mutations_set_the_dirty_flag() {
        let mut reg = SlotRegistry::new();
        assert!(!reg.is_dirty());

        let a = reg.register("a");
        assert!(reg.is_dirty());
        reg.clear_dirty();

        reg.deregister(a);
        assert!(reg.is_dirty());
        reg.clear_dirty();

        reg.mark_dirty();
        assert!(reg.is_dirty());
    }

    #[test]
    fn ignored_deregister_does_not_dirty() {
        let mut reg = SlotRegistry::<&str>::new();
        reg.register("a");
        reg.clear_dirty();

        reg.deregister(SlotId::from_index(5));
        assert!(!reg.is_dirty());
    }

    #[test]
    fn iteration_order_follows_slot_index() {
        let mut reg = SlotRegistry::new();
        let a = reg.register("a");
        let _b = reg.register("b");
        reg.deregister(a);
        let _c = reg.register("c");

        let values: Vec<&str> = reg.iter_active().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["c", "b"]);
    }
}
