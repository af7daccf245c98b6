use std::rc::Rc;

use crate::device::{DrawingSurface, FrameError};

/// Number of swap chain backbuffers (double buffering).
pub const BUFFER_COUNT: usize = 2;

/// Fixed set of per-backbuffer drawing surfaces.
///
/// Slots are either all empty or all from the same provisioning pass; the
/// set is always released as a whole before a new generation is created.
pub struct BufferSet<S> {
    slots: [Option<Rc<S>>; BUFFER_COUNT],
}

impl<S: DrawingSurface> BufferSet<S> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// True when no slot holds a surface.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub(crate) fn insert(&mut self, index: usize, surface: S) {
        debug_assert!(self.slots[index].is_none(), "slot {index} not released");
        self.slots[index] = Some(Rc::new(surface));
    }

    /// Returns the surface for `index`.
    pub fn get(&self, index: usize) -> Result<&Rc<S>, FrameError> {
        self.slots
            .get(index)
            .ok_or(FrameError::BufferIndexOutOfRange {
                index,
                count: BUFFER_COUNT,
            })?
            .as_ref()
            .ok_or(FrameError::MissingSurface(index))
    }

    /// Closes every surface and empties all slots. Empty slots are skipped.
    pub fn dispose(&mut self) {
        for slot in &mut self.slots {
            if let Some(surface) = slot.take() {
                surface.close();
            }
        }
    }
}

impl<S: DrawingSurface> Default for BufferSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Probe {
        closes: Rc<Cell<u32>>,
    }

    impl DrawingSurface for Probe {
        type Canvas = ();

        fn canvas(&self) {}

        fn close(&self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    #[test]
    fn starts_empty() {
        let set = BufferSet::<Probe>::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(matches!(set.get(0), Err(FrameError::MissingSurface(0))));
    }

    #[test]
    fn get_rejects_out_of_range_index() {
        let set = BufferSet::<Probe>::new();
        assert!(matches!(
            set.get(BUFFER_COUNT),
            Err(FrameError::BufferIndexOutOfRange { index: BUFFER_COUNT, count: BUFFER_COUNT })
        ));
    }

    #[test]
    fn partially_filled_is_not_empty() {
        let mut set = BufferSet::new();
        set.insert(1, Probe::default());
        assert!(!set.is_empty());
        assert_eq!(set.len(), 1);
        assert!(set.get(1).is_ok());
    }

    #[test]
    fn dispose_closes_each_surface_once() {
        let closes = Rc::new(Cell::new(0));
        let mut set = BufferSet::new();
        for i in 0..BUFFER_COUNT {
            set.insert(i, Probe { closes: Rc::clone(&closes) });
        }

        set.dispose();
        assert!(set.is_empty());
        assert_eq!(closes.get(), BUFFER_COUNT as u32);

        // Already-empty slots are a no-op.
        set.dispose();
        assert_eq!(closes.get(), BUFFER_COUNT as u32);
    }
}
