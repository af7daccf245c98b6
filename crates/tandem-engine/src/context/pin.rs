use std::ops::Deref;
use std::rc::Rc;

/// Keeps a shared handle alive for the duration of a device call.
///
/// The guard owns a strong reference, so the handle cannot be released
/// while a native call still uses it, even if the owner's slot is cleared
/// in between. The reference is dropped when the guard leaves scope,
/// including on early return and unwind.
pub struct Pinned<T> {
    handle: Rc<T>,
}

impl<T> Pinned<T> {
    #[inline]
    pub fn new(handle: &Rc<T>) -> Self {
        Self {
            handle: Rc::clone(handle),
        }
    }
}

impl<T> Deref for Pinned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.handle
    }
}

impl<T> Drop for Pinned<T> {
    fn drop(&mut self) {
        log::trace!(
            "releasing pinned handle (strong refs before release: {})",
            Rc::strong_count(&self.handle)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn holds_strong_reference_while_alive() {
        let handle = Rc::new(7_u32);
        {
            let pinned = Pinned::new(&handle);
            assert_eq!(Rc::strong_count(&handle), 2);
            assert_eq!(*pinned, 7);
        }
        assert_eq!(Rc::strong_count(&handle), 1);
    }

    #[test]
    fn outlives_owner_release() {
        let mut owner = Some(Rc::new(String::from("context")));
        let pinned = Pinned::new(owner.as_ref().unwrap());
        owner = None;
        assert!(owner.is_none());
        assert_eq!(pinned.as_str(), "context");
    }

    #[test]
    fn released_on_unwind() {
        let handle = Rc::new(());
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _pinned = Pinned::new(&handle);
            panic!("device call failed");
        }));
        assert!(result.is_err());
        assert_eq!(Rc::strong_count(&handle), 1);
    }
}
