//! Shim module to abstract over std and loom primitives.
//!
//! Both the two ring indices and the slot cells switch to `loom` under the `loom` feature, so
//! the model checker sees every slot access and can flag one that is not ordered by the index
//! protocol. The std `UnsafeCell` is wrapped to expose loom's closure-based `with`/`with_mut`.

#[cfg(not(feature = "loom"))]
pub mod atomic {
    pub use std::sync::atomic::{AtomicUsize, Ordering};
}

#[cfg(feature = "loom")]
pub mod atomic {
    pub use loom::sync::atomic::{AtomicUsize, Ordering};
}

#[cfg(not(feature = "loom"))]
pub mod cell {
    /// `std::cell::UnsafeCell` with the access API of `loom::cell::UnsafeCell`
    ///
    /// Transparent, so an uninitialized `UnsafeCell<MaybeUninit<T>>` stays valid.
    #[repr(transparent)]
    pub struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[allow(dead_code)]
        #[inline(always)]
        pub const fn new(data: T) -> Self {
            Self(std::cell::UnsafeCell::new(data))
        }

        #[inline(always)]
        pub fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
            f(self.0.get())
        }

        #[inline(always)]
        pub fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0.get())
        }
    }
}

#[cfg(feature = "loom")]
pub mod cell {
    pub use loom::cell::UnsafeCell;
}
