pub use env_ref_impl::{EnvMutRef, EnvRef, EnvTmpRef, EnvWeak};

#[cfg(feature = "thread-safe")]
mod env_ref_impl {
    use crate::environment::Environment;
    use crate::value::{Ref, Weak};
    use std::sync::{self, PoisonError, RwLock};

    /// Shared handle to an environment frame; each frame has its own lock.
    #[derive(Clone)]
    pub struct EnvRef(Ref<RwLock<Environment>>);

    pub type EnvTmpRef<'a> = sync::RwLockReadGuard<'a, Environment>;
    pub type EnvMutRef<'a> = sync::RwLockWriteGuard<'a, Environment>;

    impl From<Environment> for EnvRef {
        fn from(env: Environment) -> Self {
            EnvRef(Ref::new(RwLock::new(env)))
        }
    }

    impl EnvRef {
        pub fn borrow(&self) -> EnvTmpRef {
            self.0.read().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn borrow_mut(&self) -> EnvMutRef {
            self.0.write().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn downgrade(&self) -> EnvWeak {
            EnvWeak(Ref::downgrade(&self.0))
        }

        pub fn ptr_eq(&self, other: &EnvRef) -> bool {
            Ref::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Clone, Default)]
    pub struct EnvWeak(Weak<RwLock<Environment>>);

    impl EnvWeak {
        pub fn upgrade(&self) -> Option<EnvRef> {
            self.0.upgrade().map(EnvRef)
        }
    }
}

#[cfg(not(feature = "thread-safe"))]
mod env_ref_impl {
    use crate::environment::Environment;
    use crate::value::{Ref, Weak};
    use std::cell::{self, RefCell};

    /// Shared handle to an environment frame.
    #[derive(Clone)]
    pub struct EnvRef(Ref<RefCell<Environment>>);

    pub type EnvTmpRef<'a> = cell::Ref<'a, Environment>;
    pub type EnvMutRef<'a> = cell::RefMut<'a, Environment>;

    impl From<Environment> for EnvRef {
        fn from(env: Environment) -> Self {
            EnvRef(Ref::new(RefCell::new(env)))
        }
    }

    impl EnvRef {
        pub fn borrow(&self) -> EnvTmpRef {
            self.0.borrow()
        }

        pub fn borrow_mut(&self) -> EnvMutRef {
            self.0.borrow_mut()
        }

        pub fn downgrade(&self) -> EnvWeak {
            EnvWeak(Ref::downgrade(&self.0))
        }

        pub fn ptr_eq(&self, other: &EnvRef) -> bool {
            Ref::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Clone, Default)]
    pub struct EnvWeak(Weak<RefCell<Environment>>);

    impl EnvWeak {
        pub fn upgrade(&self) -> Option<EnvRef> {
            self.0.upgrade().map(EnvRef)
        }
    }
}
