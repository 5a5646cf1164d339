//! Debug-only single-thread access checking.
//!
//! Every engine operation enters the guard, which records a per-thread tag.
//! Entering while another thread's tag is recorded trips a debug assertion.
//! Release builds compile all of this away.

#[cfg(debug_assertions)]
mod imp {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

    thread_local! {
        static THREAD_TAG: u64 = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
    }

    fn current_tag() -> u64 {
        THREAD_TAG.with(|t| *t)
    }

    #[derive(Debug, Default)]
    pub struct AccessGuard {
        owner: Arc<AtomicU64>,
    }

    impl AccessGuard {
        pub fn enter(&self) -> Entered {
            let me = current_tag();
            let prev = self.owner.swap(me, Ordering::AcqRel);
            debug_assert!(
                prev == 0 || prev == me,
                "search state entered by thread #{me} while thread #{prev} is using it"
            );
            Entered {
                owner: Arc::clone(&self.owner),
                prev,
            }
        }
    }

    /// Restores the previous owner (usually none) when dropped.
    #[derive(Debug)]
    pub struct Entered {
        owner: Arc<AtomicU64>,
        prev: u64,
    }

    impl Drop for Entered {
        fn drop(&mut self) {
            self.owner.store(self.prev, Ordering::Release);
        }
    }
}

#[cfg(not(debug_assertions))]
mod imp {
    #[derive(Debug, Default)]
    pub struct AccessGuard;

    impl AccessGuard {
        #[inline(always)]
        pub fn enter(&self) -> Entered {
            Entered
        }
    }

    #[derive(Debug)]
    pub struct Entered;
}

pub(crate) use imp::AccessGuard;
