//! Scope guard that terminates a session when it goes out of scope.

use std::ops::{Deref, DerefMut};

use super::Session;

/// Borrow of a running [`Session`] that terminates it on drop.
///
/// Obtained from [`Session::guard`]. Termination happens on every exit path,
/// including early returns and unwinding.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    session: &'a mut Session,
}

impl<'a> SessionGuard<'a> {
    pub(super) const fn new(session: &'a mut Session) -> Self {
        Self { session }
    }
}

impl Deref for SessionGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl DerefMut for SessionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.session.terminate();
    }
}
