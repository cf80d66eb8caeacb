//! Scoped process environment changes for cluster bootstrap.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// An environment change list: `None` removes the variable.
pub type EnvChanges = [(OsString, Option<OsString>)];

/// Restores the previous values of every variable it changed when dropped.
pub struct EnvVarGuard {
    restore: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes` while holding the process-wide environment lock.
    pub fn apply(changes: &EnvChanges) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let restore = changes
            .iter()
            .map(|(key, _)| (key.clone(), env::var_os(key)))
            .collect();
        write_all(changes);
        Self {
            restore,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        write_all(&self.restore);
    }
}

fn write_all(changes: &EnvChanges) {
    for (key, value) in changes {
        // SAFETY: callers hold `ENV_LOCK`, so no other test mutates the
        // environment concurrently.
        unsafe {
            match value {
                Some(next) => env::set_var(key, next),
                None => env::remove_var(key),
            }
        }
    }
}
