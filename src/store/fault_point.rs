//! Fault point injection for testing rollback
//!
//! Multi-statement writes call [`FaultInjector::check`] between their
//! statements. When the named point is armed the write fails with
//! [`StoreError::FaultInjected`] and its transaction is rolled back, leaving
//! the tables as they were.
//!
//! # Usage
//!
//! ```bash
//! HYPERLEKCE_FAULT_POINT=lesson_after_exercises_delete hyperlekce serve
//! ```
//!
//! Tests arm points directly with [`FaultInjector::arm`].

use std::sync::Mutex;

use tracing::warn;

use super::errors::{StoreError, StoreResult};

/// Environment variable read by [`FaultInjector::from_env`]
pub const FAULT_POINT_ENV: &str = "HYPERLEKCE_FAULT_POINT";

/// Holds at most one armed fault point. Stays armed until [`FaultInjector::disarm`].
#[derive(Debug, Default)]
pub struct FaultInjector {
    armed: Mutex<Option<String>>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the point named by `HYPERLEKCE_FAULT_POINT`, if set.
    pub fn from_env() -> Self {
        let injector = Self::new();
        if let Ok(name) = std::env::var(FAULT_POINT_ENV) {
            if !name.is_empty() {
                warn!(point = %name, "fault point armed from environment");
                injector.arm(&name);
            }
        }
        injector
    }

    pub fn arm(&self, name: &str) {
        *self.lock() = Some(name.to_string());
    }

    pub fn disarm(&self) {
        *self.lock() = None;
    }

    pub fn armed(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Fail if `name` is armed.
    pub fn check(&self, name: &'static str) -> StoreResult<()> {
        if self.lock().as_deref() == Some(name) {
            warn!(point = name, "fault point reached");
            return Err(StoreError::FaultInjected(name));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.armed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// All defined fault point names
pub mod points {
    /// Lesson delete: exercises gone, lesson row not yet deleted
    pub const LESSON_AFTER_EXERCISES_DELETE: &str = "lesson_after_exercises_delete";
    /// Exercise delete: exercise data gone, exercise row not yet deleted
    pub const EXERCISE_AFTER_DATA_DELETE: &str = "exercise_after_data_delete";
    /// Exercise update: exercise row updated, data upsert not yet run
    pub const EXERCISE_AFTER_ROW_UPDATE: &str = "exercise_after_row_update";

    pub fn all() -> &'static [&'static str] {
        &[
            LESSON_AFTER_EXERCISES_DELETE,
            EXERCISE_AFTER_DATA_DELETE,
            EXERCISE_AFTER_ROW_UPDATE,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_check_passes() {
        let faults = FaultInjector::new();
        for point in points::all() {
            assert!(faults.check(point).is_ok());
        }
    }

    #[test]
    fn test_armed_point_fails_until_disarmed() {
        let faults = FaultInjector::new();
        faults.arm(points::EXERCISE_AFTER_DATA_DELETE);

        assert!(faults.check(points::LESSON_AFTER_EXERCISES_DELETE).is_ok());
        for _ in 0..2 {
            let err = faults.check(points::EXERCISE_AFTER_DATA_DELETE).unwrap_err();
            assert!(err.is_injected());
        }

        faults.disarm();
        assert!(faults.check(points::EXERCISE_AFTER_DATA_DELETE).is_ok());
        assert_eq!(faults.armed(), None);
    }

    #[test]
    fn test_point_names_unique() {
        let all = points::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
