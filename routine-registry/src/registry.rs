//! Name → routine mapping with register-once semantics.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rbot_core::RoutineError;
use tracing::{debug, info};

use crate::routine::{IntoRoutine, Routine};

/// Registry of routines keyed by command name.
///
/// Guarded by an `RwLock`, so registration may safely race with lookups from the
/// dispatcher; in practice it is filled once at startup and only read afterwards.
#[derive(Default)]
pub struct RoutineRegistry {
    routines: RwLock<HashMap<String, Arc<Routine>>>,
}

impl RoutineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `routine` under `name`.
    ///
    /// Returns [`RoutineError::NameTaken`] if the name already exists (the existing routine
    /// is kept) and [`RoutineError::InvalidName`] for names that could never be dispatched.
    pub fn register(&self, name: &str, routine: Routine) -> Result<(), RoutineError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RoutineError::InvalidName(name.to_string()));
        }

        let mut routines = self.routines.write().unwrap_or_else(PoisonError::into_inner);
        if routines.contains_key(name) {
            debug!(routine = %name, "registration rejected, name taken");
            return Err(RoutineError::NameTaken(name.to_string()));
        }
        info!(
            routine = %name,
            signature = %routine.signature(),
            "routine registered"
        );
        routines.insert(name.to_string(), Arc::new(routine));
        Ok(())
    }

    /// Builds a routine from a typed function and registers it; see [`IntoRoutine`].
    pub fn register_fn<Args, F: IntoRoutine<Args>>(&self, name: &str, f: F) -> Result<(), RoutineError> {
        self.register(name, f.into_routine())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Routine>> {
        self.routines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .routines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.routines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_twice_keeps_first() {
        let registry = RoutineRegistry::new();
        registry.register_fn("greet", || "first").unwrap();

        let err = registry.register_fn("greet", || "second").unwrap_err();
        assert_eq!(err, RoutineError::NameTaken("greet".into()));

        let routine = registry.lookup("greet").unwrap();
        assert_eq!(routine.execute::<&str>(&[]).await.unwrap(), "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_invalid_names() {
        let registry = RoutineRegistry::new();
        assert_eq!(
            registry.register_fn("", || "x").unwrap_err(),
            RoutineError::InvalidName(String::new())
        );
        assert!(matches!(
            registry.register_fn("two words", || "x"),
            Err(RoutineError::InvalidName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_miss_and_names() {
        let registry = RoutineRegistry::new();
        registry.register_fn("b", || "b").unwrap();
        registry.register_fn("a", || "a").unwrap();

        assert!(registry.lookup("c").is_none());
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }
}
