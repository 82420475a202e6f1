//! Per-session counter state management.
//!
//! Maps a [`SessionId`] to its own [`RepCounter`] with strict isolation
//! between sessions sharing one process. State is created lazily on first
//! use and mutated only through this registry's serialized per-id access.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use formtrack_core::{MotionPhase, RepUpdate, Resettable, SessionId};

use crate::counter::{RepCounter, RepCounterConfig};
use crate::Result;

/// Registry of per-session rep counters.
///
/// Cloned handles share one underlying registry and are safe to use from
/// concurrent callers: frames for different sessions proceed independently,
/// while frames for the same session are serialized by that session's lock
/// so two racing frames can never both read the same phase and double-count
/// a rep.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<SessionRegistryInner>,
}

/// Inner state (not cloned, shared via Arc).
struct SessionRegistryInner {
    /// One independently owned counter per session id
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<RepCounter>>>>,
    /// Counter configuration applied to lazily created sessions
    config: RepCounterConfig,
}

impl SessionRegistry {
    /// Create a registry whose sessions use default counter thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionRegistryInner {
                sessions: RwLock::new(HashMap::new()),
                config: RepCounterConfig::default(),
            }),
        }
    }

    /// Create a registry with a custom counter configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(config: RepCounterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(SessionRegistryInner {
                sessions: RwLock::new(HashMap::new()),
                config,
            }),
        })
    }

    /// Get the counter for a session, creating it lazily.
    ///
    /// A fresh counter starts Up with zero reps.
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Arc<Mutex<RepCounter>> {
        if let Some(counter) = self.inner.sessions.read().get(id) {
            return Arc::clone(counter);
        }

        let mut sessions = self.inner.sessions.write();
        // Re-check under the write lock; another caller may have created it.
        // The registry's config was validated at construction.
        Arc::clone(sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, "creating session counter");
            Arc::new(Mutex::new(RepCounter::with_config_unchecked(
                self.inner.config,
            )))
        }))
    }

    /// Drive one frame for a session.
    ///
    /// `Some(angle)` advances the state machine; `None` records a frame
    /// with no valid observation, leaving phase and counter untouched. The
    /// session's lock is held for the duration of the step.
    pub fn observe(&self, id: &SessionId, angle_deg: Option<f64>) -> RepUpdate {
        let counter = self.session(id);
        let mut counter = counter.lock();
        match angle_deg {
            Some(angle) => counter.observe(angle),
            None => counter.observe_missing(),
        }
    }

    /// Reset a session back to Up with zero reps.
    ///
    /// No other session's state is touched. An id that has never been used
    /// is lazily created then reset; observable only by a later lazy
    /// create, this is equivalent to a no-op.
    pub fn reset(&self, id: &SessionId) {
        let counter = self.session(id);
        counter.lock().reset();
        debug!(session = %id, "session reset");
    }

    /// Remove a session entirely.
    ///
    /// Returns `true` if the session existed. A later use of the same id
    /// lazily creates a fresh counter.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.inner.sessions.write().remove(id).is_some()
    }

    /// Total reps for a session; 0 for an id that has no state yet.
    ///
    /// Does not create state for unknown ids.
    #[must_use]
    pub fn total_reps(&self, id: &SessionId) -> u32 {
        self.inner
            .sessions
            .read()
            .get(id)
            .map_or(0, |counter| counter.lock().total_reps())
    }

    /// Current phase for a session, if it has state.
    #[must_use]
    pub fn phase(&self, id: &SessionId) -> Option<MotionPhase> {
        self.inner
            .sessions
            .read()
            .get(id)
            .map(|counter| counter.lock().phase())
    }

    /// Number of sessions with live state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.sessions.read().len()
    }

    /// Whether the registry has no live sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.sessions.read().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> SessionId {
        SessionId::new(s)
    }

    #[test]
    fn test_lazy_creation() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.total_reps(&sid("a")), 0);
        // Probing does not create state.
        assert!(registry.is_empty());

        registry.observe(&sid("a"), Some(120.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_session_isolation() {
        let registry = SessionRegistry::new();
        let a = sid("a");
        let b = sid("b");

        // Session a completes two reps.
        for angle in [80.0, 170.0, 75.0, 165.0] {
            registry.observe(&a, Some(angle));
        }
        // Session b goes Down and stays there.
        registry.observe(&b, Some(50.0));

        assert_eq!(registry.total_reps(&a), 2);
        assert_eq!(registry.total_reps(&b), 0);
        assert_eq!(registry.phase(&a), Some(MotionPhase::Up));
        assert_eq!(registry.phase(&b), Some(MotionPhase::Down));
    }

    #[test]
    fn test_reset_only_touches_target() {
        let registry = SessionRegistry::new();
        let a = sid("a");
        let b = sid("b");

        for angle in [80.0, 170.0] {
            registry.observe(&a, Some(angle));
            registry.observe(&b, Some(angle));
        }
        assert_eq!(registry.total_reps(&a), 1);
        assert_eq!(registry.total_reps(&b), 1);

        registry.reset(&a);
        assert_eq!(registry.total_reps(&a), 0);
        assert_eq!(registry.phase(&a), Some(MotionPhase::Up));
        assert_eq!(registry.total_reps(&b), 1);
    }

    #[test]
    fn test_reset_unknown_id_creates_fresh_state() {
        let registry = SessionRegistry::new();
        registry.reset(&sid("ghost"));
        assert_eq!(registry.total_reps(&sid("ghost")), 0);
        assert_eq!(registry.phase(&sid("ghost")), Some(MotionPhase::Up));
    }

    #[test]
    fn test_remove_then_recreate() {
        let registry = SessionRegistry::new();
        let a = sid("a");
        registry.observe(&a, Some(80.0));
        registry.observe(&a, Some(170.0));
        assert_eq!(registry.total_reps(&a), 1);

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert_eq!(registry.total_reps(&a), 0);

        // Fresh state after teardown.
        registry.observe(&a, Some(120.0));
        assert_eq!(registry.phase(&a), Some(MotionPhase::Up));
    }

    #[test]
    fn test_missing_observation_preserves_state() {
        let registry = SessionRegistry::new();
        let a = sid("a");
        registry.observe(&a, Some(80.0));
        for _ in 0..10 {
            registry.observe(&a, None);
        }
        assert_eq!(registry.phase(&a), Some(MotionPhase::Down));

        let update = registry.observe(&a, Some(170.0));
        assert_eq!(update.total_reps, 1);
    }

    #[test]
    fn test_concurrent_same_session_never_double_counts() {
        use std::thread;

        let registry = SessionRegistry::new();
        let a = sid("a");
        registry.observe(&a, Some(80.0));

        // Many racing frames all above the ascent threshold: exactly one
        // may observe the Down -> Up edge.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            let id = a.clone();
            handles.push(thread::spawn(move || {
                registry.observe(&id, Some(170.0)).reps_this_frame
            }));
        }

        let counted: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(counted, 1);
        assert_eq!(registry.total_reps(&a), 1);
    }

    #[test]
    fn test_custom_config_applies_to_new_sessions() {
        let config = RepCounterConfig::builder()
            .descent_threshold_deg(60.0)
            .ascent_threshold_deg(120.0)
            .build();
        let registry = SessionRegistry::with_config(config).unwrap();
        let a = sid("a");

        // 80 would enter Down under default thresholds but not here.
        registry.observe(&a, Some(80.0));
        assert_eq!(registry.phase(&a), Some(MotionPhase::Up));

        registry.observe(&a, Some(50.0));
        let update = registry.observe(&a, Some(125.0));
        assert_eq!(update.total_reps, 1);
    }
}
