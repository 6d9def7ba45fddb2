//! Fitness goals and the goal registry

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::database::GoalStore;
use crate::error::{DatabaseError, FitTrackError, Result};
use crate::notify::{ListenerId, ListenerList};

/// A target to reach, with progress toward it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessGoal {
    id: Option<i64>,
    name: String,
    description: String,
    goal_type: String,
    target_value: f64,
    current_progress: f64,
    unit: String,
    start_date: DateTime<Utc>,
    target_date: Option<NaiveDate>,
    completed: bool,
}

impl FitnessGoal {
    pub fn new(
        name: impl Into<String>,
        goal_type: impl Into<String>,
        target_value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            goal_type: goal_type.into(),
            target_value,
            current_progress: 0.0,
            unit: unit.into(),
            start_date: Utc::now(),
            target_date: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target_date(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_stored(
        id: i64,
        name: String,
        description: String,
        goal_type: String,
        target_value: f64,
        current_progress: f64,
        unit: String,
        start_date: DateTime<Utc>,
        target_date: Option<NaiveDate>,
        completed: bool,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            goal_type,
            target_value,
            current_progress,
            unit,
            start_date,
            target_date,
            completed,
        }
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn goal_type(&self) -> &str {
        &self.goal_type
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn current_progress(&self) -> f64 {
        self.current_progress
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }

    /// Progress as a percentage, capped at 100; zero when the target is zero
    pub fn progress_percentage(&self) -> f64 {
        if self.target_value == 0.0 {
            return 0.0;
        }
        (self.current_progress / self.target_value * 100.0).min(100.0)
    }

    /// Once reached, a goal stays completed even if progress later drops
    pub fn is_completed(&self) -> bool {
        self.completed || self.current_progress >= self.target_value
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.current_progress = progress;
        if progress >= self.target_value {
            self.completed = true;
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1}/{:.1} {} ({:.0}%)",
            self.name,
            self.current_progress,
            self.target_value,
            self.unit,
            self.progress_percentage()
        )
    }
}

/// Change delivered to goal listeners
#[derive(Debug, Clone, PartialEq)]
pub enum GoalEvent {
    Added(FitnessGoal),
    Removed(FitnessGoal),
    ProgressUpdated(FitnessGoal),
}

struct GoalState<S> {
    store: S,
    goals: Vec<FitnessGoal>,
}

impl<S> GoalState<S> {
    fn position(&self, id: i64) -> Result<usize> {
        self.goals
            .iter()
            .position(|g| g.id == Some(id))
            .ok_or(FitTrackError::GoalNotFound { id })
    }
}

/// Cache-plus-store collection of fitness goals
///
/// Listeners run after the registry lock is released, so with concurrent
/// writers events may arrive in a different order than the writes were
/// persisted.
pub struct GoalRegistry<S> {
    state: Mutex<GoalState<S>>,
    listeners: ListenerList<GoalEvent>,
}

impl<S: GoalStore> GoalRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: Mutex::new(GoalState {
                store,
                goals: Vec::new(),
            }),
            listeners: ListenerList::new(),
        }
    }

    /// Registry whose cache is populated from the store
    pub fn load(store: S) -> Self {
        let mut goals = store.get_all_goals().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load goals, starting empty");
            Vec::new()
        });
        // Store returns newest first; the cache is in insertion order
        goals.reverse();

        tracing::info!(count = goals.len(), "Loaded goals");
        Self {
            state: Mutex::new(GoalState { store, goals }),
            listeners: ListenerList::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, GoalState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a new goal; the store assigns its id
    pub fn add(&self, mut goal: FitnessGoal) -> Result<i64> {
        let id = {
            let mut state = self.state();
            let id = state.store.insert_goal(&goal).map_err(|e| {
                tracing::warn!(error = %e, name = goal.name(), "Goal was not saved");
                e
            })?;
            goal.assign_id(id);
            state.goals.push(goal.clone());
            id
        };

        tracing::info!(goal_id = id, name = goal.name(), "Goal added");
        self.listeners.notify(&GoalEvent::Added(goal));
        Ok(id)
    }

    /// Delete from the store, then from the cache
    pub fn remove(&self, id: i64) -> Result<FitnessGoal> {
        let removed = {
            let mut state = self.state();
            let index = state.position(id)?;
            if !state.store.delete_goal(id)? {
                tracing::warn!(goal_id = id, "Store did not delete goal");
                return Err(DatabaseError::Rejected {
                    operation: "delete_goal".to_string(),
                }
                .into());
            }
            state.goals.remove(index)
        };

        tracing::info!(goal_id = id, "Goal removed");
        self.listeners.notify(&GoalEvent::Removed(removed.clone()));
        Ok(removed)
    }

    /// Set progress on a copy, persist it, then replace the cached goal
    pub fn update_progress(&self, id: i64, progress: f64) -> Result<FitnessGoal> {
        let updated = {
            let mut state = self.state();
            let index = state.position(id)?;

            let mut updated = state.goals[index].clone();
            updated.set_progress(progress);

            if !state.store.update_goal_progress(&updated)? {
                tracing::warn!(goal_id = id, "Store did not update goal progress");
                return Err(DatabaseError::Rejected {
                    operation: "update_goal_progress".to_string(),
                }
                .into());
            }
            state.goals[index] = updated.clone();
            updated
        };

        tracing::info!(
            goal_id = id,
            progress,
            completed = updated.is_completed(),
            "Goal progress updated"
        );
        self.listeners
            .notify(&GoalEvent::ProgressUpdated(updated.clone()));
        Ok(updated)
    }

    pub fn get(&self, id: i64) -> Option<FitnessGoal> {
        self.state().goals.iter().find(|g| g.id == Some(id)).cloned()
    }

    pub fn list_all(&self) -> Vec<FitnessGoal> {
        self.state().goals.clone()
    }

    /// Goals not yet completed
    pub fn list_active(&self) -> Vec<FitnessGoal> {
        self.filtered(|g| !g.is_completed())
    }

    pub fn list_completed(&self) -> Vec<FitnessGoal> {
        self.filtered(FitnessGoal::is_completed)
    }

    fn filtered(&self, predicate: impl Fn(&FitnessGoal) -> bool) -> Vec<FitnessGoal> {
        self.state()
            .goals
            .iter()
            .filter(|g| predicate(g))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GoalEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<S> std::fmt::Debug for GoalRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalRegistry")
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn registry() -> GoalRegistry<Database> {
        GoalRegistry::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_progress_percentage() {
        let mut goal = FitnessGoal::new("Pushups", "strength", 10.0, "reps");
        goal.set_progress(5.0);
        assert_eq!(goal.progress_percentage(), 50.0);

        let zero = FitnessGoal::new("Nothing", "misc", 0.0, "units");
        assert_eq!(zero.progress_percentage(), 0.0);
    }

    #[test]
    fn test_completion_latch() {
        let mut goal = FitnessGoal::new("Pushups", "strength", 10.0, "reps");
        assert!(!goal.is_completed());

        goal.set_progress(12.0);
        assert_eq!(goal.progress_percentage(), 100.0);
        assert!(goal.is_completed());

        goal.set_progress(3.0);
        assert!(goal.is_completed());
    }

    #[test]
    fn test_summary() {
        let mut goal = FitnessGoal::new("Run", "distance", 50.0, "km");
        goal.set_progress(12.5);
        assert_eq!(goal.summary(), "Run: 12.5/50.0 km (25%)");
    }

    #[test]
    fn test_add_and_filter() {
        let registry = registry();
        let run = registry.add(FitnessGoal::new("Run", "distance", 50.0, "km")).unwrap();
        registry.add(FitnessGoal::new("Lift", "strength", 100.0, "kg")).unwrap();

        registry.update_progress(run, 60.0).unwrap();

        assert_eq!(registry.list_all().len(), 2);
        assert_eq!(registry.list_completed().len(), 1);
        assert_eq!(registry.list_active()[0].name(), "Lift");
    }

    #[test]
    fn test_remove() {
        let registry = registry();
        let id = registry.add(FitnessGoal::new("Run", "distance", 50.0, "km")).unwrap();

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.id(), Some(id));
        assert!(registry.is_empty());
        assert!(matches!(
            registry.remove(id),
            Err(FitTrackError::GoalNotFound { .. })
        ));
    }

    #[test]
    fn test_update_unknown_goal() {
        let registry = registry();
        assert!(matches!(
            registry.update_progress(42, 1.0),
            Err(FitTrackError::GoalNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_load_reads_store() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_goal(&FitnessGoal::new("Swim", "distance", 10.0, "km"))
            .unwrap();

        let registry = GoalRegistry::load(db);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(registry.list_all()[0].id().unwrap()).is_some());
    }
}
