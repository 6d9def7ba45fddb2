use serde::Serialize;

use crate::activity::ActivityRegistry;
use crate::database::{ActivityStore, GoalStore};
use crate::error::Result;
use crate::goals::GoalRegistry;

/// Headline numbers shown on the overview screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub activity_count: usize,
    pub total_calories: f64,
    pub total_duration_minutes: u64,
    pub active_goals: usize,
    pub completed_goals: usize,
}

impl DashboardSummary {
    /// Totals come from the activity store, counts from the registries' caches
    pub fn collect<A: ActivityStore, G: GoalStore>(
        activities: &ActivityRegistry<A>,
        goals: &GoalRegistry<G>,
    ) -> Result<Self> {
        Ok(Self {
            activity_count: activities.len(),
            total_calories: activities.total_calories()?,
            total_duration_minutes: activities.total_duration()?,
            active_goals: goals.list_active().len(),
            completed_goals: goals.list_completed().len(),
        })
    }
}
