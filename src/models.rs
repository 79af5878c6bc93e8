//models.rs
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::scheduler::TaskHandle;

/// How long a goal pulse stays on a card.
pub const PULSE_MILLIS: i64 = 500;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub name: String,
    #[serde(rename = "repGoal")]
    pub rep_goal: String,
    #[serde(rename = "minReps")]
    pub min_reps: u32,
    #[serde(rename = "maxReps")]
    pub max_reps: u32,
    pub image: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalStatus {
    Neutral,
    Reached,
    Complete,
}

impl GoalStatus {
    pub fn of(reps: u32, definition: &ExerciseDefinition) -> Self {
        if reps >= definition.max_reps {
            GoalStatus::Complete
        } else if reps >= definition.min_reps {
            GoalStatus::Reached
        } else {
            GoalStatus::Neutral
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    GoalReached,
    GoalComplete,
}

impl Notification {
    pub fn message(self) -> &'static str {
        match self {
            Notification::GoalReached => "Goal reached!",
            Notification::GoalComplete => "Goal complete!",
        }
    }
}

/// A goal pulse started at `started`; the newest one replaces any running pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub started: DateTime<Local>,
}

impl Pulse {
    pub fn is_active(&self, now: DateTime<Local>) -> bool {
        now - self.started < Duration::milliseconds(PULSE_MILLIS)
    }

    pub fn ends_at(&self) -> DateTime<Local> {
        self.started + Duration::milliseconds(PULSE_MILLIS)
    }
}

#[derive(Debug)]
pub struct ExerciseState {
    pub id: usize,
    pub definition: ExerciseDefinition,
    pub current_reps: u32,
    pub timer_seconds: u64,
    pub timer: Option<TaskHandle>,
    pub pulse: Option<Pulse>,
}

impl ExerciseState {
    pub fn new(id: usize, definition: ExerciseDefinition) -> Self {
        ExerciseState {
            id,
            definition,
            current_reps: 0,
            timer_seconds: 0,
            timer: None,
            pulse: None,
        }
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn goal_status(&self) -> GoalStatus {
        GoalStatus::of(self.current_reps, &self.definition)
    }

    pub fn timer_label(&self) -> &'static str {
        if self.is_timer_running() { "Pause" } else { "Start" }
    }
}

/// MM:SS, zero padded. Minutes widen past 99 rather than wrap.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;
    format!("{:02}:{:02}", minutes, remaining_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squats() -> ExerciseDefinition {
        ExerciseDefinition {
            name: "Squats".to_string(),
            rep_goal: "30-100 repetitions".to_string(),
            min_reps: 30,
            max_reps: 100,
            image: String::new(),
        }
    }

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn goal_status_thresholds() {
        let def = squats();
        assert_eq!(GoalStatus::of(29, &def), GoalStatus::Neutral);
        assert_eq!(GoalStatus::of(30, &def), GoalStatus::Reached);
        assert_eq!(GoalStatus::of(99, &def), GoalStatus::Reached);
        assert_eq!(GoalStatus::of(100, &def), GoalStatus::Complete);
        assert_eq!(GoalStatus::of(250, &def), GoalStatus::Complete);
    }

    #[test]
    fn complete_wins_when_min_equals_max() {
        let def = ExerciseDefinition { min_reps: 30, max_reps: 30, ..squats() };
        assert_eq!(GoalStatus::of(30, &def), GoalStatus::Complete);
    }

    #[test]
    fn pulse_expires_after_fixed_duration() {
        let start = Local::now();
        let pulse = Pulse { started: start };
        assert!(pulse.is_active(start));
        assert!(pulse.is_active(start + Duration::milliseconds(499)));
        assert!(!pulse.is_active(start + Duration::milliseconds(500)));
    }

    #[test]
    fn new_state_is_stopped_at_zero() {
        let state = ExerciseState::new(3, squats());
        assert_eq!(state.current_reps, 0);
        assert_eq!(state.timer_seconds, 0);
        assert!(!state.is_timer_running());
        assert_eq!(state.timer_label(), "Start");
        assert_eq!(state.goal_status(), GoalStatus::Neutral);
    }
}
