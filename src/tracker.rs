//! Session state for the workout grid and every operation that mutates it.

use std::fmt;

use chrono::{DateTime, Duration, Local};
use tracing::{debug, info};

use crate::models::{ExerciseDefinition, ExerciseState, Notification, Pulse};
use crate::scheduler::Scheduler;
use crate::theme::Theme;

pub const TICK_SECONDS: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Increment,
    ResetReps,
    ToggleTimer,
    ResetTimer,
}

impl ActionKind {
    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::Increment => "increment",
            ActionKind::ResetReps => "reset-reps",
            ActionKind::ToggleTimer => "start-timer",
            ActionKind::ResetTimer => "reset-timer",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A click on a card control: what to do and which exercise it targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command {
    pub action: ActionKind,
    pub exercise: usize,
}

#[derive(Debug)]
pub struct Tracker {
    theme: Theme,
    exercises: Vec<ExerciseState>,
    scheduler: Scheduler<usize>,
}

impl Tracker {
    pub fn new(definitions: Vec<ExerciseDefinition>) -> Self {
        let exercises = definitions
            .into_iter()
            .enumerate()
            .map(|(id, definition)| ExerciseState::new(id, definition))
            .collect();
        Tracker {
            theme: Theme::Light,
            exercises,
            scheduler: Scheduler::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn exercises(&self) -> &[ExerciseState] {
        &self.exercises
    }

    pub fn exercise(&self, id: usize) -> Option<&ExerciseState> {
        self.exercises.get(id)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        debug!(theme = self.theme.marker(), dark = self.is_dark_mode(), "theme toggled");
        self.theme
    }

    /// Routes a card command. Unknown exercise ids are ignored.
    pub fn dispatch(&mut self, command: Command, now: DateTime<Local>) -> Option<Notification> {
        let name = &self.exercise(command.exercise)?.definition.name;
        debug!(action = %command.action, exercise = command.exercise, name = %name, "dispatch");
        match command.action {
            ActionKind::Increment => self.increment_reps(command.exercise, now),
            ActionKind::ResetReps => {
                self.reset_reps(command.exercise);
                None
            }
            ActionKind::ToggleTimer => {
                self.toggle_timer(command.exercise, now);
                None
            }
            ActionKind::ResetTimer => {
                self.reset_timer(command.exercise);
                None
            }
        }
    }

    pub fn increment_reps(&mut self, id: usize, now: DateTime<Local>) -> Option<Notification> {
        let exercise = self.exercises.get_mut(id)?;
        let previous = exercise.current_reps;
        exercise.current_reps = previous.saturating_add(1);
        let current = exercise.current_reps;
        let def = &exercise.definition;

        let notification = if previous < def.min_reps && current >= def.min_reps {
            Some(Notification::GoalReached)
        } else if previous < def.max_reps && current >= def.max_reps {
            Some(Notification::GoalComplete)
        } else {
            None
        };

        if let Some(notification) = notification {
            exercise.pulse = Some(Pulse { started: now });
            info!("{}: {}", def.name, notification.message());
        }
        notification
    }

    pub fn reset_reps(&mut self, id: usize) {
        if let Some(exercise) = self.exercises.get_mut(id) {
            exercise.current_reps = 0;
        }
    }

    pub fn toggle_timer(&mut self, id: usize, now: DateTime<Local>) {
        let Some(exercise) = self.exercises.get_mut(id) else {
            return;
        };
        let started = match exercise.timer.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                false
            }
            None => {
                let handle = self
                    .scheduler
                    .start_repeating(id, Duration::seconds(TICK_SECONDS), now);
                exercise.timer = Some(handle);
                true
            }
        };
        let seconds = exercise.timer_seconds;
        let running = self.running_timers();
        if started {
            debug!(exercise = id, seconds, running, "timer started");
        } else {
            debug!(exercise = id, seconds, running, "timer paused");
        }
    }

    pub fn reset_timer(&mut self, id: usize) {
        let Some(exercise) = self.exercises.get_mut(id) else {
            return;
        };
        if let Some(handle) = exercise.timer.take() {
            self.scheduler.cancel(handle);
        }
        exercise.timer_seconds = 0;
    }

    /// Applies every timer tick due at `now`. Returns how many were applied.
    pub fn tick(&mut self, now: DateTime<Local>) -> usize {
        let mut applied = 0;
        for tick in self.scheduler.fire_due(now) {
            match self.exercises.get_mut(tick.owner) {
                Some(exercise) if exercise.timer == Some(tick.handle) => {
                    exercise.timer_seconds += 1;
                    applied += 1;
                }
                _ => {
                    // orphaned task, drop it
                    self.scheduler.cancel(tick.handle);
                }
            }
        }
        applied
    }

    /// Next instant something on screen changes on its own: a timer tick or a
    /// pulse running out.
    pub fn next_wakeup(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let pulse_end = self
            .exercises
            .iter()
            .filter_map(|e| e.pulse)
            .filter(|p| p.is_active(now))
            .map(|p| p.ends_at())
            .min();
        match (self.scheduler.next_due(), pulse_end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn running_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Cancels every outstanding timer. Safe to call more than once.
    pub fn shutdown(&mut self) -> usize {
        if self.scheduler.is_empty() {
            return 0;
        }
        for exercise in &mut self.exercises {
            exercise.timer = None;
        }
        let cancelled = self.scheduler.cancel_all();
        info!(cancelled, "cancelled running timers");
        cancelled
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
