//! Repeating tasks driven by the frame loop.
//!
//! Nothing runs on its own: the app hands `fire_due` the current time each
//! frame and gets back every tick that came due since the last call, oldest
//! first. A task fires at `start + n * period`, so its cadence is anchored to
//! when it was started rather than to the wall clock.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local};

/// Identifies one started task. Handles are never reused within a scheduler,
/// so cancelling a stale handle can't hit a newer task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick<K> {
    pub handle: TaskHandle,
    pub owner: K,
    pub due: DateTime<Local>,
}

#[derive(Debug)]
struct Task<K> {
    owner: K,
    period: Duration,
    next_due: DateTime<Local>,
}

#[derive(Debug)]
pub struct Scheduler<K> {
    next_id: u64,
    tasks: BTreeMap<TaskHandle, Task<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Scheduler {
            next_id: 0,
            tasks: BTreeMap::new(),
        }
    }
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_repeating(&mut self, owner: K, period: Duration, now: DateTime<Local>) -> TaskHandle {
        let period = period.max(Duration::milliseconds(1));
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            handle,
            Task {
                owner,
                period,
                next_due: now + period,
            },
        );
        handle
    }

    /// Returns false if the task was already gone.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.tasks.remove(&handle).is_some()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest upcoming tick across all live tasks.
    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.tasks.values().map(|task| task.next_due).min()
    }

    pub fn fire_due(&mut self, now: DateTime<Local>) -> Vec<Tick<K>> {
        let mut fired = Vec::new();
        for (&handle, task) in self.tasks.iter_mut() {
            while task.next_due <= now {
                fired.push(Tick {
                    handle,
                    owner: task.owner,
                    due: task.next_due,
                });
                task.next_due = task.next_due + task.period;
            }
        }
        // stable sort keeps per-task order for equal due times
        fired.sort_by_key(|tick| tick.due);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: DateTime<Local>, millis: i64) -> DateTime<Local> {
        base + Duration::milliseconds(millis)
    }

    #[test]
    fn nothing_fires_before_first_period() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        scheduler.start_repeating(0usize, Duration::seconds(1), t0);
        assert!(scheduler.fire_due(at(t0, 999)).is_empty());
        assert_eq!(scheduler.fire_due(at(t0, 1000)).len(), 1);
        assert!(scheduler.fire_due(at(t0, 1500)).is_empty());
    }

    #[test]
    fn late_poll_delivers_every_missed_tick_in_order() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.start_repeating(7usize, Duration::seconds(1), t0);
        let ticks = scheduler.fire_due(at(t0, 3200));
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|t| t.handle == handle && t.owner == 7));
        assert!(ticks.windows(2).all(|w| w[0].due < w[1].due));
        assert_eq!(scheduler.next_due(), Some(at(t0, 4000)));
    }

    #[test]
    fn ticks_from_several_tasks_are_merged_by_due_time() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        scheduler.start_repeating('a', Duration::seconds(1), t0);
        scheduler.start_repeating('b', Duration::seconds(1), at(t0, 500));
        let owners: Vec<char> = scheduler
            .fire_due(at(t0, 2600))
            .into_iter()
            .map(|t| t.owner)
            .collect();
        assert_eq!(owners, ['a', 'b', 'a', 'b']);
    }

    #[test]
    fn cancel_is_idempotent_and_stops_ticks() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.start_repeating((), Duration::seconds(1), t0);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.fire_due(at(t0, 5000)).is_empty());
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn handles_are_not_reused() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        let first = scheduler.start_repeating((), Duration::seconds(1), t0);
        scheduler.cancel(first);
        let second = scheduler.start_repeating((), Duration::seconds(1), t0);
        assert_ne!(first, second);
        assert!(!scheduler.cancel(first));
        assert!(scheduler.cancel(second));
    }

    #[test]
    fn cancel_all_reports_count() {
        let t0 = Local::now();
        let mut scheduler = Scheduler::new();
        for owner in 0..3usize {
            scheduler.start_repeating(owner, Duration::seconds(1), t0);
        }
        assert_eq!(scheduler.cancel_all(), 3);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.cancel_all(), 0);
    }
}
