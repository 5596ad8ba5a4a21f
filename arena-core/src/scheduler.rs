use serde::{Deserialize, Serialize};

/// Handle for a scheduled throw, usable to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone)]
pub struct ScheduledThrow {
    pub id: TaskId,
    pub unit_id: u32,
    pub due_at: f64,
}

/// One-shot deferred throws, fired from the frame loop.
///
/// Tasks run on the same thread as `tick`, between unit updates, so they
/// never race with frame logic.
#[derive(Debug, Default)]
pub struct ThrowScheduler {
    pending: Vec<ScheduledThrow>,
    next_id: u64,
}

impl ThrowScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, unit_id: u32, due_at: f64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledThrow { id, unit_id, due_at });
        id
    }

    /// Drop a task before it fires. Returns false if it already ran.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task for a unit
    pub fn cancel_unit(&mut self, unit_id: u32) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| task.unit_id != unit_id);
        before - self.pending.len()
    }

    /// Remove and return tasks due at `current_time`, earliest first
    pub fn take_due(&mut self, current_time: f64) -> Vec<ScheduledThrow> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|task| task.due_at <= current_time);
        self.pending = pending;

        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at));
        due
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_once_in_due_order() {
        let mut scheduler = ThrowScheduler::new();
        scheduler.schedule(1, 3000.0);
        scheduler.schedule(2, 1500.0);
        scheduler.schedule(3, 9000.0);

        assert!(scheduler.take_due(1000.0).is_empty());

        let due = scheduler.take_due(5000.0);
        let units: Vec<u32> = due.iter().map(|t| t.unit_id).collect();
        assert_eq!(units, vec![2, 1]);

        // Already fired
        assert!(scheduler.take_due(5000.0).is_empty());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = ThrowScheduler::new();
        let a = scheduler.schedule(1, 100.0);
        let b = scheduler.schedule(1, 200.0);
        let c = scheduler.schedule(2, 300.0);

        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert!(!scheduler.is_pending(a));
        assert!(scheduler.is_pending(b));

        assert_eq!(scheduler.cancel_unit(1), 1);
        assert!(scheduler.is_pending(c));

        let due = scheduler.take_due(1000.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, c);
        assert!(scheduler.is_empty());
    }
}
