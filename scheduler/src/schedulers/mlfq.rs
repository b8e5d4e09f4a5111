use std::collections::{BTreeMap, VecDeque};
use std::num::NonZeroU64;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, TaskId};

/// Multilevel feedback queue with exponential quanta.
///
/// Arrivals enter level 0. A task that uses up its quantum drops one level,
/// and the quantum at level `n` is `base * 2^n`. Lower levels are always
/// served first, FIFO within a level.
#[derive(Debug)]
pub struct MultilevelFeedbackQueue {
    levels: BTreeMap<u32, VecDeque<TaskId>>,
    // Current level of every task, indexed by TaskId.
    level_of: Vec<u32>,
    base_quantum: NonZeroU64,
}

impl MultilevelFeedbackQueue {
    pub fn new(base_quantum: NonZeroU64) -> Self {
        MultilevelFeedbackQueue {
            levels: BTreeMap::new(),
            level_of: Vec::new(),
            base_quantum,
        }
    }

    /// The quantum granted at `level`, saturating at `u64::MAX`.
    pub fn quantum(&self, level: u32) -> NonZeroU64 {
        let factor = 1u64.checked_shl(level).unwrap_or(u64::MAX);
        self.base_quantum.saturating_mul(NonZeroU64::new(factor).unwrap_or(NonZeroU64::MAX))
    }

    fn enqueue(&mut self, task: TaskId) {
        let level = self.level_of[task];
        self.levels.entry(level).or_default().push_back(task);
    }

    fn pop(&mut self) -> Option<TaskId> {
        let mut entry = self.levels.first_entry()?;
        let task = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        task
    }
}

impl Scheduler for MultilevelFeedbackQueue {
    const NAME: &'static str = "mlfq";

    fn init(&mut self, kernel: &Kernel) {
        self.level_of = vec![0; kernel.tasks().len()];
    }

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.level_of[task] = 0;
        self.enqueue(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        let Some(task) = self.pop() else {
            return SchedulingDecision::Idle;
        };
        let quantum = self.quantum(self.level_of[task]);
        let timeslice = NonZeroU64::new(kernel.task(task).remaining)
            .map_or(quantum, |remaining| remaining.min(quantum));
        SchedulingDecision::Run { task, timeslice }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        if reason == StopReason::Expired {
            self.level_of[task] = self.level_of[task].saturating_add(1);
            self.enqueue(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::spans;
    use crate::{multilevel_feedback_queue, ProcessSpec};

    #[test]
    fn demoted_task_gets_double_quantum() {
        let timeline = multilevel_feedback_queue(&[ProcessSpec::new("A", 0, 7, 0)], 2).unwrap();
        assert_eq!(spans(&timeline), [("A", 0, 2), ("A", 2, 6), ("A", 6, 7)]);
    }

    #[test]
    fn fresh_arrivals_enter_at_top_level() {
        let timeline = multilevel_feedback_queue(
            &[ProcessSpec::new("A", 0, 7, 0), ProcessSpec::new("B", 1, 3, 0)],
            2,
        )
        .unwrap();
        assert_eq!(
            spans(&timeline),
            [("A", 0, 2), ("B", 2, 4), ("A", 4, 8), ("B", 8, 9), ("A", 9, 10)]
        );
    }

    #[test]
    fn late_arrival_jumps_ahead_of_demoted_tasks() {
        let timeline = multilevel_feedback_queue(
            &[ProcessSpec::new("A", 0, 10, 0), ProcessSpec::new("B", 5, 1, 0)],
            1,
        )
        .unwrap();
        // A: 0-1 (level 0), 1-3 (level 1), 3-7 (level 2), B arrives during it.
        assert_eq!(
            spans(&timeline),
            [("A", 0, 1), ("A", 1, 3), ("A", 3, 7), ("B", 7, 8), ("A", 8, 11)]
        );
    }

    #[test]
    fn quantum_saturates() {
        let mlfq = MultilevelFeedbackQueue::new(NonZeroU64::new(3).unwrap());
        assert_eq!(mlfq.quantum(0).get(), 3);
        assert_eq!(mlfq.quantum(2).get(), 12);
        assert_eq!(mlfq.quantum(70), NonZeroU64::MAX);
    }
}
