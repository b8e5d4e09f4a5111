use std::collections::VecDeque;
use std::num::NonZeroU64;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, TaskId};

/// First-Come-First-Served.
///
/// Tasks run to completion in list order, the CPU idling whenever the next
/// one has not arrived yet.
#[derive(Debug, Default)]
pub struct Fcfs {
    ready_queue: VecDeque<TaskId>,
}

impl Fcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for Fcfs {
    const NAME: &'static str = "fcfs";

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.ready_queue.push_back(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        let Some(task) = self.ready_queue.pop_front() else {
            return SchedulingDecision::Idle;
        };
        match NonZeroU64::new(kernel.task(task).remaining) {
            Some(timeslice) => SchedulingDecision::Run { task, timeslice },
            None => SchedulingDecision::Idle,
        }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        // A full-length slice can only end in Exit.
        debug_assert_eq!(reason, StopReason::Exit, "fcfs task {task} was preempted");
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{segments, spans};
    use crate::{fcfs, ProcessSpec};

    #[test]
    fn later_arrival_waits() {
        let timeline = fcfs(&[ProcessSpec::new("A", 0, 3, 0), ProcessSpec::new("B", 1, 2, 0)]).unwrap();
        assert_eq!(spans(&timeline), [("A", 0, 3), ("B", 3, 5)]);
    }

    #[test]
    fn sorts_by_arrival_and_keeps_input_order_on_ties() {
        let timeline = fcfs(&[
            ProcessSpec::new("C", 4, 1, 0),
            ProcessSpec::new("A", 0, 2, 0),
            ProcessSpec::new("B", 0, 1, 0),
        ])
        .unwrap();
        assert_eq!(spans(&timeline), [("A", 0, 2), ("B", 2, 3), ("C", 4, 5)]);
    }

    #[test]
    fn gap_before_first_arrival() {
        let timeline = fcfs(&[ProcessSpec::new("A", 3, 2, 0)]).unwrap();
        assert_eq!(segments(&timeline), ["A:3-5"]);
        assert_eq!(timeline.slots().len(), 2);
    }
}
