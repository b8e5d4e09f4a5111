use std::collections::VecDeque;
use std::num::NonZeroU64;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, TaskId};

/// Round-Robin over a FIFO ready queue.
///
/// Every dispatch grants at most one quantum. A preempted task goes to the
/// back of the queue, behind anything that arrived during its slice.
#[derive(Debug)]
pub struct RoundRobin {
    ready_queue: VecDeque<TaskId>,
    quantum: NonZeroU64,
}

impl RoundRobin {
    pub fn new(quantum: NonZeroU64) -> Self {
        RoundRobin {
            ready_queue: VecDeque::new(),
            quantum,
        }
    }
}

impl Scheduler for RoundRobin {
    const NAME: &'static str = "round-robin";

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.ready_queue.push_back(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        let Some(task) = self.ready_queue.pop_front() else {
            return SchedulingDecision::Idle;
        };
        let timeslice = NonZeroU64::new(kernel.task(task).remaining)
            .map_or(self.quantum, |remaining| remaining.min(self.quantum));
        SchedulingDecision::Run { task, timeslice }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        if reason == StopReason::Expired {
            self.ready_queue.push_back(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::spans;
    use crate::{round_robin, ProcessSpec, SchedulerError};

    #[test]
    fn arrival_during_slice_goes_before_preempted() {
        let timeline =
            round_robin(&[ProcessSpec::new("A", 0, 5, 0), ProcessSpec::new("B", 1, 3, 0)], 2).unwrap();
        assert_eq!(
            spans(&timeline),
            [("A", 0, 2), ("B", 2, 4), ("A", 4, 6), ("B", 6, 7), ("A", 7, 8)]
        );
    }

    #[test]
    fn lone_task_is_still_sliced() {
        let timeline = round_robin(&[ProcessSpec::new("A", 0, 5, 0)], 2).unwrap();
        assert_eq!(spans(&timeline), [("A", 0, 2), ("A", 2, 4), ("A", 4, 5)]);
    }

    #[test]
    fn arrival_at_slice_end_is_queued_first() {
        let timeline = round_robin(
            &[
                ProcessSpec::new("A", 0, 4, 0),
                ProcessSpec::new("B", 0, 2, 0),
                ProcessSpec::new("C", 2, 2, 0),
            ],
            2,
        )
        .unwrap();
        // C arrives exactly when A's first slice ends and is queued behind B, ahead of A.
        assert_eq!(
            spans(&timeline),
            [("A", 0, 2), ("B", 2, 4), ("C", 4, 6), ("A", 6, 8)]
        );
    }

    #[test]
    fn rejects_non_positive_quantum() {
        let processes = [ProcessSpec::new("A", 0, 5, 0)];
        assert_eq!(round_robin(&processes, 0), Err(SchedulerError::InvalidQuantum(0)));
        assert_eq!(round_robin(&processes, -3), Err(SchedulerError::InvalidQuantum(-3)));
    }
}
