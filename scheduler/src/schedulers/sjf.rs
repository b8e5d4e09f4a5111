use std::num::NonZeroU64;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, TaskId};

/// Shortest-Job-First, non-preemptive.
///
/// At every completion the ready task with the shortest duration runs to
/// completion. Equal durations go to the earliest task in list order.
#[derive(Debug, Default)]
pub struct Sjf {
    ready: Vec<TaskId>,
}

impl Sjf {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for Sjf {
    const NAME: &'static str = "sjf";

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.ready.push(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        let Some(index) = (0..self.ready.len()).min_by_key(|&index| {
            let task = self.ready[index];
            (kernel.task(task).duration, task)
        }) else {
            return SchedulingDecision::Idle;
        };

        let task = self.ready.swap_remove(index);
        match NonZeroU64::new(kernel.task(task).remaining) {
            Some(timeslice) => SchedulingDecision::Run { task, timeslice },
            None => SchedulingDecision::Idle,
        }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        debug_assert_eq!(reason, StopReason::Exit, "sjf task {task} was preempted");
    }
}
