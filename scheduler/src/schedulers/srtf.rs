use std::collections::BTreeSet;
use std::num::NonZeroU64;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, TaskId};

/// Shortest-Remaining-Time-First, the preemptive form of SJF.
///
/// The choice is made again at every tick: the ready task with the least
/// remaining work runs, equal remaining work going to the earliest task in
/// list order. A task that keeps winning keeps its segment open, so context
/// switches only show up when the winner changes.
#[derive(Debug, Default)]
pub struct Srtf {
    ready: BTreeSet<TaskId>,
}

impl Srtf {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for Srtf {
    const NAME: &'static str = "srtf";

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.ready.insert(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        // BTreeSet iterates in list order and min_by_key keeps the first minimum.
        let Some(task) = self
            .ready
            .iter()
            .copied()
            .min_by_key(|&task| kernel.task(task).remaining)
        else {
            return SchedulingDecision::Idle;
        };

        self.ready.remove(&task);
        SchedulingDecision::Run {
            task,
            timeslice: NonZeroU64::MIN,
        }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        if reason == StopReason::Expired {
            self.ready.insert(task);
        }
    }

    fn coalesce(&self) -> bool {
        true
    }
}
