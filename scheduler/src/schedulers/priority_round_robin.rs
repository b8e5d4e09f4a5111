use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::dispatcher::Kernel;
use crate::{Scheduler, SchedulingDecision, StopReason, Task, TaskId};

/// Which end of the priority scale is urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityOrder {
    /// Lower numbers are more urgent.
    Ascending,
    /// Higher numbers are more urgent.
    #[default]
    Descending,
}

impl PriorityOrder {
    /// Compare two priorities by urgency. `Greater` means `a` outranks `b`.
    pub fn compare(self, a: i64, b: i64) -> Ordering {
        match self {
            PriorityOrder::Ascending => b.cmp(&a),
            PriorityOrder::Descending => a.cmp(&b),
        }
    }

    pub fn outranks(self, a: i64, b: i64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

impl Display for PriorityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityOrder::Ascending => write!(f, "ascending"),
            PriorityOrder::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for PriorityOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(PriorityOrder::Ascending),
            "descending" | "desc" => Ok(PriorityOrder::Descending),
            other => Err(format!(
                "unknown priority order {other:?}, expected ascending or descending"
            )),
        }
    }
}

/// How the priority round-robin reads and uses priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityConfig {
    pub order: PriorityOrder,
    /// Cut slices short for outranking arrivals and let an unrivalled task
    /// run to completion.
    pub lookahead: bool,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        PriorityConfig {
            order: PriorityOrder::Descending,
            lookahead: true,
        }
    }
}

/// Round-Robin that always serves the most urgent queued task.
///
/// Equally urgent tasks are served in queue order. With lookahead the slice
/// is also shaped by what is still to come:
/// * it ends exactly when a more urgent task arrives, if that happens within
///   the quantum;
/// * it covers all remaining work when nothing can ever outrank the task and
///   no queued task is equally urgent;
/// * otherwise it is one quantum.
#[derive(Debug)]
pub struct PriorityRoundRobin {
    ready_queue: VecDeque<TaskId>,
    quantum: NonZeroU64,
    config: PriorityConfig,
}

impl PriorityRoundRobin {
    pub fn new(quantum: NonZeroU64, config: PriorityConfig) -> Self {
        PriorityRoundRobin {
            ready_queue: VecDeque::new(),
            quantum,
            config,
        }
    }

    // Position of the most urgent task, the first one in queue order on ties.
    fn most_urgent(&self, kernel: &Kernel) -> Option<usize> {
        let order = self.config.order;
        let mut best: Option<(usize, i64)> = None;
        for (index, &task) in self.ready_queue.iter().enumerate() {
            let priority = kernel.task(task).priority;
            match best {
                Some((_, best_priority)) if !order.outranks(priority, best_priority) => {}
                _ => best = Some((index, priority)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn timeslice(&self, kernel: &Kernel, task: &Task) -> u64 {
        let quantum = self.quantum.get();
        if !self.config.lookahead {
            return quantum.min(task.remaining);
        }

        let order = self.config.order;
        let now = kernel.now();
        // Waiting tasks are sorted by arrival, so the first hit is the earliest.
        let interrupt = kernel
            .waiting()
            .iter()
            .find(|waiting| order.outranks(waiting.priority, task.priority))
            .map(|waiting| waiting.arrival);

        match interrupt {
            Some(at) if at < now.saturating_add(quantum) => (at - now).min(task.remaining),
            Some(_) => quantum.min(task.remaining),
            None => {
                let rivalled = self
                    .ready_queue
                    .iter()
                    .any(|&other| kernel.task(other).priority == task.priority);
                if rivalled {
                    quantum.min(task.remaining)
                } else {
                    task.remaining
                }
            }
        }
    }
}

impl Scheduler for PriorityRoundRobin {
    const NAME: &'static str = "priority-round-robin";

    fn admit(&mut self, _kernel: &Kernel, task: TaskId) {
        self.ready_queue.push_back(task);
    }

    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision {
        let Some(task) = self
            .most_urgent(kernel)
            .and_then(|index| self.ready_queue.remove(index))
        else {
            return SchedulingDecision::Idle;
        };

        match NonZeroU64::new(self.timeslice(kernel, kernel.task(task))) {
            Some(timeslice) => SchedulingDecision::Run { task, timeslice },
            None => {
                self.ready_queue.push_front(task);
                SchedulingDecision::Idle
            }
        }
    }

    fn stop(&mut self, _kernel: &Kernel, task: TaskId, reason: StopReason) {
        if reason == StopReason::Expired {
            self.ready_queue.push_back(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::spans;
    use crate::{priority_round_robin, ProcessSpec};

    const PLAIN_ASCENDING: PriorityConfig = PriorityConfig {
        order: PriorityOrder::Ascending,
        lookahead: false,
    };

    #[test]
    fn slice_ends_at_urgent_arrival() {
        let timeline = priority_round_robin(
            &[ProcessSpec::new("L", 0, 10, 1), ProcessSpec::new("H", 3, 2, 5)],
            4,
            PriorityConfig::default(),
        )
        .unwrap();
        assert_eq!(spans(&timeline), [("L", 0, 3), ("H", 3, 5), ("L", 5, 12)]);
    }

    #[test]
    fn urgent_arrival_after_quantum_does_not_truncate() {
        let timeline = priority_round_robin(
            &[ProcessSpec::new("L", 0, 6, 1), ProcessSpec::new("H", 5, 1, 5)],
            2,
            PriorityConfig::default(),
        )
        .unwrap();
        // At t=4 the arrival at 5 falls inside the quantum and cuts the slice.
        assert_eq!(
            spans(&timeline),
            [("L", 0, 2), ("L", 2, 4), ("L", 4, 5), ("H", 5, 6), ("L", 6, 7)]
        );
    }

    #[test]
    fn equal_priorities_share_the_cpu() {
        let timeline = priority_round_robin(
            &[
                ProcessSpec::new("A", 0, 3, 2),
                ProcessSpec::new("B", 0, 3, 2),
                ProcessSpec::new("C", 0, 2, 1),
            ],
            2,
            PriorityConfig::default(),
        )
        .unwrap();
        assert_eq!(
            spans(&timeline),
            [("A", 0, 2), ("B", 2, 4), ("A", 4, 5), ("B", 5, 6), ("C", 6, 8)]
        );
    }

    #[test]
    fn ascending_order_inverts_urgency() {
        let timeline = priority_round_robin(
            &[ProcessSpec::new("L", 0, 10, 5), ProcessSpec::new("H", 3, 2, 1)],
            4,
            PriorityConfig {
                order: PriorityOrder::Ascending,
                lookahead: true,
            },
        )
        .unwrap();
        assert_eq!(spans(&timeline), [("L", 0, 3), ("H", 3, 5), ("L", 5, 12)]);
    }

    #[test]
    fn without_lookahead_slices_are_plain_quanta() {
        let timeline = priority_round_robin(
            &[ProcessSpec::new("L", 0, 5, 3), ProcessSpec::new("H", 1, 3, 1)],
            2,
            PLAIN_ASCENDING,
        )
        .unwrap();
        assert_eq!(
            spans(&timeline),
            [("L", 0, 2), ("H", 2, 4), ("H", 4, 5), ("L", 5, 7), ("L", 7, 8)]
        );
    }

    #[test]
    fn parses_order() {
        assert_eq!("Ascending".parse::<PriorityOrder>(), Ok(PriorityOrder::Ascending));
        assert_eq!(" desc ".parse::<PriorityOrder>(), Ok(PriorityOrder::Descending));
        assert!("sideways".parse::<PriorityOrder>().is_err());
    }
}
