//! A CPU scheduling policy library.
//!
//! This library computes, for a set of processes, the exact sequence of CPU
//! slices each one occupies on a single simulated CPU under a given policy.
//! Every policy is a pure function of its input: the process list is only
//! borrowed, and running the same input twice gives the same timeline.
//!

use std::fmt::{self, Display};
use std::num::NonZeroU64;

mod dispatcher;
mod error;
mod scheduler;
mod timeline;

pub mod schedulers;

pub use crate::dispatcher::{simulate, Dispatcher, Kernel};
pub use crate::error::{InvalidProcessReason, SchedResult, SchedulerError};
pub use crate::scheduler::{
    ProcessSpec, Scheduler, SchedulingDecision, StopReason, Task, TaskId, TaskState, Ticks,
};
pub use crate::schedulers::{PriorityConfig, PriorityOrder};
pub use crate::timeline::{Occupant, Slot, Timeline, TimelineSegment};

use crate::schedulers::{
    Fcfs, MultilevelFeedbackQueue, PriorityRoundRobin, RoundRobin, Sjf, Srtf,
};

fn validate_quantum(quantum: i64) -> SchedResult<NonZeroU64> {
    u64::try_from(quantum)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or(SchedulerError::InvalidQuantum(quantum))
}

/// Schedules `processes` First-Come-First-Served.
pub fn fcfs(processes: &[ProcessSpec]) -> SchedResult<Timeline> {
    simulate(Fcfs::new(), processes)
}

/// Schedules `processes` Shortest-Job-First, without preemption.
pub fn sjf(processes: &[ProcessSpec]) -> SchedResult<Timeline> {
    simulate(Sjf::new(), processes)
}

/// Schedules `processes` Shortest-Remaining-Time-First.
pub fn srtf(processes: &[ProcessSpec]) -> SchedResult<Timeline> {
    simulate(Srtf::new(), processes)
}

/// Schedules `processes` with a round robin policy.
///
/// * `quantum` - the time quanta that a process can run before it is preempted
pub fn round_robin(processes: &[ProcessSpec], quantum: i64) -> SchedResult<Timeline> {
    simulate(RoundRobin::new(validate_quantum(quantum)?), processes)
}

/// Schedules `processes` with a priority round robin policy.
///
/// * `quantum` - the longest slice a process gets before the queue is
///               looked at again
/// * `config` - which priorities are urgent, and whether slices look ahead
///              at future arrivals
pub fn priority_round_robin(
    processes: &[ProcessSpec],
    quantum: i64,
    config: PriorityConfig,
) -> SchedResult<Timeline> {
    simulate(PriorityRoundRobin::new(validate_quantum(quantum)?, config), processes)
}

/// Schedules `processes` with a multilevel feedback queue.
///
/// * `quantum` - the quantum at the top level, doubled at every level below
pub fn multilevel_feedback_queue(processes: &[ProcessSpec], quantum: i64) -> SchedResult<Timeline> {
    simulate(MultilevelFeedbackQueue::new(validate_quantum(quantum)?), processes)
}

/// Parameters shared by a batch of policy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Quantum for the quantum-based policies. Ignored by the others.
    pub quantum: i64,
    pub priority: PriorityConfig,
}

impl Settings {
    pub fn new(quantum: i64) -> Self {
        Settings {
            quantum,
            priority: PriorityConfig::default(),
        }
    }
}

/// Every policy this library implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin,
    PriorityRoundRobin,
    MultilevelFeedbackQueue,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::Srtf,
        Policy::RoundRobin,
        Policy::PriorityRoundRobin,
        Policy::MultilevelFeedbackQueue,
    ];

    /// Whether the policy reads [`Settings::quantum`].
    pub fn uses_quantum(self) -> bool {
        matches!(
            self,
            Policy::RoundRobin | Policy::PriorityRoundRobin | Policy::MultilevelFeedbackQueue
        )
    }

    pub fn simulate(self, processes: &[ProcessSpec], settings: &Settings) -> SchedResult<Timeline> {
        match self {
            Policy::Fcfs => fcfs(processes),
            Policy::Sjf => sjf(processes),
            Policy::Srtf => srtf(processes),
            Policy::RoundRobin => round_robin(processes, settings.quantum),
            Policy::PriorityRoundRobin => {
                priority_round_robin(processes, settings.quantum, settings.priority)
            }
            Policy::MultilevelFeedbackQueue => {
                multilevel_feedback_queue(processes, settings.quantum)
            }
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => write!(f, "FCFS"),
            Policy::Sjf => write!(f, "SJF (non-preemptive)"),
            Policy::Srtf => write!(f, "SRTF"),
            Policy::RoundRobin => write!(f, "Round-Robin"),
            Policy::PriorityRoundRobin => write!(f, "Priority + RR"),
            Policy::MultilevelFeedbackQueue => write!(f, "Multilevel Feedback Queue"),
        }
    }
}
