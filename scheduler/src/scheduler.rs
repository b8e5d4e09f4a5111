use std::fmt::{self, Display};
use std::num::NonZeroU64;

use crate::dispatcher::Kernel;

/// Simulated time, in clock ticks.
pub type Ticks = u64;

/// Index of a task inside the per-run task arena.
///
/// Tasks are numbered in list order: ascending arrival, then input position.
pub type TaskId = usize;

/// The description of a process, as handed to the engine.
///
/// Fields are signed so that invalid values can reach validation and be
/// rejected with a [`SchedulerError`](crate::SchedulerError) instead of
/// being unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Unique identifier of the process.
    pub name: String,

    /// The tick at which the process becomes eligible to run.
    pub arrival: i64,

    /// Total service time required.
    pub duration: i64,

    /// Scheduling priority. See [`PriorityOrder`](crate::PriorityOrder)
    /// for how it is interpreted.
    pub priority: i64,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, arrival: i64, duration: i64, priority: i64) -> Self {
        ProcessSpec {
            name: name.into(),
            arrival,
            duration,
            priority,
        }
    }
}

/// The state of a task during a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    /// The task has not arrived yet.
    Waiting,

    /// The task has arrived and is held by the scheduler.
    Ready,

    /// The task occupies the CPU.
    Running,

    /// The task has received its whole duration. This is terminal.
    Completed,
}

impl Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Waiting => write!(f, "WAITING"),
            TaskState::Ready => write!(f, "READY"),
            TaskState::Running => write!(f, "RUNNING"),
            TaskState::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// The per-run record of a process.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub arrival: Ticks,
    pub duration: Ticks,
    pub priority: i64,
    /// Service time still owed. Never exceeds `duration`.
    pub remaining: Ticks,
    pub state: TaskState,
}

/// The action that the scheduler asks the dispatcher to take.
///
/// This is returned by the [`Scheduler::next`] function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedulingDecision {
    /// Run the task `task` for a maximum of `timeslice` ticks.
    Run { task: TaskId, timeslice: NonZeroU64 },

    /// Nothing is ready. The CPU stays idle until the next arrival.
    Idle,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingDecision::Run { task, timeslice } => {
                write!(f, "Run task {} for {} ticks", task, timeslice)
            }
            SchedulingDecision::Idle => write!(f, "Idle"),
        }
    }
}

/// The reason a running task gave the CPU back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The timeslice expired and the task still has work left.
    /// The scheduler has to queue it again.
    Expired,

    /// The task has no work left and will never be scheduled again.
    Exit,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Expired => write!(f, "Expired"),
            StopReason::Exit => write!(f, "Exit"),
        }
    }
}

/// The trait that every scheduling policy implements.
///
/// The [`Dispatcher`](crate::Dispatcher) owns the clock and the task arena.
/// A policy only owns its ready structure and decides who runs next and for
/// how long.
pub trait Scheduler {
    /// Policy name, used in logs.
    const NAME: &'static str;

    /// Called once before the clock starts.
    fn init(&mut self, _kernel: &Kernel) {}

    /// A task has arrived and is now ready.
    fn admit(&mut self, kernel: &Kernel, task: TaskId);

    /// Returns the action that the dispatcher has to perform next.
    ///
    /// Returning [`SchedulingDecision::Run`] hands the task over to the
    /// dispatcher, the scheduler must no longer hold it as ready.
    fn next(&mut self, kernel: &Kernel) -> SchedulingDecision;

    /// The scheduler is informed that the running task has stopped and why.
    ///
    /// Arrivals that happened during the slice have already been admitted.
    fn stop(&mut self, kernel: &Kernel, task: TaskId, reason: StopReason);

    /// Whether back-to-back slices of the same task merge into one segment.
    fn coalesce(&self) -> bool {
        false
    }
}
