use std::fmt::{self, Display};

use crate::Ticks;

/// Why a process record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidProcessReason {
    /// `duration` must be strictly positive.
    NonPositiveDuration(i64),
    /// `arrival` must not be negative.
    NegativeArrival(i64),
    /// Another process in the same input already uses this name.
    DuplicateName,
}

impl Display for InvalidProcessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDuration(duration) => {
                write!(f, "duration {duration} is not positive")
            }
            Self::NegativeArrival(arrival) => write!(f, "arrival {arrival} is negative"),
            Self::DuplicateName => write!(f, "name is used more than once"),
        }
    }
}

/// Errors reported by the engine. None of them leaves a partial timeline behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A process record failed validation.
    InvalidProcess {
        name: String,
        reason: InvalidProcessReason,
    },
    /// A quantum-based policy was configured with a quantum `<= 0`.
    InvalidQuantum(i64),
    /// The policy left the CPU idle while work remained and nothing else
    /// was going to arrive.
    Stalled { at: Ticks },
    /// The latest arrival plus the total work does not fit in [`Ticks`].
    ClockOverflow,
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProcess { name, reason } => {
                write!(f, "invalid process {name:?}: {reason}")
            }
            Self::InvalidQuantum(quantum) => {
                write!(f, "invalid quantum {quantum}, it must be positive")
            }
            Self::Stalled { at } => {
                write!(f, "scheduler stalled at tick {at} with work remaining")
            }
            Self::ClockOverflow => {
                write!(f, "latest arrival plus total duration overflows the clock")
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

/// Result type for engine operations.
pub type SchedResult<T> = Result<T, SchedulerError>;
