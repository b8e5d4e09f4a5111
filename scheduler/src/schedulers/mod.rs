//! The scheduling policies.
//!
//! Each policy owns only its ready structure and implements
//! [`Scheduler`](crate::Scheduler); the clock and the task arena belong to
//! the [`Dispatcher`](crate::Dispatcher).

mod fcfs;
pub use fcfs::Fcfs;

mod sjf;
pub use sjf::Sjf;

mod srtf;
pub use srtf::Srtf;

mod round_robin;
pub use round_robin::RoundRobin;

mod priority_round_robin;
pub use priority_round_robin::{PriorityConfig, PriorityOrder, PriorityRoundRobin};

mod mlfq;
pub use mlfq::MultilevelFeedbackQueue;
