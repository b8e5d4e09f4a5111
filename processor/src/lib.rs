//! A processor simulation library
//!
//! This is used for running the policies from the [`scheduler`] crate over a
//! workload read from the textual input format, and for turning the
//! resulting timelines into a readable report.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use log::debug;
use scheduler::{Policy, PriorityConfig, SchedResult, Settings, Ticks, TimelineSegment};

mod error;
mod input;

pub use crate::error::{Error, ParseError};
pub use crate::input::{parse_input, Workload};

/// Widest Gantt row, in columns. Longer timelines are scaled down to fit.
pub const GANTT_WIDTH: Ticks = 100;

/// The timeline one policy produced for a workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    /// The policy that produced the timeline.
    pub policy: Policy,

    /// The process segments, in start order, idle time removed.
    pub segments: Vec<TimelineSegment>,
}

impl Log {
    /// The tick at which the last segment ends.
    pub fn makespan(&self) -> Ticks {
        self.segments.last().map_or(0, |segment| segment.end)
    }

    /// Ticks per Gantt column, so that a row never exceeds [`GANTT_WIDTH`].
    fn ticks_per_column(&self) -> Ticks {
        self.makespan().div_ceil(GANTT_WIDTH).max(1)
    }

    fn gantt_row(&self, name: &str, scale: Ticks) -> String {
        let columns = self.makespan().div_ceil(scale) as usize;
        let mut row = vec!['.'; columns];
        for segment in self.segments.iter().filter(|segment| segment.name == name) {
            let first = (segment.start / scale) as usize;
            let last = ((segment.end - 1) / scale) as usize;
            row[first..=last].fill('#');
        }
        row.into_iter().collect()
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== {} =====", self.policy)?;
        if self.segments.is_empty() {
            return writeln!(f, "(no segments)");
        }

        writeln!(f, "NAME\tSTART\tEND")?;
        for segment in &self.segments {
            writeln!(f, "{}\t{}\t{}", segment.name, segment.start, segment.end)?;
        }
        writeln!(f)?;

        let scale = self.ticks_per_column();
        if scale > 1 {
            writeln!(f, "(1 column = {scale} ticks)")?;
        }
        let names: BTreeSet<&str> = self.segments.iter().map(|s| s.name.as_str()).collect();
        let width = names.iter().map(|name| name.len()).max().unwrap_or(0);
        for name in names {
            writeln!(f, "{name:<width$} |{}|", self.gantt_row(name, scale))?;
        }
        Ok(())
    }
}

/// The processor simulator.
pub struct Processor;

impl Processor {
    /// Run every policy over `workload`.
    ///
    /// * `workload` - the processes and the quantum, as read by [`parse_input`].
    /// * `priority` - how the priority round-robin reads priorities.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::{format_logs, parse_input, Processor};
    /// use scheduler::PriorityConfig;
    ///
    /// let workload = parse_input("2\nA 0 5 1\nB 1 3 2\nquantum=2").unwrap();
    /// let logs = Processor::run(&workload, PriorityConfig::default()).unwrap();
    ///
    /// println!("{}", format_logs(&logs));
    /// ```
    pub fn run(workload: &Workload, priority: PriorityConfig) -> SchedResult<Vec<Log>> {
        let settings = Settings {
            quantum: workload.quantum,
            priority,
        };

        Policy::ALL
            .into_iter()
            .map(|policy| {
                let timeline = policy.simulate(&workload.processes, &settings)?;
                debug!(
                    "{policy}: {} segments, makespan {}",
                    timeline.segments().len(),
                    timeline.makespan()
                );
                Ok(Log {
                    policy,
                    segments: timeline.segments(),
                })
            })
            .collect()
    }
}

/// Format the [`Processor`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by the [`Processor`].
pub fn format_logs(logs: &[Log]) -> String {
    let mut s = String::new();
    for log in logs {
        // Writing into a String cannot fail.
        let _ = fmt::write(&mut s, format_args!("{}\n", log));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scheduler::SchedulerError;

    #[test]
    fn runs_every_policy_in_order() {
        let workload = parse_input("2\nA 0 3 0\nB 1 2 0\nq=2").unwrap();
        let logs = Processor::run(&workload, PriorityConfig::default()).unwrap();
        let policies: Vec<Policy> = logs.iter().map(|log| log.policy).collect();
        assert_eq!(policies, Policy::ALL);
    }

    #[test]
    fn renders_table_and_gantt() {
        let log = Log {
            policy: Policy::Fcfs,
            segments: vec![
                TimelineSegment {
                    name: "A".into(),
                    start: 0,
                    end: 3,
                },
                TimelineSegment {
                    name: "B".into(),
                    start: 3,
                    end: 5,
                },
            ],
        };
        assert_eq!(
            log.to_string(),
            "===== FCFS =====\nNAME\tSTART\tEND\nA\t0\t3\nB\t3\t5\n\nA |###..|\nB |...##|\n"
        );
    }

    #[test]
    fn long_timelines_are_scaled_to_fit() {
        let log = Log {
            policy: Policy::Fcfs,
            segments: vec![
                TimelineSegment {
                    name: "A".into(),
                    start: 0,
                    end: 1,
                },
                TimelineSegment {
                    name: "B".into(),
                    start: 1_000_000_000,
                    end: 1_000_000_001,
                },
            ],
        };
        let report = log.to_string();
        assert!(report.contains("(1 column = 10000001 ticks)\n"));

        let rows: Vec<&str> = report.lines().filter(|line| line.contains('|')).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], format!("A |#{}|", ".".repeat(99)));
        assert_eq!(rows[1], format!("B |{}#|", ".".repeat(99)));
    }

    #[test]
    fn empty_log() {
        let log = Log {
            policy: Policy::Srtf,
            segments: vec![],
        };
        assert_eq!(format_logs(&[log]), "===== SRTF =====\n(no segments)\n\n");
    }

    #[test]
    fn bad_quantum_fails_the_whole_run() {
        let workload = parse_input("1\nA 0 3 0\nq=0").unwrap();
        assert_eq!(
            Processor::run(&workload, PriorityConfig::default()),
            Err(SchedulerError::InvalidQuantum(0))
        );
    }
}
