use std::fmt::{self, Display};

use crate::{TaskId, Ticks};

/// One contiguous CPU occupation by a named process, on `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSegment {
    pub name: String,
    pub start: Ticks,
    pub end: Ticks,
}

impl TimelineSegment {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

impl Display for TimelineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.name, self.start, self.end)
    }
}

/// Who holds the CPU during a slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Occupant {
    Process(TaskId),
    Idle,
}

/// A slot of the full timeline, idle time included.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Slot {
    pub occupant: Occupant,
    pub start: Ticks,
    pub end: Ticks,
}

/// The complete record of one run.
///
/// Slots are appended in clock order. The only in-place change is extending
/// the last slot when the same occupant keeps the CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    names: Vec<String>,
    slots: Vec<Slot>,
}

impl Timeline {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Timeline {
            names,
            slots: Vec::new(),
        }
    }

    /// Record `occupant` on `[start, end)`.
    ///
    /// With `coalesce`, a slot that directly continues the previous slot of
    /// the same occupant extends it instead of opening a new one. Idle time
    /// always coalesces.
    pub(crate) fn record(&mut self, occupant: Occupant, start: Ticks, end: Ticks, coalesce: bool) {
        debug_assert!(end > start, "empty slot {start}..{end}");
        if let Some(last) = self.slots.last_mut() {
            debug_assert!(last.end <= start, "slot {start}..{end} overlaps {last:?}");
            let merge = coalesce || occupant == Occupant::Idle;
            if merge && last.occupant == occupant && last.end == start {
                last.end = end;
                return;
            }
        }
        self.slots.push(Slot {
            occupant,
            start,
            end,
        });
    }

    /// Every slot, idle ones included.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The name of the process behind `task`.
    pub fn name(&self, task: TaskId) -> &str {
        &self.names[task]
    }

    /// The process segments, in start order, idle time removed.
    pub fn segments(&self) -> Vec<TimelineSegment> {
        self.slots
            .iter()
            .filter_map(|slot| match slot.occupant {
                Occupant::Process(task) => Some(TimelineSegment {
                    name: self.names[task].clone(),
                    start: slot.start,
                    end: slot.end,
                }),
                Occupant::Idle => None,
            })
            .collect()
    }

    /// The tick at which the last slot ends.
    pub fn makespan(&self) -> Ticks {
        self.slots.last().map_or(0, |slot| slot.end)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self.segments();
        let mut first = true;
        for segment in &segments {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_only_when_asked() {
        let mut timeline = Timeline::new(vec!["A".into()]);
        timeline.record(Occupant::Process(0), 0, 2, false);
        timeline.record(Occupant::Process(0), 2, 4, false);
        assert_eq!(timeline.slots().len(), 2);

        timeline.record(Occupant::Process(0), 4, 5, true);
        assert_eq!(timeline.slots().len(), 2);
        assert_eq!(timeline.slots()[1].end, 5);
    }

    #[test]
    fn idle_is_merged_and_hidden() {
        let mut timeline = Timeline::new(vec!["A".into()]);
        timeline.record(Occupant::Idle, 0, 1, false);
        timeline.record(Occupant::Idle, 1, 3, false);
        timeline.record(Occupant::Process(0), 3, 4, false);

        assert_eq!(timeline.slots().len(), 2);
        assert_eq!(
            timeline.segments(),
            vec![TimelineSegment {
                name: "A".into(),
                start: 3,
                end: 4
            }]
        );
        assert_eq!(timeline.makespan(), 4);
        assert_eq!(timeline.to_string(), "A:3-4");
    }
}
