use std::collections::HashSet;

use log::{debug, trace};

use crate::error::{InvalidProcessReason, SchedResult, SchedulerError};
use crate::timeline::{Occupant, Timeline};
use crate::{ProcessSpec, Scheduler, SchedulingDecision, StopReason, Task, TaskId, TaskState, Ticks};

/// Per-run simulation state: the clock and the task arena.
///
/// Schedulers only get shared access to it. Every mutation goes through the
/// [`Dispatcher`].
#[derive(Debug)]
pub struct Kernel {
    now: Ticks,
    tasks: Vec<Task>,
    // tasks[arrival_cursor..] have not arrived yet
    arrival_cursor: usize,
    completed: usize,
}

impl Kernel {
    /// Validate `processes` and lay them out in list order.
    pub fn new(processes: &[ProcessSpec]) -> SchedResult<Self> {
        let mut names = HashSet::with_capacity(processes.len());
        for process in processes {
            let reason = if process.duration <= 0 {
                Some(InvalidProcessReason::NonPositiveDuration(process.duration))
            } else if process.arrival < 0 {
                Some(InvalidProcessReason::NegativeArrival(process.arrival))
            } else if !names.insert(process.name.as_str()) {
                Some(InvalidProcessReason::DuplicateName)
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(SchedulerError::InvalidProcess {
                    name: process.name.clone(),
                    reason,
                });
            }
        }

        // Every tick the clock can reach is bounded by this.
        let latest = processes.iter().map(|p| p.arrival as Ticks).max().unwrap_or(0);
        processes
            .iter()
            .try_fold(latest, |horizon, p| horizon.checked_add(p.duration as Ticks))
            .ok_or(SchedulerError::ClockOverflow)?;

        // Stable sort, so equal arrivals keep their input order.
        let mut order: Vec<&ProcessSpec> = processes.iter().collect();
        order.sort_by_key(|process| process.arrival);

        let tasks = order
            .into_iter()
            .enumerate()
            .map(|(id, process)| Task {
                id,
                name: process.name.clone(),
                arrival: process.arrival as Ticks,
                duration: process.duration as Ticks,
                priority: process.priority,
                remaining: process.duration as Ticks,
                state: TaskState::Waiting,
            })
            .collect();

        Ok(Kernel {
            now: 0,
            tasks,
            arrival_cursor: 0,
            completed: 0,
        })
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn task(&self, task: TaskId) -> &Task {
        &self.tasks[task]
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks that have not arrived yet, by ascending arrival.
    pub fn waiting(&self) -> &[Task] {
        &self.tasks[self.arrival_cursor..]
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.tasks.len()
    }

    fn next_arrival(&self) -> Option<Ticks> {
        self.waiting().first().map(|task| task.arrival)
    }

    // Move the next task due by `now` from Waiting to Ready.
    fn pop_arrival(&mut self) -> Option<TaskId> {
        let task = self.tasks.get_mut(self.arrival_cursor)?;
        if task.arrival > self.now {
            return None;
        }
        debug_assert_eq!(task.state, TaskState::Waiting);
        task.state = TaskState::Ready;
        self.arrival_cursor += 1;
        Some(task.id)
    }

    fn set_running(&mut self, task: TaskId) {
        let task = &mut self.tasks[task];
        debug_assert_eq!(
            task.state,
            TaskState::Ready,
            "task {} dispatched while not ready",
            task.name
        );
        task.state = TaskState::Running;
    }

    // Give `slice` ticks of service to `task`. Returns the slice actually used.
    fn run_for(&mut self, task: TaskId, slice: Ticks) -> Ticks {
        let task = &mut self.tasks[task];
        let slice = slice.min(task.remaining);
        task.remaining -= slice;
        self.now += slice;
        slice
    }

    fn stop(&mut self, task: TaskId) -> StopReason {
        let task = &mut self.tasks[task];
        if task.remaining == 0 {
            task.state = TaskState::Completed;
            self.completed += 1;
            StopReason::Exit
        } else {
            task.state = TaskState::Ready;
            StopReason::Expired
        }
    }
}

/// The clock-driven loop shared by every policy.
///
/// Each step admits the arrivals due by the current tick, asks the scheduler
/// for a decision and carries it out. Arrivals that happen during a slice are
/// admitted before the scheduler learns that the slice ended, so they are
/// queued ahead of the task that was just preempted.
pub struct Dispatcher<S: Scheduler> {
    kernel: Kernel,
    scheduler: S,
    timeline: Timeline,
}

impl<S: Scheduler> Dispatcher<S> {
    pub fn new(mut scheduler: S, processes: &[ProcessSpec]) -> SchedResult<Self> {
        let kernel = Kernel::new(processes)?;
        scheduler.init(&kernel);
        let names = kernel.tasks.iter().map(|task| task.name.clone()).collect();
        Ok(Dispatcher {
            kernel,
            scheduler,
            timeline: Timeline::new(names),
        })
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Run until every task has completed.
    pub fn run(mut self) -> SchedResult<Timeline> {
        debug!(
            "{}: simulating {} processes",
            S::NAME,
            self.kernel.tasks.len()
        );
        while !self.kernel.all_completed() {
            self.step()?;
        }
        debug!("{}: finished at t={}", S::NAME, self.kernel.now);
        Ok(self.timeline)
    }

    /// Perform one scheduling decision.
    pub fn step(&mut self) -> SchedResult<()> {
        self.admit_arrivals();

        let decision = self.scheduler.next(&self.kernel);
        debug!("{}: t={} {}", S::NAME, self.kernel.now, decision);

        match decision {
            SchedulingDecision::Run { task, timeslice } => {
                self.dispatch(task, timeslice.get());
                Ok(())
            }
            SchedulingDecision::Idle => self.idle(),
        }
    }

    fn admit_arrivals(&mut self) {
        while let Some(task) = self.kernel.pop_arrival() {
            trace!(
                "{}: t={} admit {}",
                S::NAME,
                self.kernel.now,
                self.kernel.task(task).name
            );
            self.scheduler.admit(&self.kernel, task);
        }
    }

    fn dispatch(&mut self, task: TaskId, timeslice: Ticks) {
        let start = self.kernel.now;
        self.kernel.set_running(task);
        let used = self.kernel.run_for(task, timeslice);
        self.timeline.record(
            Occupant::Process(task),
            start,
            start + used,
            self.scheduler.coalesce(),
        );

        self.admit_arrivals();

        let reason = self.kernel.stop(task);
        trace!(
            "{}: t={} {} stopped: {}",
            S::NAME,
            self.kernel.now,
            self.kernel.task(task).name,
            reason
        );
        self.scheduler.stop(&self.kernel, task, reason);
    }

    fn idle(&mut self) -> SchedResult<()> {
        let start = self.kernel.now;
        let Some(until) = self.kernel.next_arrival() else {
            return Err(SchedulerError::Stalled { at: start });
        };
        // Arrivals due by now were admitted already, so this always moves forward.
        debug_assert!(until > start);
        self.kernel.now = until;
        self.timeline.record(Occupant::Idle, start, until, true);
        Ok(())
    }
}

/// Run `scheduler` over `processes` from tick 0 until every process completes.
pub fn simulate<S: Scheduler>(scheduler: S, processes: &[ProcessSpec]) -> SchedResult<Timeline> {
    Dispatcher::new(scheduler, processes)?.run()
}
