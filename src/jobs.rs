use std::fmt;
use std::io;
use std::process::{Child, ExitStatus};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::{Result, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
}

impl JobState {
    pub fn flag(self) -> char {
        match self {
            JobState::Running => 'R',
            JobState::Stopped => 'S',
        }
    }
}

pub trait JobHandle {
    fn pid(&self) -> Pid;

    /// `Ok(None)` while the process is still alive (stopped counts as alive).
    fn try_reap(&mut self) -> io::Result<Option<ExitStatus>>;

    fn signal(&mut self, signal: Signal) -> nix::Result<()>;
}

impl JobHandle for Child {
    fn pid(&self) -> Pid {
        Pid::from_raw(self.id() as i32)
    }

    fn try_reap(&mut self) -> io::Result<Option<ExitStatus>> {
        self.try_wait()
    }

    fn signal(&mut self, sig: Signal) -> nix::Result<()> {
        signal::kill(JobHandle::pid(self), sig)
    }
}

#[derive(Debug)]
pub struct Job<H = Child> {
    name: String,
    state: JobState,
    handle: H,
}

impl<H: JobHandle> Job<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn pid(&self) -> Pid {
        self.handle.pid()
    }

    pub(crate) fn set_state(&mut self, state: JobState) {
        self.state = state;
    }

    pub(crate) fn signal(&mut self, sig: Signal) -> nix::Result<()> {
        self.handle.signal(sig)
    }
}

impl<H: JobHandle> fmt::Display for Job<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:X}", self.name, self.pid().as_raw())
    }
}

/// Removing a job shifts every later job down by one, so valid indices are
/// always `0..len()`. Removal is O(len).
pub struct JobTable<H = Child> {
    jobs: Vec<Job<H>>,
    capacity: usize,
    // killed, not yet waited on
    pending: Vec<H>,
}

impl<H: JobHandle> JobTable<H> {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(capacity),
            capacity,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn ensure_capacity(&self) -> Result<()> {
        if self.is_full() {
            Err(ShellError::TableFull)
        } else {
            Ok(())
        }
    }

    pub fn get(&self, index: usize) -> Option<&Job<H>> {
        self.jobs.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Job<H>> {
        self.jobs.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job<H>> {
        self.jobs.iter()
    }

    pub fn insert(&mut self, name: impl Into<String>, handle: H) -> Result<usize> {
        self.ensure_capacity()?;

        let job = Job {
            name: name.into(),
            state: JobState::Running,
            handle,
        };
        debug!(name = job.name(), pid = %job.pid(), "job added");

        self.jobs.push(job);
        Ok(self.jobs.len() - 1)
    }

    /// `index` must be below `len()`.
    pub fn remove_at(&mut self, index: usize) -> Job<H> {
        let job = self.jobs.remove(index);
        println!("{}", removal_notice(index, &job));
        debug!(index, name = job.name(), pid = %job.pid(), "job removed");
        job
    }

    pub(crate) fn retire_at(&mut self, index: usize) {
        let job = self.remove_at(index);
        self.pending.push(job.handle);
    }

    pub(crate) fn pending_reaps(&self) -> usize {
        self.pending.len()
    }

    /// Non-blocking; after a removal the same index is checked again.
    pub fn reap_terminated(&mut self) -> usize {
        let mut removed = 0;
        let mut index = 0;

        while index < self.jobs.len() {
            match self.jobs[index].handle.try_reap() {
                Ok(None) => index += 1,
                Ok(Some(status)) => {
                    debug!(index, pid = %self.jobs[index].pid(), %status, "job exited");
                    self.remove_at(index);
                    removed += 1;
                }
                Err(err) => {
                    warn!(index, pid = %self.jobs[index].pid(), error = %err, "status check failed");
                    self.remove_at(index);
                    removed += 1;
                }
            }
        }

        self.pending.retain_mut(|handle| match handle.try_reap() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = %handle.pid(), %status, "killed job collected");
                false
            }
            Err(_) => false,
        });

        removed
    }
}

pub fn removal_notice<H: JobHandle>(index: usize, job: &Job<H>) -> String {
    format!("Terminated process {}: {}", index, job)
}
