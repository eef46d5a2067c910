//! Round-robin cooperative scheduler.
//!
//! Each thread is an accumulator plus a [`Queue`]. A pass visits every
//! live thread in spawn order and executes exactly one step of each, so
//! independently spawned programs interleave their side effects. Steps
//! never block and are never interrupted.
//!
//! A thread is retired when its queue runs dry, when a step fails, when it
//! is cancelled, or when it exhausts its step budget. A failure retires
//! only the thread that raised it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use banana_ir::Expr;
use crossbeam::channel::Sender;
use tracing::{debug, trace};

use crate::errors::{cancelled, step_limit_exceeded};
use crate::machine::{Machine, Queue};
use crate::{Environment, EvalError, Value};

/// Identifies a thread within one scheduler. Assigned in spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ThreadId(u32);

impl ThreadId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cooperative cancellation flag, checked once before each step.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Returned by [`Scheduler::spawn`].
#[derive(Clone, Debug)]
pub struct ThreadHandle {
    pub id: ThreadId,
    pub cancel: CancelToken,
}

/// Sent on the error channel as soon as a thread fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadFailure {
    pub id: ThreadId,
    pub error: EvalError,
}

/// How a thread ended.
#[derive(Debug)]
pub struct ThreadOutcome {
    pub id: ThreadId,
    /// The final accumulator, or the error that retired the thread.
    pub result: Result<Value, EvalError>,
    /// Steps executed, including a failing one.
    pub steps: u64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum steps per thread. `None` means unlimited.
    pub step_limit: Option<u64>,
}

struct Thread {
    id: ThreadId,
    acc: Value,
    queue: Queue,
    cancel: CancelToken,
    steps: u64,
}

/// Drives a set of threads to completion.
pub struct Scheduler {
    machine: Machine,
    config: SchedulerConfig,
    threads: Vec<Thread>,
    retired: Vec<ThreadOutcome>,
    errors: Option<Sender<ThreadFailure>>,
    next_id: u32,
}

impl Scheduler {
    pub fn new(machine: Machine, config: SchedulerConfig) -> Self {
        Scheduler {
            machine,
            config,
            threads: Vec::new(),
            retired: Vec::new(),
            errors: None,
            next_id: 0,
        }
    }

    /// Report every thread failure on `sender` as it happens.
    #[must_use]
    pub fn with_error_channel(mut self, sender: Sender<ThreadFailure>) -> Self {
        self.errors = Some(sender);
        self
    }

    /// Add a thread that evaluates `program` in `env`.
    pub fn spawn(&mut self, program: &[Expr], env: &Environment) -> ThreadHandle {
        self.spawn_queue(Queue::for_program(program, env))
    }

    /// Add a thread that runs an already-built queue.
    pub fn spawn_queue(&mut self, queue: Queue) -> ThreadHandle {
        let id = ThreadId(self.next_id);
        self.next_id += 1;
        let cancel = CancelToken::new();
        debug!(thread = %id, steps = queue.len(), "spawned thread");
        self.threads.push(Thread {
            id,
            acc: Value::Undefined,
            queue,
            cancel: cancel.clone(),
            steps: 0,
        });
        ThreadHandle { id, cancel }
    }

    /// Threads not yet retired.
    pub fn live_threads(&self) -> usize {
        self.threads.len()
    }

    /// Execute one step of every live thread, in spawn order. Returns
    /// whether any thread is still live afterwards.
    pub fn run_pass(&mut self) -> bool {
        let machine = &self.machine;
        let config = self.config;
        let retired = &mut self.retired;
        let errors = self.errors.as_ref();

        self.threads.retain_mut(|thread| match advance(machine, config, thread) {
            None => true,
            Some(result) => {
                retire(thread, result, retired, errors);
                false
            }
        });
        !self.threads.is_empty()
    }

    /// Run until every thread has retired. Outcomes are returned in
    /// retirement order, including any from earlier `run_pass` calls not
    /// yet collected.
    #[tracing::instrument(level = "debug", skip_all, fields(threads = self.threads.len()))]
    pub fn run(&mut self) -> Vec<ThreadOutcome> {
        while self.run_pass() {}
        self.take_outcomes()
    }

    /// Outcomes of threads retired since the last call.
    pub fn take_outcomes(&mut self) -> Vec<ThreadOutcome> {
        std::mem::take(&mut self.retired)
    }
}

/// Give `thread` one step. `Some` means the thread is finished.
fn advance(
    machine: &Machine,
    config: SchedulerConfig,
    thread: &mut Thread,
) -> Option<Result<Value, EvalError>> {
    if thread.cancel.is_cancelled() {
        return Some(Err(cancelled()));
    }
    if let Some(limit) = config.step_limit {
        if thread.steps >= limit && !thread.queue.is_empty() {
            return Some(Err(step_limit_exceeded(limit)));
        }
    }
    let acc = std::mem::replace(&mut thread.acc, Value::Undefined);
    let Some(step) = thread.queue.pop_front() else {
        return Some(Ok(acc));
    };

    thread.steps += 1;
    match machine.step(step, acc, &mut thread.queue) {
        Ok(acc) if thread.queue.is_empty() => Some(Ok(acc)),
        Ok(acc) => {
            thread.acc = acc;
            None
        }
        Err(error) => Some(Err(error)),
    }
}

fn retire(
    thread: &mut Thread,
    result: Result<Value, EvalError>,
    retired: &mut Vec<ThreadOutcome>,
    errors: Option<&Sender<ThreadFailure>>,
) {
    match &result {
        Ok(value) => debug!(thread = %thread.id, steps = thread.steps, %value, "thread finished"),
        Err(error) => {
            debug!(thread = %thread.id, steps = thread.steps, %error, "thread failed");
            if let Some(sender) = errors {
                // A dropped receiver only means nobody is listening.
                let _ = sender.send(ThreadFailure {
                    id: thread.id,
                    error: error.clone(),
                });
            }
        }
    }
    trace!(thread = %thread.id, dropped = thread.queue.len(), "retired");
    retired.push(ThreadOutcome {
        id: thread.id,
        result,
        steps: thread.steps,
    });
}

#[cfg(test)]
mod tests;
