//! The embedding API.
//!
//! An `Interpreter` owns one global environment with the primitives bound,
//! and a scheduler for concurrently spawned programs. Separate
//! interpreters share nothing.

mod builder;

pub use builder::InterpreterBuilder;

use banana_ir::{Expr, SharedInterner};
use crossbeam::channel::Sender;

use crate::machine::Machine;
use crate::scheduler::{Scheduler, SchedulerConfig, ThreadFailure, ThreadHandle, ThreadOutcome};
use crate::{Environment, EvalResult, SharedPrintHandler, Value};

pub struct Interpreter {
    interner: SharedInterner,
    print_handler: SharedPrintHandler,
    global: Environment,
    machine: Machine,
    config: SchedulerConfig,
    errors: Option<Sender<ThreadFailure>>,
    scheduler: Scheduler,
}

impl Interpreter {
    /// Interpreter with a fresh interner, stdout printing and no step limit.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Programs must be parsed with this interner.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn global(&self) -> &Environment {
        &self.global
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Run `program` to completion as a single thread and return the value
    /// of its last form.
    ///
    /// Threads queued with [`spawn`](Self::spawn) do not advance. A failure
    /// is also sent on the error channel, as thread `#0`.
    pub fn eval_program(&self, program: &[Expr]) -> EvalResult {
        let mut scheduler = Scheduler::new(self.machine.clone(), self.config);
        if let Some(sender) = &self.errors {
            scheduler = scheduler.with_error_channel(sender.clone());
        }
        scheduler.spawn(program, &self.global);
        scheduler
            .run()
            .pop()
            .map_or(Ok(Value::Undefined), |outcome| outcome.result)
    }

    /// Queue `program` as a new thread over the global environment.
    pub fn spawn(&mut self, program: &[Expr]) -> ThreadHandle {
        self.scheduler.spawn(program, &self.global)
    }

    /// One round-robin pass over spawned threads.
    pub fn run_pass(&mut self) -> bool {
        self.scheduler.run_pass()
    }

    /// Run every spawned thread to retirement.
    pub fn run(&mut self) -> Vec<ThreadOutcome> {
        self.scheduler.run()
    }

    pub fn live_threads(&self) -> usize {
        self.scheduler.live_threads()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
