//! `InterpreterBuilder` for configuring an [`Interpreter`].

use banana_ir::SharedInterner;
use crossbeam::channel::Sender;

use super::Interpreter;
use crate::machine::Machine;
use crate::scheduler::{Scheduler, SchedulerConfig, ThreadFailure};
use crate::{builtin_bindings, stdout_handler, Environment, SharedPrintHandler};

#[derive(Default)]
pub struct InterpreterBuilder {
    interner: Option<SharedInterner>,
    print_handler: Option<SharedPrintHandler>,
    config: SchedulerConfig,
    errors: Option<Sender<ThreadFailure>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an interner with the code that parses programs.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Where `print` writes. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn step_limit(mut self, limit: Option<u64>) -> Self {
        self.config.step_limit = limit;
        self
    }

    /// Receive each thread's failure as it happens, from both
    /// [`Interpreter::spawn`] and [`Interpreter::eval_program`].
    #[must_use]
    pub fn error_channel(mut self, sender: Sender<ThreadFailure>) -> Self {
        self.errors = Some(sender);
        self
    }

    pub fn build(self) -> Interpreter {
        let interner = self.interner.unwrap_or_default();
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);
        let global = Environment::root(builtin_bindings(&interner));
        let machine = Machine::new(interner.clone(), print_handler.clone());

        let mut scheduler = Scheduler::new(machine.clone(), self.config);
        if let Some(sender) = &self.errors {
            scheduler = scheduler.with_error_channel(sender.clone());
        }

        Interpreter {
            interner,
            print_handler,
            global,
            machine,
            config: self.config,
            errors: self.errors,
            scheduler,
        }
    }
}
