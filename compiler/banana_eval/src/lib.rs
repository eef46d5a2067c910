//! Banana Eval - the evaluator for Banana programs.
//!
//! Evaluation never recurses over the expression tree. Each expression is
//! expanded into a handful of [`Step`]s that are pushed onto the front of
//! a [`Queue`]; a trampoline pops and executes one step at a time, keeping
//! a single accumulator value per thread. Interpreted recursion depth is
//! therefore bounded by memory, not by the host stack.
//!
//! # Architecture
//!
//! - `Environment`: lexical scopes chained to a parent
//! - `Value`: integers, booleans, strings, undefined, primitives, closures
//! - `Machine`: expands expressions into steps and executes them
//! - `Scheduler`: drives many threads round-robin, one step each per pass,
//!   retiring failed threads without disturbing the rest
//! - `Interpreter`: owns the global environment and wires everything up

mod builtins;
mod environment;
pub mod errors;
pub mod interpreter;
mod machine;
mod print_handler;
pub mod scheduler;
mod value;

pub use builtins::{builtin_bindings, Primitive};
pub use environment::{AlreadyDefined, Environment};
pub use errors::{ArgCount, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use machine::{Machine, Queue, Step};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use scheduler::{
    CancelToken, Scheduler, SchedulerConfig, ThreadFailure, ThreadHandle, ThreadId, ThreadOutcome,
};
pub use value::{Closure, Value};
