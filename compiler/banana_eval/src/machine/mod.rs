//! The continuation queue machine.
//!
//! A thread's pending work is a [`Queue`] of [`Step`]s. Executing a step may
//! prepend more steps; those run before anything already queued, so the
//! queue behaves as a stack of micro-operations and evaluation proceeds
//! depth-first in source order. Each step does a bounded amount of work,
//! so no host recursion ever tracks the depth of the interpreted program.
//!
//! A call `(f a b)` expands to
//!
//! ```text
//! Eval f, JoinArg, Eval a, JoinArg, Eval b, JoinArg, Apply
//! ```
//!
//! where every `JoinArg` appends the accumulator to the argument list the
//! `Apply` step later consumes.

mod special_forms;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use banana_ir::{well_known, Expr, ExprKind, Name, SharedInterner, Span};
use tracing::trace;

use crate::errors::{arity_mismatch, duplicate_definition, not_callable, unbound_reference};
use crate::{ArgCount, Closure, Environment, EvalError, EvalResult, SharedPrintHandler, Value};

/// Values collected for one pending call. Shared by the call's `JoinArg`
/// steps and its `Apply` step.
#[derive(Clone, Default)]
pub struct ArgList(Rc<RefCell<Vec<Value>>>);

impl ArgList {
    fn with_capacity(n: usize) -> Self {
        ArgList(Rc::new(RefCell::new(Vec::with_capacity(n))))
    }

    fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    fn take(&self) -> Vec<Value> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// One unit of deferred work.
pub enum Step {
    /// Expand an expression into the steps that evaluate it.
    Eval { expr: Expr, env: Environment },
    /// Replace the accumulator with a constant.
    Literal(Value),
    /// Replace the accumulator with the value bound to `name`.
    Lookup {
        name: Name,
        span: Span,
        env: Environment,
    },
    /// Append the accumulator to a pending call's arguments.
    JoinArg(ArgList),
    /// Call the first collected value with the rest.
    Apply { args: ArgList, span: Span },
    /// Choose an `if` branch based on the accumulator.
    Branch {
        env: Environment,
        then_branch: Expr,
        else_branch: Option<Expr>,
    },
    /// Bind the accumulator to `name` in `env`.
    Bind {
        env: Environment,
        name: Name,
        span: Span,
    },
    /// Produce a closure over `env`.
    MakeClosure {
        params: Vec<Name>,
        body: Rc<[Expr]>,
        env: Environment,
    },
}

impl Step {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Eval { .. } => "eval",
            Step::Literal(_) => "literal",
            Step::Lookup { .. } => "lookup",
            Step::JoinArg(_) => "join-arg",
            Step::Apply { .. } => "apply",
            Step::Branch { .. } => "branch",
            Step::Bind { .. } => "bind",
            Step::MakeClosure { .. } => "make-closure",
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Eval { expr, .. } => write!(f, "Eval({})", expr.span),
            Step::Literal(value) => write!(f, "Literal({value:?})"),
            Step::Lookup { name, .. } => write!(f, "Lookup({name:?})"),
            Step::JoinArg(args) => write!(f, "JoinArg({})", args.0.borrow().len()),
            Step::Apply { span, .. } => write!(f, "Apply({span})"),
            Step::Branch { else_branch, .. } => {
                write!(f, "Branch(else: {})", else_branch.is_some())
            }
            Step::Bind { name, .. } => write!(f, "Bind({name:?})"),
            Step::MakeClosure { params, .. } => write!(f, "MakeClosure/{}", params.len()),
        }
    }
}

/// Pending steps of one thread. The front runs next.
#[derive(Debug, Default)]
pub struct Queue {
    steps: VecDeque<Step>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue that evaluates `program` in order in `env`; its final
    /// accumulator is the value of the last form.
    pub fn for_program(program: &[Expr], env: &Environment) -> Self {
        let mut queue = Queue::new();
        queue.prepend(program.iter().map(|expr| Step::Eval {
            expr: expr.clone(),
            env: env.clone(),
        }));
        queue
    }

    /// Put `steps` in front of everything already queued, keeping their
    /// relative order.
    pub fn prepend<I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = Step>,
        I::IntoIter: DoubleEndedIterator,
    {
        for step in steps.into_iter().rev() {
            self.steps.push_front(step);
        }
    }

    #[inline]
    pub fn push_front(&mut self, step: Step) {
        self.steps.push_front(step);
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Step> {
        self.steps.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

/// Executes steps. Holds what steps need beyond their own data: the
/// interner (for names in errors and string literals) and the print sink.
#[derive(Clone)]
pub struct Machine {
    interner: SharedInterner,
    print: SharedPrintHandler,
}

impl Machine {
    pub fn new(interner: SharedInterner, print: SharedPrintHandler) -> Self {
        Machine { interner, print }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Execute one step against the accumulator `acc`, prepending any
    /// follow-up work to `queue`. Returns the new accumulator.
    pub fn step(&self, step: Step, acc: Value, queue: &mut Queue) -> EvalResult {
        trace!(step = step.kind_name(), queued = queue.len(), "step");
        match step {
            Step::Eval { expr, env } => {
                self.expand(&expr, &env, queue)?;
                Ok(acc)
            }
            Step::Literal(value) => Ok(value),
            Step::Lookup { name, span, env } => env
                .lookup(name)
                .ok_or_else(|| unbound_reference(self.interner.lookup(name)).with_span(span)),
            Step::JoinArg(args) => {
                args.push(acc);
                Ok(Value::Undefined)
            }
            Step::Apply { args, span } => self.apply(args.take(), span, queue),
            Step::Branch {
                env,
                then_branch,
                else_branch,
            } => {
                let chosen = if acc.is_truthy() {
                    Some(then_branch)
                } else {
                    else_branch
                };
                match chosen {
                    Some(expr) => {
                        queue.push_front(Step::Eval { expr, env });
                        Ok(acc)
                    }
                    None => Ok(Value::Undefined),
                }
            }
            Step::Bind { env, name, span } => {
                env.define(name, acc).map_err(|_| {
                    duplicate_definition(self.interner.lookup(name)).with_span(span)
                })?;
                tracing::debug!(name = self.interner.lookup(name), "defined");
                Ok(Value::Undefined)
            }
            Step::MakeClosure { params, body, env } => {
                Ok(Value::Closure(Rc::new(Closure { params, body, env })))
            }
        }
    }

    /// Turn `expr` into the steps that evaluate it.
    fn expand(&self, expr: &Expr, env: &Environment, queue: &mut Queue) -> Result<(), EvalError> {
        match &expr.kind {
            ExprKind::Number(n) => queue.push_front(Step::Literal(Value::Int(*n))),
            ExprKind::Str(text) => {
                let text = self.interner.lookup(*text);
                queue.push_front(Step::Literal(Value::Str(text.into())));
            }
            ExprKind::Reference(name) => queue.push_front(Step::Lookup {
                name: *name,
                span: expr.span,
                env: env.clone(),
            }),
            ExprKind::Compound(elements) => {
                let head = elements.first().and_then(Expr::as_reference);
                match head {
                    Some(form @ (well_known::IF | well_known::DEFINE | well_known::LAMBDA)) => {
                        special_forms::expand(form, expr, &elements[1..], env, queue)?;
                    }
                    _ => enqueue_call(elements, expr.span, env, queue),
                }
            }
        }
        Ok(())
    }

    fn apply(&self, values: Vec<Value>, span: Span, queue: &mut Queue) -> EvalResult {
        let mut values = values.into_iter();
        let Some(callee) = values.next() else {
            // `()` has nothing to call.
            return Err(not_callable(&Value::Undefined).with_span(span));
        };
        match callee {
            Value::Primitive(primitive) => primitive
                .call(values.as_slice(), &self.print)
                .map_err(|e| e.with_span(span)),
            Value::Closure(closure) => {
                if closure.params.len() != values.len() {
                    return Err(arity_mismatch(
                        "lambda",
                        ArgCount::Exactly(closure.params.len()),
                        values.len(),
                    )
                    .with_span(span));
                }
                let local = closure
                    .env
                    .child_with(closure.params.iter().copied().zip(values));
                queue.prepend(closure.body.iter().map(|expr| Step::Eval {
                    expr: expr.clone(),
                    env: local.clone(),
                }));
                Ok(Value::Undefined)
            }
            other => Err(not_callable(&other).with_span(span)),
        }
    }
}

/// Queue an ordinary call: every element (callee included) is evaluated
/// left to right and collected, then applied.
fn enqueue_call(elements: &[Expr], span: Span, env: &Environment, queue: &mut Queue) {
    let args = ArgList::with_capacity(elements.len());
    let mut steps = Vec::with_capacity(elements.len() * 2 + 1);
    for element in elements {
        steps.push(Step::Eval {
            expr: element.clone(),
            env: env.clone(),
        });
        steps.push(Step::JoinArg(args.clone()));
    }
    steps.push(Step::Apply { args, span });
    queue.prepend(steps);
}
