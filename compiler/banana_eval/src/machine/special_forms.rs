//! `if`, `define` and `lambda`.
//!
//! Special forms never evaluate anything themselves. They check their
//! shape and queue the steps that do the work.

use banana_ir::{well_known, Expr, Name};

use super::{Queue, Step};
use crate::errors::{arity_mismatch, malformed_form};
use crate::{ArgCount, Environment, EvalError};

pub(super) fn expand(
    form: Name,
    expr: &Expr,
    args: &[Expr],
    env: &Environment,
    queue: &mut Queue,
) -> Result<(), EvalError> {
    match form {
        well_known::IF => expand_if(args, env, queue),
        well_known::DEFINE => expand_define(args, env, queue),
        _ => expand_lambda(args, env, queue),
    }
    .map_err(|e| e.with_span(expr.span))
}

fn check_arity(form: &str, expected: ArgCount, args: &[Expr]) -> Result<(), EvalError> {
    if expected.accepts(args.len()) {
        Ok(())
    } else {
        Err(arity_mismatch(form, expected, args.len()))
    }
}

/// `(if cond then [else])`
fn expand_if(args: &[Expr], env: &Environment, queue: &mut Queue) -> Result<(), EvalError> {
    check_arity("if", ArgCount::Between(2, 3), args)?;
    queue.prepend([
        Step::Eval {
            expr: args[0].clone(),
            env: env.clone(),
        },
        Step::Branch {
            env: env.clone(),
            then_branch: args[1].clone(),
            else_branch: args.get(2).cloned(),
        },
    ]);
    Ok(())
}

/// `(define name value)`
fn expand_define(args: &[Expr], env: &Environment, queue: &mut Queue) -> Result<(), EvalError> {
    check_arity("define", ArgCount::Exactly(2), args)?;
    let target = &args[0];
    let Some(name) = target.as_reference() else {
        return Err(malformed_form(
            "define",
            format!("expected a symbol to define, found {}", target.kind_name()),
        )
        .with_span(target.span));
    };
    queue.prepend([
        Step::Eval {
            expr: args[1].clone(),
            env: env.clone(),
        },
        Step::Bind {
            env: env.clone(),
            name,
            span: target.span,
        },
    ]);
    Ok(())
}

/// `(lambda (params...) body...)`
fn expand_lambda(args: &[Expr], env: &Environment, queue: &mut Queue) -> Result<(), EvalError> {
    check_arity("lambda", ArgCount::AtLeast(2), args)?;
    let list = &args[0];
    let Some(elements) = list.elements() else {
        return Err(malformed_form(
            "lambda",
            format!("expected a parameter list, found {}", list.kind_name()),
        )
        .with_span(list.span));
    };
    let params = elements
        .iter()
        .map(|param| {
            param.as_reference().ok_or_else(|| {
                malformed_form(
                    "lambda",
                    format!("parameters must be symbols, found {}", param.kind_name()),
                )
                .with_span(param.span)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    queue.push_front(Step::MakeClosure {
        params,
        body: args[1..].into(),
        env: env.clone(),
    });
    Ok(())
}
