//! Postfix side-effect scripts.
//!
//! Flow configurations attach small programs to state entry, exit, and
//! transitions: postfix token sequences over a shared variable store, e.g.
//! `"0 count put"` or `"count get 1 add count put"`. The stack effect of a
//! program is validated when the configuration is parsed: an operator that
//! would underflow or a program that leaves operands on the stack is
//! rejected before the flow ever runs, so execution itself cannot fail.

use std::collections::HashMap;

use log::warn;

use crate::error::{NavError, Result};

/// A runtime script value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
}

impl Value {
    /// Numeric view; non-numeric strings read as 0.
    pub fn as_num(&self) -> f64 {
        match self {
            Value::Num(value) => *value,
            Value::Str(text) => text.parse().unwrap_or_else(|_| {
                warn!("script value {:?} used as number", text);
                0.0
            }),
        }
    }

    /// String view.
    pub fn as_str(&self) -> String {
        match self {
            Value::Num(value) => value.to_string(),
            Value::Str(text) => text.clone(),
        }
    }
}

/// One script instruction.
#[derive(Clone, Debug, PartialEq)]
enum Instr {
    Push(Value),
    Get,
    Put,
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Swap,
    Time,
}

impl Instr {
    /// (operands required, net stack change)
    fn stack_effect(&self) -> (usize, isize) {
        match self {
            Instr::Push(_) | Instr::Time => (0, 1),
            Instr::Get | Instr::Neg => (1, 0),
            Instr::Swap => (2, 0),
            Instr::Add | Instr::Sub | Instr::Mul | Instr::Div => (2, -1),
            Instr::Put => (2, -2),
        }
    }
}

/// A validated postfix program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    instrs: Vec<Instr>,
}

impl Program {
    /// Parse a whitespace-separated token sequence.
    ///
    /// Numbers push themselves, the operator words are reserved, and any
    /// other token pushes itself as a string (typically a variable name).
    /// Fails when the stack effect is unbalanced.
    pub fn parse(source: &str) -> Result<Self> {
        let instrs: Vec<Instr> = source
            .split_whitespace()
            .map(|token| match token {
                "get" => Instr::Get,
                "put" => Instr::Put,
                "add" => Instr::Add,
                "sub" => Instr::Sub,
                "mul" => Instr::Mul,
                "div" => Instr::Div,
                "neg" => Instr::Neg,
                "swap" => Instr::Swap,
                "time" => Instr::Time,
                _ => match token.parse::<f64>() {
                    Ok(value) => Instr::Push(Value::Num(value)),
                    Err(_) => Instr::Push(Value::Str(token.to_string())),
                },
            })
            .collect();

        let mut depth: isize = 0;
        for (position, instr) in instrs.iter().enumerate() {
            let (required, net) = instr.stack_effect();
            if depth < required as isize {
                return Err(NavError::Script(format!(
                    "stack underflow at token {} in {:?}",
                    position, source
                )));
            }
            depth += net;
        }
        if depth != 0 {
            return Err(NavError::Script(format!(
                "{} leftover operand(s) in {:?}",
                depth, source
            )));
        }
        Ok(Self { instrs })
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Run the program against the variable store.
    ///
    /// `time` is the simulation clock pushed by the `time` operator.
    pub fn execute(&self, vars: &mut HashMap<String, Value>, time: u64) {
        let mut stack: Vec<Value> = Vec::new();
        // Arity was validated at parse time, the empty-stack fallbacks are
        // unreachable
        let mut pop = |stack: &mut Vec<Value>| stack.pop().unwrap_or(Value::Num(0.0));
        for instr in &self.instrs {
            match instr {
                Instr::Push(value) => stack.push(value.clone()),
                Instr::Time => stack.push(Value::Num(time as f64)),
                Instr::Get => {
                    let name = pop(&mut stack).as_str();
                    let value = vars.get(&name).cloned().unwrap_or(Value::Num(0.0));
                    stack.push(value);
                }
                Instr::Put => {
                    let name = pop(&mut stack).as_str();
                    let value = pop(&mut stack);
                    vars.insert(name, value);
                }
                Instr::Neg => {
                    let value = pop(&mut stack).as_num();
                    stack.push(Value::Num(-value));
                }
                Instr::Swap => {
                    let top = pop(&mut stack);
                    let below = pop(&mut stack);
                    stack.push(top);
                    stack.push(below);
                }
                Instr::Add | Instr::Sub | Instr::Mul | Instr::Div => {
                    let right = pop(&mut stack).as_num();
                    let left = pop(&mut stack).as_num();
                    let value = match instr {
                        Instr::Add => left + right,
                        Instr::Sub => left - right,
                        Instr::Mul => left * right,
                        _ => left / right,
                    };
                    stack.push(Value::Num(value));
                }
            }
        }
    }
}
