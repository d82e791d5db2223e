//! Handler shape validation.
//!
//! A handler takes a [`Context`](crate::Context) and optionally one struct body, and returns
//! `Result<T, E>` or `Result<(), E>`. Anything else is rejected before reflection starts.

use std::fmt;

use crate::error::{Error, Result};
use crate::schema::{Kind, TypeDesc};

/// Inputs and outputs of a handler as seen by the exporter.
#[derive(Debug, Clone)]
pub struct HandlerSignature {
    /// Source-like rendering used in diagnostics.
    pub display: String,
    pub inputs: Vec<TypeDesc>,
    pub outputs: Vec<TypeDesc>,
}

impl HandlerSignature {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, desc: TypeDesc) -> Self {
        self.inputs.push(desc);
        self
    }

    pub fn output(mut self, desc: TypeDesc) -> Self {
        self.outputs.push(desc);
        self
    }
}

/// The rule a rejected handler broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRule {
    InputCount,
    FirstInputNotContext,
    BodyNotStruct,
    OutputCount,
    LastOutputNotError,
}

impl fmt::Display for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShapeRule::InputCount => "handler must take one or two parameters",
            ShapeRule::FirstInputNotContext => "first parameter must be Context",
            ShapeRule::BodyNotStruct => "second parameter must be a struct or pointer to struct",
            ShapeRule::OutputCount => "handler must return one or two values",
            ShapeRule::LastOutputNotError => "last return value must be an error",
        };
        f.write_str(text)
    }
}

/// An accepted handler. `output` is `None` when the success payload is `()`.
#[derive(Debug, Clone)]
pub enum HandlerShape {
    Unary { output: Option<TypeDesc> },
    Binary { input: TypeDesc, output: Option<TypeDesc> },
}

impl HandlerShape {
    pub fn input(&self) -> Option<&TypeDesc> {
        match self {
            HandlerShape::Unary { .. } => None,
            HandlerShape::Binary { input, .. } => Some(input),
        }
    }

    pub fn output(&self) -> Option<&TypeDesc> {
        match self {
            HandlerShape::Unary { output } | HandlerShape::Binary { output, .. } => output.as_ref(),
        }
    }
}

pub fn validate(signature: &HandlerSignature) -> Result<HandlerShape> {
    let reject = |rule| Error::InvalidHandlerShape {
        rule,
        signature: signature.display.clone(),
    };

    let inputs = &signature.inputs;
    if inputs.is_empty() || inputs.len() > 2 {
        return Err(reject(ShapeRule::InputCount));
    }
    if !matches!(inputs[0].clone().deref().kind, Kind::Context) {
        return Err(reject(ShapeRule::FirstInputNotContext));
    }
    let input = match inputs.get(1) {
        Some(body) if body.clone().deref().is_struct() => Some(body.clone()),
        Some(_) => return Err(reject(ShapeRule::BodyNotStruct)),
        None => None,
    };

    let outputs = &signature.outputs;
    if outputs.is_empty() || outputs.len() > 2 {
        return Err(reject(ShapeRule::OutputCount));
    }
    let (last, leading) = outputs.split_last().ok_or_else(|| reject(ShapeRule::OutputCount))?;
    if !matches!(last.kind, Kind::Error) {
        return Err(reject(ShapeRule::LastOutputNotError));
    }
    let output = leading.first().cloned();

    Ok(match input {
        Some(input) => HandlerShape::Binary { input, output },
        None => HandlerShape::Unary { output },
    })
}
