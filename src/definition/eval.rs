//! Evaluates the side-effect-free part of the expression tree.
//!
//! Path resolvers, default payload accessors and response dispatch tables are pure
//! functions of the instance's properties, so their behaviour can be checked here
//! without emitting any source text. Calls into the HTTP runtime are not supported.

use crate::definition::{Expr, Part, Stmt, TypeRef};

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The evaluated code raised a failure with this message.
    #[error("{0}")]
    Thrown(String),

    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    #[error("unbound property `{0}`")]
    UnboundProperty(String),

    #[error("{0} cannot be evaluated without a runtime")]
    Unsupported(&'static str),

    #[error("expected a mapping, found `{0}`")]
    NotAMapping(Value),
}

#[derive(Debug, Default, Clone)]
pub struct Scope {
    variables: HashMap<String, Value>,
    properties: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

fn to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn evaluate(expr: &Expr, scope: &Scope) -> Result<Value, EvalError> {
    let value = match expr {
        Expr::Null => Value::Null,
        Expr::Literal(value) => value.clone(),
        Expr::Variable(name) => scope
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone()))?,
        Expr::Property(name) => scope
            .properties
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundProperty(name.clone()))?,
        Expr::ClassRef(TypeRef::Class(fqn)) => Value::String(fqn.clone()),
        Expr::ClassRef(_) => return Err(EvalError::Unsupported("runtime class reference")),
        Expr::EnumCase { case, .. } => Value::String(case.clone()),
        Expr::Interpolate(parts) => {
            let mut text = String::new();
            for part in parts {
                match part {
                    Part::Text(s) => text.push_str(s),
                    Part::Expr(expr) => text.push_str(&to_text(evaluate(expr, scope)?)),
                }
            }
            Value::String(text)
        }
        Expr::Map(entries) => {
            let mut map = Map::new();
            for (key, expr) in entries {
                map.insert(key.clone(), evaluate(expr, scope)?);
            }
            Value::Object(map)
        }
        Expr::FilterNulls(inner) => match evaluate(inner, scope)? {
            Value::Object(mut map) => {
                map.retain(|_, value| !value.is_null());
                Value::Object(map)
            }
            other => return Err(EvalError::NotAMapping(other)),
        },
        Expr::Match {
            subject,
            arms,
            fallback,
        } => {
            let subject = evaluate(subject, scope)?;
            for arm in arms {
                for pattern in &arm.patterns {
                    if evaluate(pattern, scope)? == subject {
                        return evaluate(&arm.value, scope);
                    }
                }
            }
            evaluate(fallback, scope)?
        }
        Expr::Throw(message) => return Err(EvalError::Thrown(to_text(evaluate(message, scope)?))),
        Expr::Call { .. } => return Err(EvalError::Unsupported("method call")),
        Expr::StaticCall { .. } => return Err(EvalError::Unsupported("static call")),
    };
    Ok(value)
}

/// Runs a method body up to its first `return`. A body without one yields null.
pub fn run(body: &[Stmt], scope: &Scope) -> Result<Value, EvalError> {
    let mut scope = scope.clone();
    for stmt in body {
        match stmt {
            Stmt::Assign { variable, value } => {
                let value = evaluate(value, &scope)?;
                scope.variables.insert(variable.clone(), value);
            }
            Stmt::Return { value } => return evaluate(value, &scope),
        }
    }
    Ok(Value::Null)
}
