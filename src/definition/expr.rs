use crate::definition::TypeRef;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Assign { variable: String, value: Expr },
    Return { value: Expr },
}

/// Piece of an interpolated string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Part {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    pub patterns: Vec<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expr {
    Null,
    Literal(serde_json::Value),
    Variable(String),
    /// Property of the instance the method runs on.
    Property(String),
    ClassRef(TypeRef),
    EnumCase {
        ty: TypeRef,
        case: String,
    },
    Interpolate(Vec<Part>),
    /// Ordered string-keyed mapping.
    Map(Vec<(String, Expr)>),
    /// The mapping without its null-valued entries.
    FilterNulls(Box<Expr>),
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    StaticCall {
        class: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
        fallback: Box<Expr>,
    },
    /// Raises a runtime failure with the given message.
    Throw(Box<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn property(name: impl Into<String>) -> Self {
        Expr::Property(name.into())
    }

    pub fn call(target: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Box::new(target),
            method: method.into(),
            args,
        }
    }
}
