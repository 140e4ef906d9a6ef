//! Valores tipados de parámetro y su representación literal por dialecto.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dialect::Dialect;

/// Tipo declarado de un parámetro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValType {
    Str,
    Int,
    Num,
    Bool,
    List,
    Code,
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValType::Str => "str",
            ValType::Int => "int",
            ValType::Num => "num",
            ValType::Bool => "bool",
            ValType::List => "list",
            ValType::Code => "code",
        };
        f.write_str(s)
    }
}

/// Valor de un parámetro. `Code` transporta una expresión del usuario que se
/// emite verbatim; `None` es el valor ausente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Num(f64),
    Bool(bool),
    List(Vec<ParamValue>),
    Code(String),
    None,
}

impl ParamValue {
    /// Centinelas que significan "sin valor": `None`, cadena vacía, la cadena
    /// `'None'` y `-1` (convención heredada de los parámetros de stop).
    pub fn is_unset_sentinel(&self) -> bool {
        match self {
            ParamValue::None => true,
            ParamValue::Str(s) => s.is_empty() || s == "None",
            ParamValue::Int(i) => *i == -1,
            ParamValue::Num(n) => *n == -1.0,
            _ => false,
        }
    }

    /// Concordancia con el tipo declarado. `None` encaja en cualquier tipo y
    /// las expresiones `Code` también (se resuelven en runtime). Un entero es
    /// aceptable donde se declaró `num`.
    pub fn matches_type(&self, declared: ValType) -> bool {
        match (self, declared) {
            (ParamValue::None, _) | (ParamValue::Code(_), _) => true,
            (ParamValue::Str(_), ValType::Str) => true,
            (ParamValue::Int(_), ValType::Int) | (ParamValue::Int(_), ValType::Num) => true,
            (ParamValue::Num(_), ValType::Num) => true,
            (ParamValue::Bool(_), ValType::Bool) => true,
            (ParamValue::List(_), ValType::List) => true,
            _ => false,
        }
    }

    /// Literal en el dialecto pedido.
    ///
    /// En JavaScript los centinelas de cadena (`""`, `"None"`, `"none"`) se
    /// sustituyen por `undefined`, igual que el valor ausente.
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            ParamValue::Str(s) => {
                if dialect == Dialect::JavaScript && (s.is_empty() || s == "None" || s == "none") {
                    dialect.unset_token().to_string()
                } else {
                    quote(s)
                }
            }
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Num(n) => n.to_string(),
            ParamValue::Bool(b) => dialect.bool_token(*b).to_string(),
            ParamValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.render(dialect)).collect();
                format!("[{}]", rendered.join(", "))
            }
            ParamValue::Code(expr) => expr.clone(),
            ParamValue::None => dialect.unset_token().to_string(),
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}
