//! Errores específicos del core de emisión.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EmitError {
    #[error("param '{param}': update policy '{policy}' not allowed")]
    UpdateNotAllowed { param: String, policy: String },
    #[error("param '{param}': value {value} outside allowed values")]
    ValueNotAllowed { param: String, value: String },
    #[error("param '{param}': value does not match declared type '{expected}'")]
    TypeMismatch { param: String, expected: String },
    #[error("dependency rule references unknown param '{param}'")]
    UnknownDependencyParam { param: String },
    #[error("duplicate component name '{0}'")]
    DuplicateComponentName(String),
    #[error("component '{component}' does not target dialect '{dialect}'")]
    DialectNotSupported { component: String, dialect: String },
    #[error("component '{component}': unbalanced indentation after '{phase}' hook")]
    UnbalancedIndent { component: String, phase: String },
    #[error("internal: {0}")]
    Internal(String),
}
