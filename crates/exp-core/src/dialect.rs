//! Dialectos de salida soportados y sus tokens.
//!
//! El generador no interpreta los scripts que produce; este módulo concentra
//! las diferencias léxicas entre los dos destinos para que los hooks de
//! emisión no dupliquen literales.

use serde::{Deserialize, Serialize};

/// Dialecto destino de una pasada de emisión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Python de escritorio (scripts PsychoPy).
    Python,
    /// JavaScript de navegador (scripts PsychoJS).
    JavaScript,
}

/// Estado de ejecución reflejado en los scripts generados.
///
/// Las transiciones las efectúan los condicionales emitidos, no el
/// generador:
/// - `NotStarted` -> `Started` (guard de inicio)
/// - `Started` -> `Finished` (guard de fin, sólo si hay stop configurado)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Started,
    Finished,
}

impl Dialect {
    /// Token para valores ausentes (`None` / `undefined`).
    pub fn unset_token(&self) -> &'static str {
        match self {
            Dialect::Python => "None",
            Dialect::JavaScript => "undefined",
        }
    }

    pub fn bool_token(&self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::Python, true) => "True",
            (Dialect::Python, false) => "False",
            (Dialect::JavaScript, true) => "true",
            (Dialect::JavaScript, false) => "false",
        }
    }

    pub fn comment_leader(&self) -> &'static str {
        match self {
            Dialect::Python => "#",
            Dialect::JavaScript => "//",
        }
    }

    /// Terminador de sentencia (vacío en Python, `;` en JavaScript).
    pub fn terminator(&self) -> &'static str {
        match self {
            Dialect::Python => "",
            Dialect::JavaScript => ";",
        }
    }

    pub fn eq_op(&self) -> &'static str {
        match self {
            Dialect::Python => "==",
            Dialect::JavaScript => "===",
        }
    }

    pub fn and_op(&self) -> &'static str {
        match self {
            Dialect::Python => "and",
            Dialect::JavaScript => "&&",
        }
    }

    /// Escritura de las constantes de estado en cada dialecto.
    pub fn status_token(&self, status: RunStatus) -> &'static str {
        match (self, status) {
            (Dialect::Python, RunStatus::NotStarted) => "NOT_STARTED",
            (Dialect::Python, RunStatus::Started) => "STARTED",
            (Dialect::Python, RunStatus::Finished) => "FINISHED",
            (Dialect::JavaScript, RunStatus::NotStarted) => "PsychoJS.Status.NOT_STARTED",
            (Dialect::JavaScript, RunStatus::Started) => "PsychoJS.Status.STARTED",
            (Dialect::JavaScript, RunStatus::Finished) => "PsychoJS.Status.FINISHED",
        }
    }

    /// Nombre estable usado en eventos y mensajes de error.
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Python => "python",
            Dialect::JavaScript => "js",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_per_dialect() {
        assert_eq!(Dialect::Python.unset_token(), "None");
        assert_eq!(Dialect::JavaScript.unset_token(), "undefined");
        assert_eq!(Dialect::Python.bool_token(true), "True");
        assert_eq!(Dialect::JavaScript.bool_token(false), "false");
        assert_eq!(Dialect::JavaScript.status_token(RunStatus::Finished),
                   "PsychoJS.Status.FINISHED");
    }
}
