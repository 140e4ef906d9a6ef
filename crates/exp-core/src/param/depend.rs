//! Reglas de dependencia entre parámetros.
//!
//! Dato pasivo para un editor: permite que un parámetro habilite/deshabilite
//! u oculte a otro según una condición sobre su valor. El core sólo valida
//! que los nombres referenciados existan en la tabla.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyAction {
    Enable,
    Disable,
    Show,
    Hide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDependency {
    /// Parámetro observado.
    pub depends_on: String,
    /// Condición textual sobre el valor observado, p. ej. `=='regular polygon...'`.
    pub condition: String,
    /// Parámetro afectado.
    pub param: String,
    pub when_true: DependencyAction,
    pub when_false: DependencyAction,
}

impl ParamDependency {
    pub fn new(depends_on: &str,
               condition: &str,
               param: &str,
               when_true: DependencyAction,
               when_false: DependencyAction)
               -> Self {
        Self { depends_on: depends_on.to_string(),
               condition: condition.to_string(),
               param: param.to_string(),
               when_true,
               when_false }
    }
}
