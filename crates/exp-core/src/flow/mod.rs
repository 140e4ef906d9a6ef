//! Estructura del experimento: rutinas ordenadas y definición inmutable.
//!
//! La definición lleva una huella (`definition_hash`) calculada sobre la
//! identidad estructural de cada componente en orden de flujo; es la base
//! del fingerprint de cada script emitido. Los bucles del flujo quedan fuera
//! (asunto del editor, ver DESIGN.md).

use serde_json::json;
use std::collections::BTreeSet;

use crate::component::Component;
use crate::errors::EmitError;
use crate::hashing::{hash_str, to_canonical_json};

/// Grupo ordenado de componentes que comparten línea temporal.
#[derive(Debug)]
pub struct Routine {
    pub name: String,
    pub components: Vec<Box<dyn Component>>,
}

impl Routine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(),
               components: Vec::new() }
    }

    pub fn with_component(mut self, component: Box<dyn Component>) -> Self {
        self.components.push(component);
        self
    }

    pub fn push_component(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Definición inmutable del experimento (orden de flujo + huella).
#[derive(Debug)]
pub struct ExperimentDefinition {
    pub routines: Vec<Routine>,
    pub definition_hash: String,
}

impl ExperimentDefinition {
    pub fn routine_count(&self) -> usize {
        self.routines.len()
    }

    pub fn component_count(&self) -> usize {
        self.routines.iter().map(|r| r.len()).sum()
    }

    /// Valida nombres únicos, tablas de parámetros y referencias de las
    /// reglas de dependencia. No emite nada.
    pub fn validate(&self) -> Result<(), EmitError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for routine in &self.routines {
            for comp in &routine.components {
                if !seen.insert(comp.name()) {
                    return Err(EmitError::DuplicateComponentName(comp.name().to_string()));
                }
                comp.params().validate()?;
                for dep in comp.depends() {
                    if !comp.params().contains(&dep.depends_on) {
                        return Err(EmitError::UnknownDependencyParam { param: dep.depends_on.clone() });
                    }
                    if !comp.params().contains(&dep.param) {
                        return Err(EmitError::UnknownDependencyParam { param: dep.param.clone() });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Construye la definición calculando la huella sobre la identidad de cada
/// rutina y componente en orden de flujo (JSON canónico + blake3).
pub fn build_experiment_definition(routines: Vec<Routine>) -> ExperimentDefinition {
    let identity: Vec<serde_json::Value> =
        routines.iter()
                .map(|r| {
                    json!({
                        "routine": r.name,
                        "components": r.components.iter().map(|c| c.identity_value()).collect::<Vec<_>>(),
                    })
                })
                .collect();
    let canonical = to_canonical_json(&json!(identity));
    ExperimentDefinition { routines,
                           definition_hash: hash_str(&canonical) }
}
