//! Contexto de emisión de una pasada.
//!
//! Sustituye el estado global compartido del modelo original (el handle del
//! emisor de marcadores referenciado por nombre entre componentes) por un
//! objeto explícito que el ensamblador posee durante exactamente una pasada.
//! Las colecciones internas son árboles ordenados para que el orden de
//! emisión no dependa del orden de registro.

use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::dialect::Dialect;

/// Import requerido por un componente. `from` es el módulo contenedor
/// (`from X import Y` en Python, `./lib/X.js` en JavaScript); sin `from` se
/// usa el import plano del dialecto.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportSpec {
    pub from: Option<String>,
    pub name: String,
}

#[derive(Debug)]
pub struct EmitContext {
    pub dialect: Dialect,
    pub pass_id: Uuid,
    /// Rutina en curso y posición del componente dentro de ella; los hooks
    /// los usan p. ej. para calcular la profundidad de dibujo.
    pub current_routine: Option<String>,
    pub component_index: usize,
    imports: BTreeSet<ImportSpec>,
    resources: BTreeMap<String, String>,
}

impl EmitContext {
    pub fn new(dialect: Dialect, pass_id: Uuid) -> Self {
        Self { dialect,
               pass_id,
               current_routine: None,
               component_index: 0,
               imports: BTreeSet::new(),
               resources: BTreeMap::new() }
    }

    pub fn require_import(&mut self, name: &str, from: Option<&str>) {
        self.imports.insert(ImportSpec { from: from.map(|s| s.to_string()),
                                         name: name.to_string() });
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter()
    }

    /// Registra un recurso compartido bajo una clave lógica. El primer
    /// registro gana (semántica de singleton); devuelve el identificador
    /// efectivo.
    pub fn register_resource(&mut self, key: &str, ident: &str) -> String {
        self.resources
            .entry(key.to_string())
            .or_insert_with(|| ident.to_string())
            .clone()
    }

    /// Identificador de un recurso compartido, si algún componente lo
    /// registró en esta pasada.
    pub fn resource(&self, key: &str) -> Option<&str> {
        self.resources.get(key).map(|s| s.as_str())
    }
}
