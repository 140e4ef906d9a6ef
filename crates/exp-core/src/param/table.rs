//! `ParamTable`: conjunto ordenado de parámetros de un componente.
//!
//! El orden de inserción es el orden de presentación, por eso la tabla se
//! apoya en `IndexMap`. La identidad para fingerprints no depende de este
//! orden (el JSON canónico ordena claves).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Param, UpdatePolicy};
use crate::dialect::Dialect;
use crate::errors::EmitError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamTable {
    params: IndexMap<String, Param>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta (o reemplaza) un parámetro. El orden de primera inserción es
    /// el orden de presentación.
    pub fn insert(&mut self, name: &str, param: Param) {
        self.params.insert(name.to_string(), param);
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Param)> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Literal del valor actual. Un nombre desconocido se resuelve al token
    /// ausente del dialecto: referenciar un parámetro inexistente es un error
    /// de programación del componente, no una condición recuperable.
    pub fn literal(&self, name: &str, dialect: Dialect) -> String {
        debug_assert!(self.contains(name), "param desconocido: {name}");
        self.params
            .get(name)
            .map(|p| p.render(dialect))
            .unwrap_or_else(|| dialect.unset_token().to_string())
    }

    /// Literal para la fase de init (los variables se sustituyen por el
    /// token ausente; se asignan en runtime del script).
    pub fn init_literal(&self, name: &str, dialect: Dialect) -> String {
        debug_assert!(self.contains(name), "param desconocido: {name}");
        self.params
            .get(name)
            .map(|p| p.render_init(dialect))
            .unwrap_or_else(|| dialect.unset_token().to_string())
    }

    /// Nombres de parámetros con la cadencia dada, en orden de presentación.
    pub fn with_policy(&self, policy: UpdatePolicy) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(_, p)| p.updates == policy)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// ¿Algún parámetro exige actualizaciones con esta cadencia?
    pub fn needs_update(&self, policy: UpdatePolicy) -> bool {
        self.params.values().any(|p| p.updates == policy)
    }

    pub fn validate(&self) -> Result<(), EmitError> {
        for (name, param) in &self.params {
            param.validate(name)?;
        }
        Ok(())
    }

    /// Instantánea JSON de la tabla completa, usada en la identidad de la
    /// definición (se canonicaliza antes de hashear).
    pub fn identity_value(&self) -> Value {
        serde_json::to_value(&self.params).unwrap_or(Value::Null)
    }
}
