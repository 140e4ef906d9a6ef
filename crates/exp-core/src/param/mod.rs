//! Tabla de parámetros de un componente.
//!
//! Un `Param` describe un ajuste editable: valor tipado, cadencia de
//! actualización y metadatos de presentación. La tabla (`ParamTable`)
//! conserva el orden de inserción, que es el orden de presentación y de
//! emisión.

mod depend;
mod table;
mod value;

pub use depend::{DependencyAction, ParamDependency};
pub use table::ParamTable;
pub use value::{ParamValue, ValType};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dialect::Dialect;
use crate::errors::EmitError;

/// Cadencia de actualización de un parámetro en el script generado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Se fija una vez, en la construcción.
    Constant,
    /// Se reasigna al comenzar cada repetición de la rutina.
    SetEveryRepeat,
    /// Se reasigna en cada frame mientras el componente está activo.
    SetEveryFrame,
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdatePolicy::Constant => "constant",
            UpdatePolicy::SetEveryRepeat => "set every repeat",
            UpdatePolicy::SetEveryFrame => "set every frame",
        };
        f.write_str(s)
    }
}

/// Control de edición sugerido para un front end (dato pasivo para el core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    Single,
    Choice,
    Multi,
    Bool,
}

/// Pestaña/categoría de presentación del parámetro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Appearance,
    Layout,
    Texture,
    Data,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub value: ParamValue,
    pub val_type: ValType,
    pub input_type: InputType,
    pub categ: Category,
    pub updates: UpdatePolicy,
    /// Cadencias permitidas. Vacío significa "sólo constante".
    pub allowed_updates: Vec<UpdatePolicy>,
    /// Valores admitidos. Vacío significa sin restricción.
    pub allowed_vals: Vec<ParamValue>,
    pub hint: String,
    pub label: String,
}

impl Param {
    pub fn new(value: ParamValue, val_type: ValType) -> Self {
        Self { value,
               val_type,
               input_type: InputType::Single,
               categ: Category::Basic,
               updates: UpdatePolicy::Constant,
               allowed_updates: Vec::new(),
               allowed_vals: Vec::new(),
               hint: String::new(),
               label: String::new() }
    }

    pub fn str(value: &str) -> Self {
        Self::new(ParamValue::Str(value.to_string()), ValType::Str)
    }

    pub fn int(value: i64) -> Self {
        Self::new(ParamValue::Int(value), ValType::Int)
    }

    pub fn num(value: f64) -> Self {
        Self::new(ParamValue::Num(value), ValType::Num)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ParamValue::Bool(value), ValType::Bool).with_input(InputType::Bool)
    }

    pub fn list(value: Vec<ParamValue>) -> Self {
        Self::new(ParamValue::List(value), ValType::List)
    }

    /// Expresión del usuario: pasa verbatim al script generado.
    pub fn code(value: &str) -> Self {
        Self::new(ParamValue::Code(value.to_string()), ValType::Code)
    }

    pub fn with_input(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_categ(mut self, categ: Category) -> Self {
        self.categ = categ;
        self
    }

    pub fn with_updates(mut self, updates: UpdatePolicy) -> Self {
        self.updates = updates;
        self
    }

    pub fn with_allowed_updates(mut self, allowed: &[UpdatePolicy]) -> Self {
        self.allowed_updates = allowed.to_vec();
        self
    }

    pub fn with_allowed_vals(mut self, allowed: Vec<ParamValue>) -> Self {
        self.allowed_vals = allowed;
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.to_string();
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Literal del valor actual en el dialecto pedido.
    pub fn render(&self, dialect: Dialect) -> String {
        self.value.render(dialect)
    }

    /// Literal para la fase de init. Los parámetros variables (per repeat /
    /// per frame) se resuelven en runtime del script generado, así que aquí
    /// se sustituyen por el token de valor ausente del dialecto.
    pub fn render_init(&self, dialect: Dialect) -> String {
        match self.updates {
            UpdatePolicy::Constant => self.value.render(dialect),
            _ => dialect.unset_token().to_string(),
        }
    }

    /// Valida el invariante `updates ∈ allowed_updates` (lista vacía implica
    /// sólo constante), la pertenencia a `allowed_vals` y la concordancia de
    /// tipo declarado.
    pub fn validate(&self, name: &str) -> Result<(), EmitError> {
        let policy_ok = match self.updates {
            UpdatePolicy::Constant => {
                self.allowed_updates.is_empty() || self.allowed_updates.contains(&UpdatePolicy::Constant)
            }
            other => self.allowed_updates.contains(&other),
        };
        if !policy_ok {
            return Err(EmitError::UpdateNotAllowed { param: name.to_string(),
                                                     policy: self.updates.to_string() });
        }

        if !self.value.matches_type(self.val_type) {
            return Err(EmitError::TypeMismatch { param: name.to_string(),
                                                 expected: self.val_type.to_string() });
        }

        // Los valores `code` se evalúan en runtime; no se contrastan aquí.
        if !self.allowed_vals.is_empty() && !matches!(self.value, ParamValue::Code(_)) {
            if !self.allowed_vals.contains(&self.value) {
                return Err(EmitError::ValueNotAllowed { param: name.to_string(),
                                                        value: self.value.render(Dialect::Python) });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_always_valid_with_empty_allowed_updates() {
        let p = Param::bool(false).with_allowed_updates(&[]);
        assert!(p.validate("stop_marker").is_ok());
    }

    #[test]
    fn variable_policy_requires_explicit_allowance() {
        let p = Param::str("label").with_updates(UpdatePolicy::SetEveryFrame)
                                   .with_allowed_updates(&[UpdatePolicy::Constant, UpdatePolicy::SetEveryRepeat]);
        let err = p.validate("marker_label").unwrap_err();
        assert_eq!(err,
                   EmitError::UpdateNotAllowed { param: "marker_label".to_string(),
                                                 policy: "set every frame".to_string() });
    }

    #[test]
    fn allowed_vals_rejects_outsiders() {
        let p = Param::str("circle").with_allowed_vals(vec![ParamValue::Str("line".into()),
                                                            ParamValue::Str("triangle".into())]);
        assert!(matches!(p.validate("shape"), Err(EmitError::ValueNotAllowed { .. })));
    }

    #[test]
    fn code_values_bypass_allowed_vals() {
        let p = Param::code("myShape").with_allowed_vals(vec![ParamValue::Str("line".into())]);
        assert!(p.validate("shape").is_ok());
    }

    #[test]
    fn declared_type_must_match_value() {
        let mut p = Param::int(4);
        p.val_type = ValType::Bool;
        assert!(matches!(p.validate("nVertices"), Err(EmitError::TypeMismatch { .. })));
    }

    #[test]
    fn variable_params_render_unset_at_init() {
        let p = Param::str("red").with_updates(UpdatePolicy::SetEveryFrame)
                                 .with_allowed_updates(&[UpdatePolicy::SetEveryFrame]);
        assert_eq!(p.render_init(Dialect::Python), "None");
        assert_eq!(p.render_init(Dialect::JavaScript), "undefined");
        assert_eq!(p.render(Dialect::Python), "\"red\"");
    }
}
