use serde_json::{json, Value};

use super::TimingSpec;
use crate::buffer::CodeBuffer;
use crate::context::EmitContext;
use crate::dialect::Dialect;
use crate::param::{ParamDependency, ParamTable};

/// Trait que define un componente. La emisión debe ser pura respecto al
/// estado del descriptor: el mismo estado produce siempre el mismo texto.
pub trait Component: std::fmt::Debug {
    /// Etiqueta estable del tipo de componente (p. ej. `"Polygon"`).
    fn type_tag(&self) -> &'static str;

    /// Nombre de instancia, único dentro del experimento. Es el identificador
    /// emitido en los scripts.
    fn name(&self) -> &str;

    /// Tabla de parámetros, en orden de presentación.
    fn params(&self) -> &ParamTable;

    /// Ventana de actividad (start/stop) del componente.
    fn timing(&self) -> &TimingSpec;

    /// Reglas de dependencia entre parámetros (dato para un editor).
    fn depends(&self) -> &[ParamDependency] {
        &[]
    }

    /// Dialectos que el componente sabe emitir.
    fn targets(&self) -> &'static [Dialect] {
        &[Dialect::Python, Dialect::JavaScript]
    }

    /// Pre-pasada: declara imports y recursos compartidos antes de emitir el
    /// encabezado. No escribe texto.
    fn register_requirements(&self, _ctx: &mut EmitContext) {}

    /// Sentencias de construcción, una vez por pasada.
    fn write_init(&self, _ctx: &mut EmitContext, _buff: &mut CodeBuffer) {}

    /// Sentencias al comenzar cada repetición de la rutina.
    fn write_routine_start(&self, _ctx: &mut EmitContext, _buff: &mut CodeBuffer) {}

    /// Sentencias por frame, guardadas por los tests de start/stop.
    fn write_frame(&self, _ctx: &mut EmitContext, _buff: &mut CodeBuffer) {}

    /// Sentencias al terminar la rutina.
    fn write_routine_end(&self, _ctx: &mut EmitContext, _buff: &mut CodeBuffer) {}

    /// Identidad estructural del descriptor para la huella de la definición.
    /// Tipo + nombre + tabla completa + timing; nunca incluye timestamps.
    fn identity_value(&self) -> Value {
        json!({
            "type": self.type_tag(),
            "name": self.name(),
            "params": self.params().identity_value(),
            "timing": serde_json::to_value(self.timing()).unwrap_or(Value::Null),
        })
    }
}
