//! Ventana de actividad y escritores de guards start/stop.
//!
//! Los guards emitidos implementan la máquina `NOT_STARTED -> STARTED ->
//! FINISHED` dentro del script generado; el generador sólo escribe los
//! condicionales, nunca los ejecuta. Sin stop configurado no se emite la
//! transición a FINISHED.

use serde::{Deserialize, Serialize};

use super::Component;
use crate::buffer::CodeBuffer;
use crate::context::EmitContext;
use crate::dialect::{Dialect, RunStatus};
use crate::param::ParamValue;

/// Condición de arranque del componente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StartSpec {
    /// Tiempo en segundos desde el comienzo de la rutina.
    TimeSec(ParamValue),
    /// Número de frame desde el comienzo de la rutina.
    FrameN(ParamValue),
    /// Expresión arbitraria evaluada en el script generado.
    Condition(String),
}

/// Condición de parada. `Unset` significa que el componente nunca pasa a
/// FINISHED por sí mismo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StopSpec {
    Unset,
    /// Duración en segundos contada desde el arranque del componente.
    DurationSec(ParamValue),
    /// Tiempo absoluto en segundos de rutina.
    TimeSec(ParamValue),
    FrameN(ParamValue),
    Condition(String),
}

impl StopSpec {
    /// Normaliza los centinelas de "sin stop" (`''`, `None`, `-1`).
    pub fn duration(value: ParamValue) -> Self {
        if value.is_unset_sentinel() {
            StopSpec::Unset
        } else {
            StopSpec::DurationSec(value)
        }
    }

    pub fn time(value: ParamValue) -> Self {
        if value.is_unset_sentinel() {
            StopSpec::Unset
        } else {
            StopSpec::TimeSec(value)
        }
    }

    pub fn frame(value: ParamValue) -> Self {
        if value.is_unset_sentinel() {
            StopSpec::Unset
        } else {
            StopSpec::FrameN(value)
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, StopSpec::Unset)
    }

    /// Valor del parámetro de stop tal como lo vería un editor.
    pub fn stop_value(&self) -> ParamValue {
        match self {
            StopSpec::Unset => ParamValue::None,
            StopSpec::DurationSec(v) | StopSpec::TimeSec(v) | StopSpec::FrameN(v) => v.clone(),
            StopSpec::Condition(expr) => ParamValue::Code(expr.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSpec {
    pub start: StartSpec,
    pub stop: StopSpec,
    /// Estimaciones para la vista de línea temporal de un editor; no entran
    /// en los guards emitidos.
    pub start_estim: ParamValue,
    pub duration_estim: ParamValue,
}

impl TimingSpec {
    pub fn new(start: StartSpec, stop: StopSpec) -> Self {
        Self { start,
               stop,
               start_estim: ParamValue::None,
               duration_estim: ParamValue::None }
    }

    /// Arranque a un tiempo fijo, sin stop.
    pub fn start_at(secs: f64) -> Self {
        Self::new(StartSpec::TimeSec(ParamValue::Num(secs)), StopSpec::Unset)
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.stop = StopSpec::duration(ParamValue::Num(secs));
        self
    }

    pub fn start_value(&self) -> ParamValue {
        match &self.start {
            StartSpec::TimeSec(v) | StartSpec::FrameN(v) => v.clone(),
            StartSpec::Condition(expr) => ParamValue::Code(expr.clone()),
        }
    }
}

/// Operando de guard: las expresiones van entre paréntesis para no alterar
/// la precedencia del condicional emitido.
fn guard_operand(value: &ParamValue, dialect: Dialect) -> String {
    match value {
        ParamValue::Code(expr) => format!("({expr})"),
        other => other.render(dialect),
    }
}

/// Emite el guard de arranque, registra el momento de inicio y sube un
/// nivel de indentación. El caller escribe el resto del cuerpo y cierra con
/// [`end_start_test`]. El registro de `tStart`/`frameNStart` vive aquí y no
/// en cada componente porque el guard de duración de [`write_stop_test`]
/// lee `{name}.tStart` en el script emitido.
pub fn write_start_test(comp: &dyn Component, ctx: &EmitContext, buff: &mut CodeBuffer) {
    let name = comp.name();
    let d = ctx.dialect;
    buff.blank_line();
    buff.write_indented(&format!("{} *{}* updates", d.comment_leader(), name));
    let not_started = d.status_token(RunStatus::NotStarted);
    let cond = match &comp.timing().start {
        StartSpec::TimeSec(v) => match d {
            Dialect::Python => format!("t >= {}-frameTolerance", guard_operand(v, d)),
            Dialect::JavaScript => format!("t >= {} - frameTolerance", guard_operand(v, d)),
        },
        StartSpec::FrameN(v) => format!("frameN >= {}", guard_operand(v, d)),
        StartSpec::Condition(expr) => format!("({expr})"),
    };
    match d {
        Dialect::Python => {
            buff.write_indented(&format!("if {name}.status == {not_started} and {cond}:"));
        }
        Dialect::JavaScript => {
            buff.write_indented(&format!("if ({name}.status === {not_started} && {cond}) {{"));
        }
    }
    buff.set_indent(1);
    let t = d.terminator();
    buff.write_indented(&format!("{name}.frameNStart = frameN{t}"));
    buff.write_indented(&format!("{name}.tStart = t{t}"));
}

/// Cierra el bloque abierto por [`write_start_test`].
pub fn end_start_test(dialect: Dialect, buff: &mut CodeBuffer) {
    buff.set_indent(-1);
    if dialect == Dialect::JavaScript {
        buff.write_indented("}");
    }
}

/// Emite el guard de parada (dos niveles) si hay stop configurado; devuelve
/// `false` sin escribir nada cuando `StopSpec::Unset`. El caller escribe el
/// cuerpo y cierra con [`end_stop_test`].
pub fn write_stop_test(comp: &dyn Component, ctx: &EmitContext, buff: &mut CodeBuffer) -> bool {
    let timing = comp.timing();
    if timing.stop.is_unset() {
        return false;
    }
    let name = comp.name();
    let d = ctx.dialect;
    let started = d.status_token(RunStatus::Started);
    match d {
        Dialect::Python => buff.write_indented(&format!("if {name}.status == {started}:")),
        Dialect::JavaScript => buff.write_indented(&format!("if ({name}.status === {started}) {{")),
    }
    buff.set_indent(1);
    let inner = match (&timing.stop, d) {
        (StopSpec::DurationSec(v), Dialect::Python) => {
            format!("if t >= {name}.tStart + {}-frameTolerance:", guard_operand(v, d))
        }
        (StopSpec::DurationSec(v), Dialect::JavaScript) => {
            format!("if (t >= {name}.tStart + {} - frameTolerance) {{", guard_operand(v, d))
        }
        (StopSpec::TimeSec(v), Dialect::Python) => {
            format!("if t >= {}-frameTolerance:", guard_operand(v, d))
        }
        (StopSpec::TimeSec(v), Dialect::JavaScript) => {
            format!("if (t >= {} - frameTolerance) {{", guard_operand(v, d))
        }
        (StopSpec::FrameN(v), Dialect::Python) => format!("if frameN >= {}:", guard_operand(v, d)),
        (StopSpec::FrameN(v), Dialect::JavaScript) => {
            format!("if (frameN >= {}) {{", guard_operand(v, d))
        }
        (StopSpec::Condition(expr), Dialect::Python) => format!("if ({expr}):"),
        (StopSpec::Condition(expr), Dialect::JavaScript) => format!("if (({expr})) {{"),
        (StopSpec::Unset, _) => unreachable!("guard anterior"),
    };
    buff.write_indented(&inner);
    buff.set_indent(1);
    true
}

/// Cierra los dos bloques abiertos por [`write_stop_test`].
pub fn end_stop_test(dialect: Dialect, buff: &mut CodeBuffer) {
    buff.set_indent(-1);
    if dialect == Dialect::JavaScript {
        buff.write_indented("}");
    }
    buff.set_indent(-1);
    if dialect == Dialect::JavaScript {
        buff.write_indented("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_sentinels_normalize() {
        assert!(StopSpec::duration(ParamValue::None).is_unset());
        assert!(StopSpec::duration(ParamValue::Str(String::new())).is_unset());
        assert!(StopSpec::duration(ParamValue::Int(-1)).is_unset());
        assert!(!StopSpec::duration(ParamValue::Num(1.0)).is_unset());
        assert!(StopSpec::time(ParamValue::Str("None".into())).is_unset());
    }

    #[test]
    fn timing_builder_defaults() {
        let t = TimingSpec::start_at(0.5);
        assert!(t.stop.is_unset());
        let t = t.with_duration(1.0);
        assert!(!t.stop.is_unset());
        assert_eq!(t.start_value(), ParamValue::Num(0.5));
        assert_eq!(t.stop.stop_value(), ParamValue::Num(1.0));
    }
}
