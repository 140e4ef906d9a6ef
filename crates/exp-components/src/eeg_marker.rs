//! Marcado de períodos de EEG.
//!
//! Emite llamadas a un emisor de marcadores compartido entre todos los
//! marcadores del experimento. El emisor no es un global del generador:
//! cada componente lo registra en el contexto de la pasada bajo
//! [`MARKER_SENDER_RESOURCE`] y el primer registro fija el identificador
//! efectivo. En el script Python las llamadas compensan la latencia hasta
//! el próximo flip; en JavaScript se difieren con `callOnFlip` y se
//! protegen con un guard `typeof` por si el emisor no se inicializó.

use exp_core::component::{timing, updates};
use exp_core::param::{InputType, Param, ParamValue, UpdatePolicy};
use exp_core::{CodeBuffer, Component, Dialect, EmitContext, ParamTable, RunStatus, TimingSpec};

use crate::base::ComponentCore;

/// Clave lógica del emisor compartido en el contexto de la pasada.
pub const MARKER_SENDER_RESOURCE: &str = "marker_sender";
/// Identificador emitido por defecto para el emisor.
pub const MARKER_SENDER_IDENT: &str = "eeg_cortex";

#[derive(Debug)]
pub struct EegMarkerComponent {
    core: ComponentCore,
}

impl EegMarkerComponent {
    pub fn new(name: &str, timing: TimingSpec) -> Self {
        let mut core = ComponentCore::new(name, timing);
        let allow2 = [UpdatePolicy::Constant, UpdatePolicy::SetEveryRepeat];

        core.params.insert("marker_label",
                           Param::str("label").with_allowed_updates(&allow2)
                                              .with_hint("Label of the marker to be inserted (interpreted as a string)")
                                              .with_label("Marker Label"));
        core.params.insert("marker_value",
                           Param::str("1").with_allowed_updates(&allow2)
                                          .with_hint("Value of the marker to be inserted (interpreted as a string)")
                                          .with_label("Marker Value"));
        core.params.insert("stop_marker",
                           Param::bool(false).with_input(InputType::Bool)
                                             .with_allowed_vals(vec![ParamValue::Bool(true), ParamValue::Bool(false)])
                                             .with_allowed_updates(&[])
                                             .with_hint("Check this box to include a stop marker")
                                             .with_label("Stop Marker"));
        Self { core }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.core.set_value("marker_label", ParamValue::Str(label.to_string()));
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.core.set_value("marker_value", ParamValue::Str(value.to_string()));
        self
    }

    pub fn with_stop_marker(mut self, stop_marker: bool) -> Self {
        self.core.set_value("stop_marker", ParamValue::Bool(stop_marker));
        self
    }

    fn stop_marker(&self) -> bool {
        matches!(self.core.params.get("stop_marker").map(|p| &p.value),
                 Some(ParamValue::Bool(true)))
    }

    /// Identificador del emisor en esta pasada (el primero registrado gana).
    fn sender<'a>(&self, ctx: &'a EmitContext) -> &'a str {
        ctx.resource(MARKER_SENDER_RESOURCE).unwrap_or(MARKER_SENDER_IDENT)
    }

    fn write_frame_py(&self, ctx: &EmitContext, buff: &mut CodeBuffer) {
        let name = &self.core.name;
        let p = &self.core.params;
        let sender = self.sender(ctx);
        let label = p.literal("marker_label", Dialect::Python);
        let value = p.literal("marker_value", Dialect::Python);

        timing::write_start_test(self, ctx, buff);
        buff.write_indented(&format!("{name}.status = STARTED"));
        buff.write_indented("delta_time = tThisFlip - t  # extra time until the next screen flip");
        buff.write_indented(&format!("{sender}.inject_marker(value=str({value}), label={label}, delta_time=delta_time)"));
        buff.write_indented(&format!("{name}.start_sent = True"));
        timing::end_start_test(Dialect::Python, buff);

        if timing::write_stop_test(self, ctx, buff) {
            buff.write_indented(&format!("{name}.status = FINISHED"));
            if self.stop_marker() {
                buff.write_indented("delta_time = tThisFlip - t  # extra time until the next screen flip");
                buff.write_indented(&format!("{sender}.update_marker(label={label}, delta_time=delta_time)"));
            }
            timing::end_stop_test(Dialect::Python, buff);
        }
    }

    fn write_frame_js(&self, ctx: &EmitContext, buff: &mut CodeBuffer) {
        let name = &self.core.name;
        let p = &self.core.params;
        let sender = self.sender(ctx);
        let label = p.literal("marker_label", Dialect::JavaScript);
        let value = p.literal("marker_value", Dialect::JavaScript);
        let stop_marker = Dialect::JavaScript.bool_token(self.stop_marker());

        timing::write_start_test(self, ctx, buff);
        buff.write_indented("psychoJS.window.callOnFlip(function() {");
        buff.set_indent(1);
        buff.write_indented(&format!("if (typeof {sender} != \"undefined\") {{"));
        buff.set_indent(1);
        buff.write_indented(&format!("{sender}.sendMarker({value}, {label}, {stop_marker});"));
        buff.close_block();
        buff.set_indent(-1);
        buff.write_indented("});");
        buff.write_indented(&format!("{name}.status = PsychoJS.Status.STARTED;"));
        timing::end_start_test(Dialect::JavaScript, buff);

        if timing::write_stop_test(self, ctx, buff) {
            buff.write_indented("psychoJS.window.callOnFlip(function() {");
            buff.set_indent(1);
            buff.write_indented(&format!("if (typeof {sender} != \"undefined\") {{"));
            buff.set_indent(1);
            buff.write_indented(&format!("{sender}.sendStopMarker();"));
            buff.close_block();
            buff.set_indent(-1);
            buff.write_indented("});");
            buff.write_indented(&format!("{name}.status = PsychoJS.Status.FINISHED;"));
            timing::end_stop_test(Dialect::JavaScript, buff);
        }
    }
}

impl Component for EegMarkerComponent {
    fn type_tag(&self) -> &'static str {
        "EegMarker"
    }

    fn name(&self) -> &str {
        &self.core.name
    }

    fn params(&self) -> &ParamTable {
        &self.core.params
    }

    fn timing(&self) -> &TimingSpec {
        &self.core.timing
    }

    fn register_requirements(&self, ctx: &mut EmitContext) {
        let _ = ctx.register_resource(MARKER_SENDER_RESOURCE, MARKER_SENDER_IDENT);
        if ctx.dialect == Dialect::Python {
            ctx.require_import("visual", Some("psychopy"));
            ctx.require_import("emotiv", Some("psychopy.hardware"));
        }
    }

    fn write_init(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        let name = &self.core.name;
        match ctx.dialect {
            Dialect::Python => {
                // Stim vacío: sólo aporta el atributo status a la rutina.
                buff.write_indented(&format!("{name} = visual.BaseVisualStim(win=win, name=\"{name}\")"));
            }
            Dialect::JavaScript => {
                buff.write_indented(&format!("{name} = {{status: {}}};",
                                             Dialect::JavaScript.status_token(RunStatus::NotStarted)));
            }
        }
    }

    fn write_routine_start(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        updates::write_param_updates(self, ctx, buff, UpdatePolicy::SetEveryRepeat);
    }

    fn write_frame(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        match ctx.dialect {
            Dialect::Python => self.write_frame_py(ctx, buff),
            Dialect::JavaScript => self.write_frame_js(ctx, buff),
        }
    }
}
