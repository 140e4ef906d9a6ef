//! Implementación del `ScriptAssembler`.

use serde_json::json;
use uuid::Uuid;

use super::skeleton;
use crate::buffer::CodeBuffer;
use crate::component::Component;
use crate::constants::GENERATOR_VERSION;
use crate::context::EmitContext;
use crate::dialect::Dialect;
use crate::errors::EmitError;
use crate::event::{EmitEvent, EmitEventKind, EventStore, InMemoryEventStore};
use crate::flow::ExperimentDefinition;
use crate::hashing::{hash_str, hash_value};

/// Resultado de una pasada de emisión.
#[derive(Debug, Clone)]
pub struct EmittedScript {
    pub dialect: Dialect,
    pub source: String,
    /// Huella sobre `{generator_version, definition_hash, dialect, source}`.
    pub fingerprint: String,
}

/// Ensamblador de scripts deterministas.
///
/// Responsable de recorrer la definición en orden de flujo, invocar los
/// hooks por fase y garantizar el determinismo: el mismo estado de la
/// definición produce bytes idénticos en cada pasada.
#[derive(Debug)]
pub struct ScriptAssembler<E: EventStore> {
    event_store: E,
    definition: ExperimentDefinition,
    last_pass_id: Option<Uuid>,
}

impl ScriptAssembler<InMemoryEventStore> {
    /// Crea un ensamblador con store de eventos en memoria.
    pub fn new(definition: ExperimentDefinition) -> Self {
        Self::with_store(definition, InMemoryEventStore::default())
    }
}

impl<E: EventStore> ScriptAssembler<E> {
    pub fn with_store(definition: ExperimentDefinition, event_store: E) -> Self {
        Self { event_store,
               definition,
               last_pass_id: None }
    }

    pub fn definition(&self) -> &ExperimentDefinition {
        &self.definition
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn last_pass_id(&self) -> Option<Uuid> {
        self.last_pass_id
    }

    /// Eventos de la última pasada, si hubo alguna.
    pub fn events(&self) -> Option<Vec<EmitEvent>> {
        self.last_pass_id.map(|pid| self.event_store.list(pid))
    }

    /// Variante compacta de los eventos de la última pasada.
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   EmitEventKind::PassStarted { .. } => "S",
                                   EmitEventKind::RoutineEmitted { .. } => "R",
                                   EmitEventKind::PassCompleted { .. } => "C",
                               })
                               .collect()
                     })
    }

    /// Fingerprint de la última pasada completada.
    pub fn last_fingerprint(&self) -> Option<String> {
        let events = self.events()?;
        events.iter().rev().find_map(|e| match &e.kind {
                               EmitEventKind::PassCompleted { fingerprint, .. } => Some(fingerprint.clone()),
                               _ => None,
                           })
    }

    /// Emite el script completo para un dialecto.
    pub fn assemble(&mut self, dialect: Dialect) -> Result<EmittedScript, EmitError> {
        self.definition.validate()?;
        for routine in &self.definition.routines {
            for comp in &routine.components {
                if !comp.targets().contains(&dialect) {
                    return Err(EmitError::DialectNotSupported { component: comp.name().to_string(),
                                                                dialect: dialect.label().to_string() });
                }
            }
        }

        let pass_id = Uuid::new_v4();
        self.last_pass_id = Some(pass_id);
        let _ = self.event_store.append_kind(pass_id,
                                             EmitEventKind::PassStarted { dialect,
                                                                          definition_hash:
                                                                              self.definition.definition_hash.clone(),
                                                                          routine_count:
                                                                              self.definition.routine_count() });

        let mut ctx = EmitContext::new(dialect, pass_id);
        skeleton::register_baseline(&mut ctx);
        for routine in &self.definition.routines {
            for comp in &routine.components {
                comp.register_requirements(&mut ctx);
            }
        }

        let mut buff = CodeBuffer::new();
        skeleton::write_header(&ctx, &mut buff);

        // Fase init: todos los componentes en orden de flujo.
        skeleton::write_init_banner(&ctx, &mut buff);
        for routine in &self.definition.routines {
            ctx.current_routine = Some(routine.name.clone());
            for (idx, comp) in routine.components.iter().enumerate() {
                ctx.component_index = idx;
                run_hook(comp.as_ref(), "init", &mut ctx, &mut buff, |c, x, b| c.write_init(x, b))?;
            }
        }

        // Fases por rutina.
        for routine in &self.definition.routines {
            ctx.current_routine = Some(routine.name.clone());
            match dialect {
                Dialect::Python => {
                    skeleton::write_routine_preamble_py(routine, &mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "routine-start", &mut ctx, &mut buff, |c, x, b| {
                            c.write_routine_start(x, b)
                        })?;
                    }
                    skeleton::open_frame_loop_py(&mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "frame", &mut ctx, &mut buff, |c, x, b| c.write_frame(x, b))?;
                    }
                    skeleton::close_frame_loop_py(routine, &mut buff);
                    skeleton::write_routine_end_banner_py(routine, &mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "routine-end", &mut ctx, &mut buff, |c, x, b| {
                            c.write_routine_end(x, b)
                        })?;
                    }
                }
                Dialect::JavaScript => {
                    skeleton::write_routine_preamble_js(routine, &mut buff);
                    skeleton::open_routine_begin_js(routine, &mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "routine-start", &mut ctx, &mut buff, |c, x, b| {
                            c.write_routine_start(x, b)
                        })?;
                    }
                    skeleton::close_routine_begin_js(&mut buff);
                    skeleton::open_each_frame_js(routine, &mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "frame", &mut ctx, &mut buff, |c, x, b| c.write_frame(x, b))?;
                    }
                    skeleton::close_each_frame_js(routine, &mut buff);
                    skeleton::open_routine_end_js(routine, &mut buff);
                    for (idx, comp) in routine.components.iter().enumerate() {
                        ctx.component_index = idx;
                        run_hook(comp.as_ref(), "routine-end", &mut ctx, &mut buff, |c, x, b| {
                            c.write_routine_end(x, b)
                        })?;
                    }
                    skeleton::close_routine_end_js(&mut buff);
                }
            }
            let _ = self.event_store.append_kind(pass_id,
                                                 EmitEventKind::RoutineEmitted { routine: routine.name.clone(),
                                                                                 component_count: routine.len() });
        }

        skeleton::write_footer(&ctx, &mut buff);

        let source = buff.into_string();
        let fingerprint = hash_value(&json!({
                                        "generator_version": GENERATOR_VERSION,
                                        "definition_hash": self.definition.definition_hash,
                                        "dialect": dialect,
                                        "source_hash": hash_str(&source),
                                    }));
        let _ = self.event_store.append_kind(pass_id,
                                             EmitEventKind::PassCompleted { fingerprint: fingerprint.clone(),
                                                                            source_len: source.len() });
        Ok(EmittedScript { dialect,
                           source,
                           fingerprint })
    }

    /// Emite ambos dialectos, una pasada por cada uno.
    pub fn assemble_all(&mut self) -> Result<Vec<EmittedScript>, EmitError> {
        let mut out = Vec::with_capacity(2);
        out.push(self.assemble(Dialect::Python)?);
        out.push(self.assemble(Dialect::JavaScript)?);
        Ok(out)
    }
}

/// Ejecuta un hook verificando el invariante de balance de indentación.
fn run_hook<F>(comp: &dyn Component,
               phase: &'static str,
               ctx: &mut EmitContext,
               buff: &mut CodeBuffer,
               f: F)
               -> Result<(), EmitError>
    where F: FnOnce(&dyn Component, &mut EmitContext, &mut CodeBuffer)
{
    let before = buff.indent_level();
    f(comp, ctx, buff);
    if buff.indent_level() != before {
        return Err(EmitError::UnbalancedIndent { component: comp.name().to_string(),
                                                 phase: phase.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::TimingSpec;
    use crate::flow::{build_experiment_definition, Routine};
    use crate::param::{Param, ParamTable};

    #[derive(Debug)]
    struct Unbalanced {
        params: ParamTable,
        timing: TimingSpec,
    }

    impl Unbalanced {
        fn new() -> Self {
            let mut params = ParamTable::new();
            params.insert("name", Param::code("bad"));
            Self { params,
                   timing: TimingSpec::start_at(0.0) }
        }
    }

    impl Component for Unbalanced {
        fn type_tag(&self) -> &'static str {
            "Unbalanced"
        }
        fn name(&self) -> &str {
            "bad"
        }
        fn params(&self) -> &ParamTable {
            &self.params
        }
        fn timing(&self) -> &TimingSpec {
            &self.timing
        }
        fn write_frame(&self, _ctx: &mut EmitContext, buff: &mut CodeBuffer) {
            buff.write_indented("if True:");
            buff.set_indent(1); // nunca se cierra
        }
    }

    #[test]
    fn empty_routine_still_yields_boilerplate() {
        let def = build_experiment_definition(vec![Routine::new("trial")]);
        let mut asm = ScriptAssembler::new(def);
        let py = asm.assemble(Dialect::Python).expect("python pass");
        assert!(py.source.len() > 300, "esqueleto mínimo esperado, got {}", py.source.len());
        assert!(py.source.contains("# ------- Routine 'trial' -------"));
        assert!(py.source.contains("while continueRoutine:"));
        let js = asm.assemble(Dialect::JavaScript).expect("js pass");
        assert!(js.source.contains("function trialRoutineEachFrame() {"));
    }

    #[test]
    fn unbalanced_hook_is_reported() {
        let def = build_experiment_definition(vec![Routine::new("trial").with_component(Box::new(Unbalanced::new()))]);
        let mut asm = ScriptAssembler::new(def);
        let err = asm.assemble(Dialect::Python).unwrap_err();
        assert_eq!(err,
                   EmitError::UnbalancedIndent { component: "bad".to_string(),
                                                 phase: "frame".to_string() });
    }

    #[test]
    fn last_fingerprint_matches_emitted_script() {
        let def = build_experiment_definition(vec![Routine::new("trial")]);
        let mut asm = ScriptAssembler::new(def);
        let py = asm.assemble(Dialect::Python).expect("pass");
        assert_eq!(asm.last_fingerprint(), Some(py.fingerprint));
    }
}
