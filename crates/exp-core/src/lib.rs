//! exp-core: Motor determinista de emisión de scripts (G1)
//!
//! Genera scripts de experimento en dos dialectos (Python de escritorio y
//! JavaScript de navegador) a partir de un grafo de rutinas y componentes
//! parametrizados. La emisión es una lectura pura del estado en memoria:
//! el mismo estado produce siempre bytes idénticos, verificado mediante
//! fingerprints canónicos.
pub mod assembler;
pub mod buffer;
pub mod component;
pub mod constants;
pub mod context;
pub mod dialect;
pub mod errors;
pub mod event;
pub mod flow;
pub mod hashing;
pub mod param;

pub use assembler::{EmittedScript, ScriptAssembler};
pub use buffer::CodeBuffer;
pub use component::{Component, StartSpec, StopSpec, TimingSpec};
pub use context::EmitContext;
pub use dialect::{Dialect, RunStatus};
pub use errors::EmitError;
pub use event::{EmitEvent, EmitEventKind, EventStore, InMemoryEventStore};
pub use flow::{build_experiment_definition, ExperimentDefinition, Routine};
pub use param::{Param, ParamDependency, ParamTable, ParamValue, UpdatePolicy, ValType};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::timing;

    // Componente mínimo de prueba: un objeto con status y nada más.
    #[derive(Debug)]
    struct StubComponent {
        name: String,
        params: ParamTable,
        timing: TimingSpec,
    }

    impl StubComponent {
        fn new(name: &str) -> Self {
            let mut params = ParamTable::new();
            params.insert("name", Param::code(name));
            Self { name: name.to_string(),
                   params,
                   timing: TimingSpec::start_at(0.0).with_duration(1.0) }
        }
    }

    impl Component for StubComponent {
        fn type_tag(&self) -> &'static str {
            "Stub"
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn params(&self) -> &ParamTable {
            &self.params
        }
        fn timing(&self) -> &TimingSpec {
            &self.timing
        }
        fn write_init(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
            match ctx.dialect {
                Dialect::Python => buff.write_indented(&format!("{} = object()", self.name)),
                Dialect::JavaScript => {
                    buff.write_indented(&format!("{} = {{status: PsychoJS.Status.NOT_STARTED}};", self.name))
                }
            }
        }
        fn write_frame(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
            timing::write_start_test(self, ctx, buff);
            buff.write_indented(&format!("{}.status = {}{}",
                                         self.name,
                                         ctx.dialect.status_token(RunStatus::Started),
                                         ctx.dialect.terminator()));
            timing::end_start_test(ctx.dialect, buff);
            if timing::write_stop_test(self, ctx, buff) {
                buff.write_indented(&format!("{}.status = {}{}",
                                             self.name,
                                             ctx.dialect.status_token(RunStatus::Finished),
                                             ctx.dialect.terminator()));
                timing::end_stop_test(ctx.dialect, buff);
            }
        }
    }

    fn stub_definition() -> ExperimentDefinition {
        let routine = Routine::new("trial").with_component(Box::new(StubComponent::new("stub")));
        build_experiment_definition(vec![routine])
    }

    #[test]
    fn assemble_both_dialects_smoke() {
        let mut asm = ScriptAssembler::new(stub_definition());
        let py = asm.assemble(Dialect::Python).expect("python pass");
        let js = asm.assemble(Dialect::JavaScript).expect("js pass");

        assert!(py.source.contains("stub = object()"));
        assert!(py.source.contains("stub.status = STARTED"));
        assert!(js.source.contains("stub.status = PsychoJS.Status.STARTED;"));
        assert_ne!(py.fingerprint, js.fingerprint, "cada dialecto tiene huella propia");
    }

    #[test]
    fn repeated_assembly_is_byte_identical() {
        let mut a = ScriptAssembler::new(stub_definition());
        let mut b = ScriptAssembler::new(stub_definition());
        let first = a.assemble(Dialect::Python).expect("first pass");
        let second = b.assemble(Dialect::Python).expect("second pass");
        assert_eq!(first.source, second.source);
        assert_eq!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn start_block_records_tstart_before_duration_guard_reads_it() {
        let mut asm = ScriptAssembler::new(stub_definition());
        let py = asm.assemble(Dialect::Python).expect("python pass").source;
        let assign = py.find("stub.tStart = t").expect("asignación de tStart");
        let guard = py.find("stub.tStart + 1-frameTolerance").expect("guard de duración");
        assert!(assign < guard, "tStart debe asignarse antes de que el guard lo lea");
        assert!(py.contains("stub.frameNStart = frameN"));

        let js = asm.assemble(Dialect::JavaScript).expect("js pass").source;
        let assign = js.find("stub.tStart = t;").expect("asignación de tStart");
        let guard = js.find("stub.tStart + 1 - frameTolerance").expect("guard de duración");
        assert!(assign < guard);
    }

    #[test]
    fn pass_events_follow_started_routine_completed_order() {
        let mut asm = ScriptAssembler::new(stub_definition());
        asm.assemble(Dialect::Python).expect("pass");
        let variants = asm.event_variants().expect("variants");
        assert_eq!(variants, vec!["S", "R", "C"]);
    }
}
