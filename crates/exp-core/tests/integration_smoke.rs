use exp_components::{EegMarkerComponent, PolygonComponent};
use exp_core::{build_experiment_definition, Dialect, EmitEventKind, EventStore, InMemoryEventStore, Routine,
               ScriptAssembler, TimingSpec};
use uuid::Uuid;

#[test]
fn integration_smoke_inmemory_store_and_assembler() {
    // El store en memoria acepta appends y lista por pasada
    let mut store = InMemoryEventStore::default();
    let pass_id = Uuid::new_v4();
    let ev = store.append_kind(pass_id,
                               EmitEventKind::PassStarted { dialect: Dialect::Python,
                                                            definition_hash: "h1".to_string(),
                                                            routine_count: 1 });
    assert_eq!(ev.seq, 0);
    assert_eq!(store.list(pass_id).len(), 1);

    // Ensamblador sobre un store externo: la pasada queda registrada ahí
    let routine = Routine::new("trial")
        .with_component(Box::new(PolygonComponent::new("target", TimingSpec::start_at(0.0).with_duration(1.0))))
        .with_component(Box::new(EegMarkerComponent::new("eeg_marker",
                                                         TimingSpec::start_at(0.0).with_duration(1.0))));
    let def = build_experiment_definition(vec![routine]);
    let mut asm = ScriptAssembler::with_store(def, InMemoryEventStore::default());
    let py = asm.assemble(Dialect::Python).expect("python pass");

    let events = asm.events().expect("events de la pasada");
    assert!(events.iter()
                  .any(|e| matches!(e.kind, EmitEventKind::PassStarted { .. })),
            "PassStarted missing");
    assert!(events.iter().any(|e| matches!(&e.kind,
                   EmitEventKind::PassCompleted { fingerprint, source_len }
                       if *fingerprint == py.fingerprint && *source_len == py.source.len())),
            "PassCompleted must echo the emitted script");
}

#[test]
fn duplicate_component_names_are_rejected() {
    let routine = Routine::new("trial")
        .with_component(Box::new(PolygonComponent::new("target", TimingSpec::start_at(0.0).with_duration(1.0))))
        .with_component(Box::new(PolygonComponent::new("target", TimingSpec::start_at(0.0).with_duration(1.0))));
    let def = build_experiment_definition(vec![routine]);
    let mut asm = ScriptAssembler::new(def);
    let err = asm.assemble(Dialect::Python).unwrap_err();
    assert_eq!(err, exp_core::EmitError::DuplicateComponentName("target".to_string()));
}
