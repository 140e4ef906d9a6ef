use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::{EmitEvent, EmitEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts asignados).
    fn append_kind(&mut self, pass_id: Uuid, kind: EmitEventKind) -> EmitEvent;
    /// Lista eventos de una pasada (orden ascendente por seq).
    fn list(&self, pass_id: Uuid) -> Vec<EmitEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<EmitEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, pass_id: Uuid, kind: EmitEventKind) -> EmitEvent {
        let vec = self.inner.entry(pass_id).or_default();
        let ev = EmitEvent { seq: vec.len() as u64,
                             pass_id,
                             kind,
                             ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, pass_id: Uuid) -> Vec<EmitEvent> {
        self.inner.get(&pass_id).cloned().unwrap_or_default()
    }
}
