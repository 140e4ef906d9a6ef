//! Tipos de evento de una pasada de emisión.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialect::Dialect;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmitEventKind {
    /// Apertura de la pasada: fija dialecto y huella de la definición.
    /// Invariante: debe ser el primer evento de un `pass_id`.
    PassStarted {
        dialect: Dialect,
        definition_hash: String,
        routine_count: usize,
    },
    /// Una rutina completó sus fases de emisión.
    RoutineEmitted { routine: String, component_count: usize },
    /// Cierre de la pasada con el fingerprint del script producido.
    PassCompleted { fingerprint: String, source_len: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitEvent {
    /// Asignado por el store (orden de append dentro de la pasada).
    pub seq: u64,
    pub pass_id: Uuid,
    pub kind: EmitEventKind,
    /// Metadato; no participa en fingerprints.
    pub ts: DateTime<Utc>,
}
