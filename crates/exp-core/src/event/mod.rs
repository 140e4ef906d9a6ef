//! Eventos de observabilidad de pasadas de emisión.
//!
//! Cada pasada del ensamblador apunta eventos a un `EventStore` append-only:
//! inicio, una entrada por rutina emitida y el cierre con el fingerprint.
//! Los timestamps son metadato y nunca entran en las huellas.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{EmitEvent, EmitEventKind};
