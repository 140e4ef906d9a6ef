//! exp-components: Descriptores concretos sobre el core de emisión.
//!
//! Este crate provee:
//! - `ComponentCore`: estado compartido de todo descriptor (nombre, tabla
//!   base de parámetros, ventana start/stop).
//! - `PolygonComponent`: estímulo de forma regular/custom en ambos dialectos.
//! - `EegMarkerComponent`: marcado de períodos de EEG vía un emisor
//!   compartido registrado en el contexto de la pasada.
//!
//! El core sólo conoce la interfaz neutral `Component`; aquí vive toda la
//! semántica de cada tipo de descriptor.

pub mod base;
pub mod eeg_marker;
pub mod polygon;

pub use base::ComponentCore;
pub use eeg_marker::{EegMarkerComponent, MARKER_SENDER_IDENT, MARKER_SENDER_RESOURCE};
pub use polygon::PolygonComponent;
