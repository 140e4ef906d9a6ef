//! Definiciones relacionadas a componentes.
//!
//! Un componente es un nodo del grafo del experimento (estímulo, marcador,
//! disparador de dispositivo) con una tabla de parámetros y hooks de emisión
//! ordenados. Este módulo define:
//! - `Component`: interfaz neutral usada por el ensamblador (dispatch
//!   dinámico sobre el conjunto de capacidades de emisión).
//! - `TimingSpec` y los escritores de guards start/stop.
//! - `write_param_updates` para las actualizaciones por cadencia.

pub mod definition;
pub mod timing;
pub mod updates;

pub use definition::Component;
pub use timing::{StartSpec, StopSpec, TimingSpec};
pub use updates::write_param_updates;
