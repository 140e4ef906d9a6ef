//! Ensamblador de scripts.
//!
//! Recorre las rutinas en orden de flujo y, dentro de cada una, los
//! componentes en orden de presentación, invocando los hooks por fase
//! (init, routine-start, frame, routine-end) y envolviéndolos en el
//! esqueleto del dialecto. Una pasada produce un script completo más su
//! fingerprint.

mod core;
mod skeleton;

pub use core::{EmittedScript, ScriptAssembler};
