//! Constantes del generador.
//!
//! `GENERATOR_VERSION` participa en el cálculo de fingerprints: un cambio de
//! versión del generador invalida las huellas aunque la definición no cambie.
//! Mantener estable mientras no haya cambios incompatibles en la salida.

/// Versión lógica del generador (G1).
pub const GENERATOR_VERSION: &str = "G1.0";

/// Tolerancia de frame emitida en el encabezado de ambos dialectos. Es texto
/// literal del script generado, no un valor usado por el generador.
pub const FRAME_TOLERANCE: &str = "0.001";

/// Unidad de indentación de los scripts generados (cuatro espacios en ambos
/// dialectos).
pub const INDENT_UNIT: &str = "    ";
