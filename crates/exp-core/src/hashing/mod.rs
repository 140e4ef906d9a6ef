//! Módulo de hashing y canonicalización JSON.
//!
//! Las huellas de definición y de script se calculan siempre sobre la forma
//! canónica (claves ordenadas) para que la identidad no dependa del orden de
//! inserción en memoria.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_str, hash_value};
