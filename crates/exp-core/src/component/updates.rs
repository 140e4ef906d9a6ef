//! Actualizaciones de parámetros por cadencia.
//!
//! Emite una sentencia `set<Nombre>(...)` por cada parámetro cuya política
//! coincida con la pedida. Los parámetros `constant` nunca producen una
//! sentencia de actualización.

use super::Component;
use crate::buffer::CodeBuffer;
use crate::context::EmitContext;
use crate::param::UpdatePolicy;

/// `lineColor` -> `setLineColor`, `size` -> `setSize`.
fn setter_name(param: &str) -> String {
    let mut chars = param.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

pub fn write_param_updates(comp: &dyn Component,
                           ctx: &EmitContext,
                           buff: &mut CodeBuffer,
                           policy: UpdatePolicy) {
    // Los constantes se emiten sólo en init.
    if policy == UpdatePolicy::Constant {
        return;
    }
    let name = comp.name();
    let d = ctx.dialect;
    for param_name in comp.params().with_policy(policy) {
        let literal = comp.params().literal(param_name, d);
        match d {
            crate::dialect::Dialect::Python => {
                buff.write_indented(&format!("{name}.{}({literal}, log=False)", setter_name(param_name)));
            }
            crate::dialect::Dialect::JavaScript => {
                buff.write_indented(&format!("{name}.{}({literal});", setter_name(param_name)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_names_capitalize_first_letter() {
        assert_eq!(setter_name("lineColor"), "setLineColor");
        assert_eq!(setter_name("size"), "setSize");
        assert_eq!(setter_name("ori"), "setOri");
    }
}
