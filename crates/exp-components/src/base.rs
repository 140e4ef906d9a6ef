//! Estado compartido de los descriptores concretos.
//!
//! Equivalente a la base común de todos los componentes: nombre de
//! instancia, la tabla con los parámetros estándar de temporización y la
//! ventana start/stop normalizada.

use exp_core::param::{Param, ParamValue, ValType};
use exp_core::{ParamTable, TimingSpec};

#[derive(Debug)]
pub struct ComponentCore {
    pub name: String,
    pub params: ParamTable,
    pub timing: TimingSpec,
}

impl ComponentCore {
    /// Construye la base con los parámetros estándar. Los descriptores
    /// concretos añaden los suyos a continuación, en orden de presentación.
    pub fn new(name: &str, timing: TimingSpec) -> Self {
        let mut params = ParamTable::new();
        params.insert("name",
                      Param::code(name).with_hint("Name of this component (alphanumeric, no spaces)")
                                       .with_label("Name"));
        params.insert("startVal",
                      Param::new(timing.start_value(), ValType::Num).with_hint("When does the component start?")
                                                                    .with_label("Start"));
        params.insert("stopVal",
                      Param::new(timing.stop.stop_value(), ValType::Num).with_hint("When does the component end? Leave blank for endless")
                                                                        .with_label("Stop"));
        params.insert("startEstim",
                      Param::new(timing.start_estim.clone(), ValType::Num)
                          .with_hint("(Optional) expected start, for the timeline view")
                          .with_label("Expected start (s)"));
        params.insert("durationEstim",
                      Param::new(timing.duration_estim.clone(), ValType::Num)
                          .with_hint("(Optional) expected duration, for the timeline view")
                          .with_label("Expected duration (s)"));
        Self { name: name.to_string(),
               params,
               timing }
    }

    /// Reemplaza el valor de un parámetro existente. Nombres desconocidos se
    /// ignoran en silencio (error de programación del descriptor, cubierto
    /// por debug_assert).
    pub fn set_value(&mut self, name: &str, value: ParamValue) {
        debug_assert!(self.params.contains(name), "param desconocido: {name}");
        if let Some(param) = self.params.get_mut(name) {
            param.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_params_are_present_and_ordered_first() {
        let core = ComponentCore::new("stub", TimingSpec::start_at(0.0).with_duration(1.0));
        let names: Vec<&str> = core.params.names().collect();
        assert_eq!(&names[..3], &["name", "startVal", "stopVal"]);
        assert!(core.params.validate().is_ok());
    }

    #[test]
    fn unset_stop_becomes_none_param() {
        let core = ComponentCore::new("stub", TimingSpec::start_at(0.0));
        assert_eq!(core.params.get("stopVal").unwrap().value, ParamValue::None);
    }
}
