use std::path::PathBuf;

use exp_components::{EegMarkerComponent, PolygonComponent};
use exp_core::param::{ParamValue, UpdatePolicy};
use exp_core::{build_experiment_definition, Dialect, ExperimentDefinition, Routine, ScriptAssembler, TimingSpec};

/// Definición de demostración: una rutina con estímulo y marcador EEG.
fn demo_definition() -> ExperimentDefinition {
    let polygon = PolygonComponent::new("target", TimingSpec::start_at(0.5).with_duration(2.0))
        .with_shape("regular polygon...")
        .with_value("nVertices", ParamValue::Int(6))
        .with_value("fillColor", ParamValue::Code("thisTrial.color".to_string()))
        .with_update_policy("fillColor", UpdatePolicy::SetEveryRepeat);
    let marker = EegMarkerComponent::new("eeg_marker", TimingSpec::start_at(0.5).with_duration(2.0))
        .with_label("cue")
        .with_value("1");
    build_experiment_definition(vec![Routine::new("trial").with_component(Box::new(polygon))
                                                          .with_component(Box::new(marker))])
}

fn parse_dialects(arg: &str) -> Option<Vec<Dialect>> {
    match arg {
        "python" => Some(vec![Dialect::Python]),
        "js" => Some(vec![Dialect::JavaScript]),
        "both" => Some(vec![Dialect::Python, Dialect::JavaScript]),
        _ => None,
    }
}

#[derive(Debug, PartialEq)]
struct EmitOptions {
    dialects: Vec<Dialect>,
    out:      Option<PathBuf>,
}

/// Parseo de los flags de `emit`. `env_out` es el destino por defecto
/// tomado de `EXPGEN_OUT`; `--out` lo pisa.
fn parse_emit_args(args: &[String], env_out: Option<PathBuf>) -> Result<EmitOptions, String> {
    let mut dialects = vec![Dialect::Python, Dialect::JavaScript];
    let mut out = env_out;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dialect" => {
                i += 1;
                match args.get(i) {
                    Some(arg) => match parse_dialects(arg) {
                        Some(d) => dialects = d,
                        None => return Err(format!("dialecto desconocido: {arg}")),
                    },
                    None => return Err("falta el valor de --dialect".to_string()),
                }
            }
            "--out" => {
                i += 1;
                match args.get(i) {
                    Some(arg) => out = Some(PathBuf::from(arg)),
                    None => return Err("falta el valor de --out".to_string()),
                }
            }
            other => return Err(format!("opción desconocida: {other}")),
        }
        i += 1;
    }
    Ok(EmitOptions { dialects, out })
}

fn parse_events_args(args: &[String]) -> Result<Dialect, String> {
    let mut dialect = Dialect::Python;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dialect" => {
                i += 1;
                match args.get(i).map(String::as_str) {
                    Some("python") => dialect = Dialect::Python,
                    Some("js") => dialect = Dialect::JavaScript,
                    Some(other) => return Err(format!("dialecto desconocido: {other}")),
                    None => return Err("falta el valor de --dialect".to_string()),
                }
            }
            other => return Err(format!("opción desconocida: {other}")),
        }
        i += 1;
    }
    Ok(dialect)
}

fn script_filename(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Python => "experiment.py",
        Dialect::JavaScript => "experiment.js",
    }
}

fn main() {
    // Cargar .env si existe para obtener EXPGEN_OUT
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Uso: expgen emit [--dialect python|js|both] [--out <DIR>] | expgen events [--dialect python|js]");
        std::process::exit(2);
    }

    match args[1].as_str() {
        "emit" => {
            let env_out = std::env::var("EXPGEN_OUT").ok().map(PathBuf::from);
            let EmitOptions { dialects, out } = match parse_emit_args(&args[2..], env_out) {
                Ok(opts) => opts,
                Err(msg) => { eprintln!("[expgen emit] {msg}"); std::process::exit(2); }
            };

            let mut asm = ScriptAssembler::new(demo_definition());
            for dialect in dialects {
                let script = match asm.assemble(dialect) {
                    Ok(s) => s,
                    Err(e) => { eprintln!("[expgen emit] error: {e}"); std::process::exit(5); }
                };
                match &out {
                    Some(dir) => {
                        if let Err(e) = std::fs::create_dir_all(dir) {
                            eprintln!("[expgen emit] no se pudo crear {}: {e}", dir.display());
                            std::process::exit(5);
                        }
                        let path = dir.join(script_filename(dialect));
                        if let Err(e) = std::fs::write(&path, &script.source) {
                            eprintln!("[expgen emit] no se pudo escribir {}: {e}", path.display());
                            std::process::exit(5);
                        }
                        log::info!("escrito {} ({} bytes)", path.display(), script.source.len());
                        println!("{}: fingerprint={}", path.display(), script.fingerprint);
                    }
                    None => {
                        println!("{}", script.source);
                        println!("{} fingerprint={}", dialect.label(), script.fingerprint);
                    }
                }
            }
        }
        "events" => {
            let dialect = match parse_events_args(&args[2..]) {
                Ok(d) => d,
                Err(msg) => { eprintln!("[expgen events] {msg}"); std::process::exit(2); }
            };

            let mut asm = ScriptAssembler::new(demo_definition());
            if let Err(e) = asm.assemble(dialect) {
                eprintln!("[expgen events] error: {e}");
                std::process::exit(5);
            }
            for ev in asm.events().unwrap_or_default() {
                match serde_json::to_string(&ev) {
                    Ok(line) => println!("{line}"),
                    Err(e) => { eprintln!("[expgen events] serializando evento: {e}"); std::process::exit(5); }
                }
            }
            println!("variants: {}", asm.event_variants().unwrap_or_default().join(""));
        }
        other => {
            eprintln!("[expgen] comando desconocido: {other}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn emit_parses_dialect_and_out() {
        let opts = parse_emit_args(&argv(&["--dialect", "js", "--out", "build"]), None).expect("flags válidos");
        assert_eq!(opts.dialects, vec![Dialect::JavaScript]);
        assert_eq!(opts.out, Some(PathBuf::from("build")));
    }

    #[test]
    fn emit_out_flag_overrides_env_default() {
        let opts = parse_emit_args(&argv(&["--out", "build"]), Some(PathBuf::from("env"))).expect("flags válidos");
        assert_eq!(opts.out, Some(PathBuf::from("build")));
        let opts = parse_emit_args(&[], Some(PathBuf::from("env"))).expect("sin flags");
        assert_eq!(opts.out, Some(PathBuf::from("env")));
    }

    #[test]
    fn emit_flag_without_value_is_a_usage_error() {
        assert!(parse_emit_args(&argv(&["--dialect"]), None).is_err());
        assert!(parse_emit_args(&argv(&["--out"]), None).is_err());
        assert!(parse_emit_args(&argv(&["--dialect", "python", "--out"]), None).is_err());
    }

    #[test]
    fn emit_rejects_unknown_flags() {
        assert!(parse_emit_args(&argv(&["--dialects", "python"]), None).is_err());
        assert!(parse_emit_args(&argv(&["extra"]), None).is_err());
    }

    #[test]
    fn events_flags_are_checked() {
        assert_eq!(parse_events_args(&argv(&["--dialect", "js"])), Ok(Dialect::JavaScript));
        assert!(parse_events_args(&argv(&["--dialect"])).is_err());
        assert!(parse_events_args(&argv(&["--verbose"])).is_err());
    }
}
