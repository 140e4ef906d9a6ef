//! Esqueleto por dialecto: encabezado, marco de rutina y cierre.
//!
//! Todo el texto fijo de los scripts generados vive aquí; los hooks de los
//! componentes sólo aportan los fragmentos específicos de cada descriptor.

use crate::buffer::CodeBuffer;
use crate::constants::{FRAME_TOLERANCE, GENERATOR_VERSION};
use crate::context::EmitContext;
use crate::dialect::Dialect;
use crate::flow::Routine;

/// Imports de base que el propio esqueleto necesita, antes de recoger los
/// requerimientos de los componentes.
pub fn register_baseline(ctx: &mut EmitContext) {
    match ctx.dialect {
        Dialect::Python => {
            ctx.require_import("core", Some("psychopy"));
            ctx.require_import("event", Some("psychopy"));
            ctx.require_import("visual", Some("psychopy"));
        }
        Dialect::JavaScript => {
            ctx.require_import("PsychoJS", None);
            ctx.require_import("Scheduler", None);
            ctx.require_import("util", None);
        }
    }
}

pub fn write_header(ctx: &EmitContext, buff: &mut CodeBuffer) {
    match ctx.dialect {
        Dialect::Python => write_header_py(ctx, buff),
        Dialect::JavaScript => write_header_js(ctx, buff),
    }
}

fn write_header_py(ctx: &EmitContext, buff: &mut CodeBuffer) {
    buff.write_indented("#!/usr/bin/env python");
    buff.write_indented("# -*- coding: utf-8 -*-");
    buff.write_indented(&format!("# Generated by expgen {GENERATOR_VERSION}. Do not edit: regenerate from the experiment definition."));
    buff.blank_line();
    for import in ctx.imports() {
        match &import.from {
            Some(from) => buff.write_indented(&format!("from {from} import {}", import.name)),
            None => buff.write_indented(&format!("import {}", import.name)),
        }
    }
    buff.blank_line();
    buff.write_indented("# Run-state constants mirrored by every component");
    buff.write_indented("NOT_STARTED = 0");
    buff.write_indented("STARTED = 1");
    buff.write_indented("FINISHED = 2");
    buff.write_indented(&format!("frameTolerance = {FRAME_TOLERANCE}  # how close to onset counts as 'this frame'"));
    buff.blank_line();
    buff.write_indented("win = visual.Window(size=[1024, 768], fullscr=False, units=\"height\", color=\"grey\")");
    buff.write_indented("globalClock = core.Clock()");
}

fn write_header_js(ctx: &EmitContext, buff: &mut CodeBuffer) {
    buff.write_indented(&format!("/* Generated by expgen {GENERATOR_VERSION}. Do not edit: regenerate from the experiment definition. */"));
    buff.blank_line();
    for import in ctx.imports() {
        let from = import.from.as_deref().unwrap_or("psychojs");
        buff.write_indented(&format!("import {{ {} }} from './lib/{from}.js';", import.name));
    }
    buff.blank_line();
    buff.write_indented("const psychoJS = new PsychoJS({ debug: false });");
    buff.write_indented(&format!("const frameTolerance = {FRAME_TOLERANCE};  // how close to onset counts as 'this frame'"));
    buff.write_indented("let continueRoutine = true;");
    buff.write_indented("let t = 0;");
    buff.write_indented("let frameN = -1;");
}

pub fn write_init_banner(ctx: &EmitContext, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("{} --- Initialize components ---", ctx.dialect.comment_leader()));
}

fn component_list_literal(routine: &Routine) -> String {
    let names: Vec<&str> = routine.components.iter().map(|c| c.name()).collect();
    format!("[{}]", names.join(", "))
}

/// Preámbulo de rutina (Python): relojes, lista de componentes y reset de
/// estados. Deja el buffer a nivel 0, listo para los hooks de routine-start.
pub fn write_routine_preamble_py(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("# ------- Routine '{}' -------", routine.name));
    buff.write_indented("continueRoutine = True");
    buff.write_indented("routineTimer = core.Clock()");
    buff.write_indented("frameN = -1");
    buff.write_indented(&format!("{}Components = {}", routine.name, component_list_literal(routine)));
    buff.write_indented(&format!("for thisComponent in {}Components:", routine.name));
    buff.set_indent(1);
    buff.write_indented("thisComponent.status = NOT_STARTED");
    buff.set_indent(-1);
}

/// Abre el bucle de frames (Python) y sube a nivel 1 para los frame hooks.
pub fn open_frame_loop_py(buff: &mut CodeBuffer) {
    buff.write_indented("while continueRoutine:");
    buff.set_indent(1);
    buff.write_indented("t = routineTimer.getTime()");
    buff.write_indented("tThisFlip = win.getFutureFlipTime(clock=routineTimer)");
    buff.write_indented("frameN = frameN + 1");
}

/// Chequeo de continuación + flip, y cierre del bucle (Python).
pub fn close_frame_loop_py(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented("# check if all components have finished");
    buff.write_indented("continueRoutine = False");
    buff.write_indented(&format!("for thisComponent in {}Components:", routine.name));
    buff.set_indent(1);
    buff.write_indented("if hasattr(thisComponent, 'status') and thisComponent.status != FINISHED:");
    buff.set_indent(1);
    buff.write_indented("continueRoutine = True");
    buff.write_indented("break");
    buff.set_indent(-2);
    buff.write_indented("if event.getKeys(keyList=[\"escape\"]):");
    buff.set_indent(1);
    buff.write_indented("core.quit()");
    buff.set_indent(-1);
    buff.write_indented("if continueRoutine:");
    buff.set_indent(1);
    buff.write_indented("win.flip()");
    buff.set_indent(-2);
}

pub fn write_routine_end_banner_py(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("# ------- Ending Routine '{}' -------", routine.name));
}

/// Encabezado de rutina (JavaScript): reloj propio y lista de componentes.
pub fn write_routine_preamble_js(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("// ------- Routine '{}' -------", routine.name));
    buff.write_indented(&format!("const {}Clock = new util.Clock();", routine.name));
    buff.write_indented(&format!("let {}Components = [];", routine.name));
}

/// Abre `function {r}RoutineBegin()` y sube a nivel 1.
pub fn open_routine_begin_js(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("function {}RoutineBegin() {{", routine.name));
    buff.set_indent(1);
    buff.write_indented("continueRoutine = true;");
    buff.write_indented(&format!("{}Clock.reset();", routine.name));
    buff.write_indented("frameN = -1;");
    buff.write_indented(&format!("{}Components = {};", routine.name, component_list_literal(routine)));
    buff.write_indented(&format!("for (const thisComponent of {}Components) {{", routine.name));
    buff.set_indent(1);
    buff.write_indented("thisComponent.status = PsychoJS.Status.NOT_STARTED;");
    buff.set_indent(-1);
    buff.write_indented("}");
}

pub fn close_routine_begin_js(buff: &mut CodeBuffer) {
    buff.write_indented("return Scheduler.Event.NEXT;");
    buff.set_indent(-1);
    buff.write_indented("}");
}

/// Abre `function {r}RoutineEachFrame()` y sube a nivel 1.
pub fn open_each_frame_js(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("function {}RoutineEachFrame() {{", routine.name));
    buff.set_indent(1);
    buff.write_indented(&format!("t = {}Clock.getTime();", routine.name));
    buff.write_indented("frameN = frameN + 1;");
}

pub fn close_each_frame_js(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented("// check if all components have finished");
    buff.write_indented("continueRoutine = false;");
    buff.write_indented(&format!("for (const thisComponent of {}Components) {{", routine.name));
    buff.set_indent(1);
    buff.write_indented("if ('status' in thisComponent && thisComponent.status !== PsychoJS.Status.FINISHED) {");
    buff.set_indent(1);
    buff.write_indented("continueRoutine = true;");
    buff.write_indented("break;");
    buff.set_indent(-1);
    buff.write_indented("}");
    buff.set_indent(-1);
    buff.write_indented("}");
    buff.write_indented("if (continueRoutine) {");
    buff.set_indent(1);
    buff.write_indented("return Scheduler.Event.FLIP_REPEAT;");
    buff.set_indent(-1);
    buff.write_indented("}");
    buff.write_indented("return Scheduler.Event.NEXT;");
    buff.set_indent(-1);
    buff.write_indented("}");
}

/// Abre `function {r}RoutineEnd()` y sube a nivel 1.
pub fn open_routine_end_js(routine: &Routine, buff: &mut CodeBuffer) {
    buff.blank_line();
    buff.write_indented(&format!("function {}RoutineEnd() {{", routine.name));
    buff.set_indent(1);
}

pub fn close_routine_end_js(buff: &mut CodeBuffer) {
    buff.write_indented("return Scheduler.Event.NEXT;");
    buff.set_indent(-1);
    buff.write_indented("}");
}

pub fn write_footer(ctx: &EmitContext, buff: &mut CodeBuffer) {
    buff.blank_line();
    match ctx.dialect {
        Dialect::Python => {
            buff.write_indented("# --- End experiment ---");
            buff.write_indented("win.close()");
            buff.write_indented("core.quit()");
        }
        Dialect::JavaScript => {
            buff.write_indented("// --- End experiment ---");
            buff.write_indented("psychoJS.quit();");
        }
    }
}
