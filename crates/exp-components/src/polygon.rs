//! Estímulo de forma geométrica (línea, polígono regular o custom).
//!
//! La elección de `shape` decide el constructor emitido; `nVertices` y
//! `vertices` sólo aplican a las variantes regular/custom, y las reglas de
//! dependencia se lo indican a un editor. En JavaScript las unidades
//! basadas en distancia física no están soportadas y degradan a `height`
//! con un aviso.

use once_cell::sync::Lazy;

use exp_core::component::{timing, updates};
use exp_core::param::{Category, DependencyAction, InputType, Param, ParamDependency, ParamValue, UpdatePolicy};
use exp_core::{CodeBuffer, Component, Dialect, EmitContext, ParamTable, RunStatus, TimingSpec};

use crate::base::ComponentCore;

static SHAPE_VALUES: Lazy<Vec<ParamValue>> = Lazy::new(|| {
    ["line", "triangle", "rectangle", "cross", "star", "regular polygon...", "custom polygon..."]
        .iter()
        .map(|s| ParamValue::Str(s.to_string()))
        .collect()
});

static UNIT_VALUES: Lazy<Vec<ParamValue>> = Lazy::new(|| {
    ["from exp settings", "deg", "cm", "pix", "norm", "height", "degFlatPos", "degFlat"]
        .iter()
        .map(|s| ParamValue::Str(s.to_string()))
        .collect()
});

#[derive(Debug)]
pub struct PolygonComponent {
    core:    ComponentCore,
    depends: Vec<ParamDependency>,
}

impl PolygonComponent {
    pub fn new(name: &str, timing: TimingSpec) -> Self {
        let mut core = ComponentCore::new(name, timing);
        let geometry = [UpdatePolicy::Constant, UpdatePolicy::SetEveryRepeat, UpdatePolicy::SetEveryFrame];

        core.params.insert("shape",
                           Param::str("triangle").with_input(InputType::Choice)
                                                 .with_allowed_vals(SHAPE_VALUES.clone())
                                                 .with_hint("What shape is this? 'regular polygon...' uses nVertices, 'custom polygon...' uses vertices")
                                                 .with_label("Shape"));
        core.params.insert("nVertices",
                           Param::int(4).with_hint("How many vertices in your regular polygon?")
                                        .with_label("Num. vertices"));
        core.params.insert("vertices",
                           Param::list(Vec::new()).with_hint("List of [x, y] pairs for a custom polygon")
                                                  .with_label("Vertices"));
        core.params.insert("size",
                           Param::list(vec![ParamValue::Num(0.5), ParamValue::Num(0.5)])
                               .with_categ(Category::Layout)
                               .with_allowed_updates(&geometry)
                               .with_hint("Size of this stimulus [w,h]. For a line only the first value is used")
                               .with_label("Size [w,h]"));
        core.params.insert("pos",
                           Param::list(vec![ParamValue::Num(0.0), ParamValue::Num(0.0)])
                               .with_categ(Category::Layout)
                               .with_allowed_updates(&geometry)
                               .with_hint("Position of this stimulus [x,y]")
                               .with_label("Position [x,y]"));
        core.params.insert("ori",
                           Param::num(0.0).with_categ(Category::Layout)
                                          .with_allowed_updates(&geometry)
                                          .with_hint("Orientation of this stimulus (in deg)")
                                          .with_label("Orientation"));
        core.params.insert("units",
                           Param::str("from exp settings")
                               .with_input(InputType::Choice)
                               .with_categ(Category::Layout)
                               .with_allowed_vals(UNIT_VALUES.clone())
                               .with_hint("Units of dimensions for this stimulus")
                               .with_label("Spatial units"));
        core.params.insert("colorSpace",
                           Param::str("rgb").with_input(InputType::Choice)
                                            .with_categ(Category::Appearance)
                                            .with_allowed_vals(vec![ParamValue::Str("rgb".to_string()),
                                                                    ParamValue::Str("dkl".to_string()),
                                                                    ParamValue::Str("hsv".to_string()),
                                                                    ParamValue::Str("hex".to_string())])
                                            .with_allowed_updates(&[])
                                            .with_hint("In what format (color space) have you specified the colors?")
                                            .with_label("Color space"));
        core.params.insert("lineColor",
                           Param::str("white").with_categ(Category::Appearance)
                                              .with_allowed_updates(&geometry)
                                              .with_hint("Color of the shape's outline")
                                              .with_label("Line color"));
        core.params.insert("fillColor",
                           Param::str("white").with_categ(Category::Appearance)
                                              .with_allowed_updates(&geometry)
                                              .with_hint("Color of the shape's interior")
                                              .with_label("Fill color"));
        core.params.insert("lineWidth",
                           Param::num(1.0).with_categ(Category::Appearance)
                                          .with_allowed_updates(&geometry)
                                          .with_hint("Width of the shape's line (always in pixels)")
                                          .with_label("Line width"));
        core.params.insert("opacity",
                           Param::num(1.0).with_categ(Category::Appearance)
                                          .with_allowed_updates(&geometry)
                                          .with_hint("Opacity of this stimulus (1 = opaque, 0 = transparent)")
                                          .with_label("Opacity"));
        core.params.insert("interpolate",
                           Param::str("linear").with_input(InputType::Choice)
                                               .with_categ(Category::Texture)
                                               .with_allowed_vals(vec![ParamValue::Str("linear".to_string()),
                                                                       ParamValue::Str("nearest".to_string())])
                                               .with_allowed_updates(&[])
                                               .with_hint("How should the shape be interpolated if rescaled")
                                               .with_label("Interpolate"));

        let depends = vec![ParamDependency::new("shape",
                                                "=='regular polygon...'",
                                                "nVertices",
                                                DependencyAction::Enable,
                                                DependencyAction::Disable),
                           ParamDependency::new("shape",
                                                "=='custom polygon...'",
                                                "vertices",
                                                DependencyAction::Enable,
                                                DependencyAction::Disable)];
        Self { core, depends }
    }

    pub fn with_shape(mut self, shape: &str) -> Self {
        self.core.set_value("shape", ParamValue::Str(shape.to_string()));
        self
    }

    pub fn with_value(mut self, param: &str, value: ParamValue) -> Self {
        self.core.set_value(param, value);
        self
    }

    pub fn with_update_policy(mut self, param: &str, policy: UpdatePolicy) -> Self {
        debug_assert!(self.core.params.contains(param), "param desconocido: {param}");
        if let Some(p) = self.core.params.get_mut(param) {
            p.updates = policy;
        }
        self
    }

    fn shape_str(&self) -> &str {
        match self.core.params.get("shape").map(|p| &p.value) {
            Some(ParamValue::Str(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Literal de `size` en fase de init. Un valor escalar `1`/`1.0` se
    /// expande al par `[1.0, 1.0]` porque el constructor exige [w,h].
    fn size_literal(&self, dialect: Dialect) -> String {
        let raw = self.core.params.init_literal("size", dialect);
        if raw == "1" || raw == "1.0" {
            "[1.0, 1.0]".to_string()
        } else {
            raw
        }
    }

    fn interpolate_token(&self, dialect: Dialect) -> &'static str {
        let linear = matches!(self.core.params.get("interpolate").map(|p| &p.value),
                              Some(ParamValue::Str(s)) if s == "linear");
        dialect.bool_token(linear)
    }

    /// Profundidad de dibujo: el primer componente de la rutina queda a 0 y
    /// los siguientes cada vez más atrás.
    fn depth(ctx: &EmitContext) -> String {
        let depth = if ctx.component_index == 0 {
            0.0
        } else {
            -(ctx.component_index as f64)
        };
        format!("{depth:.1}")
    }

    fn write_init_py(&self, ctx: &EmitContext, buff: &mut CodeBuffer) {
        let d = Dialect::Python;
        let p = &self.core.params;
        let name = &self.core.name;
        let units = match p.get("units").map(|u| &u.value) {
            Some(ParamValue::Str(s)) if s == "from exp settings" => String::new(),
            _ => format!("units={}, ", p.literal("units", d)),
        };
        let size = self.size_literal(d);
        let head = match self.shape_str() {
            "line" => format!("{name} = visual.Line(\n    win=win, name='{name}',{units}\n    start=(-{size}[0]/2.0, 0), end=(+{size}[0]/2.0, 0),"),
            "triangle" => format!("{name} = visual.ShapeStim(\n    win=win, name='{name}',{units}\n    vertices=[[-{size}[0]/2.0,-{size}[1]/2.0], [+{size}[0]/2.0,-{size}[1]/2.0], [0,{size}[1]/2.0]],"),
            "rectangle" => format!("{name} = visual.Rect(\n    win=win, name='{name}',{units}\n    width={size}[0], height={size}[1],"),
            "star" => format!("{name} = visual.ShapeStim(\n    win=win, name='{name}', vertices='star7',{units}\n    size={size},"),
            "cross" => format!("{name} = visual.ShapeStim(\n    win=win, name='{name}', vertices='cross',{units}\n    size={size},"),
            "custom polygon..." => format!("{name} = visual.ShapeStim(\n    win=win, name='{name}', vertices={},{units}\n    size={size},",
                                           p.init_literal("vertices", d)),
            _ => format!("{name} = visual.Polygon(\n    win=win, name='{name}',{units}\n    edges={}, size={size},",
                         p.init_literal("nVertices", d)),
        };
        let tail = format!("    ori={}, pos={},\n    lineWidth={}, colorSpace={}, lineColor={}, fillColor={},\n    opacity={}, depth={}, interpolate={})",
                           p.init_literal("ori", d),
                           p.init_literal("pos", d),
                           p.init_literal("lineWidth", d),
                           p.init_literal("colorSpace", d),
                           p.init_literal("lineColor", d),
                           p.init_literal("fillColor", d),
                           p.init_literal("opacity", d),
                           Self::depth(ctx),
                           self.interpolate_token(d));
        buff.write_indented_lines(&format!("{head}\n{tail}"));
    }

    fn write_init_js(&self, ctx: &EmitContext, buff: &mut CodeBuffer) {
        let d = Dialect::JavaScript;
        let p = &self.core.params;
        let name = &self.core.name;
        let units = match p.get("units").map(|u| &u.value) {
            Some(ParamValue::Str(s)) if s == "from exp settings" => String::new(),
            Some(ParamValue::Str(s)) if matches!(s.as_str(), "cm" | "deg" | "degFlatPos" | "degFlat") => {
                log::warn!("'{s}' units for shape '{name}' are not supported in the browser target, switching to 'height'");
                "units : 'height', ".to_string()
            }
            _ => format!("units : {}, ", p.literal("units", d)),
        };
        let size = self.size_literal(d);
        let head = match self.shape_str() {
            "line" => format!("{name} = new visual.ShapeStim ({{\n  win: psychoJS.window, name: '{name}', {units}\n  vertices: [[-{size}[0]/2.0, 0], [+{size}[0]/2.0, 0]],"),
            "triangle" => format!("{name} = new visual.ShapeStim ({{\n  win: psychoJS.window, name: '{name}', {units}\n  vertices: [[-{size}[0]/2.0, -{size}[1]/2.0], [+{size}[0]/2.0, -{size}[1]/2.0], [0, {size}[1]/2.0]],"),
            "rectangle" => format!("{name} = new visual.Rect ({{\n  win: psychoJS.window, name: '{name}', {units}\n  width: {size}[0], height: {size}[1],"),
            "star" => format!("{name} = new visual.ShapeStim ({{\n  win: psychoJS.window, name: '{name}', {units}\n  vertices: 'star7', size: {size},"),
            "cross" => format!("{name} = new visual.ShapeStim ({{\n  win: psychoJS.window, name: '{name}', {units}\n  vertices: 'cross', size: {size},"),
            _ => format!("{name} = new visual.Polygon ({{\n  win: psychoJS.window, name: '{name}', {units}\n  edges: {}, size: {size},",
                         p.init_literal("nVertices", d)),
        };
        let tail = format!("  ori: {}, pos: {},\n  lineWidth: {}, lineColor: new util.Color({}),\n  fillColor: new util.Color({}),\n  opacity: {}, depth: {}, interpolate: {},\n}});",
                           p.init_literal("ori", d),
                           p.init_literal("pos", d),
                           p.init_literal("lineWidth", d),
                           p.init_literal("lineColor", d),
                           p.init_literal("fillColor", d),
                           p.init_literal("opacity", d),
                           Self::depth(ctx),
                           self.interpolate_token(d));
        buff.write_indented_lines(&format!("{head}\n{tail}"));
        buff.blank_line();
    }
}

impl Component for PolygonComponent {
    fn type_tag(&self) -> &'static str {
        "Polygon"
    }

    fn name(&self) -> &str {
        &self.core.name
    }

    fn params(&self) -> &ParamTable {
        &self.core.params
    }

    fn timing(&self) -> &TimingSpec {
        &self.core.timing
    }

    fn depends(&self) -> &[ParamDependency] {
        &self.depends
    }

    fn register_requirements(&self, ctx: &mut EmitContext) {
        match ctx.dialect {
            Dialect::Python => ctx.require_import("visual", Some("psychopy")),
            Dialect::JavaScript => ctx.require_import("visual", None),
        }
    }

    fn write_init(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        match ctx.dialect {
            Dialect::Python => self.write_init_py(ctx, buff),
            Dialect::JavaScript => self.write_init_js(ctx, buff),
        }
    }

    fn write_routine_start(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        updates::write_param_updates(self, ctx, buff, UpdatePolicy::SetEveryRepeat);
    }

    fn write_frame(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        let name = &self.core.name;
        let d = ctx.dialect;
        let t = d.terminator();

        timing::write_start_test(self, ctx, buff);
        buff.write_indented(&format!("{name}.status = {}{t}", d.status_token(RunStatus::Started)));
        buff.write_indented(&format!("{name}.setAutoDraw({}){t}", d.bool_token(true)));
        timing::end_start_test(d, buff);

        if timing::write_stop_test(self, ctx, buff) {
            buff.write_indented(&format!("{name}.setAutoDraw({}){t}", d.bool_token(false)));
            buff.write_indented(&format!("{name}.status = {}{t}", d.status_token(RunStatus::Finished)));
            timing::end_stop_test(d, buff);
        }

        if self.core.params.needs_update(UpdatePolicy::SetEveryFrame) {
            match d {
                Dialect::Python => {
                    buff.write_indented(&format!("if {name}.status == {}:", d.status_token(RunStatus::Started)));
                    buff.set_indent(1);
                    updates::write_param_updates(self, ctx, buff, UpdatePolicy::SetEveryFrame);
                    buff.set_indent(-1);
                }
                Dialect::JavaScript => {
                    buff.write_indented(&format!("if ({name}.status === {}) {{", d.status_token(RunStatus::Started)));
                    buff.set_indent(1);
                    updates::write_param_updates(self, ctx, buff, UpdatePolicy::SetEveryFrame);
                    buff.close_block();
                }
            }
        }
    }

    fn write_routine_end(&self, ctx: &mut EmitContext, buff: &mut CodeBuffer) {
        buff.write_indented(&format!("{}.setAutoDraw({}){}",
                                     self.core.name,
                                     ctx.dialect.bool_token(false),
                                     ctx.dialect.terminator()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_core::{build_experiment_definition, Routine, ScriptAssembler};

    fn assemble(comp: PolygonComponent, dialect: Dialect) -> String {
        let def = build_experiment_definition(vec![Routine::new("trial").with_component(Box::new(comp))]);
        let mut asm = ScriptAssembler::new(def);
        asm.assemble(dialect).expect("pass").source
    }

    #[test]
    fn default_table_validates() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0));
        assert!(poly.params().validate().is_ok());
        assert_eq!(poly.depends().len(), 2);
        assert_eq!(poly.depends()[0].param, "nVertices");
    }

    #[test]
    fn triangle_emits_shapestim_with_vertices() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0));
        let src = assemble(poly, Dialect::Python);
        assert!(src.contains("poly = visual.ShapeStim("));
        assert!(src.contains("vertices=[[-[0.5, 0.5][0]/2.0,-[0.5, 0.5][1]/2.0]"));
        assert!(src.contains("interpolate=True)"));
    }

    #[test]
    fn regular_polygon_emits_edges_from_nvertices() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0))
            .with_shape("regular polygon...")
            .with_value("nVertices", ParamValue::Int(6));
        let src = assemble(poly, Dialect::Python);
        assert!(src.contains("poly = visual.Polygon("));
        assert!(src.contains("edges=6"));
    }

    #[test]
    fn python_init_carries_color_space() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0));
        let src = assemble(poly, Dialect::Python);
        assert!(src.contains("lineWidth=1, colorSpace=\"rgb\", lineColor=\"white\""));

        // el constructor del navegador no acepta el argumento
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0));
        let src = assemble(poly, Dialect::JavaScript);
        assert!(!src.contains("colorSpace"));
    }

    #[test]
    fn scalar_size_expands_to_pair() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0))
            .with_value("size", ParamValue::Code("1.0".to_string()));
        assert_eq!(poly.size_literal(Dialect::Python), "[1.0, 1.0]");
    }

    #[test]
    fn js_falls_back_to_height_units() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0))
            .with_value("units", ParamValue::Str("deg".to_string()));
        let src = assemble(poly, Dialect::JavaScript);
        assert!(src.contains("units : 'height', "));
        assert!(src.contains("fillColor: new util.Color(\"white\")"));
    }

    #[test]
    fn per_frame_color_updates_are_guarded() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0).with_duration(1.0))
            .with_value("lineColor", ParamValue::Code("thisColor".to_string()))
            .with_update_policy("lineColor", UpdatePolicy::SetEveryFrame);
        let src = assemble(poly, Dialect::Python);
        assert!(src.contains("if poly.status == STARTED:"));
        assert!(src.contains("poly.setLineColor(thisColor, log=False)"));
        // en init el valor variable queda sin resolver
        assert!(src.contains("lineColor=None"));
    }

    #[test]
    fn later_components_draw_further_back() {
        let first = PolygonComponent::new("first", TimingSpec::start_at(0.0).with_duration(1.0));
        let second = PolygonComponent::new("second", TimingSpec::start_at(0.0).with_duration(1.0));
        let def = build_experiment_definition(vec![Routine::new("trial").with_component(Box::new(first))
                                                                        .with_component(Box::new(second))]);
        let mut asm = ScriptAssembler::new(def);
        let src = asm.assemble(Dialect::Python).expect("pass").source;
        assert!(src.contains("depth=0.0"));
        assert!(src.contains("depth=-1.0"));
    }

    #[test]
    fn no_finished_transition_without_stop() {
        let poly = PolygonComponent::new("poly", TimingSpec::start_at(0.0));
        let src = assemble(poly, Dialect::Python);
        assert!(!src.contains("poly.status = FINISHED"));
    }
}
