#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = native::run() {
        eprintln!("ring_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ring_engine::geom::{Mesh, MeshDiagnostics};
    use ring_engine::ring::{
        Connector, RadiusJitter, RenderSet, Rgb, RingAssembly, RingConfig, SectionProfile,
        SegmentPlacement, SegmentSpec, default_segments, random_segments,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;
    const RANDOM_SEED: u64 = 7;

    const USAGE: &str = r##"ring_cli (ring-engine)

USAGE:
  ring_cli list
  ring_cli run <scenario|all> [options]

SCENARIOS:
  two_segment_ring
  four_segment_ring
  single_full_ring
  square_profile_ring
  random_ring

OPTIONS (run):
  --out-dir <dir>         Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>            Write OBJ (single scenario only)
  --snap <path>           Write golden-style snapshot (single scenario only)
  --json <path>           Write the render set export as JSON (single scenario only)
  --no-obj                Skip OBJ when using --out-dir
  --no-snap               Skip snapshot when using --out-dir
  --overwrite             Overwrite existing output files
  --segments <file.json>  Replace the scenario's segments ([{"progress": 0.5, "color": "#ff4040"}, ...])
  --config <file.json>    Replace the scenario's ring configuration (missing fields take defaults)
  -h, --help              Show this help

Logging goes to stderr and follows RUST_LOG (default `warn`).
"##;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    /// Inputs that replace a scenario's built-in ones.
    #[derive(Default)]
    struct Overrides {
        config: Option<RingConfig>,
        segments: Option<Vec<SegmentSpec>>,
    }

    impl Overrides {
        fn apply(&self, mut input: ScenarioInput) -> ScenarioInput {
            if let Some(config) = &self.config {
                input.config = config.clone();
            }
            if let Some(segments) = &self.segments {
                input.segments = segments.clone();
            }
            input
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut json_path: Option<PathBuf> = None;
        let mut overrides = Overrides::default();
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--json" => json_path = Some(PathBuf::from(args.value("--json")?)),
                "--segments" => {
                    overrides.segments = Some(read_json(Path::new(&args.value("--segments")?))?);
                }
                "--config" => {
                    overrides.config = Some(read_json(Path::new(&args.value("--config")?))?);
                }
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() || json_path.is_some() {
                return Err("use either --out-dir or --obj/--snap/--json (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, &overrides, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, &overrides, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, &overrides)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.render_set, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if let Some(path) = json_path.as_deref() {
            let json = serde_json::to_string_pretty(&output.render_set.export())
                .map_err(|e| format!("encode json: {e}"))?;
            write_text_file(path, &json, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        overrides: &Overrides,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario, overrides)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.render_set, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn print_summary(output: &ScenarioOutput) {
        eprintln!(
            "{}: segments={} | {}",
            output.name,
            output.render_set.len(),
            output.render_set.diagnostics.summary()
        );
        if let Some(timing) = output.render_set.timing.as_ref() {
            eprintln!("{}: {:.3} ms", output.name, timing.total_ms());
        }
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "unknown scenario `{name}`\n\navailable scenarios:");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
    }

    fn refuse_existing(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        refuse_existing(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    /// One OBJ object per segment; indices are offset across objects.
    fn write_obj_file(path: &Path, render_set: &RenderSet, name: &str, overwrite: bool) -> Result<(), String> {
        for item in &render_set.meshes {
            item.mesh
                .validate()
                .map_err(|e| format!("segment {} mesh validation failed: {e}", item.index))?;
        }
        refuse_existing(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        let obj_err = |e: std::io::Error| format!("write obj: {e}");

        writeln!(w, "# ring-engine ring_cli {name}").map_err(obj_err)?;

        let mut offset = 1_usize;
        for item in &render_set.meshes {
            writeln!(w, "o segment_{}", item.index).map_err(obj_err)?;
            writeln!(w, "# color {}", item.color).map_err(obj_err)?;

            for p in &item.mesh.positions {
                writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(obj_err)?;
            }
            for n in &item.mesh.normals {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(obj_err)?;
            }
            for tri in item.mesh.triangles() {
                let [a, b, c] = tri.map(|i| i as usize + offset);
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}").map_err(obj_err)?;
            }
            offset += item.mesh.vertex_count();
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_scalar_line(out: &mut String, key: &str, value: f64) {
        let _ = write!(out, "{key} ");
        write_f64(out, value);
        out.push('\n');
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_placement(out: &mut String, placement: &SegmentPlacement) {
        let _ = writeln!(out, "segment {}", placement.index);
        write_scalar_line(out, "placement.progress", placement.progress);
        write_scalar_line(out, "placement.start_angle", placement.start_angle);
        write_scalar_line(out, "placement.arc_length", placement.arc_length);
        write_scalar_line(out, "placement.center_angle", placement.center_angle);
        write_scalar_line(out, "placement.radius", placement.radius);
        write_vec3_line(out, "placement.anchor", placement.anchor_point.to_array());
        let _ = writeln!(out, "placement.color {}", placement.color);
    }

    fn write_mesh_diagnostics(out: &mut String, diag: &MeshDiagnostics) {
        let _ = writeln!(out, "mesh_diag.vertex_count {}", diag.vertex_count);
        let _ = writeln!(out, "mesh_diag.triangle_count {}", diag.triangle_count);
        let _ = writeln!(
            out,
            "mesh_diag.degenerate_triangle_count {}",
            diag.degenerate_triangle_count
        );
        let _ = writeln!(out, "mesh_diag.open_edge_count {}", diag.open_edge_count);
        let _ = writeln!(
            out,
            "mesh_diag.non_manifold_edge_count {}",
            diag.non_manifold_edge_count
        );
        match diag.degenerate_input {
            Some(reason) => {
                let _ = writeln!(out, "mesh_diag.degenerate_input {reason}");
            }
            None => {
                let _ = writeln!(out, "mesh_diag.degenerate_input none");
            }
        }
        let _ = writeln!(out, "mesh_diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "mesh_diag.warning.{idx} {warning}");
        }
    }

    fn write_connector(out: &mut String, connector: &Connector) {
        write_vec3_line(out, "connector.start", connector.start.to_array());
        write_vec3_line(out, "connector.control", connector.control.to_array());
        write_vec3_line(out, "connector.end", connector.end.to_array());
        write_vec3_line(out, "connector.marker_z", connector.marker.transform.axis(2).to_array());
        write_vec3_line(out, "connector.label_position", connector.label_position.to_array());
        let _ = writeln!(out, "connector.label {}", connector.label_text);
    }

    fn write_mesh(out: &mut String, mesh: &Mesh) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        let _ = writeln!(out, "mesh.positions {}", mesh.positions.len());
        for p in mesh.positions.iter().copied() {
            write_vec3_line(out, "p", p);
        }

        let _ = writeln!(out, "mesh.indices {}", mesh.indices.len());
        for [a, b, c] in mesh.triangles() {
            let _ = writeln!(out, "i {a} {b} {c}");
        }

        let _ = writeln!(out, "mesh.normals {}", mesh.normals.len());
        for n in mesh.normals.iter().copied() {
            write_vec3_line(out, "n", n);
        }
        Ok(())
    }

    fn snapshot(op: &str, render_set: &RenderSet) -> Result<String, String> {
        let mut out = String::new();
        let _ = writeln!(out, "# ring-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        let _ = writeln!(out, "segment_count {}", render_set.len());

        for ((placement, item), connector) in render_set
            .placements
            .iter()
            .zip(&render_set.meshes)
            .zip(&render_set.annotations)
        {
            write_placement(&mut out, placement);
            write_mesh_diagnostics(&mut out, &item.diagnostics);
            write_connector(&mut out, connector);
            write_mesh(&mut out, &item.mesh)?;
        }
        Ok(normalize_snapshot_text(&out))
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        TwoSegmentRing,
        FourSegmentRing,
        SingleFullRing,
        SquareProfileRing,
        RandomRing,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::TwoSegmentRing,
            Scenario::FourSegmentRing,
            Scenario::SingleFullRing,
            Scenario::SquareProfileRing,
            Scenario::RandomRing,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::TwoSegmentRing => "two_segment_ring",
                Scenario::FourSegmentRing => "four_segment_ring",
                Scenario::SingleFullRing => "single_full_ring",
                Scenario::SquareProfileRing => "square_profile_ring",
                Scenario::RandomRing => "random_ring",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Scenario::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }

        fn input(self) -> ScenarioInput {
            let preview = RingConfig {
                angular_segments: 32,
                edge_segments: 2,
                ..RingConfig::default()
            };

            match self {
                Scenario::TwoSegmentRing => ScenarioInput {
                    config: preview,
                    segments: default_segments(),
                },
                Scenario::FourSegmentRing => ScenarioInput {
                    config: RingConfig { gap: 0.1, ..preview },
                    segments: vec![
                        SegmentSpec::new(0.4, Rgb::CORAL).with_label("cpu"),
                        SegmentSpec::new(0.3, Rgb::PLUM).with_label("memory"),
                        SegmentSpec::new(0.2, Rgb::BLUE_VIOLET).with_label("disk"),
                        SegmentSpec::new(0.1, Rgb::CHARCOAL).with_label("network"),
                    ],
                },
                Scenario::SingleFullRing => ScenarioInput {
                    config: RingConfig { gap: 0.0, ..preview },
                    segments: vec![SegmentSpec::new(1.0, Rgb::VIOLET)],
                },
                Scenario::SquareProfileRing => ScenarioInput {
                    config: RingConfig {
                        radius: 1.0,
                        radial_thickness: 0.3,
                        angular_segments: 24,
                        profile: SectionProfile::Square,
                        ..preview
                    },
                    segments: default_segments(),
                },
                Scenario::RandomRing => {
                    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
                    ScenarioInput {
                        config: RingConfig {
                            jitter: Some(RadiusJitter::seeded(
                                RadiusJitter::PRODUCTION_AMPLITUDE,
                                RANDOM_SEED,
                            )),
                            ..preview
                        },
                        segments: random_segments(5, &mut rng),
                    }
                }
            }
        }
    }

    struct ScenarioInput {
        config: RingConfig,
        segments: Vec<SegmentSpec>,
    }

    struct ScenarioOutput {
        name: &'static str,
        render_set: RenderSet,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario, overrides: &Overrides) -> Result<ScenarioOutput, String> {
        let name = scenario.name();
        let input = overrides.apply(scenario.input());
        log::debug!("{name}: {} segments", input.segments.len());

        let render_set = RingAssembly::new(input.config)
            .and_then(|assembly| assembly.recompute(&input.segments))
            .map_err(|e| format!("{name}: {e}"))?;
        let snapshot = snapshot(name, &render_set)?;

        Ok(ScenarioOutput {
            name,
            render_set,
            snapshot,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
