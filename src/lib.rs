#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod ring;

use std::fmt;

use ring::{RenderSet, RingAssembly, RingConfig, SegmentSpec, default_segments, random_segments};
use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start the rayon thread pool: {err}")))
}

/// Browser-facing handle around one ring.
///
/// Inputs are staged with the setters; [`RingEngine::recompute`] builds a
/// new render set and swaps it in only when the whole build succeeded.
#[wasm_bindgen]
pub struct RingEngine {
    config: RingConfig,
    segments: Vec<SegmentSpec>,
    render_set: Option<RenderSet>,
    dirty: bool,
}

#[derive(Debug, Serialize)]
struct DiagnosticsExport {
    summary: String,
    vertex_count: usize,
    triangle_count: usize,
    warnings: Vec<String>,
}

impl Default for RingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RingEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> RingEngine {
        RingEngine {
            config: RingConfig::default(),
            segments: default_segments(),
            render_set: None,
            dirty: true,
        }
    }

    /// Replaces the ring configuration. Missing fields take their defaults.
    #[wasm_bindgen]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: RingConfig = serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        config.validate().map_err(to_js_error)?;
        self.config = config;
        self.dirty = true;
        Ok(())
    }

    /// Replaces the segment list (`[{progress, color, label?}, ...]`).
    #[wasm_bindgen]
    pub fn set_segments(&mut self, segments: JsValue) -> Result<(), JsValue> {
        let segments: Vec<SegmentSpec> =
            serde_wasm_bindgen::from_value(segments).map_err(to_js_error)?;
        self.segments = segments;
        self.dirty = true;
        Ok(())
    }

    /// Replaces the segment list with `count` random segments.
    #[wasm_bindgen]
    pub fn randomize_segments(&mut self, count: u32, seed: Option<u32>) {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
            None => StdRng::from_os_rng(),
        };
        self.segments = random_segments(count as usize, &mut rng);
        self.dirty = true;
    }

    #[wasm_bindgen]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuilds the ring. On error the previous render set stays in place.
    #[wasm_bindgen]
    pub fn recompute(&mut self) -> Result<(), JsValue> {
        #[cfg(all(feature = "debug_logs", target_arch = "wasm32"))]
        web_sys::console::time_with_label("ring recompute");

        let result = RingAssembly::new(self.config.clone())
            .and_then(|assembly| assembly.recompute(&self.segments));

        #[cfg(all(feature = "debug_logs", target_arch = "wasm32"))]
        web_sys::console::time_end_with_label("ring recompute");

        self.render_set = Some(result.map_err(to_js_error)?);
        self.dirty = false;
        Ok(())
    }

    /// Per-segment buffers, colours and connectors of the last recompute.
    #[wasm_bindgen]
    pub fn get_render_set(&self) -> Result<JsValue, JsValue> {
        let render_set = self.current()?;
        serde_wasm_bindgen::to_value(&render_set.export()).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn get_placements(&self) -> Result<JsValue, JsValue> {
        let render_set = self.current()?;
        serde_wasm_bindgen::to_value(&render_set.placements).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn get_diagnostics(&self) -> Result<JsValue, JsValue> {
        let diagnostics = &self.current()?.diagnostics;
        let export = DiagnosticsExport {
            summary: diagnostics.summary(),
            vertex_count: diagnostics.vertex_count,
            triangle_count: diagnostics.triangle_count,
            warnings: diagnostics.warnings.clone(),
        };
        serde_wasm_bindgen::to_value(&export).map_err(to_js_error)
    }
}

impl RingEngine {
    /// The last successfully computed render set.
    #[must_use]
    pub fn render_set(&self) -> Option<&RenderSet> {
        self.render_set.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Native counterpart of [`RingEngine::set_segments`].
    pub fn replace_segments(&mut self, segments: Vec<SegmentSpec>) {
        self.segments = segments;
        self.dirty = true;
    }

    /// Native counterpart of [`RingEngine::set_config`].
    pub fn replace_config(&mut self, config: RingConfig) -> Result<(), ring::RingError> {
        config.validate()?;
        self.config = config;
        self.dirty = true;
        Ok(())
    }

    fn current(&self) -> Result<&RenderSet, JsValue> {
        self.render_set
            .as_ref()
            .ok_or_else(|| js_error("the ring has not been computed yet"))
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
