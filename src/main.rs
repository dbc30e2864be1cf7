#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[allow(unused_imports)]
use pulse_chart::{ChartConfig, Cli, PlaybackOptions, run_app};

// --- WASM SPECIFIC CODE ---
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This keeps the WASM memory allocator from being stripped
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn _keep_alive() {}

// The binary still needs a main() on wasm even though `start` is the entry point
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    // A. Init Logging
    console_error_panic_hook::set_once();
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    log::info!("Pulse chart starting in WASM mode...");

    let web_options = eframe::WebOptions::default();

    // B. No CLI on the web: defaults plus timeline playback stand-in settings
    let config = ChartConfig::default();
    let playback = PlaybackOptions {
        duration_secs: 10.0,
        load_delay_ms: 800.0,
    };

    // C. Find the canvas element
    let canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("the_canvas_id"))
        .ok_or("Failed to find canvas with id 'the_canvas_id'")?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "the_canvas_id was not a valid HtmlCanvasElement")?;

    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(move |cc| Ok(run_app(cc, config, playback))),
        )
        .await
}

// --- NATIVE SPECIFIC CODE ---
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use clap::Parser;
    use eframe::NativeOptions;

    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Config (file + overrides)
    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid chart configuration: {e:#}");
            std::process::exit(2);
        }
    };
    let playback = args.playback_options();

    // D. Run Native App
    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 420.0])
            .with_min_inner_size([480.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pulse Chart",
        options,
        Box::new(move |cc| Ok(run_app(cc, config, playback))),
    )
}
