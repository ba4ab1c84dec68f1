mod app;

use std::process::ExitCode;

use anyhow::{Context, Result};
use nodeweave_engine::device::GpuInit;
use nodeweave_engine::logging::{LoggingConfig, init_logging};
use nodeweave_engine::text::{FontId, FontSystem};
use nodeweave_engine::window::{Runtime, RuntimeConfig};
use nodeweave_graph::Document;
use winit::dpi::LogicalSize;

use app::StudioApp;

const DOCUMENT_PATH: &str = "graph.toml";

/// Tried in order when the configured font cannot be used.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let doc = Document::load(DOCUMENT_PATH).with_context(|| format!("cannot load {DOCUMENT_PATH}"))?;

    let mut fonts = FontSystem::new();
    let font = load_font(&mut fonts, &doc.settings.font_path)?;

    let config = RuntimeConfig {
        title: doc.settings.window_title.clone(),
        initial_size: LogicalSize::new(
            f64::from(doc.settings.window_width),
            f64::from(doc.settings.window_height),
        ),
    };

    let app = Runtime::run(config, GpuInit::default(), StudioApp::new(doc, fonts, font))?;

    // Renderers, GPU and window are gone by now; the document goes last.
    let doc = app.into_document();
    log::info!(
        "exiting with {} nodes and {} connections",
        doc.nodes.len(),
        doc.connections.len()
    );
    drop(doc);
    Ok(())
}

/// Loads the configured font, falling back to common system fonts.
fn load_font(fonts: &mut FontSystem, configured: &str) -> Result<FontId> {
    for path in std::iter::once(configured).chain(FALLBACK_FONTS.iter().copied()) {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                log::debug!("font {path}: {e}");
                continue;
            }
        };
        match fonts.load_font(&bytes) {
            Ok(id) => {
                if path != configured {
                    log::warn!("font {configured} unavailable; using {path}");
                }
                return Ok(id);
            }
            Err(e) => log::warn!("font {path}: {e}"),
        }
    }
    anyhow::bail!("no loadable font (tried {configured} and {} fallbacks)", FALLBACK_FONTS.len())
}
