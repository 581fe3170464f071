use anyhow::{Context, Result};
use rand::Rng;

use scatter_engine::data::SetDataOptions;
use scatter_engine::logging::{init_logging, LoggingConfig};
use scatter_engine::window::{Dataset, Viewer, ViewerConfig};

const DEFAULT_POINTS: usize = 10;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("point count must be a non-negative integer, got `{arg}`"))?,
        None => DEFAULT_POINTS,
    };

    let mut rng = rand::rng();
    let points: Vec<[f32; 2]> = (0..count)
        .map(|_| {
            [
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>() * 2.0 - 1.0,
            ]
        })
        .collect();

    log::info!("plotting {count} random points (wheel: zoom, drag: pan, R/Esc: reset)");

    let options = SetDataOptions::new()
        .with_colors("#FF0000")
        .with_sizes(50.0f32)
        .with_opacity(1.0f32)
        .with_stroke_colors("#000000")
        .with_stroke_widths(4.0f32);

    Viewer::run(
        ViewerConfig {
            title: "scatter studio".to_string(),
            ..ViewerConfig::default()
        },
        Dataset::new(points, options),
    )
}
