//! citygen-demo — smallest driver for the city generator.
//!
//! Usage:
//!
//! ```text
//! citygen-demo [config.json]
//! ```
//!
//! Loads the configuration (defaults when no file is given), runs the full
//! generation pipeline, prints a summary, and exports the five JSON
//! documents into the configured output directory.  Set `RUST_LOG=debug` to
//! watch individual proposals being accepted and rejected.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use cg_city::CityGenerator;
use cg_core::CityConfig;
use cg_output::CityExporter;

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => CityConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => CityConfig::default(),
    };
    let output_dir = config.output_dir.clone();
    let seed = config.seed;

    let started = Instant::now();
    let mut city = CityGenerator::new(config).context("constructing generator")?;
    city.generate().context("generating city")?;
    info!("generation finished in {:.2?}", started.elapsed());

    println!("seed {seed}:");
    println!("  roads:         {}", city.roads().len());
    println!("  intersections: {}", city.intersections().len());
    println!("  buildings:     {}", city.buildings().len());
    println!("  elements:      {}", city.elements().len());
    println!("  routes:        {}", city.routes().len());
    if let Some(graph) = city.graph() {
        println!("  graph:         {} nodes, {} edges", graph.node_count(), graph.edge_count());
    }

    let dir = Path::new(&output_dir);
    CityExporter::new(&city)
        .export_all(dir)
        .with_context(|| format!("exporting to {}", dir.display()))?;
    println!("exported to {}", dir.display());

    Ok(())
}
