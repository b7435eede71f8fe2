use std::path::Path;

use anyhow::{Context as _, Result};
use csv::Writer;
use log::info;
use probe_model_core::{PressurePoint, pressure_surface};

use crate::{args::PressureTableCli, config::ProbeConfig};

pub fn pressure_table(args: PressureTableCli, config: &ProbeConfig) -> Result<Vec<PressurePoint>> {
    let geometry = config.geometry_or(args.geometry);
    let points = pressure_surface(&config.pressure_table, geometry);

    write_points(&args.output, &points)?;
    info!(
        "wrote {} {} attitudes to {}",
        points.len(),
        geometry,
        args.output.display()
    );
    Ok(points)
}

fn write_points(path: &Path, points: &[PressurePoint]) -> Result<()> {
    let mut csv_writer = Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    csv_writer.write_record([
        "alpha_deg",
        "beta_deg",
        "dp0_over_q",
        "dpA_over_q",
        "dpB_over_q",
        "ra0",
        "rb0",
    ])?;

    for point in points {
        // empty ratio cells where dp0 is zero
        let ratio = |r: Option<f64>| r.map(|r| r.to_string()).unwrap_or_default();
        csv_writer.write_record(&[
            point.alpha.to_degrees().to_string(),
            point.beta.to_degrees().to_string(),
            point.dp0.to_string(),
            point.dp_a.to_string(),
            point.dp_b.to_string(),
            ratio(point.ra0),
            ratio(point.rb0),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
