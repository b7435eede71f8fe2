use std::path::Path;

use anyhow::{Context as _, Result};
use csv::Writer;
use log::{info, warn};
use probe_model_core::{CalibrationSurface, calibration_surface};

use crate::{args::CalibrationTableCli, config::ProbeConfig};

pub fn calibration_table(
    args: CalibrationTableCli,
    config: &ProbeConfig,
) -> Result<CalibrationSurface> {
    let geometry = config.geometry_or(args.geometry);
    let surface = calibration_surface(&config.calibration, geometry, &config.solver);

    write_surface(&args.output, &surface)?;

    info!(
        "wrote {} calibration points to {}",
        surface.points.len(),
        args.output.display()
    );
    if !surface.failures.is_empty() {
        warn!(
            "{} of {} grid points did not converge and were left out",
            surface.failures.len(),
            surface.total()
        );
    }
    Ok(surface)
}

fn write_surface(path: &Path, surface: &CalibrationSurface) -> Result<()> {
    let mut csv_writer = Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    csv_writer.write_record(["ra0", "rb0", "alpha_deg", "beta_deg", "q_over_dp0"])?;
    for point in &surface.points {
        csv_writer.write_record(&[
            point.ra0.to_string(),
            point.rb0.to_string(),
            point.alpha.to_degrees().to_string(),
            point.beta.to_degrees().to_string(),
            point.q_over_dp0.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
