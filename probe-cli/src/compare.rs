use std::path::Path;

use anyhow::{Context as _, Result, bail};
use csv::{Reader, Writer};
use log::{info, warn};
use probe_model_core::{
    AttitudeAverage, Component, ProbeGeometry, TheoryComparison, TunnelSample, best_fit_scaling,
    compare, reduce_by_attitude, scaling_sweep,
};

use crate::{args::CompareCli, config::ProbeConfig};

// scalings tried for the error curve, end exclusive
const SWEEP_FROM: f64 = 0.1;
const SWEEP_TO: f64 = 1.9;
const SWEEP_STEP: f64 = 0.05;

pub struct CompareReport {
    pub comparisons: Vec<TheoryComparison>,
    /// least squares theory scaling for dp0, dpA, dpB
    pub scalings: [Option<f64>; 3],
}

pub fn compare_session(args: CompareCli, config: &ProbeConfig) -> Result<CompareReport> {
    let geometry = config.geometry_or(args.geometry);
    let samples = read_session(&args.session)?;
    info!(
        "read {} samples from {}",
        samples.len(),
        args.session.display()
    );

    let averages = reduce_by_attitude(&samples, &config.air);
    if averages.is_empty() {
        bail!("{} has no usable readings", args.session.display());
    }

    let comparisons = compare(&averages, geometry);
    println!(
        "{:>8} {:>8} {:>10} {:>10} {:>10}",
        "alpha", "beta", "dp0", "dpA", "dpB"
    );
    for comparison in &comparisons {
        let [dp0, dp_a, dp_b] = comparison.ratio.map(format_ratio);
        println!(
            "{:>8.2} {:>8.2} {:>10} {:>10} {:>10}",
            comparison.alpha, comparison.beta, dp0, dp_a, dp_b
        );
    }

    let scalings =
        Component::ALL.map(|component| best_fit_scaling(&averages, component, geometry));
    for (component, scaling) in Component::ALL.iter().zip(scalings) {
        match scaling {
            Some(scaling) => println!("{} best fit scaling: {:.4}", component.name(), scaling),
            None => warn!("no attitude constrains the {} scaling", component.name()),
        }
    }

    if let Some(output) = &args.output {
        write_comparisons(output, &comparisons)?;
        info!("wrote {} attitudes to {}", comparisons.len(), output.display());
    }
    if let Some(sweep_output) = &args.sweep_output {
        write_sweeps(sweep_output, &averages, geometry)?;
        info!("wrote scaling error curves to {}", sweep_output.display());
    }

    Ok(CompareReport {
        comparisons,
        scalings,
    })
}

fn read_session(path: &Path) -> Result<Vec<TunnelSample>> {
    let mut reader =
        Reader::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut samples = Vec::new();
    for (row, sample) in reader.deserialize().enumerate() {
        let sample: TunnelSample =
            sample.with_context(|| format!("bad row {} in {}", row + 1, path.display()))?;
        samples.push(sample);
    }
    Ok(samples)
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{ratio:.4}"),
        None => "-".into(),
    }
}

fn write_comparisons(path: &Path, comparisons: &[TheoryComparison]) -> Result<()> {
    let mut csv_writer = Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    csv_writer.write_record([
        "alpha_deg",
        "beta_deg",
        "dp0_data",
        "dpA_data",
        "dpB_data",
        "dp0_theory",
        "dpA_theory",
        "dpB_theory",
        "dp0_ratio",
        "dpA_ratio",
        "dpB_ratio",
    ])?;

    for comparison in comparisons {
        let mut record = vec![comparison.alpha.to_string(), comparison.beta.to_string()];
        record.extend(
            Component::ALL
                .iter()
                .map(|component| component.of(&comparison.measured).to_string()),
        );
        record.extend(
            Component::ALL
                .iter()
                .map(|component| component.of(&comparison.theory).to_string()),
        );
        // empty cell where the theory is zero
        record.extend(
            comparison
                .ratio
                .iter()
                .map(|ratio| ratio.map(|r| r.to_string()).unwrap_or_default()),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_sweeps(path: &Path, averages: &[AttitudeAverage], geometry: ProbeGeometry) -> Result<()> {
    let sweeps = Component::ALL.map(|component| {
        scaling_sweep(averages, component, geometry, SWEEP_FROM, SWEEP_TO, SWEEP_STEP)
    });

    let mut csv_writer = Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    csv_writer.write_record(["scaling", "dp0_error", "dpA_error", "dpB_error"])?;
    for (i, (scaling, dp0_error)) in sweeps[0].iter().enumerate() {
        csv_writer.write_record(&[
            scaling.to_string(),
            dp0_error.to_string(),
            sweeps[1][i].1.to_string(),
            sweeps[2][i].1.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
