use anyhow::{Context as _, Result};
use log::info;
use probe_model_core::{
    FlowState, Inverter, RawPressures, air_density, airspeed_from_dynamic_pressure, predict,
};

use crate::{
    args::{InvertCli, PredictCli},
    config::ProbeConfig,
};

pub fn predict_cmd(args: PredictCli, config: &ProbeConfig) -> Result<RawPressures> {
    let geometry = config.geometry_or(args.geometry);
    let raw = predict(
        args.alpha.to_radians(),
        args.beta.to_radians(),
        args.q,
        geometry,
    );

    info!(
        "{} probe at alpha {} deg, beta {} deg, q {}",
        geometry, args.alpha, args.beta, args.q
    );
    println!("dp0 = {:.6}", raw.dp0);
    println!("dpA = {:.6}", raw.dp_a);
    println!("dpB = {:.6}", raw.dp_b);
    Ok(raw)
}

pub fn invert_cmd(args: InvertCli, config: &ProbeConfig) -> Result<FlowState> {
    let geometry = config.geometry_or(args.geometry);
    let raw = RawPressures::new(args.dp0, args.dp_a, args.dp_b);
    let flow = Inverter::new(geometry, config.solver.clone())
        .invert(&raw)
        .with_context(|| format!("failed to invert {raw:?} for a {geometry} probe"))?;

    println!("alpha = {:.4} deg", flow.alpha.to_degrees());
    println!("beta  = {:.4} deg", flow.beta.to_degrees());
    println!("q     = {:.6}", flow.q);
    if let (Some(baro), Some(oat)) = (args.baro, args.oat) {
        let density = air_density(baro, oat, &config.air);
        let airspeed = airspeed_from_dynamic_pressure(flow.q, density);
        println!("tas   = {:.3} m/s", airspeed);
    }
    Ok(flow)
}
