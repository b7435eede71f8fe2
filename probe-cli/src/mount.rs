use anyhow::{Context as _, Result};
use probe_model_core::{MountAngles, alpha_beta_to_az_el};

use crate::{args::MountAnglesCli, config::ProbeConfig};

pub fn mount_angles(args: MountAnglesCli, config: &ProbeConfig) -> Result<MountAngles> {
    let angles = alpha_beta_to_az_el(args.alpha, args.beta, &config.solver).with_context(|| {
        format!(
            "no mount azimuth gives alpha {} deg, beta {} deg",
            args.alpha, args.beta
        )
    })?;

    println!("azimuth   = {:.4} deg", angles.azimuth);
    println!("elevation = {:.4} deg", angles.elevation);
    Ok(angles)
}
