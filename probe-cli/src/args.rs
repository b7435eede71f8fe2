use clap::Parser;
use clap::Subcommand;
use probe_model_core::ProbeGeometry;

#[derive(Parser, Debug)]
#[command(name = "Probe CLI")]
#[command(bin_name = "probe-cli")]
pub struct Cli {
    #[arg(long, help = "config file path, created with defaults if missing")]
    pub config: Option<std::path::PathBuf>,

    #[arg(short, long, help = "log every solver iteration")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub mode: ModeSelect,
}

#[derive(Subcommand, Debug)]
pub enum ModeSelect {
    #[command(about = "predict raw probe pressures for a flow")]
    Predict(PredictCli),

    #[command(about = "recover alpha, beta and q from raw probe pressures")]
    Invert(InvertCli),

    #[command(about = "write the pressure ratio calibration surface as csv")]
    CalibrationTable(CalibrationTableCli),

    #[command(about = "write model pressures over a grid of flow angles as csv")]
    PressureTable(PressureTableCli),

    #[command(about = "compare a tunnel session against the potential flow model")]
    Compare(CompareCli),

    #[command(about = "altazimuth mount angles for a commanded alpha and beta")]
    MountAngles(MountAnglesCli),
}

#[derive(Parser, Debug)]
pub struct PredictCli {
    #[arg(allow_negative_numbers = true, help = "angle of attack, degrees")]
    pub alpha: f64,
    #[arg(allow_negative_numbers = true, help = "sideslip, degrees")]
    pub beta: f64,
    #[arg(help = "dynamic pressure")]
    pub q: f64,
    #[arg(long, value_parser = parse_geometry)]
    pub geometry: Option<ProbeGeometry>,
}

#[derive(Parser, Debug)]
pub struct InvertCli {
    #[arg(allow_negative_numbers = true)]
    pub dp0: f64,
    #[arg(allow_negative_numbers = true)]
    pub dp_a: f64,
    #[arg(allow_negative_numbers = true)]
    pub dp_b: f64,
    #[arg(long, value_parser = parse_geometry)]
    pub geometry: Option<ProbeGeometry>,
    #[arg(long, requires = "oat", help = "static pressure in Pa, prints true airspeed with --oat")]
    pub baro: Option<f64>,
    #[arg(long, requires = "baro", allow_negative_numbers = true, help = "air temperature, C")]
    pub oat: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct CalibrationTableCli {
    pub output: std::path::PathBuf,
    #[arg(long, value_parser = parse_geometry)]
    pub geometry: Option<ProbeGeometry>,
}

#[derive(Parser, Debug)]
pub struct PressureTableCli {
    pub output: std::path::PathBuf,
    #[arg(long, value_parser = parse_geometry)]
    pub geometry: Option<ProbeGeometry>,
}

#[derive(Parser, Debug)]
pub struct CompareCli {
    #[arg(help = "session csv: mph,alpha,beta,seq,baro,oat,dp0,dpA,dpB")]
    pub session: std::path::PathBuf,
    #[arg(long, value_parser = parse_geometry)]
    pub geometry: Option<ProbeGeometry>,
    #[arg(long, help = "also write the per-attitude comparison as csv")]
    pub output: Option<std::path::PathBuf>,
    #[arg(long, help = "also write the scaling error curve of each component as csv")]
    pub sweep_output: Option<std::path::PathBuf>,
}

#[derive(Parser, Debug)]
pub struct MountAnglesCli {
    #[arg(allow_negative_numbers = true, help = "angle of attack, degrees")]
    pub alpha: f64,
    #[arg(allow_negative_numbers = true, help = "sideslip, degrees")]
    pub beta: f64,
}

fn parse_geometry(s: &str) -> Result<ProbeGeometry, String> {
    s.parse::<ProbeGeometry>().map_err(|e| e.to_string())
}
