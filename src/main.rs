//! cmos-vtc - CMOS inverter DC transfer characteristic
//!
//! Sweeps the inverter input voltage and writes the Vin–Id and Vin–Vout
//! curves as CSV for an external plotter.
//!
//! # Usage
//!
//! ```bash
//! cmos-vtc --vdd 1.8 --wn 1 --ln 0.18 --wp 2 --lp 0.18 --output vtc.csv
//! RUST_LOG=debug cmos-vtc --vdd 1.8 --wn 1 --ln 0.18 --wp 2 --lp 0.18 --clm
//! ```

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use cmos_vtc::{
    error::Result,
    output::write_csv,
    solver::{DEFAULT_ABS_TOL, DEFAULT_MAX_ITERATIONS, DEFAULT_REL_TOL, DEFAULT_STEP},
    ConvergencePolicy, Geometry, InverterConfig, SolverConfig, SweepDriver, SweepRange,
    Technology,
};

/// CMOS inverter DC transfer characteristic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Supply voltage (V)
    #[arg(long)]
    vdd: f64,

    /// Body bias (V)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    vbulk: f64,

    /// NMOS channel width (only W/L matters, so any consistent unit)
    #[arg(long)]
    wn: f64,

    /// NMOS channel length
    #[arg(long)]
    ln: f64,

    /// PMOS channel width
    #[arg(long)]
    wp: f64,

    /// PMOS channel length
    #[arg(long)]
    lp: f64,

    /// First input voltage of the sweep (V)
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last input voltage of the sweep (V), defaults to Vdd
    #[arg(long)]
    end: Option<f64>,

    /// Input voltage step (V)
    #[arg(long, default_value_t = DEFAULT_STEP)]
    step: f64,

    /// Enable channel-length modulation
    #[arg(long)]
    clm: bool,

    /// Maximum root-search iterations per point
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Absolute residual tolerance (A)
    #[arg(long, default_value_t = DEFAULT_ABS_TOL)]
    abs_tol: f64,

    /// Residual tolerance relative to the branch current
    #[arg(long, default_value_t = DEFAULT_REL_TOL)]
    rel_tol: f64,

    /// Record points that fail to converge as NaN instead of aborting
    #[arg(long)]
    skip_unconverged: bool,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let technology = if args.clm {
        Technology::with_channel_length_modulation()
    } else {
        Technology::base()
    };

    let config = InverterConfig::new(
        args.vdd,
        Geometry::new(args.wn, args.ln),
        Geometry::new(args.wp, args.lp),
    )
    .with_vbulk(args.vbulk)
    .with_technology(technology);

    let solver = SolverConfig::new()
        .with_max_iterations(args.max_iterations)
        .with_abs_tol(args.abs_tol)
        .with_rel_tol(args.rel_tol);

    let policy = if args.skip_unconverged {
        ConvergencePolicy::MarkUnresolved
    } else {
        ConvergencePolicy::Abort
    };

    let range = SweepRange::new(args.start, args.end.unwrap_or(args.vdd)).with_step(args.step);

    // Run the sweep
    let driver = SweepDriver::new(config, solver)?.with_policy(policy);
    let curve = driver.run(&range)?;

    info!(
        switching_threshold = ?curve.switching_threshold(),
        steepest = ?curve.steepest_point(),
        peak_current = ?curve.peak_current().map(|p| p.id),
        "transfer characteristic"
    );

    // Write results
    match args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            write_csv(&curve, &mut writer)?;
        }
        None => {
            let mut writer = io::stdout().lock();
            write_csv(&curve, &mut writer)?;
        }
    }

    Ok(())
}
