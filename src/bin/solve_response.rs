use hdr_calib::config::solve::load_config;
use hdr_calib::image::io::write_json_file;
use hdr_calib::image::DiskImageSource;
use hdr_calib::{HdrError, ResponseSolver, UniformSampler};
use log::info;
use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let stack = config.stack();
    if !stack.is_well_posed() {
        return Err(HdrError::Config(
            "the stack needs at least two distinct, positive exposure times".to_string(),
        )
        .into());
    }

    let mut sampler = config
        .seed
        .map(UniformSampler::seeded)
        .unwrap_or_default();
    let solver = ResponseSolver::new(&stack, config.solver.clone());
    let images = DiskImageSource;
    let solved = solver.solve(&images, &mut sampler, config.output.points.is_some())?;

    match &config.output.curve {
        Some(path) => {
            solved.curve.save(path)?;
            info!("response curve written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            solved.curve.write_to(&mut stdout)?;
            stdout.flush()?;
        }
    }

    if let (Some(path), Some(samples)) = (&config.output.points, &solved.samples) {
        solver.write_sample_points(samples, &images, path)?;
        info!("{} sample points written to {}", samples.len(), path.display());
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &solved.report)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: solve_response <config.json>".to_string()
}
