use hdr_calib::config::fuse::{load_config, CurveDomain, StrategyConfig};
use hdr_calib::image::io::{load_ldr_image, save_gray_u8, save_hdr, write_json_file};
use hdr_calib::image::DiskImageSource;
use hdr_calib::matte::{all_pixels, select_from_matte};
use hdr_calib::{FusionStrategy, HdrError, RadianceFuser, ResponseCurve};
use log::info;
use std::env;
use std::error::Error;
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
    let images = DiskImageSource;
    let info = stack.probe(&images)?;
    info!(
        "{} exposures of {}x{} ({} channel(s))",
        stack.len(),
        info.width,
        info.height,
        info.min_channels
    );

    let curve = match &config.strategy {
        StrategyConfig::Linear => None,
        StrategyConfig::Tabular { curve, domain } => {
            let loaded = ResponseCurve::load_from_file(curve)?;
            Some(match domain {
                CurveDomain::Log => loaded,
                CurveDomain::Exponential => loaded.to_log_domain(),
            })
        }
    };
    let strategy = match &curve {
        Some(curve) => FusionStrategy::General(curve),
        None => FusionStrategy::Linear,
    };

    let pixels = match &config.matte {
        Some(path) => {
            let matte = load_ldr_image(path)?;
            select_from_matte(&matte, info.width, info.height)?
        }
        None => all_pixels(info.width, info.height),
    };
    if pixels.is_empty() {
        return Err(HdrError::EmptySelection.into());
    }

    let fuser = RadianceFuser::new(&stack, config.fusion_params()?);
    let out = fuser.fuse(strategy, &images, &pixels)?;

    save_hdr(&out.radiance, &config.output.hdr)?;
    info!(
        "radiance map written to {} (peak {:.4})",
        config.output.hdr.display(),
        out.radiance.max_finite().unwrap_or(0.0)
    );
    if let (Some(path), Some(counts)) = (&config.output.sample_counts, &out.sample_counts) {
        save_gray_u8(counts, path)?;
    }
    if let (Some(path), Some(residuals)) = (&config.output.residuals, &out.residuals) {
        save_hdr(residuals, path)?;
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &out.report)?;
    }
    println!(
        "{} bad pixels ({:.2}%)",
        out.bad_pixels,
        out.report.bad_pixel_percent()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: make_hdr <config.json>".to_string()
}
