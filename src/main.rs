// Main program for the fractal-explorer project

mod ascii;
mod cli;
mod engine;
mod error;
mod frame_rate;
mod functions;
mod gui;
mod palette;
mod plane;
mod point;
mod pool;
mod xy;

use clap::Parser;

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = cli::Cli::parse();
    let ascii_mode = cli.ascii;
    let config = cli.into_plane_config()?;
    tracing::info!(width = config.width, height = config.height, function = config.function_index, "resolved configuration");

    if ascii_mode {
        run_ascii(config)
    } else {
        gui::launch(config).map_err(anyhow::Error::from)
    }
}

fn run_ascii(config: plane::PlaneConfig) -> anyhow::Result<()> {
    let halt_after = config.halt_after;
    let mut plane = plane::CoordinatePlane::new(config)?;
    let mut engine = engine::Engine::new(plane.num_threads)?;
    let function_name = functions::FunctionVariant::from_index(plane.function_index).name();
    let mut stdout = std::io::stdout();

    loop {
        let steps = if halt_after > 0 {
            (halt_after - plane.iteration_count).min(100)
        } else {
            100
        };
        if steps == 0 || plane.live.is_empty() {
            break;
        }
        engine.iterate(&mut plane, steps)?;
        ascii::render(&plane, function_name, &mut stdout)?;
        if halt_after > 0 && plane.iteration_count >= halt_after {
            break;
        }
    }
    ascii::render(&plane, function_name, &mut stdout)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("fractal-explorer: {e}");
        std::process::exit(1);
    }
}
