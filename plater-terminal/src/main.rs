/// Plater Terminal - place an STL part on the work table and export it
///
/// Usage: plater-terminal [OPTIONS] [STL-FILE]
/// Controls:
///   - T/R/S: Translate, rotate or scale mode
///   - Arrow keys / PageUp / PageDown: Drag along x, z and y
///   - G: Lower to ground, X: Reset transform
///   - E: Export triangles
///   - Q/ESC: Quit

use plater_core::{Geometry, Session};
use plater_terminal::config::{ConfigError, USAGE};
use plater_terminal::{logging, AppConfig, ExportClient, TerminalApp};
use std::fs;
use std::process;
use tracing::info;

/// Edge length of the cube shown when no file is given
const DEMO_CUBE_SIZE: f32 = 20.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(2);
        }
    };

    logging::init(&config.log_file)?;
    info!(endpoint = %config.endpoint, "starting plater");

    let mut session = Session::new();
    match &config.stl_path {
        Some(path) => {
            println!("Loading STL file: {}", path.display());
            let data = fs::read(path)
                .map_err(|e| format!("Failed to read STL file {}: {}", path.display(), e))?;
            session.load_stl(&data)?;
        }
        None => {
            println!("No STL file provided, using demo cube...");
            session.load(Geometry::cube(DEMO_CUBE_SIZE))?;
        }
    }

    if let Some(mesh) = session.mesh() {
        println!("Loaded {} triangles", mesh.geometry.triangle_count());
    }
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let exporter = ExportClient::new(config.endpoint.clone(), config.export_timeout)?;
    let mut app = TerminalApp::new(session, exporter)?;
    app.run()?;

    println!("Thank you for using Plater!");
    Ok(())
}
