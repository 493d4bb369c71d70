#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Renders the bicycle accident dashboard as JSON on stdout.
//!
//! Reads the input files named in the embedded configuration, relative to
//! the working directory. Set `RUST_LOG` to see progress.

use std::io::Write as _;

use velo_map_dashboard::Dashboard;
use velo_map_dashboard::config::DashboardConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let dashboard = Dashboard::new(DashboardConfig::embedded()?)?;
    log::info!(
        "Rendering dashboard for {} and {}",
        dashboard.config().records_path.display(),
        dashboard.config().geometry_path.display()
    );

    let view = dashboard.render()?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &view)?;
    writeln!(stdout)?;

    Ok(())
}
