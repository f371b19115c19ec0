//! Attention monitoring replay tool for exam-proctoring sessions.

use anyhow::Result;
use attention_monitor::app::{ReplayApp, SessionScript};
use attention_monitor::config::{Config, EXAMPLE_CONFIG};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session script to replay (YAML)
    script: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let Some(script_path) = args.script else {
        anyhow::bail!("no session script given (see --help)");
    };

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    info!("Replaying session: {}", script_path);
    let script = SessionScript::from_file(&script_path)?;
    let mut app = ReplayApp::new(&config, script)?;
    let summary = app.run()?;

    println!("Ticks processed:      {}", summary.ticks);
    println!("Violations:           {}", summary.violations.len());
    for (at, direction) in &summary.violations {
        println!("  {at:>7.2}s  looking {direction}");
    }
    println!("Peak windowed count:  {}", summary.peak_violation_count);
    println!("Warning raised:       {}", if summary.warning_raised { "yes" } else { "no" });
    println!("Face-absent ticks:    {}", summary.face_absent_ticks);
    if summary.calibration_failures > 0 {
        println!("Calibration failures: {}", summary.calibration_failures);
    }

    Ok(())
}
