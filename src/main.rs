//! motiongate CLI
//!
//! Shake-gesture recognition agent with cross-detector trigger exclusion.

use chrono::Utc;
use clap::{Parser, Subcommand};
use crossbeam_channel::{at, never, select};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use motiongate::{
    config::Config,
    gesture::{threshold_for_sensitivity, DeadlineScheduler, ShakeDetector, TriggerGate},
    logging::init_logging,
    sensor::{Accelerometer, SensorConfig},
    VERSION,
};

#[derive(Parser)]
#[command(name = "motiongate")]
#[command(version = VERSION)]
#[command(about = "Shake-gesture recognition agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start detecting shake gestures
    Start {
        /// Shake sensitivity for this session, 1 (least) to 10 (most)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        sensitivity: Option<u8>,

        /// IIO device name override (auto-detected if not specified)
        #[arg(long)]
        device: Option<String>,
    },

    /// Pause gesture detection
    Pause,

    /// Resume gesture detection
    Resume,

    /// Show current detection status
    Status,

    /// Set and persist the shake sensitivity
    Sensitivity {
        /// Sensitivity level, 1 (least) to 10 (most)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        level: u8,
    },

    /// Show configuration
    Config,
}

fn main() {
    init_logging("info");

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            sensitivity,
            device,
        } => {
            cmd_start(sensitivity, device);
        }
        Commands::Pause => {
            cmd_pause();
        }
        Commands::Resume => {
            cmd_resume();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Sensitivity { level } => {
            cmd_sensitivity(level);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(sensitivity_override: Option<u8>, device_override: Option<String>) {
    println!("motiongate v{VERSION}");
    println!();

    // Load or create configuration
    let config = Config::load().unwrap_or_default();
    let mut sensitivity = sensitivity_override.unwrap_or_else(|| config.clamped_sensitivity());

    let sensor_config = SensorConfig {
        sample_rate_hz: config.sample_rate_hz,
        device: device_override.or_else(|| config.device.clone()),
    };

    // No accelerometer is a feature-unavailable state, not an error
    let mut accel = match Accelerometer::discover(sensor_config) {
        Some(accel) => accel,
        None => {
            println!("No accelerometer detected; shake detection is unavailable on this machine.");
            return;
        }
    };

    // The gate is shared by every gesture source in the process; the
    // confirmed-gesture callback claims it before acting
    let gate = TriggerGate::new();
    let action_gate = gate.clone();

    let mut detector = ShakeDetector::new(
        gate,
        DeadlineScheduler::new(),
        Box::new(move || {
            if action_gate.claim_trigger() {
                println!("[{}] Triple shake confirmed", Utc::now().format("%H:%M:%S"));
            } else {
                tracing::debug!("triple shake suppressed: another source holds the cooldown");
            }
        }),
    );
    detector.configure_sensitivity(sensitivity);

    println!("Starting detection...");
    println!("  Device: {}", accel.device_name());
    println!(
        "  Sensitivity: {} (jerk threshold {:.1})",
        sensitivity,
        detector.threshold()
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Support pause/resume and sensitivity changes from another process by
    // polling the config file. If paused at startup, wait until resumed
    // before starting the sensor.
    let mut paused = config.paused;
    let mut last_config_check = std::time::Instant::now();

    if paused {
        println!("Detection is currently paused.");
        println!("Run `motiongate resume` to start detecting.");
        println!();
    } else {
        if let Err(e) = accel.start() {
            eprintln!("Error starting sensor: {e}");
            std::process::exit(1);
        }
        detector.start();
    }

    // Main event loop
    let sample_rx = accel.receiver().clone();
    let mut samples_processed: u64 = 0;

    while running.load(Ordering::SeqCst) {
        // Periodically reload config so `motiongate pause/resume/sensitivity`
        // can control a running agent.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if cfg.paused != paused {
                    paused = cfg.paused;

                    if paused {
                        println!();
                        println!("Pausing detection...");
                        accel.stop();
                        detector.stop();

                        // Drain any queued samples.
                        while sample_rx.try_recv().is_ok() {}
                    } else {
                        println!();
                        println!("Resuming detection...");
                        if let Err(e) = accel.start() {
                            eprintln!("Error resuming sensor: {e}");
                            std::process::exit(1);
                        }
                        detector.start();
                    }
                }

                if cfg.clamped_sensitivity() != sensitivity {
                    sensitivity = cfg.clamped_sensitivity();
                    detector.configure_sensitivity(sensitivity);
                    println!(
                        "Sensitivity changed to {} (jerk threshold {:.1})",
                        sensitivity,
                        detector.threshold()
                    );
                }
            }
            last_config_check = std::time::Instant::now();
        }

        if paused {
            thread::sleep(Duration::from_millis(100));
            continue;
        }

        // The armed reset deadline becomes a receiver the loop selects on
        let (reset_generation, reset_rx) = match detector.scheduler().armed() {
            Some((generation, deadline)) => (generation, at(deadline)),
            None => (0, never()),
        };

        select! {
            recv(sample_rx) -> msg => match msg {
                Ok(sample) => {
                    samples_processed += 1;
                    detector.on_sample(sample);
                }
                Err(_) => {
                    eprintln!("Sensor disconnected unexpectedly");
                    break;
                }
            },
            recv(reset_rx) -> _ => {
                detector.on_reset_elapsed(reset_generation);
            }
            default(Duration::from_millis(100)) => {}
        }
    }

    // Stop detection
    println!();
    println!("Stopping detection...");
    accel.stop();
    detector.stop();

    // Final stats
    println!();
    println!(
        "Session statistics:\n\
         - Samples processed: {}\n\
         - Impulses counted: {}\n\
         - Gestures confirmed: {}",
        samples_processed,
        detector.impulses_counted(),
        detector.gestures_confirmed()
    );
}

fn cmd_pause() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = true;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Detection paused. Use 'motiongate resume' to continue.");
}

fn cmd_resume() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = false;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Detection resumed.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("motiongate Status");
    println!("=================");
    println!();

    let sensor_config = SensorConfig {
        sample_rate_hz: config.sample_rate_hz,
        device: config.device.clone(),
    };
    match Accelerometer::discover(sensor_config) {
        Some(accel) => println!("Accelerometer: {} ✓", accel.device_name()),
        None => println!("Accelerometer: not found ✗"),
    }
    println!();

    println!("Configuration:");
    println!(
        "  Sensitivity: {} (jerk threshold {:.1})",
        config.clamped_sensitivity(),
        threshold_for_sensitivity(config.clamped_sensitivity())
    );
    println!("  Sample rate: {} Hz", config.sample_rate_hz);
    println!(
        "  Device: {}",
        config.device.as_deref().unwrap_or("auto-detect")
    );
    println!("  Paused: {}", config.paused);
}

fn cmd_sensitivity(level: u8) {
    let mut config = Config::load().unwrap_or_default();
    config.sensitivity = level;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!(
        "Sensitivity set to {} (jerk threshold {:.1}).",
        level,
        threshold_for_sensitivity(level)
    );
    println!("A running agent picks this up within a second.");
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
