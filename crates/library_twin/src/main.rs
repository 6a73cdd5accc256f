//! Headless library twin session
//!
//! Plays both sides of the boundary: a host thread requests a shelf (before
//! the runtime is ready) and prints what it observes; the main thread plays
//! the runtime loader and ticks the simulation.

use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use library_twin::{log_error, log_info, TwinConfig, TwinMessage, TwinSimulation};

#[derive(Parser, Debug)]
#[command(name = "library_twin", about = "Headless library digital twin session")]
struct Args {
    /// TOML config (defaults to the built-in scene)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Location id to walk to
    #[arg(short, long, default_value = "Rack_A_Shelf_1")]
    location: String,

    /// Give up after this many frames
    #[arg(long, default_value_t = 3600)]
    max_ticks: u64,

    /// Frames the simulated loader takes before reporting ready
    #[arg(long, default_value_t = 30)]
    load_ticks: u64,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match TwinConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => TwinConfig::default(),
    };

    let (mut twin, mut host) = match TwinSimulation::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(2);
        }
    };

    let location = args.location.clone();
    let host_thread = thread::spawn(move || {
        // Premature on purpose: the bridge queues it until ready
        if let Err(e) = host.request_go_to_location(location.clone()) {
            log_error(&format!("Host: request not sent: {}", e));
            return false;
        }

        loop {
            for message in host.poll() {
                match message {
                    TwinMessage::LoadProgress { progress } => {
                        println!("host: loading {:>3.0}%", progress * 100.0)
                    }
                    TwinMessage::Ready => println!("host: twin ready"),
                    TwinMessage::Arrived { location_id } => {
                        println!("host: arrived at {}", location_id);
                        return true;
                    }
                    TwinMessage::Error { reason } => {
                        println!("host: error: {}", reason);
                        return false;
                    }
                }
            }
            if !host.is_twin_connected() {
                println!("host: twin shut down before arrival");
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    });

    for tick in 0..args.max_ticks {
        if tick < args.load_ticks {
            twin.report_load_progress((tick + 1) as f32 / args.load_ticks as f32);
        } else if tick == args.load_ticks {
            twin.report_ready();
        }

        twin.step();

        if tick % 60 == 0 {
            let pose = twin.agent_pose();
            log_info(&format!(
                "Tick {}: agent {:?} at {:.2?}, camera {:?}",
                tick,
                twin.agent_state(),
                pose.position,
                twin.camera_mode()
            ));
        }

        if host_thread.is_finished() {
            break;
        }
    }

    let frames = twin.frame();
    let final_state = twin.agent_state().clone();
    let final_mode = twin.camera_mode();
    // Closes the bridge so a still-waiting host thread returns
    drop(twin);

    let success = match host_thread.join() {
        Ok(success) => success,
        Err(_) => {
            log_error("Host thread panicked");
            false
        }
    };

    println!(
        "Session complete after {} frames (agent {:?}, camera {:?})",
        frames, final_state, final_mode
    );

    if !success {
        std::process::exit(1);
    }
}
