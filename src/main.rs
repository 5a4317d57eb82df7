//! Toroid Life CLI - Run a headless simulation from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use toroid_life::{
    pattern::Pattern,
    schema::LifeConfig,
    session::{Simulation, pattern_intake},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks] [patterns...]", args[0]);
        eprintln!();
        eprintln!("Run a toroidal Life simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  ticks        Number of loop iterations (default: 100)");
        eprintln!("  patterns     Pattern files submitted while the simulation runs");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let submissions: Vec<PathBuf> = args.iter().skip(3).map(PathBuf::from).collect();

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: LifeConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Toroid Life");
    println!("===========");
    println!(
        "Grid: {}x{} ({} cells)",
        config.columns,
        config.rows,
        config.grid_size()
    );
    println!("Rule: {}", config.rule);
    println!("Tick rate: {} fps", config.fps);
    println!("Ticks: {}", ticks);
    println!();

    let mut sim = Simulation::new(config).unwrap_or_else(|e| {
        eprintln!("Error creating simulation: {}", e);
        std::process::exit(1);
    });

    // Extra patterns are posted from a separate producer, like a request handler would
    let (sender, intake) = pattern_intake();
    sim.attach_intake(intake);
    let producer = thread::spawn(move || {
        for path in submissions {
            match Pattern::load(&path) {
                Ok(pattern) => {
                    log::info!("Submitting {}", path.display());
                    if sender.submit(pattern).is_err() {
                        log::warn!("Simulation stopped before {} was submitted", path.display());
                        return;
                    }
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
    });

    println!("Initial state:");
    println!("  Rule: {}", sim.rule());
    println!("  Live cells: {}", sim.live_cells());
    println!();

    println!("Running simulation...");
    let interval = sim.tick_interval();
    let start = Instant::now();

    for i in 0..ticks {
        let tick_start = Instant::now();
        sim.advance();

        // Print progress every 10%
        if (i + 1) % (ticks / 10).max(1) == 0 {
            println!("  {}", sim.status_line());
        }

        if let Some(rest) = interval.checked_sub(tick_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    println!("  Rule: {}", sim.rule());
    println!("  Live cells: {}", sim.live_cells());
    println!("  Generation: {}", sim.generation());

    // Closes the intake so a blocked producer gives up
    drop(sim);
    if producer.join().is_err() {
        log::warn!("Pattern producer panicked");
    }

    println!();
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = LifeConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
