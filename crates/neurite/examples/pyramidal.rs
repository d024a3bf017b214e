//! Grow one pyramidal cell and print a summary of its dendrites.
//!
//! Run with `RUST_LOG=debug` to see every creation event:
//!
//! ```sh
//! RUST_LOG=info cargo run --example pyramidal -- 200
//! ```

use neurite::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), WorldError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let growth_steps = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let scenario = PyramidalCell {
        config: SimConfig::with_seed(42),
        division_steps: 0,
        growth_steps,
        ..PyramidalCell::default()
    };
    let run = scenario.run()?;
    let world = &run.world;

    let segments = world
        .agents()
        .filter(|a| a.kind() == AgentKind::NeuriteSegment)
        .count();
    let terminals: Vec<_> = world.terminals().collect();
    println!("steps:     {}", world.current_tick().0);
    println!("agents:    {}", world.len());
    println!("segments:  {segments}");
    println!("terminals: {}", terminals.len());
    for (id, seg) in terminals {
        let [x, y, z] = seg.mass_location();
        println!(
            "  {id:?}: tip ({x:7.2}, {y:7.2}, {z:7.2})  diameter {:.3}",
            seg.diameter()
        );
    }
    Ok(())
}
