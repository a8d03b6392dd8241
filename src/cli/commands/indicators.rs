//! List indicators command.

use anyhow::Result;
use barstream_engine::catalogue;

pub async fn run() -> Result<()> {
    println!("Available Indicators");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in catalogue() {
        println!("  {} ", info.kind);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  Parameters: {}", info.params.join(", "));
        if let Some(period) = info.default_period {
            println!("  Default period: {}", period);
        }
        if let Some(multiplier) = info.default_multiplier {
            println!("  Default multiplier: {}", multiplier);
        }
        println!();
    }

    println!("Configure indicators under [engine.indicators.<name>] with kind = \"<kind>\".");

    Ok(())
}
