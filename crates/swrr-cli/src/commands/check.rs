use std::path::Path;

use swrr::BalancerConfig;

pub fn check(path: &str) -> anyhow::Result<()> {
    let config = BalancerConfig::from_file(Path::new(path))?;
    match config.validate() {
        Ok(()) => {
            println!("✓ {path} is valid");
            println!("  Strategy:   {:?}", config.strategy);
            println!("  Candidates: {}", config.candidates.len());
            println!("  Total:      {}", config.total_weight());
            Ok(())
        }
        Err(e) => {
            eprintln!("Check failed: {e}");
            Err(e.into())
        }
    }
}
