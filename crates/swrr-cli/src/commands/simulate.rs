use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use swrr::{BalancerConfig, Weight};

/// Cap on the default pick count, which otherwise follows the total weight.
pub const MAX_DEFAULT_PICKS: usize = 10_000;

#[derive(Debug, Serialize)]
pub struct Simulation {
    pub picks: Vec<String>,
    /// Address → times picked.
    pub counts: BTreeMap<String, usize>,
}

/// Run `n` picks against `picker`. Stops early if the picker has nothing
/// to hand out.
pub fn run(picker: &dyn Weight<String>, n: usize) -> Simulation {
    let mut picks = Vec::new();
    let mut counts = BTreeMap::new();
    for _ in 0..n {
        let Some(addr) = picker.next() else {
            break;
        };
        *counts.entry(addr.clone()).or_default() += 1;
        picks.push(addr);
    }
    Simulation { picks, counts }
}

/// One full round of picks, bounded by [`MAX_DEFAULT_PICKS`].
pub fn default_picks(total: i64) -> usize {
    usize::try_from(total).unwrap_or(0).min(MAX_DEFAULT_PICKS)
}

pub fn simulate(path: &str, picks: Option<usize>, json: bool) -> anyhow::Result<()> {
    let config = BalancerConfig::from_file(Path::new(path))?;
    let picker = config.build()?;

    let n = picks.unwrap_or_else(|| default_picks(picker.total()));
    let result = run(picker.as_ref(), n);
    info!(requested = n, picked = result.picks.len(), "simulation finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Sequence: {}", result.picks.join(", "));
    let picked = result.picks.len().max(1) as f64;
    for (addr, count) in &result.counts {
        println!("  {addr:<24} {count:>6}  ({:.1}%)", *count as f64 * 100.0 / picked);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use swrr::SmoothWeighted;

    #[test]
    fn run_counts_a_full_round() {
        let picker = SmoothWeighted::new();
        picker.add("a", "a:1".to_string(), 2).unwrap();
        picker.add("b", "b:1".to_string(), 1).unwrap();

        let sim = run(&picker, 3);
        assert_eq!(sim.picks, vec!["a:1", "b:1", "a:1"]);
        assert_eq!(sim.counts["a:1"], 2);
        assert_eq!(sim.counts["b:1"], 1);
    }

    #[test]
    fn run_on_empty_picker_stops() {
        let picker: SmoothWeighted<String> = SmoothWeighted::new();
        let sim = run(&picker, 10);
        assert!(sim.picks.is_empty());
        assert!(sim.counts.is_empty());
    }

    #[test]
    fn default_picks_is_bounded() {
        assert_eq!(default_picks(7), 7);
        assert_eq!(default_picks(0), 0);
        assert_eq!(default_picks(-3), 0);
        assert_eq!(default_picks(i64::MAX), MAX_DEFAULT_PICKS);
    }

    #[test]
    fn huge_weight_config_simulates_bounded_run() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[[candidates]]\nname = \"a\"\naddress = \"a:1\"\nweight = {}\n",
            i64::MAX
        )
        .unwrap();

        let config = BalancerConfig::from_file(file.path()).unwrap();
        let picker = config.build().unwrap();
        let sim = run(picker.as_ref(), default_picks(picker.total()));
        assert_eq!(sim.picks.len(), MAX_DEFAULT_PICKS);
        assert!(simulate(file.path().to_str().unwrap(), Some(3), true).is_ok());
    }

    #[test]
    fn simulation_serializes() {
        let picker = SmoothWeighted::new();
        picker.add("a", "a:1".to_string(), 1).unwrap();
        let json = serde_json::to_value(run(&picker, 2)).unwrap();
        assert_eq!(json["counts"]["a:1"], 2);
    }
}
