//! `parley check-config`: validate the configuration and show the tiers.

use std::path::Path;

use parley_core::quota::classify;
use parley_infra::config::{self, Secrets};
use parley_types::quota::{QuotaLimits, Tier};

/// A contiguous range of monthly counts served by the same tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSpan {
    pub tier: Tier,
    pub from: u32,
    /// Inclusive upper bound; `None` means open-ended.
    pub to: Option<u32>,
}

/// Split `0..` into the tier ranges `classify` produces for `limits`.
///
/// Tiers only change at a configured threshold or at the monthly cap, so those
/// are the only counts classified.
pub fn tier_spans(limits: &QuotaLimits) -> Vec<TierSpan> {
    let max = limits.max_turns_per_month;
    let mut starts: Vec<u32> = [
        Some(0),
        limits.warning_threshold,
        limits.exhausted_threshold,
        Some(max),
    ]
    .into_iter()
    .flatten()
    .filter(|&count| count <= max)
    .collect();
    starts.sort_unstable();
    starts.dedup();

    let mut spans: Vec<TierSpan> = Vec::new();
    for (i, &from) in starts.iter().enumerate() {
        let tier = classify(from, limits);
        let to = starts.get(i + 1).map(|next| next - 1);
        match spans.last_mut() {
            Some(span) if span.tier == tier => span.to = to,
            _ => spans.push(TierSpan { tier, from, to }),
        }
    }
    spans
}

pub async fn check_config(path: &Path) -> anyhow::Result<()> {
    let config = config::load_and_validate(path).await?;

    println!("config: {}", path.display());
    println!(
        "history: last {} exchanges ({} turns)",
        config.history.max_turns,
        config.history.max_turns * 2
    );
    println!("backend: {:?} / {}", config.backend.provider, config.backend.model);
    println!("quota tiers (turns per month):");
    for span in tier_spans(&config.quota.limits()) {
        let tier = span.tier.to_string();
        match span.to {
            Some(to) if to == span.from => println!("  {tier:<9} {}", span.from),
            Some(to) => println!("  {tier:<9} {}-{to}", span.from),
            None => println!("  {tier:<9} {}+", span.from),
        }
    }

    match Secrets::from_env() {
        Ok(_) => println!("secrets: ok"),
        Err(e) => println!("secrets: {e}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(tier: Tier, from: u32, to: Option<u32>) -> TierSpan {
        TierSpan { tier, from, to }
    }

    #[test]
    fn default_limits_produce_four_spans() {
        let spans = tier_spans(&QuotaLimits::default());
        assert_eq!(
            spans,
            vec![
                span(Tier::Normal, 0, Some(14)),
                span(Tier::Warning, 15, Some(24)),
                span(Tier::Exhausted, 25, Some(29)),
                span(Tier::Blocked, 30, None),
            ]
        );
    }

    #[test]
    fn single_cutoff_has_no_warning_span() {
        let limits = QuotaLimits {
            max_turns_per_month: 10,
            warning_threshold: None,
            exhausted_threshold: None,
        };
        assert_eq!(
            tier_spans(&limits),
            vec![span(Tier::Normal, 0, Some(9)), span(Tier::Blocked, 10, None)]
        );
    }

    #[test]
    fn coinciding_thresholds_collapse() {
        let limits = QuotaLimits {
            max_turns_per_month: 20,
            warning_threshold: Some(20),
            exhausted_threshold: Some(0),
        };
        assert_eq!(
            tier_spans(&limits),
            vec![span(Tier::Exhausted, 0, Some(19)), span(Tier::Blocked, 20, None)]
        );
    }

    #[test]
    fn huge_cap_is_computed_from_thresholds() {
        let limits = QuotaLimits {
            max_turns_per_month: u32::MAX,
            warning_threshold: Some(1_000),
            exhausted_threshold: Some(u32::MAX - 1),
        };
        assert_eq!(
            tier_spans(&limits),
            vec![
                span(Tier::Normal, 0, Some(999)),
                span(Tier::Warning, 1_000, Some(u32::MAX - 2)),
                span(Tier::Exhausted, u32::MAX - 1, Some(u32::MAX - 1)),
                span(Tier::Blocked, u32::MAX, None),
            ]
        );
    }
}
