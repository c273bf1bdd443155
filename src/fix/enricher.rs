//! Ranking and summarising cycles once every stage has run.

use crate::fix::strategy::effort_time;
use crate::types::{
    CircularDependencyInfo, FixSummary, PriorityCycleSummary, PriorityScore, QuickFix, RiskLevel,
};
use regex::Regex;
use std::sync::LazyLock;

/// Minutes assumed for a cycle without a usable time band.
pub const DEFAULT_CYCLE_MINUTES: f64 = 30.0;

const DEFAULT_IMPACT_FACTOR: f64 = 5.0;
const DEFAULT_EASE_FACTOR: f64 = 6.0;
const QUICK_WIN_MAX: u8 = 3;
const PRIORITY_CYCLES: usize = 3;

// "15-30 min", "1-2 hrs"
static TIME_BAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*(min|mins|minutes|hr|hrs|hour|hours)\s*$")
        .expect("Invalid regex")
});

/// Attaches quick fixes and priority scores, orders cycles and summarises
/// them. Running it twice yields the same result as running it once.
#[derive(Debug, Default)]
pub struct ResultEnricher;

impl ResultEnricher {
    /// Create an enricher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Enrich every cycle, order by priority, and summarise.
    pub fn enrich(&self, cycles: &mut [CircularDependencyInfo]) -> FixSummary {
        for cycle in cycles.iter_mut() {
            self.enrich_cycle(cycle);
        }
        // stable: equal scores keep detection order
        cycles.sort_by(|a, b| priority(b).total_cmp(&priority(a)));

        let summary = self.summarize(cycles);
        tracing::debug!(
            cycles = summary.total_cycles,
            quick_wins = summary.quick_wins_count,
            critical = summary.critical_cycles_count,
            minutes = summary.total_estimated_minutes,
            "Enriched results"
        );
        summary
    }

    /// Sort strategies, pick the quick fix, and score one cycle.
    pub fn enrich_cycle(&self, cycle: &mut CircularDependencyInfo) {
        cycle
            .fix_strategies
            .sort_by(|a, b| b.suitability.cmp(&a.suitability));

        cycle.quick_fix = cycle.fix_strategies.first().map(|top| QuickFix {
            strategy_type: top.strategy_type,
            title: top.name.clone(),
            summary: top.description.clone(),
            suitability: top.suitability,
            estimated_time: top
                .guide
                .as_ref()
                .map(|g| g.estimated_time.clone())
                .or_else(|| cycle.complexity.as_ref().map(|c| c.estimated_time.clone()))
                .unwrap_or_else(|| effort_time(top.effort).to_string()),
        });

        cycle.priority_score = Some(priority_score(cycle));
    }

    /// Aggregate already-enriched cycles, in their current order.
    #[must_use]
    pub fn summarize(&self, cycles: &[CircularDependencyInfo]) -> FixSummary {
        let minutes: f64 = cycles
            .iter()
            .map(|c| {
                c.complexity
                    .as_ref()
                    .and_then(|x| band_minutes(&x.estimated_time))
                    .unwrap_or(DEFAULT_CYCLE_MINUTES)
            })
            .sum();
        let total = minutes.round() as u32;

        FixSummary {
            total_cycles: cycles.len(),
            total_estimated_time: format!("{} hours {} minutes", total / 60, total % 60),
            total_estimated_minutes: total,
            quick_wins_count: cycles
                .iter()
                .filter(|c| c.complexity.as_ref().is_some_and(|x| x.score <= QUICK_WIN_MAX))
                .count(),
            critical_cycles_count: cycles
                .iter()
                .filter(|c| {
                    c.impact
                        .as_ref()
                        .is_some_and(|i| i.risk_level == RiskLevel::Critical)
                })
                .count(),
            priority_cycles: cycles
                .iter()
                .take(PRIORITY_CYCLES)
                .map(|c| PriorityCycleSummary {
                    cycle: c.cycle.clone(),
                    priority_score: priority(c),
                    risk_level: c.impact.as_ref().map(|i| i.risk_level),
                    estimated_time: c
                        .complexity
                        .as_ref()
                        .map_or_else(|| "unknown".to_string(), |x| x.estimated_time.clone()),
                    top_strategy: c.fix_strategies.first().map(|s| s.strategy_type),
                })
                .collect(),
        }
    }
}

fn priority(cycle: &CircularDependencyInfo) -> f64 {
    cycle.priority_score.as_ref().map_or(0.0, |p| p.score)
}

const fn impact_factor(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Critical => 10.0,
        RiskLevel::High => 7.5,
        RiskLevel::Medium => 5.0,
        RiskLevel::Low => 2.5,
    }
}

fn priority_score(cycle: &CircularDependencyInfo) -> PriorityScore {
    let risk = cycle.impact.as_ref().map(|i| i.risk_level);
    let impact = risk.map_or(DEFAULT_IMPACT_FACTOR, impact_factor);
    let complexity = cycle.complexity.as_ref().map(|c| c.score);
    let ease = complexity.map_or(DEFAULT_EASE_FACTOR, |score| {
        (11.0 - f64::from(score)).max(1.0)
    });
    let score = (impact * ease).clamp(0.0, 100.0);

    let impact_text = risk.map_or_else(|| "unknown impact".to_string(), |r| format!("{r} impact"));
    let ease_text = complexity.map_or_else(
        || "unknown complexity".to_string(),
        |c| format!("complexity {c}/10"),
    );

    PriorityScore {
        score,
        impact_factor: impact,
        ease_factor: ease,
        explanation: format!(
            "{impact_text} ({impact}) × ease ({ease}, {ease_text}) = {score}"
        ),
    }
}

/// Midpoint in minutes of a band such as "15-30 min" or "1-2 hrs".
#[must_use]
pub fn band_minutes(band: &str) -> Option<f64> {
    let caps = TIME_BAND.captures(band)?;
    let low: f64 = caps[1].parse().ok()?;
    let high: f64 = caps[2].parse().ok()?;
    let unit = if caps[3].starts_with('h') { 60.0 } else { 1.0 };
    Some((low + high) / 2.0 * unit)
}
