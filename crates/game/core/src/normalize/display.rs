//! Presentation helpers. Deterministic functions of their arguments only.

use crate::state::{FightSummaryData, RoundsData};

pub fn health_percentage(current: i64, max: i64) -> f64 {
    clamped_percentage(current, max)
}

pub fn progress_percentage(current: i64, total: i64) -> f64 {
    clamped_percentage(current, total)
}

fn clamped_percentage(current: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (current as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn health_color(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 80.0 => "#22c55e",
        p if p >= 60.0 => "#84cc16",
        p if p >= 40.0 => "#eab308",
        p if p >= 20.0 => "#f97316",
        _ => "#ef4444",
    }
}

pub fn progress_color(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 90.0 => "#22c55e",
        p if p >= 70.0 => "#84cc16",
        p if p >= 50.0 => "#eab308",
        p if p >= 30.0 => "#f97316",
        _ => "#3b82f6",
    }
}

/// Bar gauge ready for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeDisplay {
    pub current: i64,
    pub total: i64,
    pub percentage: f64,
    pub color: &'static str,
    pub display: String,
}

pub fn format_health_display(current: i64, max: i64) -> GaugeDisplay {
    let percentage = health_percentage(current, max);
    GaugeDisplay {
        current,
        total: max,
        percentage,
        color: health_color(percentage),
        display: format!("{current}/{max} ({percentage:.1}%)"),
    }
}

pub fn format_progress_display(current: i64, total: i64, label: &str) -> GaugeDisplay {
    let percentage = progress_percentage(current, total);
    GaugeDisplay {
        current,
        total,
        percentage,
        color: progress_color(percentage),
        display: format!("{label}: {current}/{total} ({percentage:.1}%)"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FightOutcome {
    Victory,
    Defeat,
    Unresolved,
    Ended,
}

impl FightOutcome {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Victory => "#4CAF50",
            Self::Defeat => "#F44336",
            Self::Unresolved => "#FF9800",
            Self::Ended => "#666",
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Victory => "VICTORY!",
            Self::Defeat => "DEFEAT",
            Self::Unresolved => "UNRESOLVED",
            Self::Ended => "FIGHT ENDED",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Victory => "🏆",
            Self::Defeat => "💀",
            Self::Unresolved => "⏰",
            Self::Ended => "⚔️",
        }
    }
}

pub fn fight_outcome(summary: &FightSummaryData) -> FightOutcome {
    if summary.victory {
        FightOutcome::Victory
    } else if summary.player_died {
        FightOutcome::Defeat
    } else if summary.unresolved {
        FightOutcome::Unresolved
    } else {
        FightOutcome::Ended
    }
}

pub fn format_damage(damage: i64, critical: bool) -> String {
    if critical {
        format!("{damage} (CRITICAL!)")
    } else {
        damage.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundSummary {
    pub total_player_damage: i64,
    pub total_enemy_damage: i64,
    pub critical_hits: usize,
    /// Mean damage per blow, both sides counted.
    pub average_damage: f64,
}

pub fn round_summary(rounds: &RoundsData) -> RoundSummary {
    let total_player_damage = saturating_total(&rounds.player_damages);
    let total_enemy_damage = saturating_total(&rounds.enemy_damages);
    let critical_hits = rounds
        .player_criticals
        .iter()
        .chain(&rounds.enemy_criticals)
        .filter(|hit| **hit)
        .count();
    let average_damage = if rounds.count == 0 {
        0.0
    } else {
        let blows = (rounds.count as f64) * 2.0;
        (total_player_damage as i128 + total_enemy_damage as i128) as f64 / blows
    };

    RoundSummary {
        total_player_damage,
        total_enemy_damage,
        critical_hits,
        average_damage,
    }
}

fn saturating_total(damages: &[i64]) -> i64 {
    damages.iter().copied().fold(0, i64::saturating_add)
}

/// `amount / 10^decimals` with four decimals and the currency symbol.
pub fn format_amount(amount: u128, decimals: u32, symbol: &str) -> String {
    let scale = 10f64.powi(decimals as i32);
    format!("{:.4} {symbol}", amount as f64 / scale)
}

pub fn format_time_remaining(seconds: u64) -> String {
    let hours = seconds as f64 / 3600.0;
    if hours >= 24.0 {
        format!("{:.1} days", hours / 24.0)
    } else if hours >= 1.0 {
        format!("{hours:.1} hours")
    } else {
        format!("{:.1} minutes", seconds as f64 / 60.0)
    }
}

/// `0x1234...abcd`; short inputs are returned unchanged.
pub fn shorten_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{RawRecord, normalize_fight_summary};
    use serde_json::json;

    #[test]
    fn health_bands() {
        assert_eq!(health_color(80.0), "#22c55e");
        assert_eq!(health_color(79.9), "#84cc16");
        assert_eq!(health_color(40.0), "#eab308");
        assert_eq!(health_color(20.0), "#f97316");
        assert_eq!(health_color(0.0), "#ef4444");
        assert_eq!(health_percentage(150, 100), 100.0);
        assert_eq!(health_percentage(5, 0), 0.0);
    }

    #[test]
    fn progress_bands() {
        assert_eq!(progress_color(95.0), "#22c55e");
        assert_eq!(progress_color(10.0), "#3b82f6");
        let gauge = format_progress_display(45, 100, "XP");
        assert_eq!(gauge.display, "XP: 45/100 (45.0%)");
        assert_eq!(gauge.color, "#f97316");
    }

    #[test]
    fn health_display_string() {
        let gauge = format_health_display(30, 40);
        assert_eq!(gauge.display, "30/40 (75.0%)");
        assert_eq!(gauge.color, "#84cc16");
    }

    #[test]
    fn outcome_classification() {
        let summary = |payload| normalize_fight_summary(&RawRecord::from(payload), None);

        let win = summary(json!({ "victory": true }));
        assert_eq!(fight_outcome(&win), FightOutcome::Victory);
        assert_eq!(fight_outcome(&win).text(), "VICTORY!");

        let loss = summary(json!({ "victory": false }));
        assert_eq!(fight_outcome(&loss), FightOutcome::Defeat);
        assert_eq!(fight_outcome(&loss).color(), "#F44336");

        let timeout = summary(json!({ "unresolved": true }));
        assert_eq!(fight_outcome(&timeout), FightOutcome::Unresolved);

        let mut odd = loss.clone();
        odd.player_died = false;
        assert_eq!(fight_outcome(&odd), FightOutcome::Ended);
    }

    #[test]
    fn round_summary_totals() {
        let rounds = RoundsData {
            count: 2,
            numbers: vec![1, 2],
            player_damages: vec![10, 20],
            enemy_damages: vec![4, 6],
            player_criticals: vec![true, false],
            enemy_criticals: vec![false, true],
        };
        let summary = round_summary(&rounds);
        assert_eq!(summary.total_player_damage, 30);
        assert_eq!(summary.total_enemy_damage, 10);
        assert_eq!(summary.critical_hits, 2);
        assert_eq!(summary.average_damage, 10.0);
        assert_eq!(format_damage(12, true), "12 (CRITICAL!)");
        assert_eq!(format_damage(12, false), "12");
    }

    #[test]
    fn round_summary_saturates_on_huge_damage() {
        let rounds = RoundsData {
            count: 1,
            numbers: vec![1],
            player_damages: vec![i64::MAX, 1],
            enemy_damages: vec![i64::MIN, -1],
            player_criticals: vec![false],
            enemy_criticals: vec![false],
        };
        let summary = round_summary(&rounds);
        assert_eq!(summary.total_player_damage, i64::MAX);
        assert_eq!(summary.total_enemy_damage, i64::MIN);
        assert!(summary.average_damage.is_finite());
    }

    #[test]
    fn amount_time_and_address_formatting() {
        assert_eq!(format_amount(1_500_000_000_000_000_000, 18, "CFX"), "1.5000 CFX");
        assert_eq!(format_time_remaining(2 * 86_400), "2.0 days");
        assert_eq!(format_time_remaining(5_400), "1.5 hours");
        assert_eq!(format_time_remaining(90), "1.5 minutes");
        assert_eq!(
            shorten_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(shorten_address("0x12"), "0x12");
    }
}
