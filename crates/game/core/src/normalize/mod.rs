//! Ledger payload normalization.
//!
//! Ledger logs arrive as loosely-typed JSON. [`RawRecord`] is the single
//! coercion boundary; everything past it uses the strict types from
//! [`crate::state`].
pub mod coerce;
pub mod display;
pub mod enemies;
pub mod fight;

pub use coerce::RawRecord;
pub use display::{
    FightOutcome, GaugeDisplay, RoundSummary, fight_outcome, format_amount, format_damage,
    format_health_display, format_progress_display, format_time_remaining, health_color,
    health_percentage, progress_color, progress_percentage, round_summary, shorten_address,
};
pub use enemies::{ENEMY_NAMES, enemy_name};
pub use fight::{
    FightSummaryReport, normalize_equipment_drop, normalize_fight_summary, normalize_healing,
    normalize_resurrection, validate_fight_summary,
};
