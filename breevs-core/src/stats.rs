use rust_decimal::Decimal;

use crate::{EventKind, EventRecord, PlayerSnapshot};

/// Aggregate statistics persisted alongside a game summary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameStatistics {
    pub average_spins_per_round: f64,
    pub shield_uses: usize,
    pub risk_mode_uses: usize,
    pub survival_rate: f64,
    pub longest_game_duration: u32,
    pub total_prize_pool: String,
}

/// Counts trigger pulls: survive and eliminate events.
pub fn total_spins(events: &[EventRecord]) -> usize {
    events.iter().filter(|e| e.kind.is_spin()).count()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn game_statistics(
    events: &[EventRecord],
    players: &[PlayerSnapshot],
    current_round: u32,
    prize_pool: &Decimal,
) -> GameStatistics {
    let spins = total_spins(events);
    let average_spins_per_round = if current_round > 0 {
        round2(spins as f64 / current_round as f64)
    } else {
        0.0
    };
    // The winner takes the whole pool, so each seat's a-priori share is
    // 1/n. Not a survival distribution.
    let survival_rate = if players.is_empty() {
        0.0
    } else {
        round2(100.0 / players.len() as f64)
    };

    GameStatistics {
        average_spins_per_round,
        shield_uses: events
            .iter()
            .filter(|e| e.kind == EventKind::ShieldUsed)
            .count(),
        risk_mode_uses: players.iter().filter(|p| p.used_risk_mode).count(),
        survival_rate,
        longest_game_duration: current_round,
        total_prize_pool: prize_pool.to_string(),
    }
}
