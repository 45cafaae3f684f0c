mod excitement;
mod moments;
mod stats;
mod tension;

pub mod prompt;

pub use excitement::excitement_rating;
pub use moments::extract_key_moments;
pub use stats::{GameStatistics, game_statistics, total_spins};
pub use tension::{recent_eliminations, tension_level};

/// Event kinds recorded from the chain. The discriminants mirror the
/// contract's event names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PlayerSurvived,
    PlayerEliminated,
    ShieldUsed,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PlayerSurvived => "player_survived",
            EventKind::PlayerEliminated => "player_eliminated",
            EventKind::ShieldUsed => "shield_used",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventKind::PlayerSurvived => "Player Survived",
            EventKind::PlayerEliminated => "Player Eliminated",
            EventKind::ShieldUsed => "Shield Used",
        }
    }

    pub fn parse(s: &str) -> Option<EventKind> {
        match s {
            "player_survived" => Some(EventKind::PlayerSurvived),
            "player_eliminated" => Some(EventKind::PlayerEliminated),
            "shield_used" => Some(EventKind::ShieldUsed),
            _ => None,
        }
    }

    /// A spin is any pull of the trigger, i.e. a survive or eliminate event.
    pub fn is_spin(&self) -> bool {
        matches!(self, EventKind::PlayerSurvived | EventKind::PlayerEliminated)
    }
}

/// One chain event, reduced to what the pipeline needs. `block_height` is
/// the canonical ordering key; it is monotonic but not contiguous.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub player: Option<String>,
    pub round: Option<u32>,
    pub block_height: u64,
}

/// Per-player view of a game, in join order. `eliminated_round` is `Some`
/// exactly when the player has been eliminated.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub wallet_address: String,
    pub eliminated_round: Option<u32>,
    pub used_risk_mode: bool,
}

impl PlayerSnapshot {
    pub fn is_eliminated(&self) -> bool {
        self.eliminated_round.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EliminationRecord {
    pub address: String,
    pub round: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentKind {
    ShieldUsed,
    FirstBlood,
    RapidEliminations,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentImpact {
    Medium,
    High,
}

/// A notable sub-event surfaced for narrative emphasis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyMoment {
    #[serde(rename = "type")]
    pub kind: MomentKind,
    pub round: Option<u32>,
    pub player: Option<String>,
    pub impact: MomentImpact,
}

impl KeyMoment {
    pub fn is_high_impact(&self) -> bool {
        self.impact == MomentImpact::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_round_trip() {
        for kind in [
            EventKind::PlayerSurvived,
            EventKind::PlayerEliminated,
            EventKind::ShieldUsed,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("player_joined"), None);
    }

    #[test]
    fn test_spin_events() {
        assert!(EventKind::PlayerSurvived.is_spin());
        assert!(EventKind::PlayerEliminated.is_spin());
        assert!(!EventKind::ShieldUsed.is_spin());
    }
}
