use crate::{EventKind, EventRecord};

/// Counts eliminations among the two most-recent events. `events_desc`
/// must be ordered by descending block height.
pub fn recent_eliminations(events_desc: &[EventRecord]) -> usize {
    events_desc
        .iter()
        .take(2)
        .filter(|e| e.kind == EventKind::PlayerEliminated)
        .count()
}

/// Heuristic 0-10 drama score for the current game state.
///
/// Weighted sum of elimination pressure (how many players are already
/// out), round pressure (capped at round 10) and recency pressure (each
/// of the last two events that was an elimination adds one point).
pub fn tension_level(
    total_players: usize,
    active_players: usize,
    current_round: u32,
    recent_eliminations: usize,
) -> u8 {
    let player_factor = if total_players == 0 {
        0.0
    } else {
        (1.0 - active_players as f64 / total_players as f64) * 5.0
    };
    let round_factor = (current_round as f64 / 10.0).min(1.0) * 3.0;
    let elimination_factor = recent_eliminations.min(2) as f64;

    let raw = player_factor + round_factor + elimination_factor;
    (raw.round() as u8).min(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elimination(block_height: u64) -> EventRecord {
        EventRecord {
            kind: EventKind::PlayerEliminated,
            player: Some("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string()),
            round: Some(3),
            block_height,
        }
    }

    fn survival(block_height: u64) -> EventRecord {
        EventRecord {
            kind: EventKind::PlayerSurvived,
            player: Some("SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M".to_string()),
            round: Some(3),
            block_height,
        }
    }

    #[test]
    fn test_tension_reference_values() {
        // 10 players, 5 active, round 10, two recent eliminations:
        // 2.5 + 3.0 + 2.0 = 7.5, rounds to 8.
        assert_eq!(tension_level(10, 5, 10, 2), 8);
    }

    #[test]
    fn test_tension_bounds() {
        // All players active in round 0 with no recent eliminations.
        assert_eq!(tension_level(8, 8, 0, 0), 0);
        // Everything maxed out stays capped at 10.
        assert_eq!(tension_level(10, 0, 100, 2), 10);
    }

    #[test]
    fn test_tension_empty_game() {
        assert_eq!(tension_level(0, 0, 0, 0), 0);
    }

    #[test]
    fn test_recent_eliminations_window() {
        // Only the two most-recent events count.
        let events = vec![elimination(30), survival(29), elimination(28)];
        assert_eq!(recent_eliminations(&events), 1);

        let events = vec![elimination(30), elimination(29), elimination(28)];
        assert_eq!(recent_eliminations(&events), 2);

        assert_eq!(recent_eliminations(&[]), 0);
    }
}
