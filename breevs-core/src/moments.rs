use crate::{EventKind, EventRecord, KeyMoment, MomentImpact, MomentKind};

/// Extracts the notable moments from a game's event stream.
///
/// `events_asc` must be ordered by ascending block height. The output
/// preserves that order within each rule and is bounded by the number of
/// shield events plus two: every shield use becomes a moment, the first
/// elimination becomes `FirstBlood`, and the first pair of consecutive
/// eliminations at most one round apart becomes a single
/// `RapidEliminations` moment. Later qualifying pairs are ignored.
pub fn extract_key_moments(events_asc: &[EventRecord]) -> Vec<KeyMoment> {
    let mut moments = Vec::new();

    for event in events_asc.iter().filter(|e| e.kind == EventKind::ShieldUsed) {
        moments.push(KeyMoment {
            kind: MomentKind::ShieldUsed,
            round: event.round,
            player: event.player.clone(),
            impact: MomentImpact::High,
        });
    }

    let eliminations: Vec<&EventRecord> = events_asc
        .iter()
        .filter(|e| e.kind == EventKind::PlayerEliminated)
        .collect();

    if let Some(first) = eliminations.first() {
        moments.push(KeyMoment {
            kind: MomentKind::FirstBlood,
            round: first.round,
            player: first.player.clone(),
            impact: MomentImpact::Medium,
        });
    }

    for pair in eliminations.windows(2) {
        let earlier = pair[0].round.unwrap_or(0);
        let later = pair[1].round.unwrap_or(0);
        if later.saturating_sub(earlier) <= 1 {
            moments.push(KeyMoment {
                kind: MomentKind::RapidEliminations,
                round: pair[0].round,
                player: None,
                impact: MomentImpact::High,
            });
            break;
        }
    }

    moments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, round: u32, block_height: u64) -> EventRecord {
        EventRecord {
            kind,
            player: Some(format!("SP{:038}", block_height)),
            round: Some(round),
            block_height,
        }
    }

    #[test]
    fn test_shield_first_blood_and_rapid() {
        // Three players, a shield at round 2, eliminations at rounds 3 and 4.
        let events = vec![
            event(EventKind::PlayerSurvived, 1, 10),
            event(EventKind::ShieldUsed, 2, 11),
            event(EventKind::PlayerEliminated, 3, 12),
            event(EventKind::PlayerEliminated, 4, 13),
        ];
        let moments = extract_key_moments(&events);

        assert_eq!(moments.len(), 3);
        assert_eq!(moments[0].kind, MomentKind::ShieldUsed);
        assert_eq!(moments[0].round, Some(2));
        assert_eq!(moments[0].impact, MomentImpact::High);
        assert_eq!(moments[1].kind, MomentKind::FirstBlood);
        assert_eq!(moments[1].round, Some(3));
        assert_eq!(moments[1].impact, MomentImpact::Medium);
        assert_eq!(moments[2].kind, MomentKind::RapidEliminations);
        assert_eq!(moments[2].round, Some(3));
        assert_eq!(moments[2].impact, MomentImpact::High);
    }

    #[test]
    fn test_at_most_one_rapid_eliminations() {
        // Five eliminations each one round apart still yield a single
        // rapid-eliminations moment, anchored at the first pair.
        let events: Vec<EventRecord> = (0..5)
            .map(|i| event(EventKind::PlayerEliminated, 2 + i, 20 + i as u64))
            .collect();
        let moments = extract_key_moments(&events);

        let rapid: Vec<&KeyMoment> = moments
            .iter()
            .filter(|m| m.kind == MomentKind::RapidEliminations)
            .collect();
        assert_eq!(rapid.len(), 1);
        assert_eq!(rapid[0].round, Some(2));
    }

    #[test]
    fn test_no_rapid_for_spread_out_eliminations() {
        let events = vec![
            event(EventKind::PlayerEliminated, 1, 10),
            event(EventKind::PlayerEliminated, 4, 11),
            event(EventKind::PlayerEliminated, 8, 12),
        ];
        let moments = extract_key_moments(&events);
        assert!(moments.iter().all(|m| m.kind != MomentKind::RapidEliminations));
        assert_eq!(moments.len(), 1);
        assert_eq!(moments[0].kind, MomentKind::FirstBlood);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let events = vec![
            event(EventKind::ShieldUsed, 1, 10),
            event(EventKind::PlayerEliminated, 2, 11),
            event(EventKind::PlayerEliminated, 3, 12),
        ];
        assert_eq!(extract_key_moments(&events), extract_key_moments(&events));
    }

    #[test]
    fn test_empty_stream() {
        assert!(extract_key_moments(&[]).is_empty());
    }

    #[test]
    fn test_shield_order_preserved() {
        let events = vec![
            event(EventKind::ShieldUsed, 1, 10),
            event(EventKind::ShieldUsed, 5, 20),
        ];
        let moments = extract_key_moments(&events);
        assert_eq!(moments.len(), 2);
        assert_eq!(moments[0].round, Some(1));
        assert_eq!(moments[1].round, Some(5));
    }
}
