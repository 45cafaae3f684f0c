use crate::KeyMoment;

/// Heuristic 1-10 post-hoc rating for a completed game.
///
/// Base 5, plus bonuses for long games, large rosters and high-impact
/// moments, capped at 10.
pub fn excitement_rating(
    rounds: u32,
    player_count: usize,
    key_moments: &[KeyMoment],
    _total_spins: usize,
) -> u8 {
    let mut score: u8 = 5;

    if rounds > 10 {
        score += 2;
    } else if rounds > 5 {
        score += 1;
    }

    if player_count > 5 {
        score += 1;
    }

    let high_impact = key_moments.iter().filter(|m| m.is_high_impact()).count();
    score += high_impact.min(2) as u8;

    score.min(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MomentImpact, MomentKind};

    fn high_moment() -> KeyMoment {
        KeyMoment {
            kind: MomentKind::ShieldUsed,
            round: Some(1),
            player: None,
            impact: MomentImpact::High,
        }
    }

    fn medium_moment() -> KeyMoment {
        KeyMoment {
            kind: MomentKind::FirstBlood,
            round: Some(1),
            player: None,
            impact: MomentImpact::Medium,
        }
    }

    #[test]
    fn test_base_score() {
        assert_eq!(excitement_rating(1, 2, &[], 4), 5);
    }

    #[test]
    fn test_bonuses() {
        assert_eq!(excitement_rating(6, 2, &[], 0), 6);
        assert_eq!(excitement_rating(11, 2, &[], 0), 7);
        assert_eq!(excitement_rating(11, 6, &[], 0), 8);
        assert_eq!(
            excitement_rating(11, 6, &[high_moment(), medium_moment()], 0),
            9
        );
    }

    #[test]
    fn test_high_impact_bonus_capped_at_two() {
        let moments = vec![high_moment(), high_moment(), high_moment(), high_moment()];
        assert_eq!(excitement_rating(1, 2, &moments, 0), 7);
    }

    #[test]
    fn test_never_exceeds_ten() {
        let moments = vec![high_moment(); 8];
        for rounds in [0u32, 5, 6, 10, 11, 100] {
            for players in [0usize, 5, 6, 50] {
                let rating = excitement_rating(rounds, players, &moments, 1000);
                assert!((5..=10).contains(&rating));
            }
        }
        assert_eq!(excitement_rating(50, 50, &moments, 0), 10);
    }

    #[test]
    fn test_spin_count_does_not_move_the_score() {
        // The spin total is part of the signature but the formula never
        // reads it. Kept that way on purpose; changing the rating scale
        // is a product decision, not a code fix.
        let moments = vec![high_moment()];
        assert_eq!(
            excitement_rating(7, 4, &moments, 0),
            excitement_rating(7, 4, &moments, 10_000)
        );
    }
}
