//! Prompt and context assembly for the text-generation service.
//!
//! Everything here is deterministic string building over already-loaded
//! data. The timeline is capped so a long game cannot produce an
//! unbounded prompt, and wallet addresses are truncated before they
//! leave the system.

use rust_decimal::Decimal;

use crate::{EliminationRecord, EventRecord, PlayerSnapshot};

/// Events included in the summary timeline, counted from the start of
/// the game.
pub const TIMELINE_EVENT_CAP: usize = 50;

/// Recent events included in live commentary context.
pub const RECENT_EVENT_CAP: usize = 5;

/// Shortens a wallet address for display: the first `len` characters
/// followed by an ellipsis.
pub fn short_address(address: &str, len: usize) -> String {
    let head: String = address.chars().take(len).collect();
    format!("{}...", head)
}

pub struct SummaryContext<'a> {
    pub game_id: i64,
    pub stake_amount: &'a Decimal,
    pub prize_pool: &'a Decimal,
    pub players: &'a [PlayerSnapshot],
    pub winner: Option<&'a str>,
    pub current_round: u32,
    pub total_spins: usize,
    /// Ascending by block height.
    pub events: &'a [EventRecord],
    pub elimination_order: &'a [EliminationRecord],
}

impl SummaryContext<'_> {
    fn timeline(&self) -> Vec<String> {
        self.events
            .iter()
            .take(TIMELINE_EVENT_CAP)
            .map(|event| {
                let round = event
                    .round
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let mut line = format!("Round {}: {}", round, event.kind.display_name());
                if let Some(player) = &event.player {
                    line.push_str(&format!(" - {}", short_address(player, 8)));
                }
                line
            })
            .collect()
    }

    fn roster(&self) -> Vec<String> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mark = if Some(p.wallet_address.as_str()) == self.winner {
                    " WINNER".to_string()
                } else if let Some(round) = p.eliminated_round {
                    format!(" Eliminated Round {}", round)
                } else {
                    String::new()
                };
                format!("{}. {}{}", i + 1, short_address(&p.wallet_address, 10), mark)
            })
            .collect()
    }

    pub fn context_block(&self) -> String {
        let eliminations: Vec<String> = self
            .elimination_order
            .iter()
            .enumerate()
            .map(|(i, e)| {
                format!(
                    "{}. {} - Round {}",
                    i + 1,
                    short_address(&e.address, 10),
                    e.round
                )
            })
            .collect();

        format!(
            "Game Summary Data:\n\
             - Game ID: {}\n\
             - Stake Amount: {} STX per player\n\
             - Total Prize Pool: {} STX\n\
             - Total Players: {}\n\
             - Total Rounds: {}\n\
             - Total Spins: {}\n\
             - Winner: {}\n\
             \n\
             Players (in join order):\n{}\n\
             \n\
             Game Timeline:\n{}\n\
             \n\
             Elimination Order:\n{}",
            self.game_id,
            self.stake_amount,
            self.prize_pool,
            self.players.len(),
            self.current_round,
            self.total_spins,
            self.winner
                .map(|w| short_address(w, 10))
                .unwrap_or_else(|| "N/A".to_string()),
            self.roster().join("\n"),
            self.timeline().join("\n"),
            eliminations.join("\n"),
        )
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are a master storyteller recounting an epic Russian Roulette game on the Stacks blockchain.\n\
             Write a compelling narrative summary that captures the full arc of this game.\n\
             \n\
             Structure your response:\n\
             1. **The Setup** - Set the stakes and introduce the battle (2-3 sentences)\n\
             2. **Rising Action** - Chronicle key eliminations and tense moments (3-4 sentences)\n\
             3. **The Climax** - Build to the final showdown (2-3 sentences)\n\
             4. **The Resolution** - Winner announcement and reflection (2 sentences)\n\
             5. **Strategy Analysis** - Brief tactical insights (2-3 sentences)\n\
             \n\
             {}\n\
             \n\
             Write in an engaging, dramatic style. Use metaphors from poker, warfare, or gladiatorial combat.\n\
             Keep it under 400 words. Make readers feel the tension and excitement.",
            self.context_block()
        )
    }
}

pub struct CommentaryContext<'a> {
    pub game_id: i64,
    pub current_round: u32,
    pub active_players: usize,
    pub total_players: usize,
    pub prize_pool: &'a Decimal,
    pub tension_level: u8,
    /// Descending by block height; only the first [`RECENT_EVENT_CAP`]
    /// entries are used.
    pub recent_events: &'a [EventRecord],
    pub roster: &'a [PlayerSnapshot],
}

impl CommentaryContext<'_> {
    pub fn context_block(&self) -> String {
        let recent: Vec<String> = self
            .recent_events
            .iter()
            .take(RECENT_EVENT_CAP)
            .map(|event| {
                let round = event
                    .round
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let player = event
                    .player
                    .as_deref()
                    .map(|p| short_address(p, 8))
                    .unwrap_or_else(|| "N/A".to_string());
                format!("Round {}: {} - {}", round, event.kind.display_name(), player)
            })
            .collect();

        let active: Vec<String> = self
            .roster
            .iter()
            .filter(|p| !p.is_eliminated())
            .map(|p| {
                let risk = if p.used_risk_mode {
                    " (Risk Mode Active)"
                } else {
                    ""
                };
                format!("- {}{}", short_address(&p.wallet_address, 12), risk)
            })
            .collect();

        format!(
            "Current Game State:\n\
             - Game ID: {}\n\
             - Current Round: {}\n\
             - Players Remaining: {} of {}\n\
             - Prize Pool: {} STX\n\
             - Tension Level: {}/10\n\
             \n\
             Recent Actions (last 5):\n{}\n\
             \n\
             Active Players:\n{}",
            self.game_id,
            self.current_round,
            self.active_players,
            self.total_players,
            self.prize_pool,
            self.tension_level,
            recent.join("\n"),
            active.join("\n"),
        )
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are a live sports commentator for a blockchain Russian Roulette game.\n\
             Provide exciting, real-time commentary on the current game state.\n\
             \n\
             Style: Energetic, suspenseful, focus on the drama of the moment.\n\
             Keep it to 2-3 punchy sentences about what's happening RIGHT NOW.\n\
             Make it feel like a live broadcast.\n\
             \n\
             {}\n\
             \n\
             Commentary:",
            self.context_block()
        )
    }
}

pub struct PredictionPlayerLine {
    pub address: String,
    pub survival_count: usize,
    pub risk_mode_active: bool,
    pub position: usize,
}

pub struct PredictionContext<'a> {
    pub current_round: u32,
    pub players_remaining: usize,
    pub prize_pool: &'a Decimal,
    pub players: &'a [PredictionPlayerLine],
}

impl PredictionContext<'_> {
    pub fn prompt(&self) -> String {
        let lines: Vec<String> = self
            .players
            .iter()
            .map(|p| {
                format!(
                    "Player {}: {} survivals, Risk Mode: {}, Position: {}",
                    short_address(&p.address, 10),
                    p.survival_count,
                    p.risk_mode_active,
                    p.position
                )
            })
            .collect();

        format!(
            "Analyze this Russian Roulette game and predict outcomes.\n\
             \n\
             Current Game State:\n\
             - Round: {}\n\
             - Players Remaining: {}\n\
             - Prize Pool: {} STX\n\
             \n\
             Player Statistics:\n{}\n\
             \n\
             Provide predictions in JSON format with:\n\
             1. win_probability for each player (percentages that sum to 100)\n\
             2. reasoning for each player's chances\n\
             3. most_likely_next_elimination with player and reasoning\n\
             4. estimated_rounds_remaining\n\
             5. confidence_level (low/medium/high)",
            self.current_round,
            self.players_remaining,
            self.prize_pool,
            lines.join("\n"),
        )
    }
}

/// Aggregated per-wallet record used both in the comparison prompt and
/// in the HTTP response.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WalletComparison {
    pub wallet: String,
    pub full_wallet: String,
    pub games_played: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub risk_mode_usage: usize,
    pub average_survival_rounds: f64,
}

pub fn comparison_prompt(stats: &[WalletComparison]) -> String {
    let lines: Vec<String> = stats
        .iter()
        .map(|p| {
            format!(
                "Player {}:\n- Games: {}, Wins: {} ({}%)\n- Risk Mode Usage: {} times\n- Avg Survival: {} rounds",
                p.wallet, p.games_played, p.wins, p.win_rate, p.risk_mode_usage, p.average_survival_rounds,
            )
        })
        .collect();

    format!(
        "Compare these Russian Roulette players' performance and strategies:\n\
         \n\
         {}\n\
         \n\
         Provide:\n\
         1. Strategic assessment of each player\n\
         2. Strengths and weaknesses comparison\n\
         3. Head-to-head matchup prediction\n\
         4. Strategy recommendations\n\
         \n\
         Be insightful like a professional analyst.",
        lines.join("\n\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    fn player(wallet: &str, eliminated_round: Option<u32>, risk: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            wallet_address: wallet.to_string(),
            eliminated_round,
            used_risk_mode: risk,
        }
    }

    fn event(kind: EventKind, round: u32, block_height: u64) -> EventRecord {
        EventRecord {
            kind,
            player: Some("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string()),
            round: Some(round),
            block_height,
        }
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address("SP2J6ZY48GV1EZ5V2V5RB", 8), "SP2J6ZY4...");
        // Shorter than the cut still gets the ellipsis.
        assert_eq!(short_address("SP1", 8), "SP1...");
    }

    #[test]
    fn test_summary_timeline_is_capped() {
        let events: Vec<EventRecord> = (0..80)
            .map(|i| event(EventKind::PlayerSurvived, i, i as u64))
            .collect();
        let players = vec![player("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", None, false)];
        let ctx = SummaryContext {
            game_id: 7,
            stake_amount: &Decimal::new(50, 0),
            prize_pool: &Decimal::new(150, 0),
            players: &players,
            winner: Some("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7"),
            current_round: 80,
            total_spins: 80,
            events: &events,
            elimination_order: &[],
        };
        let block = ctx.context_block();
        assert_eq!(block.matches("Player Survived").count(), TIMELINE_EVENT_CAP);
        assert!(block.contains("- Game ID: 7"));
        assert!(block.contains("- Winner: SP2J6ZY48G..."));
        assert!(block.contains("1. SP2J6ZY48G... WINNER"));
    }

    #[test]
    fn test_summary_prompt_is_deterministic() {
        let players = vec![
            player("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", Some(3), false),
            player("SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M", None, true),
        ];
        let events = vec![event(EventKind::PlayerEliminated, 3, 12)];
        let eliminations = vec![EliminationRecord {
            address: "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string(),
            round: 3,
        }];
        let ctx = SummaryContext {
            game_id: 1,
            stake_amount: &Decimal::new(50, 0),
            prize_pool: &Decimal::new(100, 0),
            players: &players,
            winner: Some("SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M"),
            current_round: 4,
            total_spins: 6,
            events: &events,
            elimination_order: &eliminations,
        };
        assert_eq!(ctx.prompt(), ctx.prompt());
        assert!(ctx.prompt().contains("master storyteller"));
        assert!(ctx.context_block().contains("2. SP1K8DHA2Y... WINNER"));
        assert!(ctx.context_block().contains("1. SP2J6ZY48G... Eliminated Round 3"));
    }

    #[test]
    fn test_commentary_context() {
        let roster = vec![
            player("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", None, true),
            player("SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M", Some(2), false),
        ];
        let recent: Vec<EventRecord> = (0..8)
            .map(|i| event(EventKind::PlayerSurvived, 5, 100 - i))
            .collect();
        let ctx = CommentaryContext {
            game_id: 3,
            current_round: 5,
            active_players: 1,
            total_players: 2,
            prize_pool: &Decimal::new(100, 0),
            tension_level: 7,
            recent_events: &recent,
            roster: &roster,
        };
        let block = ctx.context_block();
        assert_eq!(block.matches("Player Survived").count(), RECENT_EVENT_CAP);
        assert!(block.contains("- Players Remaining: 1 of 2"));
        assert!(block.contains("- Tension Level: 7/10"));
        // Eliminated players never appear in the active roster.
        assert!(!block.contains("SP1K8DHA2Y6B..."));
        assert!(block.contains("- SP2J6ZY48GV1... (Risk Mode Active)"));
    }

    #[test]
    fn test_prediction_prompt_requests_json() {
        let players = vec![PredictionPlayerLine {
            address: "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string(),
            survival_count: 4,
            risk_mode_active: true,
            position: 1,
        }];
        let ctx = PredictionContext {
            current_round: 5,
            players_remaining: 1,
            prize_pool: &Decimal::new(100, 0),
            players: &players,
        };
        let prompt = ctx.prompt();
        assert!(prompt.contains("JSON format"));
        assert!(prompt.contains("Player SP2J6ZY48G...: 4 survivals"));
    }

    #[test]
    fn test_comparison_prompt() {
        let stats = vec![WalletComparison {
            wallet: "SP2J6ZY48G...".to_string(),
            full_wallet: "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string(),
            games_played: 15,
            wins: 3,
            win_rate: 20.0,
            risk_mode_usage: 5,
            average_survival_rounds: 4.2,
        }];
        let prompt = comparison_prompt(&stats);
        assert!(prompt.contains("Games: 15, Wins: 3 (20%)"));
        assert!(prompt.contains("professional analyst"));
    }
}
