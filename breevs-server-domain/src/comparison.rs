use std::sync::Arc;

use breevs_core::prompt::{WalletComparison, comparison_prompt, short_address};

use crate::{
    ServiceError, ServiceResult,
    game::{ArcGameRepository, ArcPlayerRepository},
    textgen::ArcTextGenerator,
};

/// Wallets considered per comparison request.
pub const COMPARISON_WALLET_CAP: usize = 6;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StrategyComparison {
    pub player_stats: Vec<WalletComparison>,
    pub ai_analysis: String,
}

pub type ArcComparisonService = Arc<Box<dyn ComparisonService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ComparisonService {
    async fn compare(&self, wallets: &[String]) -> ServiceResult<StrategyComparison>;
}

pub struct ComparisonServiceImpl {
    game_repository: ArcGameRepository,
    player_repository: ArcPlayerRepository,
    text_generator: ArcTextGenerator,
}

impl ComparisonServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        player_repository: ArcPlayerRepository,
        text_generator: ArcTextGenerator,
    ) -> Self {
        Self {
            game_repository,
            player_repository,
            text_generator,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[async_trait::async_trait]
impl ComparisonService for ComparisonServiceImpl {
    async fn compare(&self, wallets: &[String]) -> ServiceResult<StrategyComparison> {
        if wallets.len() < 2 {
            return ServiceError::bad_request("Provide at least 2 wallet addresses to compare");
        }

        let mut player_stats = Vec::new();
        for wallet in wallets.iter().take(COMPARISON_WALLET_CAP) {
            let games = self.game_repository.games_of_wallet(wallet).await?;
            let games_played = games.len();
            let wins = games
                .iter()
                .filter(|g| g.phase.winner() == Some(wallet.as_str()))
                .count();
            let player = self.player_repository.get_player(wallet).await?;

            let (risk_mode_usage, survived_rounds) = player
                .map(|p| {
                    (
                        p.used_risk_mode as usize,
                        p.eliminated_round.unwrap_or(0) as f64,
                    )
                })
                .unwrap_or((0, 0.0));

            player_stats.push(WalletComparison {
                wallet: short_address(wallet, 10),
                full_wallet: wallet.clone(),
                games_played,
                wins,
                win_rate: if games_played > 0 {
                    round2(wins as f64 / games_played as f64 * 100.0)
                } else {
                    0.0
                },
                risk_mode_usage,
                average_survival_rounds: if games_played > 0 {
                    round2(survived_rounds / games_played as f64)
                } else {
                    0.0
                },
            });
        }

        let ai_analysis = self
            .text_generator
            .generate(&comparison_prompt(&player_stats))
            .await
            .map_err(|e| {
                ServiceError::Unavailable(format!("Failed to compare strategies: {}", e))
            })?;

        Ok(StrategyComparison {
            player_stats,
            ai_analysis,
        })
    }
}
