use std::{sync::Arc, time::Duration};

use breevs_core::{
    EventKind,
    prompt::{PredictionContext, PredictionPlayerLine},
};

use crate::{
    ServiceError, ServiceResult,
    game::{ArcEventRepository, ArcGameRepository, ArcPlayerRepository, GameId},
    textgen::ArcTextGenerator,
};

/// Predictions are memoized per game round; a miss simply recomputes.
pub const PREDICTION_CACHE_TTL: Duration = Duration::from_secs(300);

pub type ArcPredictionService = Arc<Box<dyn PredictionService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PredictionService {
    async fn predict(&self, game_id: GameId) -> ServiceResult<serde_json::Value>;
}

pub struct PredictionServiceImpl {
    game_repository: ArcGameRepository,
    player_repository: ArcPlayerRepository,
    event_repository: ArcEventRepository,
    text_generator: ArcTextGenerator,
    cache: moka::future::Cache<(GameId, u32), serde_json::Value>,
}

impl PredictionServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        player_repository: ArcPlayerRepository,
        event_repository: ArcEventRepository,
        text_generator: ArcTextGenerator,
    ) -> Self {
        Self {
            game_repository,
            player_repository,
            event_repository,
            text_generator,
            cache: moka::future::Cache::builder()
                .time_to_live(PREDICTION_CACHE_TTL)
                .build(),
        }
    }
}

#[async_trait::async_trait]
impl PredictionService for PredictionServiceImpl {
    async fn predict(&self, game_id: GameId) -> ServiceResult<serde_json::Value> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found(format!("Game {} not found", game_id));
        };
        if game.phase.is_completed() {
            return ServiceError::bad_request("Game already completed");
        }

        let cache_key = (game_id, game.current_round);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let players = self.player_repository.players_of_game(game_id).await?;
        let events = self.event_repository.events_of_game(game_id, None).await?;

        let lines: Vec<PredictionPlayerLine> = players
            .iter()
            .filter(|p| !p.is_eliminated())
            .enumerate()
            .map(|(i, p)| PredictionPlayerLine {
                address: p.wallet_address.clone(),
                survival_count: events
                    .iter()
                    .filter(|e| {
                        e.kind == EventKind::PlayerSurvived
                            && e.player_address.as_deref() == Some(p.wallet_address.as_str())
                    })
                    .count(),
                risk_mode_active: p.used_risk_mode,
                position: i + 1,
            })
            .collect();

        let context = PredictionContext {
            current_round: game.current_round,
            players_remaining: lines.len(),
            prize_pool: &game.prize_pool,
            players: &lines,
        };

        let prediction = self
            .text_generator
            .generate_json(&context.prompt())
            .await
            .map_err(|e| {
                ServiceError::Unavailable(format!("Failed to generate prediction: {}", e))
            })?;

        let payload = serde_json::json!({
            "game_id": game_id,
            "round": game.current_round,
            "predictions": prediction.get("predictions").cloned().unwrap_or_else(|| serde_json::json!([])),
            "next_elimination": prediction.get("most_likely_next_elimination")
                .or_else(|| prediction.get("next_elimination"))
                .cloned()
                .unwrap_or_else(|| serde_json::json!({})),
            "rounds_remaining": prediction.get("estimated_rounds_remaining")
                .or_else(|| prediction.get("rounds_remaining"))
                .cloned()
                .unwrap_or_else(|| serde_json::json!(0)),
            "confidence_level": prediction.get("confidence_level").cloned().unwrap_or_else(|| serde_json::json!("medium")),
        });

        self.cache.insert(cache_key, payload.clone()).await;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::{
        game::{
            Game, GameEvent, GamePhase, MockEventRepository, MockGameRepository,
            MockPlayerRepository, Player,
        },
        textgen::MockTextGenerator,
    };

    use super::*;

    const WALLET_A: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
    const WALLET_B: &str = "SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M";

    struct Fixture {
        service: PredictionServiceImpl,
        games: MockGameRepository,
        players: MockPlayerRepository,
        events: MockEventRepository,
        generator: MockTextGenerator,
    }

    fn fixture(generator: MockTextGenerator) -> Fixture {
        let games = MockGameRepository::default();
        let players = MockPlayerRepository::default();
        let events = MockEventRepository::default();
        let service = PredictionServiceImpl::new(
            Arc::new(Box::new(games.clone())),
            Arc::new(Box::new(players.clone())),
            Arc::new(Box::new(events.clone())),
            Arc::new(Box::new(generator.clone())),
        );
        Fixture {
            service,
            games,
            players,
            events,
            generator,
        }
    }

    fn running_game(id: GameId, round: u32) -> Game {
        Game {
            id,
            created_at: Utc::now(),
            current_round: round,
            prize_pool: Decimal::new(100, 0),
            stake_amount: Decimal::new(50, 0),
            phase: GamePhase::InProgress,
        }
    }

    fn player(wallet: &str, eliminated_round: Option<u32>) -> Player {
        Player {
            wallet_address: wallet.to_string(),
            joined_at: Utc::now(),
            eliminated_round,
            used_risk_mode: false,
        }
    }

    fn survival(game_id: GameId, wallet: &str, block_height: u64) -> GameEvent {
        GameEvent {
            id: block_height as i64,
            game_id,
            kind: EventKind::PlayerSurvived,
            player_address: Some(wallet.to_string()),
            round: Some(1),
            data: serde_json::json!({ "round": 1 }),
            block_height,
        }
    }

    #[tokio::test]
    async fn test_predict_assembles_payload() {
        let generator = MockTextGenerator::with_json_response(serde_json::json!({
            "predictions": [{ "player": "SP2J6ZY48G...", "win_probability": 60.0 }],
            "most_likely_next_elimination": { "player": "SP1K8DHA2Y..." },
            "estimated_rounds_remaining": 3,
            "confidence_level": "high",
        }));
        let f = fixture(generator);
        f.games.insert(running_game(1, 5));
        f.players.insert(1, player(WALLET_A, None));
        f.players.insert(1, player(WALLET_B, Some(3)));
        f.events.insert(survival(1, WALLET_A, 10));
        f.events.insert(survival(1, WALLET_A, 11));

        let payload = f.service.predict(1).await.unwrap();
        assert_eq!(payload["game_id"], 1);
        assert_eq!(payload["round"], 5);
        assert_eq!(payload["rounds_remaining"], 3);
        assert_eq!(payload["confidence_level"], "high");

        // Eliminated players are excluded; survivals counted per wallet.
        let prompts = f.generator.prompts();
        assert!(prompts[0].contains("Player SP2J6ZY48G...: 2 survivals"));
        assert!(!prompts[0].contains("SP1K8DHA2Y"));
    }

    #[tokio::test]
    async fn test_predict_cached_per_round() {
        let f = fixture(MockTextGenerator::with_json_response(serde_json::json!({
            "confidence_level": "low",
        })));
        f.games.insert(running_game(2, 4));
        f.players.insert(2, player(WALLET_A, None));

        let first = f.service.predict(2).await.unwrap();
        let second = f.service.predict(2).await.unwrap();
        assert_eq!(first, second);
        // Served from the cache: only one generation call.
        assert_eq!(f.generator.call_count(), 1);

        // A new round invalidates the key.
        f.games.insert(running_game(2, 5));
        f.service.predict(2).await.unwrap();
        assert_eq!(f.generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_predict_rejected_for_completed_game() {
        let f = fixture(MockTextGenerator::default());
        let mut game = running_game(3, 4);
        game.phase = GamePhase::Completed {
            winner: WALLET_A.to_string(),
        };
        f.games.insert(game);

        assert!(matches!(
            f.service.predict(3).await,
            Err(ServiceError::BadRequest(..))
        ));
        assert_eq!(f.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_generator_failure() {
        let f = fixture(MockTextGenerator::failing());
        f.games.insert(running_game(4, 2));
        f.players.insert(4, player(WALLET_A, None));

        assert!(matches!(
            f.service.predict(4).await,
            Err(ServiceError::Unavailable(..))
        ));
    }
}
