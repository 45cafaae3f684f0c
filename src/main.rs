use std::sync::Arc;

use breevs_persistence_sea_orm::{
    commentaries::CommentaryRepositoryImpl, events::EventRepositoryImpl, games::GameRepositoryImpl,
    players::PlayerRepositoryImpl, summaries::SummaryRepositoryImpl,
};
use breevs_server_api::http::AppState;
use breevs_server_domain::{
    commentary::{ArcCommentaryRepository, ArcCommentaryService, CommentaryServiceImpl},
    comparison::{ArcComparisonService, ComparisonServiceImpl},
    game::{ArcEventRepository, ArcGameRepository, ArcPlayerRepository},
    prediction::{ArcPredictionService, PredictionServiceImpl},
    summary::{ArcSummaryRepository, ArcSummaryService, SummaryServiceImpl},
    textgen::ArcTextGenerator,
};
use breevs_textgen_gemini::GeminiTextGenerator;
use log::info;

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().expect("Failed to load .env file");

    logs::init_logger();

    let game_repository: ArcGameRepository = Arc::new(Box::new(GameRepositoryImpl::new().await));
    let player_repository: ArcPlayerRepository =
        Arc::new(Box::new(PlayerRepositoryImpl::new().await));
    let event_repository: ArcEventRepository = Arc::new(Box::new(EventRepositoryImpl::new().await));
    let summary_repository: ArcSummaryRepository =
        Arc::new(Box::new(SummaryRepositoryImpl::new().await));
    let commentary_repository: ArcCommentaryRepository =
        Arc::new(Box::new(CommentaryRepositoryImpl::new().await));

    let text_generator: ArcTextGenerator = Arc::new(Box::new(GeminiTextGenerator::new()));

    let summary_service: ArcSummaryService = Arc::new(Box::new(SummaryServiceImpl::new(
        game_repository.clone(),
        player_repository.clone(),
        event_repository.clone(),
        summary_repository.clone(),
        text_generator.clone(),
    )));
    let commentary_service: ArcCommentaryService = Arc::new(Box::new(CommentaryServiceImpl::new(
        game_repository.clone(),
        player_repository.clone(),
        event_repository.clone(),
        commentary_repository.clone(),
        text_generator.clone(),
    )));
    let prediction_service: ArcPredictionService = Arc::new(Box::new(PredictionServiceImpl::new(
        game_repository.clone(),
        player_repository.clone(),
        event_repository.clone(),
        text_generator.clone(),
    )));
    let comparison_service: ArcComparisonService = Arc::new(Box::new(ComparisonServiceImpl::new(
        game_repository.clone(),
        player_repository.clone(),
        text_generator.clone(),
    )));

    let state = AppState {
        game_repository,
        player_repository,
        event_repository,
        summary_service,
        commentary_service,
        prediction_service,
        comparison_service,
    };

    info!("Starting application");

    breevs_server_api::http::run(state, shutdown_signal()).await;
}
