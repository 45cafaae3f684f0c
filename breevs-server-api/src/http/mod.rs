use axum::{
    Router,
    routing::{get, post},
};
use breevs_server_domain::{
    commentary::ArcCommentaryService,
    comparison::ArcComparisonService,
    game::{ArcEventRepository, ArcGameRepository, ArcPlayerRepository},
    prediction::ArcPredictionService,
    summary::ArcSummaryService,
};
use log::info;

mod commentaries;
mod comparison;
mod games;
mod predictions;
mod summaries;

#[derive(Clone)]
pub struct AppState {
    pub game_repository: ArcGameRepository,
    pub player_repository: ArcPlayerRepository,
    pub event_repository: ArcEventRepository,
    pub summary_service: ArcSummaryService,
    pub commentary_service: ArcCommentaryService,
    pub prediction_service: ArcPredictionService,
    pub comparison_service: ArcComparisonService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/games", get(games::get_all))
                .route("/games/compare_strategies", post(comparison::compare))
                .route("/games/{id}", get(games::get_by_id))
                .route("/games/{id}/events", get(games::get_events))
                .route("/games/{id}/generate_summary", post(summaries::generate))
                .route("/games/{id}/summary", get(summaries::get_by_game))
                .route(
                    "/games/{id}/generate_live_commentary",
                    post(commentaries::generate_live),
                )
                .route("/games/{id}/commentaries", get(commentaries::get_all))
                .route("/games/{id}/predict_outcome", post(predictions::predict))
                .route("/summaries", get(summaries::get_all)),
        )
        .with_state(state)
}

pub async fn run(
    state: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let port = std::env::var("BREEVS_HTTP_API_PORT")
        .expect("BREEVS_HTTP_API_PORT must be set")
        .parse::<u16>()
        .expect("BREEVS_HTTP_API_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .unwrap();

    info!("API server listening on port {}", port);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP API shut down gracefully");
}
