pub mod game;
pub mod game_commentary;
pub mod game_event;
pub mod game_player;
pub mod game_summary;
pub mod player;
