use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/quizzes", quiz_routes())
        .nest("/play", play_routes())
        .routes(routes!(handlers::scoreboard::contestant_scoreboard))
}

fn quiz_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::quiz::get_quiz))
        .routes(routes!(handlers::quiz::register_contestant))
        .routes(routes!(handlers::scoreboard::group_scoreboard))
}

fn play_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::play::next_question))
        .routes(routes!(handlers::play::submit_answer))
}
