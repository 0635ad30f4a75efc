use axum::{Router, routing::get};
use store_object::GenericStore;

use crate::core::SquadHaus;
use crate::models::Squad;
use crate::server::handlers;

#[derive(Debug, Clone)]
pub struct AppState {
    pub haus: SquadHaus,
    pub squads: GenericStore<Squad>,
}

impl AppState {
    pub fn new(haus: SquadHaus) -> Self {
        let squads = haus.generic_store::<Squad>();
        Self { haus, squads }
    }
}

/// All routes live under `/v1`; anything else is a JSON 404
pub fn squadhaus_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/checkstatus", get(handlers::check_status))
        .route(
            "/squad",
            get(handlers::list_squads).post(handlers::create_squad),
        )
        .route(
            "/squad/{id}",
            get(handlers::get_squad)
                .put(handlers::update_squad)
                .delete(handlers::delete_squad),
        );

    Router::new()
        .nest("/v1", v1)
        .fallback(handlers::route_not_found)
        .with_state(state)
}
