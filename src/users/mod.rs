use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod service;
pub mod store;
mod validate;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
