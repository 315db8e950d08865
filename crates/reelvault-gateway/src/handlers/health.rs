use crate::model::HealthBody;
use axum::Json;

pub async fn health_handler() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}
