//! In-memory `/admins` backend used by the client's integration tests.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct AdminInput {
    pub name: String,
}

/// Admins in insertion order; listing returns them as stored.
pub type Db = Arc<RwLock<Vec<Admin>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router preloaded with `seed`.
pub fn app_with(seed: Vec<Admin>) -> Router {
    let db: Db = Arc::new(RwLock::new(seed));
    Router::new()
        .route("/admins", get(list_admins).post(create_admin))
        .route(
            "/admins/{id}",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validated_name(input: AdminInput) -> Result<String, StatusCode> {
    let name = input.name.trim();
    if name.is_empty() {
        tracing::debug!("rejecting blank admin name");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(name.to_string())
}

async fn list_admins(State(db): State<Db>) -> Json<Vec<Admin>> {
    let admins = db.read().await;
    Json(admins.clone())
}

async fn create_admin(
    State(db): State<Db>,
    Json(input): Json<AdminInput>,
) -> Result<(StatusCode, Json<Admin>), StatusCode> {
    let admin = Admin {
        id: Uuid::new_v4().to_string(),
        name: validated_name(input)?,
    };
    db.write().await.push(admin.clone());
    tracing::info!(id = %admin.id, "admin created");
    Ok((StatusCode::CREATED, Json(admin)))
}

async fn get_admin(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Admin>, StatusCode> {
    let admins = db.read().await;
    admins
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_admin(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<AdminInput>,
) -> Result<Json<Admin>, StatusCode> {
    let name = validated_name(input)?;
    let mut admins = db.write().await;
    let admin = admins
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    admin.name = name;
    tracing::info!(%id, "admin updated");
    Ok(Json(admin.clone()))
}

async fn delete_admin(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut admins = db.write().await;
    let position = admins
        .iter()
        .position(|a| a.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    admins.remove(position);
    tracing::info!(%id, "admin deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_serializes_to_json() {
        let admin = Admin {
            id: "42".to_string(),
            name: "Ana".to_string(),
        };
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json, serde_json::json!({"id": "42", "name": "Ana"}));
    }

    #[test]
    fn admin_input_rejects_missing_name() {
        let result: Result<AdminInput, _> = serde_json::from_str(r#"{"id":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn admin_input_ignores_extra_fields() {
        let input: AdminInput = serde_json::from_str(r#"{"id":"1","name":"Bia"}"#).unwrap();
        assert_eq!(input.name, "Bia");
    }

    #[test]
    fn blank_names_are_unprocessable() {
        let blank = AdminInput {
            name: "   ".to_string(),
        };
        assert_eq!(validated_name(blank), Err(StatusCode::UNPROCESSABLE_ENTITY));

        let padded = AdminInput {
            name: "  Ana ".to_string(),
        };
        assert_eq!(validated_name(padded), Ok("Ana".to_string()));
    }
}
