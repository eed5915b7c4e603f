use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError,
        repositories::user_registration_repository::UserRegistrationRepository,
        services::{image_service::ImageDecoder, password_service::PasswordHasher},
    },
    usecase::register_user_usecase::{RegisterUserUsecase, RegistrationInput, RegistrationOutcome},
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

// Request

/// json for register request
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(request: RegisterRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            avatar: request.avatar,
            photos: request.photos,
        }
    }
}

// Response

/// json for register response
///
/// `message` on success, `errors` on rejection, `error` when the
/// request could not be processed at all
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegisterResponse {
    fn registered(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            errors: None,
            error: None,
        }
    }

    fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: None,
            errors: Some(errors),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            message: None,
            errors: None,
            error: Some(error),
        }
    }
}

/* Router Function and Handler Function */

// User Router

/// function return Router object
/// Suppose to be nested by main router
///
/// `max_body_bytes` replaces axum's default request body limit, which is
/// too small for a set of inline photos
pub fn create_user_router<
    R: UserRegistrationRepository + Send + Sync + 'static + Clone,
    P: PasswordHasher + Send + Sync + 'static,
    D: ImageDecoder + Send + Sync + 'static,
>(
    register_service: RegisterUserUsecase<R, P, D>,
    max_body_bytes: usize,
) -> Router {
    let state = AppState {
        register_service: Arc::new(register_service),
    };

    Router::new()
        .route("/register", post(register::<R, P, D>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState<R: UserRegistrationRepository, P: PasswordHasher, D: ImageDecoder> {
    pub register_service: Arc<RegisterUserUsecase<R, P, D>>,
}

// handler function

/// handler function for register
async fn register<
    R: UserRegistrationRepository + Send + Sync + Clone,
    P: PasswordHasher + Send + Sync,
    D: ImageDecoder + Send + Sync,
>(
    State(state): State<AppState<R, P, D>>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    match state.register_service.register_user(payload.into()).await {
        Ok(RegistrationOutcome::Registered { message, .. }) => {
            (StatusCode::CREATED, Json(RegisterResponse::registered(message))).into_response()
        }
        Ok(RegistrationOutcome::Rejected { errors }) => {
            (StatusCode::BAD_REQUEST, Json(RegisterResponse::rejected(errors))).into_response()
        }
        // undecodable images are a bad request
        Err(e @ DomainError::Decode(_)) => {
            (StatusCode::BAD_REQUEST, Json(RegisterResponse::failed(e.to_string()))).into_response()
        }
        Err(e) => {
            error!("Registration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RegisterResponse::failed("Registration failed".to_string())),
            )
                .into_response()
        }
    }
}
