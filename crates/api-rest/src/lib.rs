//! # API REST
//!
//! REST API implementation for the Ausome worksheet assistant.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, per-session state)
//!
//! Uses `api-shared` for wire types and `ausome-core` for all profile and prompt logic.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod sessions;

use axum::{
    extract::{Path as AxumPath, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::{
    ActivityOptionsRes, ActivityReq, ContextRes, CreateSessionRes, ErrorRes, FocusOptions,
    HealthRes, HealthService, ProfileRes, PromptRes, ResolveActivityRes, TextActivityRes,
    UpdateProfileReq,
};
use ausome_core::{
    ActivityRequest, ActivitySelector, ActivityType, ContextFormatter, KnownActivity,
    ProfileField, ProfileOption, ProfileStore, SessionValue, WorksheetError, WorksheetResult,
    WorksheetService,
};
use error::ApiResult;
use sessions::{Session, SessionRegistry};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    sessions: SessionRegistry,
    worksheets: Arc<WorksheetService>,
}

impl AppState {
    pub fn new(worksheets: WorksheetService) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            worksheets: Arc::new(worksheets),
        }
    }

    /// Replaces the session registry, e.g. to configure the idle timeout.
    pub fn with_sessions(mut self, sessions: SessionRegistry) -> Self {
        self.sessions = sessions;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        create_session,
        delete_session,
        get_profile,
        update_profile,
        get_context,
        resolve_activity,
        activity_prompt,
        activity_text,
        activity_image,
        activity_options,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        CreateSessionRes,
        ProfileRes,
        UpdateProfileReq,
        ContextRes,
        ActivityReq,
        ResolveActivityRes,
        PromptRes,
        TextActivityRes,
        FocusOptions,
        ActivityOptionsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(delete_session))
        .route("/sessions/:id/profile", get(get_profile).put(update_profile))
        .route("/sessions/:id/context", get(get_context))
        .route("/sessions/:id/activity/resolve", post(resolve_activity))
        .route("/sessions/:id/activity/prompt", post(activity_prompt))
        .route("/sessions/:id/activity/text", post(activity_text))
        .route("/sessions/:id/activity/image", post(activity_image))
        .route("/activity/options", get(activity_options))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created with a default profile", body = CreateSessionRes)
    )
)]
/// Open a new form session
///
/// Every profile field starts at its default value.
#[axum::debug_handler]
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<CreateSessionRes>) {
    let (id, session) = state.sessions.create();
    (
        StatusCode::CREATED,
        Json(CreateSessionRes {
            session_id: id.to_string(),
            created_at: session.created_at.to_rfc3339(),
        }),
    )
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session ended and its profile discarded"),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// End a form session
#[axum::debug_handler]
async fn delete_session(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&raw_id)?;
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error::session_not_found(&raw_id))
    }
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/profile",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current profile", body = ProfileRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Read every profile field with its current value
#[axum::debug_handler]
async fn get_profile(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ProfileRes>> {
    let (id, session) = load_session(&state, &id)?;
    Ok(Json(profile_res(id, &session)))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/profile",
    params(("id" = String, Path, description = "Session id")),
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Unknown field or invalid value", body = ErrorRes)
    )
)]
/// Update profile fields
///
/// The update is all-or-nothing: if any value is rejected, no field is written.
#[axum::debug_handler]
async fn update_profile(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    Json(req): Json<UpdateProfileReq>,
) -> ApiResult<Json<ProfileRes>> {
    let id = parse_session_id(&raw_id)?;
    let values = req
        .fields
        .into_iter()
        .map(|(key, value)| session_value(&key, value).map(|value| (key, value)))
        .collect::<WorksheetResult<Vec<_>>>()
        .map_err(error::worksheet)?;

    let session = state
        .sessions
        .with_session(id, |session| -> WorksheetResult<Session> {
            let written = session.profile.update(values)?;
            session.updated_at = Utc::now();
            tracing::info!(session_id = %id, written, "updated profile");
            Ok(session.clone())
        })
        .ok_or_else(|| error::session_not_found(&raw_id))?
        .map_err(error::worksheet)?;

    Ok(Json(profile_res(id, &session)))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/context",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Formatted profile context", body = ContextRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Render the profile as a context summary
#[axum::debug_handler]
async fn get_context(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ContextRes>> {
    let (id, session) = load_session(&state, &id)?;
    Ok(Json(ContextRes {
        session_id: id.to_string(),
        context: ContextFormatter::format(&session.profile.profile()),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/activity/resolve",
    params(("id" = String, Path, description = "Session id")),
    request_body = ActivityReq,
    responses(
        (status = 200, description = "Resolved activity type", body = ResolveActivityRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Missing topic or unknown menu choice", body = ErrorRes)
    )
)]
/// Resolve a menu selection to an activity type
///
/// When the request has no `focus`, the session's stored activity focus is used.
#[axum::debug_handler]
async fn resolve_activity(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<ActivityReq>,
) -> ApiResult<Json<ResolveActivityRes>> {
    let (_, session) = load_session(&state, &id)?;
    let activity = resolve(&session.profile, &req).map_err(error::worksheet)?;
    Ok(Json(ResolveActivityRes {
        activity_type: activity.label().to_owned(),
        custom: activity.is_custom(),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/activity/prompt",
    params(("id" = String, Path, description = "Session id")),
    request_body = ActivityReq,
    responses(
        (status = 200, description = "Worksheet, image and text prompts", body = PromptRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Missing topic or unknown menu choice", body = ErrorRes)
    )
)]
/// Build every prompt for an activity without calling the generation service
#[axum::debug_handler]
async fn activity_prompt(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<ActivityReq>,
) -> ApiResult<Json<PromptRes>> {
    let (_, session) = load_session(&state, &id)?;
    let activity = resolve(&session.profile, &req).map_err(error::worksheet)?;
    let prompts = state
        .worksheets
        .prompts(&session.profile.profile(), &activity);

    Ok(Json(PromptRes {
        activity_type: prompts.activity_type,
        worksheet_prompt: prompts.worksheet,
        image_prompt: prompts.image,
        text_prompt: prompts.text,
        profile_complete: session.profile.is_complete(),
        missing: missing_keys(&session.profile),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/activity/text",
    params(("id" = String, Path, description = "Session id")),
    request_body = ActivityReq,
    responses(
        (status = 200, description = "Generated activity instructions", body = TextActivityRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Missing topic or unknown menu choice", body = ErrorRes),
        (status = 502, description = "Generation service failed", body = ErrorRes)
    )
)]
/// Generate activity instructions with the text model
#[axum::debug_handler]
async fn activity_text(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<ActivityReq>,
) -> ApiResult<Json<TextActivityRes>> {
    let (_, session) = load_session(&state, &id)?;
    let activity = resolve(&session.profile, &req).map_err(error::worksheet)?;
    let generated = state
        .worksheets
        .generate_text_activity(&session.profile.profile(), &activity)
        .await
        .map_err(error::worksheet)?;

    Ok(Json(TextActivityRes {
        activity_type: generated.activity_type,
        text: generated.text,
        profile_complete: session.profile.is_complete(),
        missing: missing_keys(&session.profile),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/activity/image",
    params(("id" = String, Path, description = "Session id")),
    request_body = ActivityReq,
    responses(
        (status = 200, description = "`image/png` worksheet, sent as an attachment"),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Missing topic or unknown menu choice", body = ErrorRes),
        (status = 502, description = "Generation service failed", body = ErrorRes)
    )
)]
/// Generate a printable worksheet image with the image model
#[axum::debug_handler]
async fn activity_image(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<ActivityReq>,
) -> ApiResult<Response> {
    let (_, session) = load_session(&state, &id)?;
    let activity = resolve(&session.profile, &req).map_err(error::worksheet)?;
    let image = state
        .worksheets
        .generate_worksheet_image(&session.profile.profile(), &activity)
        .await
        .map_err(error::worksheet)?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(image.mime_type)),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&image.file_name),
            ),
        ],
        image.bytes,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/activity/options",
    responses(
        (status = 200, description = "Menu and form options", body = ActivityOptionsRes)
    )
)]
/// List activity menus and the allowed values for choice and tag fields
#[axum::debug_handler]
async fn activity_options(State(_state): State<AppState>) -> Json<ActivityOptionsRes> {
    let focuses = ActivitySelector::menu()
        .into_iter()
        .map(|(focus, subtypes)| FocusOptions {
            focus: focus.label().to_owned(),
            subtypes: subtypes.into_iter().map(str::to_owned).collect(),
        })
        .collect();

    let profile_options: BTreeMap<String, Vec<String>> = ProfileField::ALL
        .iter()
        .filter(|field| !field.options().is_empty())
        .map(|field| {
            (
                field.key().to_owned(),
                field.options().iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect();

    Json(ActivityOptionsRes {
        focuses,
        tracing: ActivitySelector::tracing_labels()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        known_activities: KnownActivity::ALL
            .iter()
            .map(|known| known.label().to_owned())
            .collect(),
        profile_options,
    })
}

fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| error::session_not_found(raw))
}

fn load_session(state: &AppState, raw: &str) -> ApiResult<(Uuid, Session)> {
    let id = parse_session_id(raw)?;
    let session = state
        .sessions
        .get(id)
        .ok_or_else(|| error::session_not_found(raw))?;
    Ok((id, session))
}

fn session_value(key: &str, value: Value) -> WorksheetResult<SessionValue> {
    serde_json::from_value(value).map_err(|_| {
        WorksheetError::InvalidInput(format!(
            "{key} must be null, a whole number, a string or a list of strings"
        ))
    })
}

fn json_value(value: SessionValue) -> Value {
    match value {
        SessionValue::Null => Value::Null,
        SessionValue::Integer(n) => Value::from(n),
        SessionValue::Text(s) => Value::String(s),
        SessionValue::List(items) => Value::from(items),
    }
}

fn missing_keys(profile: &ProfileStore) -> Vec<String> {
    profile
        .missing_required()
        .into_iter()
        .map(|field| field.key().to_owned())
        .collect()
}

fn profile_res(id: Uuid, session: &Session) -> ProfileRes {
    ProfileRes {
        session_id: id.to_string(),
        complete: session.profile.is_complete(),
        missing: missing_keys(&session.profile),
        fields: session
            .profile
            .fields()
            .map(|(field, value)| (field.key().to_owned(), json_value(value)))
            .collect(),
        updated_at: session.updated_at.to_rfc3339(),
    }
}

/// Resolves the request's menu selection, falling back to the session's stored focus.
fn resolve(profile: &ProfileStore, req: &ActivityReq) -> WorksheetResult<ActivityType> {
    let focus = match &req.focus {
        Some(value) => session_value("focus", value.clone())?,
        None => profile.get(ProfileField::ActivityFocus),
    };

    let mut request = ActivityRequest::from_session_focus(
        &focus,
        req.subtype.clone().unwrap_or_default(),
        req.custom_topic.clone(),
    )?;
    if let Some(tracing_focus) = &req.tracing_focus {
        request = request.with_tracing_focus(tracing_focus.clone());
    }

    ActivitySelector::resolve(&request)
}

fn content_disposition(file_name: &str) -> HeaderValue {
    if !file_name.contains('"') {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        {
            return value;
        }
    }
    HeaderValue::from_static("attachment; filename=\"worksheet.png\"")
}
