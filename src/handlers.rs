use crate::{
    AppState,
    auth::AuthUser,
    content::{load_document, load_questions, resolve_card_images},
    error::AppError,
    models::{
        Breadcrumb, CardItem, CreateCustomQuestionRequest, CustomQuestion, DocumentResponse,
        QuestionDetail, QuestionPage, RegisterUserRequest, SiteInfo, User, UserProfile,
    },
    table::{QuestionTable, TableQuery},
    titles::{breadcrumbs, difficulty_label, format_minutes, format_title_case},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

/// BreadcrumbQuery
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BreadcrumbQuery {
    /// Any site path, e.g. `/documents/design-patterns/behavioral`.
    pub path: String,
}

/// Minimal view of the auth provider's sign-up response.
#[derive(Deserialize)]
struct AuthProviderSignup {
    id: Uuid,
}

// --- Public Handlers ---

/// get_home
///
/// [Public Route] Site name, description and navigation links.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Site info", body = SiteInfo))
)]
pub async fn get_home(State(state): State<AppState>) -> Json<SiteInfo> {
    Json(state.registry.site().clone())
}

/// get_documents
///
/// [Public Route] Landing cards for the top-level documents.
#[utoipa::path(
    get,
    path = "/documents",
    responses((status = 200, description = "Document cards", body = [CardItem]))
)]
pub async fn get_documents(State(state): State<AppState>) -> Json<Vec<CardItem>> {
    let cards = state.registry.document_cards();
    Json(resolve_card_images(state.storage.as_ref(), cards).await)
}

/// get_document
///
/// [Public Route] Resolves a nested document path such as
/// `/documents/design-patterns/behavioral/command`. The last segment is the
/// document id; an unknown id is a 404.
#[utoipa::path(
    get,
    path = "/documents/{path}",
    params(("path" = String, Path, description = "Slash-separated document path")),
    responses(
        (status = 200, description = "Found", body = DocumentResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DocumentResponse>, AppError> {
    let Path(path) = path?;
    let document = load_document(&state.registry, state.storage.as_ref(), &path).await?;
    Ok(Json(document))
}

/// get_technologies
///
/// [Public Route] Landing cards for the interview question sets.
#[utoipa::path(
    get,
    path = "/interview-questions",
    responses((status = 200, description = "Technology cards", body = [CardItem]))
)]
pub async fn get_technologies(State(state): State<AppState>) -> Json<Vec<CardItem>> {
    let cards = state.registry.technology_cards();
    Json(resolve_card_images(state.storage.as_ref(), cards).await)
}

/// get_questions
///
/// [Public Route] One page of a question set's table. The dataset is sorted
/// by difficulty before numbering; `filter`, `sort` and pagination apply on top.
#[utoipa::path(
    get,
    path = "/interview-questions/{id}",
    params(("id" = String, Path, description = "Question set id"), TableQuery),
    responses(
        (status = 200, description = "Question page", body = QuestionPage),
        (status = 400, description = "Invalid table parameters"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_questions(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<QuestionPage>, AppError> {
    let (Path(id), Query(query)) = (id?, query?);
    let questions = load_questions(&state.registry, state.storage.as_ref(), &id).await?;
    let table = QuestionTable::new(questions);
    let heading = format!("{} Interview Questions", format_title_case(&id));
    let page = table.render(&id, heading, &query, state.config.default_page_size)?;
    Ok(Json(page))
}

/// get_question
///
/// [Public Route] A single question with its full answer, addressed by its
/// 1-based table number.
#[utoipa::path(
    get,
    path = "/interview-questions/{id}/{number}",
    params(
        ("id" = String, Path, description = "Question set id"),
        ("number" = usize, Path, description = "1-based question number")
    ),
    responses(
        (status = 200, description = "Found", body = QuestionDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_question(
    State(state): State<AppState>,
    path: Result<Path<(String, usize)>, PathRejection>,
) -> Result<Json<QuestionDetail>, AppError> {
    let Path((id, number)) = path?;
    let questions = load_questions(&state.registry, state.storage.as_ref(), &id).await?;
    let table = QuestionTable::new(questions);
    let row = table
        .get(number)
        .ok_or_else(|| AppError::not_found(format!("question {} in {}", number, id)))?;

    Ok(Json(QuestionDetail {
        heading: format!("{} Question {}", format_title_case(&id), row.number),
        number: row.number,
        difficulty_label: difficulty_label(row.pair.difficulty),
        estimated_time: format_minutes(row.pair.estimated_time),
        question: row.pair.clone(),
    }))
}

/// get_breadcrumbs
///
/// [Public Route] Breadcrumb trail for an arbitrary path.
#[utoipa::path(
    get,
    path = "/breadcrumbs",
    params(BreadcrumbQuery),
    responses((status = 200, description = "Trail", body = [Breadcrumb]))
)]
pub async fn get_breadcrumbs(
    query: Result<Query<BreadcrumbQuery>, QueryRejection>,
) -> Result<Json<Vec<Breadcrumb>>, AppError> {
    let Query(query) = query?;
    Ok(Json(breadcrumbs(&query.path)))
}

/// register_user
///
/// [Public Route] Proxies sign-up to the external auth provider, then mirrors
/// the new user into `profiles` under the provider's user id.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Registered", body = User),
        (status = 400, description = "Rejected by the auth provider")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(payload) = payload?;
    let (Some(provider_url), Some(provider_key)) = (
        state.config.auth_provider_url.as_deref(),
        state.config.auth_provider_key.as_deref(),
    ) else {
        return Err(AppError::Internal("auth provider is not configured".to_string()));
    };

    let response = reqwest::Client::new()
        .post(format!("{}/auth/v1/signup", provider_url))
        .header("apikey", provider_key)
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("auth provider unreachable: {}", e)))?;

    if !response.status().is_success() {
        tracing::info!("auth provider rejected sign-up: {}", response.status());
        return Err(AppError::BadRequest("sign-up rejected".to_string()));
    }

    let signup = response
        .json::<AuthProviderSignup>()
        .await
        .map_err(|e| AppError::Internal(format!("unexpected auth provider response: {}", e)))?;

    let user = User {
        id: signup.id,
        email: payload.email,
        username: payload.username,
        full_name: payload.full_name,
        image_url: None,
        role: "member".to_string(),
    };

    state
        .repo
        .create_user(user)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("failed to create profile".to_string()))
}

// --- Authenticated Handlers ---

/// get_profile
///
/// [Authenticated Route] The current user's profile. The role is the one the
/// auth gate resolved for this request. Users without an uploaded image get a
/// generated avatar seeded by their id.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_profile(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .repo
        .get_user(id)
        .await
        .ok_or(AppError::Unauthorized)?;
    let custom_question_count = state.repo.count_custom_questions(id).await;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        username: user.username,
        full_name: user.full_name,
        image_url: user.image_url.unwrap_or_else(|| {
            format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", user.id)
        }),
        role,
        custom_question_count,
    }))
}

/// get_custom_questions
///
/// [Authenticated Route] The current user's own questions, newest first.
#[utoipa::path(
    get,
    path = "/profile/questions",
    responses((status = 200, description = "My questions", body = [CustomQuestion]))
)]
pub async fn get_custom_questions(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<CustomQuestion>> {
    Json(state.repo.get_custom_questions(id).await)
}

/// add_custom_question
///
/// [Authenticated Route] Files a new question under one of the registered
/// question sets.
#[utoipa::path(
    post,
    path = "/profile/questions",
    request_body = CreateCustomQuestionRequest,
    responses(
        (status = 201, description = "Created", body = CustomQuestion),
        (status = 400, description = "Invalid question")
    )
)]
pub async fn add_custom_question(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomQuestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomQuestion>), AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(AppError::BadRequest)?;
    if state.registry.find_question_set(&payload.topic).is_none() {
        return Err(AppError::BadRequest(format!("unknown topic: {}", payload.topic)));
    }

    let (topic, question) = payload.into_qa_pair();
    let created = state
        .repo
        .add_custom_question(id, topic, question)
        .await
        .ok_or_else(|| AppError::Internal("failed to store custom question".to_string()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// delete_custom_question
///
/// [Authenticated Route] Owner-only delete. Someone else's question is
/// reported as 404, same as a missing one.
#[utoipa::path(
    delete,
    path = "/profile/questions/{id}",
    params(("id" = Uuid, Path, description = "Custom question id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_custom_question(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    if state.repo.delete_custom_question(id, user_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("custom question {}", id)))
    }
}

/// not_found
///
/// Router fallback for any unmatched route.
pub async fn not_found() -> AppError {
    AppError::not_found("no route")
}
