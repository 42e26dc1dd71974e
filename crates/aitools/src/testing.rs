//! In-process catalog backend for tests.
//!
//! Serves the demo catalog over HTTP on an ephemeral port, with enough of the
//! auth and moderation rules to exercise the client end to end. Every request
//! is recorded so tests can assert on what went over the wire.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use aitools_core::demo::{demo_reviews, demo_tools, filter_tools};
use aitools_core::pagination::paginate;
use aitools_core::types::{
    AdminReview, ModerationDecision, PricingModel, Review, ReviewCreate, ReviewStatus, Role, Tool,
    ToolCreate, ToolFilters, ToolUpdate, User,
};
use axum::body::Body;
use axum::extract::{Path, RawQuery, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiClient;

pub const PASSWORD: &str = "password";
pub const USER_EMAIL: &str = "user@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug)]
struct Backend {
    tools: Vec<Tool>,
    reviews: Vec<Review>,
    users: Vec<User>,
    requests: Vec<RecordedRequest>,
    outage: bool,
    next_id: u64,
}

impl Backend {
    fn seeded() -> Self {
        let user = |id: &str, name: &str, email: &str, role| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        };

        Self {
            tools: demo_tools().to_vec(),
            reviews: demo_reviews().to_vec(),
            users: vec![
                user("u1", "Test User", USER_EMAIL, Role::User),
                user("admin", "Admin", ADMIN_EMAIL, Role::Admin),
            ],
            requests: Vec::new(),
            outage: false,
            next_id: 100,
        }
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn caller(&self, headers: &HeaderMap) -> Option<User> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer token-")?;

        self.users.iter().find(|u| u.id == token).cloned()
    }

    fn recompute_rating(&mut self, tool_id: &str) {
        let ratings: Vec<f64> = self
            .reviews
            .iter()
            .filter(|r| r.tool_id == tool_id && r.status == ReviewStatus::Approved)
            .map(|r| f64::from(r.rating))
            .collect();

        if let Some(tool) = self.tools.iter_mut().find(|t| t.id == tool_id) {
            tool.review_count = ratings.len() as u64;
            tool.avg_rating = if ratings.is_empty() {
                0.0
            } else {
                ratings.iter().sum::<f64>() / ratings.len() as f64
            };
        }
    }
}

type Shared = Arc<Mutex<Backend>>;
type Failure = (StatusCode, Json<Value>);

fn fail(status: StatusCode, detail: &str) -> Failure {
    (status, Json(json!({ "detail": detail })))
}

fn lock(state: &Shared) -> MutexGuard<'_, Backend> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn require_user(backend: &Backend, headers: &HeaderMap) -> Result<User, Failure> {
    backend
        .caller(headers)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authenticated"))
}

fn require_admin(backend: &Backend, headers: &HeaderMap) -> Result<User, Failure> {
    let user = require_user(backend, headers)?;
    if !user.is_admin() {
        return Err(fail(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(user)
}

/// Decoded `key=value` pairs, keeping repeats in order
fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    let decode = |s: &str| {
        let s = s.replace('+', " ");
        urlencoding::decode(&s)
            .map(|d| d.into_owned())
            .unwrap_or(s)
    };

    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn query_usize(pairs: &[(String, String)], key: &str, default: usize) -> usize {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(default)
}

fn query_str<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn tool_filters(raw: Option<&str>) -> ToolFilters {
    let pairs = query_pairs(raw);
    let defaults = ToolFilters::default();

    ToolFilters {
        category: query_str(&pairs, "category").map(str::to_string),
        pricing_model: pairs
            .iter()
            .filter(|(k, _)| k == "pricingModel")
            .filter_map(|(_, v)| v.parse::<PricingModel>().ok())
            .collect(),
        min_rating: query_str(&pairs, "minRating").and_then(|v| v.parse().ok()),
        search: query_str(&pairs, "search").map(str::to_string),
        page: query_usize(&pairs, "page", defaults.page),
        page_size: query_usize(&pairs, "pageSize", defaults.page_size),
    }
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let outage = {
        let mut backend = lock(&state);
        backend.requests.push(RecordedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            authorization: parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned()),
        });
        backend.outage
    };

    if outage {
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn list_tools(State(state): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    let filters = tool_filters(query.as_deref());
    let page = filter_tools(&lock(&state).tools, &filters);
    Json(json!(page))
}

async fn get_tool(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, Failure> {
    let tool = lock(&state).tools.iter().find(|t| t.id == id).cloned();
    tool.map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Tool not found"))
}

async fn tool_reviews(
    State(state): State<Shared>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    let pairs = query_pairs(query.as_deref());
    let approved: Vec<Review> = lock(&state)
        .reviews
        .iter()
        .filter(|r| r.tool_id == id && r.status == ReviewStatus::Approved)
        .cloned()
        .collect();

    Json(json!(paginate(
        &approved,
        query_usize(&pairs, "page", 1),
        query_usize(&pairs, "pageSize", 10),
    )))
}

async fn create_review(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<ReviewCreate>,
) -> Result<Json<Review>, Failure> {
    let mut backend = lock(&state);
    let user = require_user(&backend, &headers)?;

    if !backend.tools.iter().any(|t| t.id == payload.tool_id) {
        return Err(fail(StatusCode::NOT_FOUND, "Tool not found"));
    }

    let now = Utc::now();
    let review = Review {
        id: backend.next_id(),
        tool_id: payload.tool_id,
        user_id: user.id,
        user_name: Some(user.name),
        rating: payload.rating,
        comment: payload.comment,
        status: ReviewStatus::Pending,
        moderation_note: None,
        created_at: now,
        updated_at: now,
    };
    backend.reviews.push(review.clone());

    Ok(Json(review))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(default)]
    name: Option<String>,
    email: String,
    password: String,
}

fn token_response(user: &User) -> Json<Value> {
    Json(json!({ "access_token": format!("token-{}", user.id), "user": user }))
}

async fn login(
    State(state): State<Shared>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, Failure> {
    let user = lock(&state)
        .users
        .iter()
        .find(|u| u.email == credentials.email && credentials.password == PASSWORD)
        .cloned();

    user.as_ref()
        .map(token_response)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid email or password"))
}

async fn signup(
    State(state): State<Shared>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, Failure> {
    let mut backend = lock(&state);
    if backend.users.iter().any(|u| u.email == credentials.email) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }

    let user = User {
        id: format!("u{}", backend.next_id()),
        name: credentials.name.unwrap_or_default(),
        email: credentials.email,
        role: Role::User,
    };
    backend.users.push(user.clone());

    Ok(token_response(&user))
}

async fn admin_list_tools(
    State(state): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, Failure> {
    let backend = lock(&state);
    require_admin(&backend, &headers)?;

    let pairs = query_pairs(query.as_deref());
    Ok(Json(json!(paginate(
        &backend.tools,
        query_usize(&pairs, "page", 1),
        query_usize(&pairs, "pageSize", 20),
    ))))
}

async fn admin_create_tool(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<ToolCreate>,
) -> Result<Json<Tool>, Failure> {
    let mut backend = lock(&state);
    require_admin(&backend, &headers)?;

    let now = Utc::now();
    let tool = Tool {
        id: backend.next_id(),
        name: payload.name,
        short_description: payload.short_description,
        category: payload.category,
        pricing_display: payload.pricing_display,
        pricing_model: payload.pricing_model,
        official_url: payload.official_url,
        source_url: payload.source_url,
        released_ago: payload.released_ago.unwrap_or_else(|| "Just now".to_string()),
        views: None,
        votes: None,
        rating: None,
        logo_url: payload.logo_url,
        created_at: now,
        updated_at: now,
        avg_rating: 0.0,
        review_count: 0,
    };
    backend.tools.push(tool.clone());

    Ok(Json(tool))
}

async fn admin_update_tool(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<ToolUpdate>,
) -> Result<Json<Tool>, Failure> {
    let mut backend = lock(&state);
    require_admin(&backend, &headers)?;

    let tool = backend
        .tools
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Tool not found"))?;

    let ToolUpdate {
        name,
        short_description,
        category,
        pricing_display,
        pricing_model,
        official_url,
        source_url,
        released_ago,
        logo_url,
    } = update;

    if let Some(v) = name {
        tool.name = v;
    }
    if let Some(v) = short_description {
        tool.short_description = v;
    }
    if let Some(v) = category {
        tool.category = v;
    }
    if let Some(v) = pricing_display {
        tool.pricing_display = v;
    }
    if let Some(v) = pricing_model {
        tool.pricing_model = v;
    }
    if official_url.is_some() {
        tool.official_url = official_url;
    }
    if let Some(v) = source_url {
        tool.source_url = v;
    }
    if let Some(v) = released_ago {
        tool.released_ago = v;
    }
    if logo_url.is_some() {
        tool.logo_url = logo_url;
    }
    tool.updated_at = Utc::now();

    Ok(Json(tool.clone()))
}

async fn admin_delete_tool(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut backend = lock(&state);
    require_admin(&backend, &headers)?;

    let before = backend.tools.len();
    backend.tools.retain(|t| t.id != id);
    if backend.tools.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Tool not found"));
    }
    backend.reviews.retain(|r| r.tool_id != id);

    Ok(StatusCode::NO_CONTENT)
}

async fn admin_list_reviews(
    State(state): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, Failure> {
    let backend = lock(&state);
    require_admin(&backend, &headers)?;

    let pairs = query_pairs(query.as_deref());
    let status = query_str(&pairs, "status").and_then(|s| s.parse::<ReviewStatus>().ok());

    let queue: Vec<AdminReview> = backend
        .reviews
        .iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .map(|r| AdminReview {
            review: r.clone(),
            tool_name: backend
                .tools
                .iter()
                .find(|t| t.id == r.tool_id)
                .map(|t| t.name.clone()),
        })
        .collect();

    Ok(Json(json!(paginate(
        &queue,
        query_usize(&pairs, "page", 1),
        query_usize(&pairs, "pageSize", 20),
    ))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Moderation {
    status: ModerationDecision,
    #[serde(default)]
    moderation_note: Option<String>,
}

async fn admin_moderate_review(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(moderation): Json<Moderation>,
) -> Result<Json<Review>, Failure> {
    let mut backend = lock(&state);
    require_admin(&backend, &headers)?;

    let position = backend
        .reviews
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Review not found"))?;

    let moderated = backend.reviews[position]
        .clone()
        .moderate(moderation.status, moderation.moderation_note, Utc::now())
        .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;

    backend.reviews[position] = moderated.clone();
    backend.recompute_rating(&moderated.tool_id);

    Ok(Json(moderated))
}

/// A running mock backend. The server task stops with the test runtime.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend::seeded()));

        let router = Router::new()
            .route("/tools", get(list_tools))
            .route("/tools/{id}", get(get_tool))
            .route("/tools/{id}/reviews", get(tool_reviews))
            .route("/reviews", post(create_review))
            .route("/auth/login", post(login))
            .route("/auth/signup", post(signup))
            .route("/admin/tools", get(admin_list_tools).post(admin_create_tool))
            .route(
                "/admin/tools/{id}",
                put(admin_update_tool).delete(admin_delete_tool),
            )
            .route("/admin/reviews", get(admin_list_reviews))
            .route("/admin/reviews/{id}", patch(admin_moderate_review))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Anonymous client pointed at this backend
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.url()).expect("api client")
    }

    /// Client already holding an admin token
    pub async fn admin_client(&self) -> ApiClient {
        let client = self.client();
        let auth = client
            .login(ADMIN_EMAIL, PASSWORD)
            .await
            .expect("admin login");
        client.set_token(Some(auth.token));
        client
    }

    /// Answer every request with a non-JSON 503 while set
    pub fn set_outage(&self, outage: bool) {
        lock(&self.state).outage = outage;
    }

    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        lock(&self.state)
            .requests
            .last()
            .cloned()
            .unwrap_or_default()
    }

    /// Insert a pending review by the seeded user, returning its id
    pub fn seed_pending_review(&self, tool_id: &str) -> String {
        let mut backend = lock(&self.state);
        let now = Utc::now();
        let id = backend.next_id();

        backend.reviews.push(Review {
            id: id.clone(),
            tool_id: tool_id.to_string(),
            user_id: "u1".to_string(),
            user_name: Some("Test User".to_string()),
            rating: 5,
            comment: "Pending review".to_string(),
            status: ReviewStatus::Pending,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        });

        id
    }
}

/// Base URL where nothing is listening
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
