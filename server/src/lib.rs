use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use search_core::corpus::build_index;
use search_core::{DocId, NewDocument, QueryOptions, RawDocument, SharedIndex, UnseenTerms};
use serde::{Deserialize, Serialize};
use quick_xml::escape::escape;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

/// Characters of abstract kept before and after the first query match.
const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub strict: bool,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct BatchResponse {
    pub ids: Vec<DocId>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub num_terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: SharedIndex,
    pub admin_token: Option<String>,
}

/// Read the corpus at `corpus` (file or directory) and index it.
pub fn load_index(corpus: &std::path::Path, stop_words: Option<&std::path::Path>) -> Result<SharedIndex> {
    let index = build_index(corpus, stop_words).with_context(|| format!("build index from {}", corpus.display()))?;
    Ok(SharedIndex::new(index))
}

/// Router with the admin token taken from `ADMIN_TOKEN`.
pub fn build_app(index: SharedIndex) -> Router {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    router(AppState { index, admin_token })
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/batch", post(index_batch))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let options = QueryOptions {
        unseen_terms: if params.strict { UnseenTerms::Strict } else { UnseenTerms::Skip },
        limit: Some(k),
    };
    let (total_hits, hits) = state.index.search_counted(&params.q, &options);

    // Raw query words are highlighted in the abstract, not their stems.
    let raw_terms: Vec<&str> = params.q.split_whitespace().collect();
    let results = hits
        .into_iter()
        .map(|hit| {
            let snippet = snippet_from_text(&hit.document.abstract_text, &raw_terms);
            SearchHit {
                doc_id: hit.document.id,
                score: hit.score,
                title: hit.document.title,
                url: hit.document.url,
                snippet,
            }
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, "search served");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> (StatusCode, Json<serde_json::Value>) {
    match state.index.get(doc_id) {
        Some(doc) => (StatusCode::OK, Json(serde_json::json!({
            "doc_id": doc.id,
            "title": doc.title,
            "url": doc.url,
            "abstract": doc.abstract_text,
        }))),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))),
    }
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (num_docs, num_terms) = state.index.read(|index| (index.len(), index.term_count()));
    Json(StatsResponse { num_docs, num_terms })
}

fn snippet_from_text(text: &str, raw_terms: &[&str]) -> Option<String> {
    if text.is_empty() { return None; }
    let pattern = terms_pattern(raw_terms);
    // Window around the first match (case-insensitive) of any raw term.
    let snippet: String = match pattern.as_ref().and_then(|p| p.find(text)) {
        Some(m) => {
            let match_char = text[..m.start()].chars().count();
            let start_char = match_char.saturating_sub(SNIPPET_BEFORE);
            text.chars()
                .skip(start_char)
                .take(match_char - start_char + SNIPPET_AFTER)
                .collect()
        }
        None => text.chars().take(SNIPPET_AFTER).collect(),
    };
    Some(highlight_terms(&snippet, pattern.as_ref()))
}

/// One case-insensitive alternation over every non-empty term, longest first.
fn terms_pattern(terms: &[&str]) -> Option<regex::Regex> {
    let mut alternatives: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() { return None; }
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()));
    regex::RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// HTML-escape `snippet` and wrap every match in `<em>`, in a single pass.
fn highlight_terms(snippet: &str, pattern: Option<&regex::Regex>) -> String {
    let Some(pattern) = pattern else {
        return escape(snippet).into_owned();
    };
    let mut out = String::with_capacity(snippet.len() + 16);
    let mut last = 0;
    for m in pattern.find_iter(snippet) {
        out.push_str(&escape(&snippet[last..m.start()]));
        out.push_str("<em>");
        out.push_str(&escape(m.as_str()));
        out.push_str("</em>");
        last = m.end();
    }
    out.push_str(&escape(&snippet[last..]));
    out
}

// --- Admin endpoints ---
async fn index_batch(State(state): State<AppState>, headers: HeaderMap, Json(docs): Json<Vec<RawDocument>>) -> Result<Json<BatchResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    // Validate the whole batch before any of it becomes visible.
    let docs = docs
        .into_iter()
        .map(NewDocument::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let ids = state.index.index_batch(docs);
    tracing::info!(added = ids.len(), "indexed batch over http");
    Ok(Json(BatchResponse { ids }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
