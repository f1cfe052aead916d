//! API request handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use codesift_core::{ContentQuery, Match, OpenRequest, SearchStats, TypeaheadQuery};
use codesift_search::{SearchError, SearchPipeline, TwoPhaseMatcher};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::{AppState, ReindexSummary};

/// Content search results
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<Match>,
    pub stats: SearchStats,
}

/// Typeahead results, best first
#[derive(Debug, Serialize)]
pub struct TypeaheadResponse {
    pub paths: Vec<String>,
    pub total_matches: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.snapshot().load();
    Json(serde_json::json!({
        "status": "ok",
        "server": "codesift",
        "version": env!("CARGO_PKG_VERSION"),
        "files": snapshot.index().files().len(),
        "built_at": snapshot.index().built_at().to_rfc3339(),
    }))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    query.validate()?;

    let worker = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let snapshot = worker.snapshot().load();
        SearchPipeline::new(snapshot.index()).run(&query)
    })
    .await??;

    let matches = match &state.config().strip_prefix {
        Some(prefix) => outcome
            .matches
            .into_iter()
            .map(|m| m.strip_path_prefix(prefix))
            .collect(),
        None => outcome.matches,
    };
    Ok(Json(SearchResponse {
        matches,
        stats: outcome.stats,
    }))
}

pub async fn typeahead(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TypeaheadQuery>,
) -> Result<Json<TypeaheadResponse>, ApiError> {
    let response = tokio::task::spawn_blocking(move || -> Result<_, SearchError> {
        let snapshot = state.snapshot().load();
        let found = TwoPhaseMatcher::new(snapshot.corpus()).typeahead(&query)?;
        let paths = found
            .candidates
            .iter()
            .map(|c| c.relative_path().to_string())
            .collect();
        Ok(TypeaheadResponse {
            paths,
            total_matches: found.total_matches,
        })
    })
    .await??;

    Ok(Json(response))
}

/// Open an indexed file in the configured editor
pub async fn open(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request.validate()?;
    if state.config().editor.is_none() {
        return Err(ApiError::NotImplemented("no editor configured".to_string()));
    }

    let path = state
        .resolve_indexed_path(&request.path)
        .ok_or_else(|| ApiError::NotFound(format!("not indexed: {}", request.path.display())))?;
    let argv = state
        .config()
        .editor_command(&path, request.line)
        .unwrap_or_default();
    let Some((program, args)) = argv.split_first() else {
        return Err(ApiError::NotImplemented("editor command is empty".to_string()));
    };

    tracing::info!("Opening {}:{} with {}", path.display(), request.line, program);
    tokio::process::Command::new(program)
        .args(args)
        .spawn()
        .map_err(|e| ApiError::Internal(format!("failed to start {}: {}", program, e)))?;

    Ok(Json(serde_json::json!({
        "path": path,
        "line": request.line,
    })))
}

/// Rebuild the index and swap it in; concurrent requests queue up
pub async fn reindex(State(state): State<Arc<AppState>>) -> Result<Json<ReindexSummary>, ApiError> {
    let _guard = state.reindex_lock().lock().await;

    let worker = state.clone();
    let summary = tokio::task::spawn_blocking(move || worker.reindex()).await??;
    tracing::info!(
        "Reindexed {} files ({} trigrams)",
        summary.files,
        summary.trigrams
    );
    Ok(Json(summary))
}
