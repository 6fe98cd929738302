use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use common::{Category, Error, TradeResult};
use market::levels;

use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/markets", get(get_markets))
        .route("/api/markets/:symbol", get(get_market_detail))
        .route("/api/categories", get(get_categories))
        .route("/api/strategies", get(get_strategies))
        .route("/api/trades/active", get(get_active_trades))
        .route("/api/trades/closed", get(get_closed_trades))
        .route("/api/trades/:id/close", post(close_trade))
}

type ApiError = (StatusCode, Json<Value>);

fn internal(e: Error) -> ApiError {
    warn!(error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": e.to_string()})),
    )
}

fn not_found(message: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"error": message})))
}

// ─── Markets ──────────────────────────────────────────────────────────────────

async fn get_markets(State(state): State<AppState>) -> Json<Value> {
    match state.cache.latest().await {
        Some(snapshot) => Json(json!({
            "markets": &snapshot.records,
            "count": snapshot.records.len(),
            "taken_at": snapshot.taken_at,
        })),
        None => Json(json!({ "markets": [], "count": 0, "taken_at": null })),
    }
}

async fn get_market_detail(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let symbol = symbol.to_uppercase();
    let snapshot = state
        .cache
        .latest()
        .await
        .ok_or_else(|| not_found("no market snapshot yet"))?;
    let record = snapshot
        .records
        .iter()
        .find(|r| r.symbol == symbol)
        .ok_or_else(|| not_found("unknown symbol"))?;

    // Open interest is an on-demand single-symbol fetch, never part of the
    // periodic snapshot; a failed fetch degrades to null.
    let open_interest = match state.source.open_interest(&symbol).await {
        Ok(oi) => Some(oi),
        Err(e) => {
            warn!(%symbol, error = %e, "Open interest fetch failed");
            None
        }
    };

    Ok(Json(json!({
        "market": record,
        "entry_zone": levels::entry_zone(record.price),
        "bias": levels::market_bias(record.change_24h),
        "long_short_ratio": levels::long_short_ratio(record.funding_rate),
        "open_interest": open_interest,
    })))
}

// ─── Categories ───────────────────────────────────────────────────────────────

async fn get_categories(State(state): State<AppState>) -> Json<Value> {
    let records = state
        .cache
        .latest()
        .await
        .map(|s| s.records.clone())
        .unwrap_or_default();

    let categories: Vec<Value> = Category::ALL
        .iter()
        .map(|category| {
            let members: Vec<&common::MarketRecord> =
                records.iter().filter(|r| r.category == *category).collect();
            let avg_change = if members.is_empty() {
                0.0
            } else {
                members.iter().map(|r| r.change_24h).sum::<f64>() / members.len() as f64
            };
            let top = members
                .iter()
                .max_by(|a, b| a.momentum.total_cmp(&b.momentum))
                .map(|r| r.symbol.clone());
            json!({
                "category": category,
                "name": category.display_name(),
                "count": members.len(),
                "avg_change_24h": avg_change,
                "total_volume": members.iter().map(|r| r.volume).sum::<f64>(),
                "top_momentum": top,
            })
        })
        .collect();

    Json(json!({ "categories": categories }))
}

// ─── Strategies ───────────────────────────────────────────────────────────────

async fn get_strategies(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let modules = state.manager.module_views().await.map_err(internal)?;
    Ok(Json(json!({ "modules": modules })))
}

// ─── Trades ───────────────────────────────────────────────────────────────────

async fn get_active_trades(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let trades = state.manager.enriched_trades().await.map_err(internal)?;
    Ok(Json(json!({ "trades": &trades, "count": trades.len() })))
}

#[derive(Deserialize)]
struct ClosedQuery {
    module: Option<String>,
    result: Option<String>,
}

async fn get_closed_trades(
    State(state): State<AppState>,
    Query(q): Query<ClosedQuery>,
) -> Result<Json<Value>, ApiError> {
    let result = match q.result.as_deref() {
        Some(raw) => Some(TradeResult::parse(raw).ok_or((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "result must be WIN or LOSS"})),
        ))?),
        None => None,
    };

    let mut trades = match &q.module {
        Some(module) => state
            .store
            .closed_trades_by_module(module)
            .await
            .map_err(internal)?,
        None => match result {
            Some(r) => state
                .store
                .closed_trades_by_result(r)
                .await
                .map_err(internal)?,
            None => state.store.closed_trades().await.map_err(internal)?,
        },
    };
    // Module + result combine by narrowing the module listing.
    if q.module.is_some() {
        if let Some(r) = result {
            trades.retain(|t| t.result == r);
        }
    }

    Ok(Json(json!({ "trades": &trades, "count": trades.len() })))
}

async fn close_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    match state.manager.close_trade(trade_id).await {
        Ok(final_pnl) => Ok(Json(json!({
            "trade_id": trade_id,
            "final_pnl": final_pnl,
            "result": TradeResult::from_pnl(final_pnl),
        }))),
        Err(Error::TradeNotFound(_)) => Err(not_found("no active trade with that id")),
        Err(e) => Err(internal(e)),
    }
}
