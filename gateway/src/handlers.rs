//! HTTP handlers for the gateway

use crate::error::GatewayError;
use crate::registry::{NodeRecord, NodeRegistry};
use crate::render::{node_table_scene, report_scene, FontFace, ReportStyle, Scene, TableStyle};
use crate::upstream::Backend;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use protocol::{markup, NodeSummary, ProbeKind};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub struct GatewayState<B> {
    pub registry: NodeRegistry,
    pub backend: B,
    pub report_face: FontFace,
    pub table_face: FontFace,
    pub report_style: ReportStyle,
    pub table_style: TableStyle,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeQuery {
    pub address: Option<String>,
    pub node: Option<String>,
}

impl ProbeQuery {
    /// Both parameters, trimmed; either one missing or blank is an error
    fn params(&self) -> Result<(&str, &str), GatewayError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        }

        match (present(&self.address), present(&self.node)) {
            (Some(address), Some(node)) => Ok((address, node)),
            _ => Err(GatewayError::MissingParameter),
        }
    }
}

pub fn router<B: Backend>(state: Arc<GatewayState<B>>) -> Router {
    let mut router = Router::new()
        .route("/nodes", get(list_nodes::<B>))
        .route("/nodes_image", get(nodes_image::<B>));

    for kind in ProbeKind::ALL {
        router = router.route(
            kind.path(),
            get(
                move |State(state): State<Arc<GatewayState<B>>>, Query(query): Query<ProbeQuery>| {
                    probe_image(state, kind, query)
                },
            ),
        );
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Handle `GET /nodes`
pub async fn list_nodes<B: Backend>(State(state): State<Arc<GatewayState<B>>>) -> Json<Vec<NodeSummary>> {
    Json(state.registry.summaries())
}

/// Handle `GET /nodes_image`
pub async fn nodes_image<B: Backend>(
    State(state): State<Arc<GatewayState<B>>>,
) -> Result<Response, GatewayError> {
    let scene = node_table_scene(&state.registry.summaries(), &state.table_face, &state.table_style);
    let png = render(state.table_face, scene).await?;
    Ok(png_response(png))
}

/// Handle `GET /ping`, `/curl_ping_test` and `/traceroute` with `address` and `node`
pub async fn probe_image<B: Backend>(
    state: Arc<GatewayState<B>>,
    kind: ProbeKind,
    query: ProbeQuery,
) -> Result<Response, GatewayError> {
    let (node, text) = fetch_report(&state, kind, &query).await?;
    let scene = report_scene(&node.header(), &text, &state.report_face, &state.report_style);
    let png = render(state.report_face, scene).await?;
    Ok(png_response(png))
}

/// Resolve the node and fetch the report text its agent produces.
///
/// Parameters are checked and the node looked up before the backend is
/// contacted. Traceroute output comes back with its markup removed.
pub async fn fetch_report<'a, B: Backend>(
    state: &'a GatewayState<B>,
    kind: ProbeKind,
    query: &ProbeQuery,
) -> Result<(&'a NodeRecord, String), GatewayError> {
    let (address, node_name) = query.params()?;
    let node = state
        .registry
        .lookup(node_name)
        .ok_or_else(|| GatewayError::NodeNotFound(node_name.to_string()))?;

    info!("{} probe of {} via node {}", kind, address, node.name);
    let body = state
        .backend
        .fetch(node, kind, address)
        .await
        .map_err(GatewayError::Upstream)?;
    debug!("Node {} returned {} bytes", node.name, body.len());

    let text = if kind.strips_markup() {
        markup::strip(&body)
    } else {
        body
    };
    Ok((node, text))
}

/// Rasterise on the blocking pool
async fn render(face: FontFace, scene: Scene) -> Result<Vec<u8>, GatewayError> {
    tokio::task::spawn_blocking(move || face.render_png(&scene))
        .await
        .map_err(|err| GatewayError::Render(err.into()))?
        .map_err(GatewayError::Render)
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}
