//! HTTP routes over the navigation engine

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use campusnav_core::{
    EdgeRecord, NavigationSession, NodeRecord, Position, Route, SessionSnapshot,
    model::Category,
    loading::rebuild_graph,
    query::{NodeSummary, destinations_from},
    routing::{RouteStep, RoutingOptions, route_with},
    source::LocationError,
    tracking::{HeadingReading, PositionSample},
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ApiError,
    state::SharedState,
    worker::{Command, SessionHandle},
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/graph", get(get_graph).post(replace_graph))
        .route("/destinations", get(list_destinations))
        .route("/nodes", get(list_nodes))
        .route("/nodes/{id}/nearby", get(nearby_nodes))
        .route("/route", post(compute_route))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(stop_session))
        .route("/sessions/{id}/position", post(submit_position))
        .route("/sessions/{id}/heading", post(submit_heading))
        .route("/sessions/{id}/location-error", post(report_location_error))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphRecords {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Serialize)]
struct GraphSummary {
    generation: u64,
    nodes: usize,
    edges: usize,
    components: usize,
}

async fn get_graph(State(state): State<SharedState>) -> Json<GraphRecords> {
    let (nodes, edges) = state.graph().records();
    Json(GraphRecords { nodes, edges })
}

async fn replace_graph(
    State(state): State<SharedState>,
    Json(records): Json<GraphRecords>,
) -> Result<Json<GraphSummary>, ApiError> {
    let current = state.graph();
    let graph = tokio::task::spawn_blocking(move || {
        rebuild_graph(&current, &records.nodes, &records.edges)
    })
    .await
    .map_err(ApiError::internal)??;

    let summary = GraphSummary {
        generation: graph.generation(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        components: graph.component_count(),
    };
    state.replace_graph(graph);
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
struct PositionQuery {
    lat: Option<f64>,
    lng: Option<f64>,
}

async fn list_destinations(
    State(state): State<SharedState>,
    Query(query): Query<PositionQuery>,
) -> Result<Json<Vec<NodeSummary>>, ApiError> {
    let graph = state.graph();
    match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            let options = state.navigation.routing.clone();
            let catalogue = tokio::task::spawn_blocking(move || {
                destinations_from(&graph, &Position::outdoor(lat, lng), &options)
            })
            .await
            .map_err(ApiError::internal)??;
            Ok(Json(catalogue))
        }
        (None, None) => Ok(Json(
            graph
                .destinations()
                .map(|node| NodeSummary::new(node, None))
                .collect(),
        )),
        _ => Err(ApiError::bad_request("lat and lng must be given together")),
    }
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    category: Option<Category>,
}

async fn list_nodes(
    State(state): State<SharedState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<NodeSummary>> {
    let graph = state.graph();
    let nodes = match query.category {
        Some(category) => graph
            .nodes_by_category(category)
            .map(|node| NodeSummary::new(node, None))
            .collect(),
        None => graph.nodes().map(|node| NodeSummary::new(node, None)).collect(),
    };
    Json(nodes)
}

#[derive(Debug, Deserialize)]
struct RadiusQuery {
    #[serde(default = "default_radius")]
    radius: f64,
}

fn default_radius() -> f64 {
    50.0
}

async fn nearby_nodes(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<RadiusQuery>,
) -> Result<Json<Vec<NodeSummary>>, ApiError> {
    if !(query.radius.is_finite() && query.radius >= 0.0) {
        return Err(ApiError::bad_request("radius must be a non-negative number"));
    }
    let graph = state.graph();
    let nearby = graph
        .nodes_within(&id, query.radius)?
        .into_iter()
        .map(|(node, distance)| NodeSummary::new(node, Some(distance)))
        .collect();
    Ok(Json(nearby))
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    from: Position,
    destination: String,
    #[serde(default)]
    options: Option<RoutingOptions>,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    route: Route,
    steps: Vec<RouteStep>,
    geojson: FeatureCollection,
}

async fn compute_route(
    State(state): State<SharedState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let options = request
        .options
        .unwrap_or_else(|| state.navigation.routing.clone());
    options.validate()?;
    let graph = state.graph();

    let response = tokio::task::spawn_blocking(move || {
        let route = route_with(&graph, &request.from, &request.destination, &options)?;
        let geojson = route.to_geojson(&graph)?;
        Ok::<_, campusnav_core::Error>(RouteResponse {
            steps: route.instructions(),
            route,
            geojson,
        })
    })
    .await
    .map_err(ApiError::internal)??;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct CreateSession {
    destination: String,
    #[serde(default)]
    position: Option<PositionSample>,
}

#[derive(Debug, Serialize)]
struct SessionCreated {
    id: u64,
    snapshot: Arc<SessionSnapshot>,
}

/// Starts a session; navigation begins with the first position fix
async fn create_session(
    State(state): State<SharedState>,
    Json(request): Json<CreateSession>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let mut session = NavigationSession::new(state.graph(), state.navigation.clone());
    session.select_destination(&request.destination)?;
    if let Some(sample) = request.position {
        session.submit_position(sample);
        session.start()?;
    }

    let snapshot = session.snapshot();
    let (id, _) = state.add_session(session);
    info!(session = id, "Session created for {}", request.destination);
    Ok((StatusCode::CREATED, Json(SessionCreated { id, snapshot })))
}

fn find_session(state: &SharedState, id: u64) -> Result<SessionHandle, ApiError> {
    state.session(id).ok_or_else(|| ApiError::session_not_found(id))
}

async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Arc<SessionSnapshot>>, ApiError> {
    Ok(Json(find_session(&state, id)?.snapshot()))
}

/// Queues a sample and answers with the snapshot current at that moment
async fn submit_position(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(sample): Json<PositionSample>,
) -> Result<(StatusCode, Json<Arc<SessionSnapshot>>), ApiError> {
    let handle = find_session(&state, id)?;
    if !handle.submit_position(sample) {
        return Err(ApiError::session_not_found(id));
    }
    Ok((StatusCode::ACCEPTED, Json(handle.snapshot())))
}

async fn submit_heading(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(reading): Json<HeadingReading>,
) -> Result<StatusCode, ApiError> {
    send_command(&state, id, Command::Heading(reading))
}

async fn report_location_error(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(error): Json<LocationError>,
) -> Result<StatusCode, ApiError> {
    send_command(&state, id, Command::LocationError(error))
}

/// Stops a session; stopping one that already ended is not an error
async fn stop_session(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    match state.session(id) {
        Some(handle) => {
            if !handle.send(Command::Stop) {
                debug!(session = id, "Session ended before stop");
            }
        }
        None if state.was_issued(id) => debug!(session = id, "Session already retired"),
        None => return Err(ApiError::session_not_found(id)),
    }
    Ok(StatusCode::NO_CONTENT)
}

fn send_command(state: &SharedState, id: u64, command: Command) -> Result<StatusCode, ApiError> {
    if find_session(state, id)?.send(command) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(ApiError::session_not_found(id))
    }
}
