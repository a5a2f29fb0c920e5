use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::models::{Destination, SortKey, TravelList};
use crate::service::{LocationPage, PageRequest, TravelService};
use crate::{Result, WanderlistError};

pub mod requests;

use requests::{
    AddDestinationBody, CityParams, FilterParams, ListParams, ListsParams, NameBody,
    RemoveDestinationBody,
};

pub fn router() -> Router<TravelService> {
    Router::new()
        .route("/locations", get(get_locations))
        .route("/filtered-locations", get(get_filtered_locations))
        .route("/countries", get(get_countries))
        .route("/cities", get(get_cities))
        .route("/lists", get(get_lists).post(create_list))
        .route(
            "/lists/{id}",
            get(get_list).put(rename_list).delete(delete_list),
        )
        .route(
            "/lists/{id}/destinations",
            post(add_destination).delete(remove_destination),
        )
        .route("/dataset/reload", post(reload_dataset))
}

/// Ids are positive, so anything unparseable can never name a list
fn parse_list_id(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| WanderlistError::ListNotFound { id: 0 })
}

/// Unwrap a JSON body, turning a malformed or missing body into a validation error
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>, missing: &str) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        WanderlistError::validation(missing)
    })
}

/// Paging input is untrusted; a query string that cannot be read at all means "use the defaults"
fn lenient_query<T: Default>(params: std::result::Result<Query<T>, QueryRejection>) -> T {
    params.map(|Query(params)| params).unwrap_or_else(|rejection| {
        tracing::debug!("Ignoring query string: {}", rejection.body_text());
        T::default()
    })
}

fn strict_query<T>(params: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    params.map(|Query(params)| params).map_err(|rejection| {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        WanderlistError::validation("Invalid query string")
    })
}

fn required_name(body: NameBody) -> Result<String> {
    body.name
        .ok_or_else(|| WanderlistError::validation("List name is required"))
}

async fn get_locations(State(service): State<TravelService>) -> Result<Json<Vec<Destination>>> {
    Ok(Json(service.locations()?))
}

async fn get_filtered_locations(
    State(service): State<TravelService>,
    pairs: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<LocationPage>> {
    let params = FilterParams::from_pairs(lenient_query(pairs));
    let page = PageRequest::from_query(
        params.limit.as_deref(),
        params.page.as_deref(),
        service.query_config(),
    );
    Ok(Json(
        service.filtered_locations(params.country.as_deref(), page)?,
    ))
}

async fn get_countries(State(service): State<TravelService>) -> Result<Json<Vec<String>>> {
    Ok(Json(service.countries()?))
}

async fn get_cities(
    State(service): State<TravelService>,
    params: std::result::Result<Query<CityParams>, QueryRejection>,
) -> Result<Json<Vec<String>>> {
    let params = strict_query(params)?;
    Ok(Json(service.cities(params.country.as_deref())?))
}

async fn get_lists(
    State(service): State<TravelService>,
    params: std::result::Result<Query<ListsParams>, QueryRejection>,
) -> Result<Response> {
    let params = strict_query(params)?;
    if params.wants_summary() {
        Ok(Json(service.list_summaries().await?).into_response())
    } else {
        Ok(Json(service.lists().await?).into_response())
    }
}

async fn create_list(
    State(service): State<TravelService>,
    payload: std::result::Result<Json<NameBody>, JsonRejection>,
) -> Result<Json<TravelList>> {
    let name = required_name(json_body(payload, "List name is required")?)?;
    Ok(Json(service.create_list(&name).await?))
}

async fn get_list(
    State(service): State<TravelService>,
    Path(id): Path<String>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<TravelList>> {
    let id = parse_list_id(&id)?;
    let params = strict_query(params)?;
    let sort = params
        .sort_by
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;
    Ok(Json(service.get_list(id, sort).await?))
}

async fn rename_list(
    State(service): State<TravelService>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<NameBody>, JsonRejection>,
) -> Result<Json<TravelList>> {
    let name = required_name(json_body(payload, "List name is required")?)?;
    let id = parse_list_id(&id)?;
    Ok(Json(service.rename_list(id, &name).await?))
}

async fn delete_list(
    State(service): State<TravelService>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_list_id(&id)?;
    service.delete_list(id).await?;
    Ok(Json(json!({ "message": "List deleted successfully" })))
}

async fn add_destination(
    State(service): State<TravelService>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AddDestinationBody>, JsonRejection>,
) -> Result<Json<TravelList>> {
    const MISSING: &str = "Destination data is required";
    let body = json_body(payload, MISSING)?;
    let name = body
        .destination_name()
        .ok_or_else(|| WanderlistError::validation(MISSING))?;
    let id = parse_list_id(&id)?;
    Ok(Json(service.add_destination(id, name).await?))
}

async fn remove_destination(
    State(service): State<TravelService>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<RemoveDestinationBody>, JsonRejection>,
) -> Result<Json<TravelList>> {
    const MISSING: &str = "Destination name is required";
    let id = parse_list_id(&id)?;
    let name = json_body(payload, MISSING)?
        .destination_name
        .ok_or_else(|| WanderlistError::validation(MISSING))?;
    Ok(Json(service.remove_destination(id, &name).await?))
}

async fn reload_dataset(State(service): State<TravelService>) -> Result<Json<Value>> {
    let count = service.reload_dataset()?;
    Ok(Json(json!({
        "message": "Dataset reloaded",
        "destinations": count,
    })))
}
