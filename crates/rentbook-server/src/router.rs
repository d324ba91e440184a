//! Request routing and the endpoint handlers

use std::time::Instant;

use bytes::Bytes;
use hyper::header::ORIGIN;
use hyper::{Method, Request, StatusCode};
use rentbook::Rentbook;
use rentbook_core::{Block, PageRequest};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::TokenGate;
use crate::cors::CorsPolicy;
use crate::params::{
    parse_body, present, row_from, rows_from, AmountBody, EntryBody, Query, SummaryBody,
};
use crate::response::{failure, json, success, ApiError, Reply};

/// Everything a request handler needs, shared across connections
pub struct AppState {
    pub book: Rentbook,
    pub gate: TokenGate,
    pub cors: CorsPolicy,
    /// Normalized route prefix (`/rent`), empty for none
    pub prefix: String,
}

type ApiResult = Result<Reply, ApiError>;

/// Handle one buffered request
pub async fn route(req: Request<Bytes>, state: &AppState) -> Reply {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut reply = if method == Method::OPTIONS {
        state.cors.preflight(origin.as_deref())
    } else {
        match dispatch(req, state).await {
            Ok(reply) => reply,
            Err(err) => {
                if err.status().is_server_error() {
                    warn!(%method, %path, error = %err, "request failed");
                }
                failure(&err)
            }
        }
    };
    state.cors.apply(origin.as_deref(), &mut reply);

    info!(
        %method,
        %path,
        status = reply.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    reply
}

fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    let rest = match rest.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    rest.starts_with('/').then_some(rest)
}

async fn dispatch(req: Request<Bytes>, state: &AppState) -> ApiResult {
    if req.uri().path() == "/health" {
        return Ok(json(StatusCode::OK, &json!({ "message": "ok" })));
    }
    let endpoint = strip_prefix(req.uri().path(), &state.prefix)
        .ok_or(ApiError::NotFound)?
        .to_string();
    state.gate.check(req.headers())?;

    let query = Query::parse(req.uri().query());
    let book = &state.book;
    match (req.method(), endpoint.as_str()) {
        (&Method::GET, "/all-flats") => all_flats(book, &query).await,
        (&Method::GET, "/tenants/formData") => form_data(book, &query).await,
        (&Method::GET, "/tenants/financial-total") => financial_total(book, &query).await,
        (&Method::POST, "/add-rent-entry") => add_rent_entry(book, req.body()).await,
        (&Method::GET, "/recent-entries") => recent_entries(book, &query).await,
        (&Method::GET, "/amount") => get_amount(book, &query).await,
        (&Method::PUT, "/amount") => put_amount(book, req.body()).await,
        (&Method::DELETE, "/amount") => delete_amount(book, &query).await,
        (&Method::PUT, "/update-summary") => update_summary(book, req.body()).await,
        _ => Err(ApiError::NotFound),
    }
}

async fn all_flats(book: &Rentbook, query: &Query) -> ApiResult {
    let target = book.target(query.flag("demoLogin"))?;
    let flats = book.all_flats(target).await?;
    Ok(success("Flats fetched", flats))
}

async fn form_data(book: &Rentbook, query: &Query) -> ApiResult {
    let target = book.target(query.flag("demoLogin"))?;
    let units = book.units(target).await?;
    Ok(success("Units fetched", units))
}

async fn financial_total(book: &Rentbook, query: &Query) -> ApiResult {
    let (Some(from), Some(to), Some(tenant)) = (
        query.non_empty("from"),
        query.non_empty("to"),
        query.non_empty("tenant"),
    ) else {
        return Err(ApiError::bad_request("from, to and tenant are mandatory."));
    };

    let target = book.target(query.flag("demoLogin"))?;
    let total = book.financial_total(target, from, to, tenant).await?;
    Ok(success("Total calculated", json!({ "total": total })))
}

async fn add_rent_entry(book: &Rentbook, body: &Bytes) -> ApiResult {
    let body: EntryBody = parse_body(body)?;
    let (Some(sheet), Some(values)) = (present(body.sheet), body.values) else {
        return Err(ApiError::bad_request("Sheet name and values are mandatory."));
    };
    let rows = rows_from(values)?;

    let target = book.target(body.demo_login.0)?;
    let block = Block::from_flag(body.is_electric_bill.0);
    let ack = book.add_entry(target, &sheet, block, rows).await?;
    Ok(success(
        "Entry Successfully Added",
        json!({ "entriesAdded": ack.updated_rows }),
    ))
}

async fn recent_entries(book: &Rentbook, query: &Query) -> ApiResult {
    let Some(sheet) = query.non_empty("sheet") else {
        return Err(ApiError::bad_request("Sheet name is mandatory."));
    };
    let request = PageRequest::parse(query.get("page"), query.get("pageSize"))?;

    let target = book.target(query.flag("demoLogin"))?;
    let entries = book.recent_entries(target, sheet, request).await?;
    Ok(success("Entries fetched", entries))
}

async fn get_amount(book: &Rentbook, query: &Query) -> ApiResult {
    let (Some(sheet), Some(month_year)) = (query.non_empty("sheet"), query.non_empty("monthYear"))
    else {
        return Err(ApiError::bad_request(
            "Sheet name, month, and year are mandatory.",
        ));
    };

    let target = book.target(query.flag("demoLogin"))?;
    let block = Block::from_flag(query.flag("isElectricBill"));
    let record = book.amount(target, sheet, block, month_year).await?;
    Ok(success("Entry found", json!({ "amount": record })))
}

async fn put_amount(book: &Rentbook, body: &Bytes) -> ApiResult {
    let body: AmountBody = parse_body(body)?;
    let (Some(sheet), Some(month_year), Some(values)) =
        (present(body.sheet), present(body.month_year), body.values)
    else {
        return Err(ApiError::bad_request(
            "Sheet name, month, year, and values are mandatory.",
        ));
    };
    let rows = rows_from(values)?;

    let target = book.target(body.demo_login.0)?;
    let block = Block::from_flag(body.is_electric_bill.0);
    let ack = book
        .update_amount(target, &sheet, block, &month_year, rows)
        .await?;
    Ok(success(
        "Entry Successfully Updated",
        json!({ "entriesUpdated": ack.updated_rows }),
    ))
}

async fn delete_amount(book: &Rentbook, query: &Query) -> ApiResult {
    let (Some(sheet), Some(month_year)) = (query.non_empty("sheet"), query.non_empty("monthYear"))
    else {
        return Err(ApiError::bad_request(
            "Sheet name, month, and year are mandatory.",
        ));
    };

    let target = book.target(query.flag("demoLogin"))?;
    let block = Block::from_flag(query.flag("isElectricBill"));
    let ack = book.clear_amount(target, sheet, block, month_year).await?;
    Ok(success(
        "Entry Successfully Deleted",
        json!({ "entriesCleared": ack.updated_rows }),
    ))
}

async fn update_summary(book: &Rentbook, body: &Bytes) -> ApiResult {
    let body: SummaryBody = parse_body(body)?;
    let (Some(flat), Some(values)) = (present(body.flat), body.values) else {
        return Err(ApiError::bad_request("Flat name and values are mandatory."));
    };
    let values = row_from(values)?;

    let target = book.target(body.demo_login.0)?;
    let ack = book.update_summary(target, &flat, values).await?;
    Ok(success(
        "Summary Successfully Updated",
        json!({ "entriesUpdated": ack.updated_rows }),
    ))
}
