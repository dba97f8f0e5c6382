//! Query codec
//!
//! A [`Filter`] travels in the address bar as one `filter=<token>` parameter,
//! where the token is `percent(base64(json(conditions)))`. A [`Query`] of N
//! filters yields N repeated `filter=` parameters. Decoding is best effort:
//! malformed tokens and invalid conditions are logged and dropped.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::errors::ConsoleError;
use crate::query::model::{Filter, Query};
use crate::query::validate::{validate_filter, validate_query};

pub const FILTER_PARAM: &str = "filter";
pub const PAGE_PARAM: &str = "page";
pub const ORDER_BY_PARAM: &str = "order_by";
pub const ORDER_PARAM: &str = "order";

/// Base64 payload of a filter, before percent-encoding
fn filter_payload(filter: &Filter) -> Result<String, ConsoleError> {
    let json = serde_json::to_string(filter)?;
    Ok(STANDARD.encode(json))
}

/// Decode a percent-decoded payload into a validated filter.
///
/// `Ok(None)` means the payload was well formed but none of its conditions
/// survived validation.
fn decode_payload(payload: &str) -> Result<Option<Filter>, ConsoleError> {
    let candidates = raw_payload(payload)?;
    Ok(validate_filter(&candidates))
}

/// Unvalidated condition candidates of a percent-decoded payload
fn raw_payload(payload: &str) -> Result<Vec<Value>, ConsoleError> {
    // An unescaped '+' in a hand-edited URL arrives here as a space.
    let payload = payload.trim().replace(' ', "+");
    let bytes = STANDARD.decode(payload.as_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode one filter as a URL-safe token
pub fn encode_filter(filter: &Filter) -> Result<String, ConsoleError> {
    let payload = filter_payload(filter)?;
    Ok(form_urlencoded::byte_serialize(payload.as_bytes()).collect())
}

/// Decode one URL token into a validated filter
pub fn decode_token(token: &str) -> Result<Option<Filter>, ConsoleError> {
    let payload = percent_decode(token);
    decode_payload(&payload)
}

/// Encode every filter of a query, one token per filter
pub fn encode_query(query: &Query) -> Result<Vec<String>, ConsoleError> {
    query.iter().map(encode_filter).collect()
}

/// Decode a list of tokens, dropping the ones that fail
pub fn decode_query<S: AsRef<str>>(tokens: &[S]) -> Query {
    tokens
        .iter()
        .filter_map(|token| recover(decode_token(token.as_ref())))
        .collect()
}

fn recover(decoded: Result<Option<Filter>, ConsoleError>) -> Option<Filter> {
    match decoded {
        Ok(Some(filter)) => Some(filter),
        Ok(None) => {
            debug!("Dropping filter token with no valid condition");
            None
        }
        Err(e) => {
            warn!("Dropping malformed filter token: {}", e);
            None
        }
    }
}

/// Condition candidates of every `filter=` parameter, before validation.
///
/// Tokens that are not a base64 JSON array have no conditions to show and are
/// skipped.
pub fn raw_filters(query_string: &str) -> Vec<Vec<Value>> {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
    form_urlencoded::parse(query_string.as_bytes())
        .filter(|(key, _)| key == FILTER_PARAM)
        .filter_map(|(_, value)| match raw_payload(&value) {
            Ok(candidates) => Some(candidates),
            Err(e) => {
                debug!("Skipping unreadable filter token: {}", e);
                None
            }
        })
        .collect()
}

fn percent_decode(token: &str) -> String {
    let pair = format!("{}={}", FILTER_PARAM, token);
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Address-bar state of the device list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceListState {
    pub query: Query,

    /// Zero-based page number
    pub page: u32,

    /// Column to order by, opaque to the codec
    pub order_by: Option<String>,

    /// Order direction, opaque to the codec
    pub order: Option<String>,
}

impl DeviceListState {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    /// Encode as a query string without the leading `?`.
    ///
    /// `page` is omitted when zero and ordering when unset.
    pub fn to_query_string(&self) -> Result<String, ConsoleError> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for filter in self.query.iter() {
            serializer.append_pair(FILTER_PARAM, &filter_payload(filter)?);
        }
        if self.page > 0 {
            serializer.append_pair(PAGE_PARAM, &self.page.to_string());
        }
        if let Some(order_by) = &self.order_by {
            serializer.append_pair(ORDER_BY_PARAM, order_by);
        }
        if let Some(order) = &self.order {
            serializer.append_pair(ORDER_PARAM, order);
        }
        Ok(serializer.finish())
    }

    /// Decode from a query string, with or without the leading `?`.
    ///
    /// Never fails: unknown parameters are ignored, a non-numeric page falls
    /// back to 0 and broken filter tokens are dropped.
    pub fn from_query_string(query_string: &str) -> Self {
        let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
        let mut state = DeviceListState::default();
        let mut filters = Vec::new();

        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            match key.as_ref() {
                FILTER_PARAM => {
                    if let Some(filter) = recover(decode_payload(&value)) {
                        filters.push(filter);
                    }
                }
                PAGE_PARAM => {
                    state.page = value.trim().parse().unwrap_or_else(|_| {
                        debug!("Ignoring non-numeric page '{}'", value);
                        0
                    });
                }
                ORDER_BY_PARAM => state.order_by = non_empty(&value),
                ORDER_PARAM => state.order = non_empty(&value),
                _ => {}
            }
        }

        state.query = Query::new(filters);
        state
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Scheduling rule payload: the query as plain JSON, no extra encoding
pub fn scheduling_rule_to_json(query: &Query) -> Result<Value, ConsoleError> {
    Ok(serde_json::to_value(query)?)
}

/// Validated query from a scheduling rule payload
pub fn scheduling_rule_from_json(value: &Value) -> Query {
    validate_query(value)
}
