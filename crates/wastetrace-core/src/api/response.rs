//! Response normalization for the backend's payload shapes.
//!
//! The backend wraps most payloads in `{"status": ..., "message": ...,
//! "data": ...}`; older deployments returned bare arrays, and the product
//! catalog has shipped both `{"products": [...]}` and plain name strings.
//! Each endpoint gets one parsing function that normalizes every accepted
//! shape into a single typed result and fails loudly on anything else -
//! there is no silent empty-list default.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::{Insights, Product, User};

/// Standard backend envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

fn shape_error(endpoint: &str) -> ApiError {
    ApiError::Validation(format!("unrecognized response shape from {endpoint}"))
}

/// Outcome of a registration call.
///
/// The backend signs the new user in when it can issue a token, and falls
/// back to a recorded-please-login response when it cannot.
#[derive(Debug)]
pub enum RegisterOutcome {
    SignedIn { token: String, user: User },
    LoginRequired { message: Option<String> },
}

/// `/auth/login`: `{token, user}` - both required; anything less is a
/// contract violation, not a partial success.
pub(crate) fn parse_login(body: &str) -> Result<(String, User), ApiError> {
    #[derive(Deserialize)]
    struct LoginBody {
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        user: Option<User>,
    }

    let parsed: LoginBody =
        serde_json::from_str(body).map_err(|_| shape_error("/auth/login"))?;
    match (parsed.token, parsed.user) {
        (Some(token), Some(user)) if !token.is_empty() => Ok((token, user)),
        _ => Err(ApiError::Validation(
            "login response is missing token or user".to_string(),
        )),
    }
}

/// `/auth/register`: token+user when the backend signs the user in, or a
/// success acknowledgement when registration is recorded without a token.
pub(crate) fn parse_register(body: &str) -> Result<RegisterOutcome, ApiError> {
    #[derive(Deserialize)]
    struct RegisterBody {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        user: Option<User>,
    }

    let parsed: RegisterBody =
        serde_json::from_str(body).map_err(|_| shape_error("/auth/register"))?;
    match (parsed.token, parsed.user) {
        (Some(token), Some(user)) if !token.is_empty() => {
            Ok(RegisterOutcome::SignedIn { token, user })
        }
        _ if parsed.status.as_deref() == Some("success") => Ok(RegisterOutcome::LoginRequired {
            message: parsed.message,
        }),
        _ => Err(shape_error("/auth/register")),
    }
}

/// List endpoints: `{"data": [...]}` or a bare array.
pub(crate) fn parse_list<T: DeserializeOwned>(
    body: &str,
    endpoint: &str,
) -> Result<Vec<T>, ApiError> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<Vec<T>>>(body) {
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    serde_json::from_str::<Vec<T>>(body).map_err(|_| shape_error(endpoint))
}

/// Single-record endpoints: `{"data": {...}}` or the bare record.
pub(crate) fn parse_record<T: DeserializeOwned>(
    body: &str,
    endpoint: &str,
) -> Result<T, ApiError> {
    if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(body) {
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    serde_json::from_str::<T>(body).map_err(|_| shape_error(endpoint))
}

/// Mutation acknowledgements: an object, optionally carrying a `message`.
pub(crate) fn parse_ack(body: &str, endpoint: &str) -> Result<Option<String>, ApiError> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|_| shape_error(endpoint))?;
    Ok(envelope.message)
}

/// `/products`: bare array, `data` wrapper, or legacy `products` wrapper;
/// items are either name strings or `{id, name}` records.
pub(crate) fn parse_products(body: &str) -> Result<Vec<Product>, ApiError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ProductItem {
        Full(Product),
        Name(String),
    }

    impl From<ProductItem> for Product {
        fn from(item: ProductItem) -> Self {
            match item {
                ProductItem::Full(product) => product,
                ProductItem::Name(name) => Product::named(name),
            }
        }
    }

    #[derive(Deserialize)]
    struct ProductsWrapper {
        #[serde(default)]
        data: Option<Vec<ProductItem>>,
        #[serde(default)]
        products: Option<Vec<ProductItem>>,
    }

    if let Ok(wrapper) = serde_json::from_str::<ProductsWrapper>(body) {
        if let Some(items) = wrapper.data.or(wrapper.products) {
            return Ok(items.into_iter().map(Product::from).collect());
        }
    }
    serde_json::from_str::<Vec<ProductItem>>(body)
        .map(|items| items.into_iter().map(Product::from).collect())
        .map_err(|_| shape_error("/products"))
}

/// `/reports/insights`: the relayed payload is either prose or a JSON
/// document under `data`.
pub(crate) fn parse_insights(body: &str) -> Result<Insights, ApiError> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|_| shape_error("/reports/insights"))?;
    match envelope.data {
        Some(serde_json::Value::String(text)) => Ok(Insights::Text(text)),
        Some(value) => Ok(Insights::Structured(value)),
        None => Err(shape_error("/reports/insights")),
    }
}
