//! # Server-driven pages
//!
//! Handlers answer with a page object (`component`, `props`, `url`,
//! `version`) that the client-side component renders. Requests sent by the
//! client router carry `X-Inertia: true` and get the page object as JSON; a
//! plain browser visit gets an HTML shell with the page object embedded in the
//! root element's `data-page` attribute.
//!
//! Flash messages survive the redirect that follows a mutation in a
//! short-lived cookie, and are moved into the `flash` prop on the next render.

pub mod company;

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE, VARY},
        request::Parts,
    },
    response::{Html, IntoResponse, Response},
};
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use crate::config::AppConfig;

pub const INERTIA_HEADER: &str = "x-inertia";
pub const INERTIA_VERSION_HEADER: &str = "x-inertia-version";
pub const INERTIA_LOCATION_HEADER: &str = "x-inertia-location";
pub const FLASH_COOKIE: &str = "flash";

/// Page object consumed by the client-side page components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page {
    /// Name of the client component to mount
    #[schema(example = "company")]
    pub component: String,
    /// Component props
    #[schema(value_type = Object)]
    pub props: Value,
    /// URL the page was rendered for
    #[schema(example = "/company")]
    pub url: String,
    /// Asset version the page was rendered against
    pub version: String,
}

/// Per-request rendering context
#[derive(Debug, Clone)]
pub struct PageContext {
    pub method: Method,
    /// Path and query of the current request
    pub url: String,
    /// Request came from the client router rather than a full page load
    pub inertia: bool,
    /// Asset version the client was built against, if it sent one
    pub client_version: Option<String>,
    /// Pending flash message from the previous redirect
    pub flash: Option<String>,
    pub version: String,
}

impl<S> FromRequestParts<S> for PageContext
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AppConfig>::from_ref(state);

        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let inertia = parts
            .headers
            .get(INERTIA_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let client_version = parts
            .headers
            .get(INERTIA_VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            method: parts.method.clone(),
            url,
            inertia,
            client_version,
            flash: read_flash(&parts.headers),
            version: config.asset_version.clone(),
        })
    }
}

impl PageContext {
    /// Build the response for `component` with the given props.
    ///
    /// `errors` defaults to an empty object and `flash` is always present so
    /// the client components can rely on both keys.
    pub fn render<P: Serialize>(&self, component: &str, props: P) -> PageResponse {
        let mut props = match serde_json::to_value(props) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
            Err(err) => {
                tracing::error!(error = %err, component, "Failed to serialize page props");
                Map::new()
            }
        };

        props
            .entry("errors")
            .or_insert_with(|| Value::Object(Map::new()));
        props.insert(
            "flash".to_string(),
            json!({ "success": self.flash.clone() }),
        );

        PageResponse {
            page: Page {
                component: component.to_string(),
                props: Value::Object(props),
                url: self.url.clone(),
                version: self.version.clone(),
            },
            status: StatusCode::OK,
            inertia: self.inertia,
            stale_client: self.is_stale_client(),
            clear_flash: self.flash.is_some(),
        }
    }

    /// A client-router GET built against another asset version must do a full reload
    fn is_stale_client(&self) -> bool {
        self.inertia
            && self.method == Method::GET
            && self
                .client_version
                .as_deref()
                .is_some_and(|client| client != self.version)
    }
}

/// Rendered page ready to be turned into a response
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub page: Page,
    pub status: StatusCode,
    inertia: bool,
    stale_client: bool,
    clear_flash: bool,
}

impl PageResponse {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        if self.stale_client {
            let mut response = StatusCode::CONFLICT.into_response();
            if let Ok(location) = HeaderValue::from_str(&self.page.url) {
                response
                    .headers_mut()
                    .insert(INERTIA_LOCATION_HEADER, location);
            }
            return response;
        }

        let mut response = if self.inertia {
            let mut response = (self.status, Json(&self.page)).into_response();
            response
                .headers_mut()
                .insert(INERTIA_HEADER, HeaderValue::from_static("true"));
            response
        } else {
            (self.status, Html(render_shell(&self.page))).into_response()
        };

        let headers = response.headers_mut();
        headers.insert(VARY, HeaderValue::from_static("X-Inertia"));
        if self.clear_flash {
            let mut removal = flash_cookie(String::new());
            removal.make_removal();
            if let Ok(value) = HeaderValue::from_str(&removal.encoded().to_string()) {
                headers.append(SET_COOKIE, value);
            }
        }

        response
    }
}

/// Redirect after a mutation, carrying `message` to the next page render.
///
/// POST gets `302 Found`; PUT, PATCH and DELETE get `303 See Other` so the
/// follow-up request is a GET.
pub fn redirect_with_flash(method: &Method, to: &str, message: &str) -> Response {
    let status = if *method == Method::GET || *method == Method::POST {
        StatusCode::FOUND
    } else {
        StatusCode::SEE_OTHER
    };

    let mut response = status.into_response();
    let headers = response.headers_mut();

    match HeaderValue::from_str(to) {
        Ok(location) => {
            headers.insert(LOCATION, location);
        }
        Err(err) => {
            tracing::error!(error = %err, to, "Invalid redirect target");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let cookie = flash_cookie(message.to_string());
    if let Ok(value) = HeaderValue::from_str(&cookie.encoded().to_string()) {
        headers.insert(SET_COOKIE, value);
    }

    response
}

/// Read and decode the flash cookie, if any
pub fn read_flash(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == FLASH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|message| !message.is_empty())
}

fn flash_cookie(message: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, message))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn render_shell(page: &Page) -> String {
    let data = serde_json::to_string(page).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n<div id=\"app\" data-page=\"{}\"></div>\n</body>\n</html>\n",
        html_escape::encode_text(&page.component),
        html_escape::encode_double_quoted_attribute(&data)
    )
}
