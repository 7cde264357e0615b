//! [`RequestContext`] over HTTP request parts.

use std::borrow::Cow;

use helios_tenancy::{Principal, RequestContext, RouteValues};
use http::header::HOST;
use http::request::Parts;
use url::form_urlencoded;

/// Read-only view of an HTTP request for the tenant resolvers.
///
/// The principal and route values are read from request extensions. An
/// authentication layer places the [`Principal`]; the tenant middleware
/// places [`RouteValues`] from the matched route.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequestContext<'a> {
    parts: &'a Parts,
    host: Option<&'a str>,
}

impl<'a> HttpRequestContext<'a> {
    /// Wraps the request parts.
    pub fn new(parts: &'a Parts) -> Self {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| parts.uri.host())
            .map(strip_port)
            .filter(|h| !h.is_empty());

        Self { parts, host }
    }
}

impl RequestContext for HttpRequestContext<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let query = self.parts.uri.query()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| Cow::into_owned(value))
    }

    fn principal(&self) -> Option<&Principal> {
        self.parts.extensions.get::<Principal>()
    }

    fn route_value(&self, key: &str) -> Option<&str> {
        self.parts.extensions.get::<RouteValues>()?.get(key)
    }

    fn host(&self) -> Option<&str> {
        self.host
    }

    fn path(&self) -> &str {
        self.parts.uri.path()
    }
}

/// Removes a trailing `:port` and IPv6 brackets from an authority.
fn strip_port(authority: &str) -> &str {
    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }

    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    }
}
