//! In-memory request double for unit tests.

use crate::request::{Principal, RequestContext, RouteValues};

#[derive(Debug, Default)]
pub(crate) struct FakeRequest {
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    principal: Option<Principal>,
    route_values: RouteValues,
    host: Option<String>,
}

impl FakeRequest {
    pub(crate) fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub(crate) fn with_route_value(mut self, key: &str, value: &str) -> Self {
        self.route_values.insert(key, value);
        self
    }

    pub(crate) fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }
}

impl RequestContext for FakeRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    fn route_value(&self, key: &str) -> Option<&str> {
        self.route_values.get(key)
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn path(&self) -> &str {
        &self.path
    }
}
