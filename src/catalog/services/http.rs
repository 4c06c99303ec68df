//! # HTTP Gateway
//!
//! reqwest-backed implementation of [`CatalogGateway`] talking to the
//! catalog backend's REST contract under `/api/interfaces`.

use super::error::{GatewayError, GatewayResult};
use super::gateway::CatalogGateway;
use crate::catalog::models::{Endpoint, Interface, ServerInfo};
use crate::config::CatalogProfile;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;

/// Path segments of the interface collection, relative to the base URL
const INTERFACES_PATH: [&str; 2] = ["api", "interfaces"];

/// Gateway that issues real HTTP requests
///
/// Stateless per call: the only thing held is the connection pool inside
/// the reqwest client, which is cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    /// Create a gateway for the given deployment prefix
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, false)
    }

    /// Create a gateway from a loaded profile
    pub fn from_profile(profile: &CatalogProfile) -> Result<Self> {
        tracing::debug!(
            "Creating gateway for profile '{}' at '{}'",
            profile.name,
            profile.server
        );
        Self::build(&profile.server, profile.insecure)
    }

    /// Create a gateway around an existing client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn build(base_url: &str, insecure: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("apihub/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(insecure)
            .build()?;
        tracing::info!("HTTP client created for '{}'", base_url);
        Ok(Self::with_client(client, base_url))
    }

    /// Deployment prefix every request path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    ///
    /// An empty base URL leaves the path relative, which cannot be sent and
    /// surfaces as a transport failure.
    pub fn url_for(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| GatewayError::transport(&e))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GatewayError::transport_message(&format!(
                    "'{}' cannot be used as a base URL",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn interfaces_url(&self, rest: &[&str]) -> GatewayResult<Url> {
        let segments: Vec<&str> = INTERFACES_PATH.iter().chain(rest.iter()).copied().collect();
        self.url_for(&segments)
    }

    /// Send a request and reject any non-2xx answer
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Interface>,
    ) -> GatewayResult<Response> {
        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport(&e))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(GatewayError::application(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }
        Ok(response)
    }

    /// Send a request below `/api/interfaces` and decode the JSON body
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        rest: &[&str],
        body: Option<&Interface>,
    ) -> GatewayResult<T> {
        let url = self.interfaces_url(rest)?;
        self.fetch(method, url, body).await
    }

    /// Send a request and decode the JSON body
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Interface>,
    ) -> GatewayResult<T> {
        let response = self.execute(method, url, body).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            GatewayError::application(status, &format!("Http failure during parsing: {e}"))
        })
    }
}

/// Single exit point for failures: log once, hand the normalized error on
fn handle_error<T>(operation: &str, outcome: GatewayResult<T>) -> GatewayResult<T> {
    outcome.map_err(|error| {
        tracing::error!("{} failed: {}", operation, error.message());
        error
    })
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn list_interfaces(&self) -> GatewayResult<Vec<Interface>> {
        handle_error("list interfaces", self.call(Method::GET, &[], None).await)
    }

    async fn get_interface(&self, id: i64) -> GatewayResult<Interface> {
        let id = id.to_string();
        handle_error("get interface", self.call(Method::GET, &[id.as_str()], None).await)
    }

    async fn get_interface_by_name(&self, name: &str) -> GatewayResult<Interface> {
        handle_error(
            "get interface by name",
            self.call(Method::GET, &["name", name], None).await,
        )
    }

    async fn create_interface(&self, data: &Interface) -> GatewayResult<Interface> {
        handle_error(
            "create interface",
            self.call(Method::POST, &[], Some(data)).await,
        )
    }

    async fn update_interface(&self, id: i64, data: &Interface) -> GatewayResult<Interface> {
        let id = id.to_string();
        handle_error(
            "update interface",
            self.call(Method::PUT, &[id.as_str()], Some(data)).await,
        )
    }

    async fn delete_interface(&self, id: i64) -> GatewayResult<()> {
        let id = id.to_string();
        let outcome = match self.interfaces_url(&[id.as_str()]) {
            Ok(url) => self.execute(Method::DELETE, url, None).await.map(|_| ()),
            Err(error) => Err(error),
        };
        handle_error("delete interface", outcome)
    }

    async fn list_endpoints(&self, interface_id: i64) -> GatewayResult<Vec<Endpoint>> {
        let id = interface_id.to_string();
        handle_error(
            "list endpoints",
            self.call(Method::GET, &[id.as_str(), "endpoints"], None).await,
        )
    }

    async fn list_large_interfaces(&self) -> GatewayResult<Vec<Interface>> {
        handle_error(
            "list large interfaces",
            self.call(Method::GET, &["large"], None).await,
        )
    }

    async fn server_info(&self) -> GatewayResult<ServerInfo> {
        let outcome = match self.url_for(&[""]) {
            Ok(url) => self.fetch(Method::GET, url, None).await,
            Err(error) => Err(error),
        };
        handle_error("server info", outcome)
    }
}
