//! # Catalog Gateway
//!
//! The only seam through which controllers reach the backend. Each operation
//! resolves to exactly one value or one normalized [`GatewayError`]; nothing is
//! cached and nothing is retried.

use super::error::GatewayResult;
use crate::catalog::models::{Endpoint, Interface, ServerInfo};
use async_trait::async_trait;

/// Data access for the interface catalog
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// `GET /api/interfaces`
    async fn list_interfaces(&self) -> GatewayResult<Vec<Interface>>;

    /// `GET /api/interfaces/{id}`
    async fn get_interface(&self, id: i64) -> GatewayResult<Interface>;

    /// `GET /api/interfaces/name/{name}`, with the name percent-encoded
    async fn get_interface_by_name(&self, name: &str) -> GatewayResult<Interface>;

    /// `POST /api/interfaces`; the returned interface carries the assigned id
    async fn create_interface(&self, data: &Interface) -> GatewayResult<Interface>;

    /// `PUT /api/interfaces/{id}`; every field of `data` replaces server state
    async fn update_interface(&self, id: i64, data: &Interface) -> GatewayResult<Interface>;

    /// `DELETE /api/interfaces/{id}`
    async fn delete_interface(&self, id: i64) -> GatewayResult<()>;

    /// `GET /api/interfaces/{id}/endpoints`
    async fn list_endpoints(&self, interface_id: i64) -> GatewayResult<Vec<Endpoint>>;

    /// `GET /api/interfaces/large`: interfaces with more than five endpoints
    async fn list_large_interfaces(&self) -> GatewayResult<Vec<Interface>>;

    /// `GET /`: backend banner
    async fn server_info(&self) -> GatewayResult<ServerInfo>;
}
