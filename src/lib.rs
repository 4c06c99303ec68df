//! # apihub - Terminal Catalog Manager for External API Definitions
//!
//! Browse, search, create, edit and delete cataloged API interfaces and
//! inspect the endpoints each one exposes, against a REST backend serving
//! `/api/interfaces`.
//!
//! ## Architecture
//!
//! Every controller depends on the gateway only; none depends on another,
//! except that the detail view embeds the endpoint sublist by handing it an id.
//!
//! ```text
//! ┌─────────────┐  commands   ┌───────────────┐   activate   ┌──────────────────┐
//! │   Shell     │────────────▶│ AppController │─────────────▶│ List / Detail /  │
//! │ (stdin)     │             │               │◀─────────────│ Form controller  │
//! └─────────────┘             │ - Router      │  ViewEvents  └────────┬─────────┘
//!                             │ - Renderer    │                       │ Dispatcher
//!                             └───────────────┘                       ▼
//!                                                             ┌──────────────────┐
//!                                                             │  CatalogGateway  │
//!                                                             │  (reqwest)       │
//!                                                             └──────────────────┘
//! ```
//!
//! Requests run on background tasks. Their results are applied only while
//! the controller that started them is alive; tearing a controller down
//! cancels everything it has in flight.

pub mod catalog;
pub mod cmd_args;
pub mod config;

// Re-export main types for easy access
pub use catalog::*;
