//! Driver licence registry and verification backend.
//!
//! The crate is organised as a hexagon: [`domain`] holds types, services and
//! ports, [`inbound`] adapts HTTP requests onto the driving ports and
//! [`outbound`] implements the driven ports for PostgreSQL, memory and
//! password hashing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
