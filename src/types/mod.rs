// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod app_id;
mod endpoint;
mod id;

pub use app_id::{AppId, AppIdError};
pub use endpoint::{Endpoint, EndpointError};
pub use id::{DeploymentId, Id, TaskId};
