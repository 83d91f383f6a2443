// ABOUTME: Command module aggregator for the convoy CLI.
// ABOUTME: Re-exports deploy, restart, cancel, and versions command handlers.

mod cancel;
mod deploy;
mod restart;
mod target;
mod versions;

pub use cancel::cancel;
pub use deploy::deploy;
pub use restart::restart;
pub use versions::versions;
