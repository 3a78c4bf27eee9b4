//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Fixed worker pool, one worker per connection for its whole lifetime
//! - Requests executed against the shared Store

mod pool;
mod server;
mod connection;

pub use pool::{Job, WorkerPool};
pub use server::Server;
pub use connection::{dispatch, Connection};
