//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One worker thread per connection
//! - Statements routed through `Database`

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
