// Sanctum - Mental-health companion chat server
// Library exports

pub mod chat;
pub mod config;
pub mod crisis;
pub mod framework;
pub mod responder;
pub mod server;
pub mod store;
