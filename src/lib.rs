//! pingmon - live monitor for a GraphQL ping service
//!
//! Shows the most recent ping timestamp and a rolling log of the GraphQL
//! operations (query, mutation, subscription) exchanged with the service.

pub mod cli;
pub mod config;
pub mod graphql;
pub mod logging;
pub mod monitor;
pub mod oplog;
pub mod scheduler;
