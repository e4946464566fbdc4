//! Markov-chain sentence learning and generation library.
//!
//! This crate provides a modular markov-chain text system including:
//! - A second-order chain engine (learn from sentences, generate new ones)
//! - A storage contract (`database::Database`) decoupling the engine
//!   from where the transition sets actually live
//! - Three backends: volatile memory, JSON-file persistence, redis
//! - A connection-string factory to pick a backend at runtime
//!
//! The engine never depends on a concrete backend; everything it needs
//! is expressed through the `Database` trait.

/// Chain engine: context handling, key encoding, learning and generation.
pub mod chain;

/// Storage contract, backends and the connection-string factory.
pub mod database;
