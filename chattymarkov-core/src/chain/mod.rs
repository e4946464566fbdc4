//! Top-level module for the markov-chain engine.
//!
//! This module provides the full learning/generation pipeline:
//! - Rolling two-word context management (`Context`)
//! - Deterministic key encoding (`KeyCodec`)
//! - Incremental learning (`Learner`)
//! - Random-walk generation (`Generator`)
//! - A high-level facade composing the above (`ChattyMarkov`)

/// High-level facade binding a storage backend to the chain algorithm.
///
/// Exposes construction from a bound backend or from a connection
/// string, plus the `learn`/`generate` operations.
pub mod engine;

/// Rolling (previous, last) word pair used to look up transitions.
pub mod context;

/// Deterministic, namespaced key construction.
///
/// Pure string encoding; holds no backend state.
pub mod key;

/// Internal learning pass over a sentence.
///
/// Walks the word sequence and records transitions through the backend.
/// This module is not exposed publicly.
mod learner;

/// Internal random-walk generation.
///
/// Reads transitions back from the backend until a stop condition.
/// This module is not exposed publicly.
mod generator;
