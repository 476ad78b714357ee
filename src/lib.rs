//! # Biogate
//!
//! `biogate` is a small HTTP backend for user registration and login with
//! biometric payloads, plus cookie-session keepalive tracking.
//!
//! ## Sessions
//!
//! Session state lives in an injected keyed store with a rolling idle window
//! (default 30 seconds). Independently of that, the ping endpoint enforces an
//! absolute 1-hour cap measured from the first ping: once exceeded, the store
//! entry is destroyed and the client receives HTTP `440`. The two expiry
//! mechanisms coexist and are never unified.
//!
//! ## Validation
//!
//! Registration and login payloads are checked by pure, side-effect-free
//! validators before any persistence call. Rules run in a fixed order and the
//! first failure wins; only the missing-fields rule aggregates.

pub mod biogate;
pub mod cli;
