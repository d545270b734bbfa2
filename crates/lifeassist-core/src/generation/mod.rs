//! Generation client and chat framing.
//!
//! - `ChatFrame`: splits a turn list into provider history + live message
//! - `GenerationClient`: single-shot and streaming calls with failures
//!   rendered as `[Error from model: ...]` content

pub mod client;
pub mod frame;
