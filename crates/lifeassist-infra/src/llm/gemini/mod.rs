//! Google Gemini provider (native `generateContent` API).

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiProvider;
