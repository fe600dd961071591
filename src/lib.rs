//! Subrelay - Subtitle and Text Translation Relay
//!
//! Relays user text and SRT subtitle files to hosted translation backends
//! (LLM chat completion or literal machine translation) and hands the
//! translated result back, caption by caption.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod credentials;
pub mod preferences;
pub mod subtitle;
pub mod translate;
pub mod progress;
pub mod batch;
pub mod job;
pub mod handler;
