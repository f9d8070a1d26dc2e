//! vid-axum: Axum transport for the video registry.
//!
//! Mounts the metadata routes, streamed uploads and streamed downloads of a
//! [`vid_core::VideoService`] under `/video`, and renders `VidError`s as
//! JSON `{name, message, code, className, errors}` bodies.

pub mod app;
pub mod rest;
pub mod state;
pub mod upload;
mod error;
pub use error::VidAxumError;
pub use state::VidAxumState;

pub use app::{axum, VidAxumApp};
