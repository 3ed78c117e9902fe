//! Shared band composition logic used by both the backend and the wasm frontend.
//!
//! Nothing in this crate performs I/O: the store, the network and the DOM live in the
//! `backend` and `frontend` crates, which drive the types defined here.

pub mod carousel;
pub mod error;
pub mod model;
pub mod render;
pub mod reorder;
pub mod requests;
pub mod upload;

pub use error::BandError;
