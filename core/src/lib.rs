//! FitBuddy core: session lifecycle, favourites and exercise list state kept
//! in sync with an on-device key-value store, plus the navigation gate that
//! follows the session.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod navigation;
pub mod state;
pub mod store;
