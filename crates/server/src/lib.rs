//! HTTP front end for the torrent search proxy.

pub mod api;
pub mod metrics;
pub mod state;
