//! twentyq CLI library: turns resolved settings into a running game and renders the result.
//!
//! Used by the `twentyq` binary. Builds a [`Coordinator`](twentyq::Coordinator) with one
//! OpenAI-compatible client per role, plays it, and prints either the live transcript or JSON.

pub mod display;
pub mod game;

pub use game::{
    build_coordinator, cancel_on_ctrl_c, play, require_api_key, GameOptions, GameOutput,
    RunError,
};
