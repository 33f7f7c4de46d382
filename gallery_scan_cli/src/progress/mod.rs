//! Progress reporting module for the CLI
//!
//! The walker reports through a channel-backed provider; a renderer task
//! drains the channel into an `indicatif` spinner on stderr.

pub mod provider;
pub mod renderer;
pub mod utils;

pub use provider::{ChannelProvider, create_progress_infrastructure};
pub use renderer::{ProgressRenderer, render_progress};
pub use utils::{format_duration, format_elapsed};
