//! State module for tracking scrape progress
//!
//! - `LoopState`: where the listing page loop currently is, and whether it
//!   has ended on the success or the abort path

mod loop_state;

pub use loop_state::LoopState;
