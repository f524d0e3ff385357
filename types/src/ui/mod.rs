//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod celebration;
mod options;

pub use animation::AnimPhase;
pub use celebration::CelebrationEffect;
pub use options::UiOptions;
