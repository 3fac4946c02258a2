pub mod commands;
pub mod interaction;
pub mod pins;
pub mod snapping;
pub mod strategies;
pub mod sync;

pub use commands::{CanvasCommand, CanvasOverlay, WhenToRun, apply_commands};
pub use interaction::{
    ActiveControl, CanvasState, EdgePosition, InteractionSession, InteractionState, Modifiers,
};
pub use snapping::SnappingConfig;
pub use strategies::{CanvasStrategy, default_strategies, pick_strategy};
pub use sync::SyncEngine;
