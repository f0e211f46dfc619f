pub mod config;
pub mod demo_data;
pub mod engine;
pub mod error;
pub mod export;
pub mod loader;
pub mod persist;
pub mod render;
pub mod shots;
pub mod state;

pub use engine::{FilterSelector, ShotView, SummaryStats, apply};
pub use error::{Result, ShotMapError};
pub use loader::{InvalidRowPolicy, NormalizeOptions, NormalizeReport, normalize};
pub use render::{ColorClass, MapVariant, RenderConfig, ShotRenderDescriptor};
pub use shots::{PitchPoint, RawShotRecord, ShotEvent, ShotTable};
