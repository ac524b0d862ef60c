//! Concrete steps of the two-pass processing workflow.

mod measure;
mod plan;
mod render;
mod verify;

pub use measure::MeasureStep;
pub use plan::PlanStep;
pub use render::RenderStep;
pub use verify::{VerifyStep, VERIFY_FALLBACK_LUFS};
