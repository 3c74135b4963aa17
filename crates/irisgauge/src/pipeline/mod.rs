//! Analysis pipeline.
//!
//! Stage order for one call:
//! validate input -> pupil pre-pass + reflection removal -> segmentation ->
//! geometry (pupil, then iris) -> ratio.
//!
//! The public entry point is [`Pipeline`](crate::Pipeline); this module
//! holds the stage wiring, the per-call trace and the result records.

mod result;
mod run;
mod trace;

pub use result::{AnalysisOutcome, ErrorReport, EyeSide, PirReport};
pub use trace::{PipelineTrace, Stage, StageRecord, StageStatus};

pub(crate) use run::run;
