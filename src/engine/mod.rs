//! Job execution.
//!
//! A job moves through `Idle -> Loaded -> Planned -> Guarded -> Executing`
//! and ends `Complete` or `Failed`. Planning and the capacity check run
//! synchronously before any sampling; execution proceeds in row bands with
//! progress reported after each band. Failed jobs are never retried here.

mod bands;
mod job;
mod monitor;

pub use bands::{
    band_progress, band_size, bands, execute, render_band, Execution, ProgressEvent,
    ProgressSink, BANDS_PERCENT, COMPLETE_PERCENT, FINALIZE_PERCENT, SETUP_PERCENT,
};
pub use job::{ConversionJob, JobEvent, JobState};
pub use monitor::{CheckpointTiming, PerformanceMonitor, PerformanceReport};

use crate::capacity::{check_capacity, CapacityReport};
use crate::convert::{ConversionResult, PixelBuffer};
use crate::error::ConvertError;
use crate::settings::{ConversionSettings, JobPlan};

/// Resolve settings and run the capacity check for `buffer`.
///
/// `on_state` is told about each state reached (`Planned`, `Guarded`).
pub(crate) fn prepare(
    buffer: &PixelBuffer,
    settings: &ConversionSettings,
    mut on_state: impl FnMut(JobState),
) -> Result<(JobPlan, CapacityReport), ConvertError> {
    let plan = settings.resolve()?;
    log::debug!(
        "Planned {} grid, {} palette ({} glyphs), {} mode",
        plan.grid,
        settings.character_set.name(),
        plan.palette.len(),
        plan.color_mode.name()
    );
    on_state(JobState::Planned);

    let capacity = check_capacity(buffer.width(), buffer.height(), plan.grid)?;
    on_state(JobState::Guarded);

    Ok((plan, capacity))
}

/// Plan, guard and convert on the calling thread.
///
/// Produces the same events and result as a [`ConversionJob`] without
/// spawning a worker.
pub fn convert(
    buffer: &PixelBuffer,
    settings: &ConversionSettings,
    mut on_progress: impl FnMut(ProgressEvent),
) -> Result<ConversionResult, ConvertError> {
    let (plan, _) = prepare(buffer, settings, |_| {})?;
    match execute(buffer, &plan, &mut on_progress)? {
        Execution::Complete(result) => Ok(result),
        Execution::Abandoned { rows_done } => Err(ConvertError::internal(format!(
            "inline conversion stopped after {} rows",
            rows_done
        ))),
    }
}
