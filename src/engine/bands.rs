//! Row-band execution with progress checkpoints.
//!
//! The grid is converted a band of rows at a time. After each band a
//! [`ProgressEvent`] is reported; the first 10% is reserved for setup and the
//! last 10% for assembly.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::convert::{render_cell, sample, ConversionResult, PixelBuffer, RenderCell};
use crate::error::ConvertError;
use crate::settings::JobPlan;

/// Percent reported before the first band.
pub const SETUP_PERCENT: f32 = 10.0;

/// Percent span covered by the bands.
pub const BANDS_PERCENT: f32 = 80.0;

/// Percent reported while assembling the result.
pub const FINALIZE_PERCENT: f32 = 95.0;

pub const COMPLETE_PERCENT: f32 = 100.0;

/// A progress checkpoint for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub percent: f32,
    pub stage: String,
}

impl ProgressEvent {
    pub fn new(percent: f32, stage: impl Into<String>) -> Self {
        Self {
            percent,
            stage: stage.into(),
        }
    }
}

/// Receives progress events from an executing job.
///
/// Returning `false` means nobody is listening any more; the executor stops
/// at the next band boundary.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent) -> bool;
}

impl<F: FnMut(ProgressEvent)> ProgressSink for F {
    fn report(&mut self, event: ProgressEvent) -> bool {
        self(event);
        true
    }
}

/// How an execution ended.
#[derive(Debug)]
pub enum Execution {
    Complete(ConversionResult),
    /// The sink went away; `rows_done` rows had been converted.
    Abandoned { rows_done: u32 },
}

/// Rows per band for a grid of `height` rows.
///
/// Small grids get fine bands for responsive progress, large grids get
/// coarse bands to amortize per-band overhead.
pub fn band_size(height: u32) -> u32 {
    match height {
        0..=50 => 5,
        51..=100 => 10,
        101..=200 => 15,
        201..=400 => 20,
        _ => 25,
    }
}

/// Row ranges covering `0..height` in band order.
pub fn bands(height: u32) -> impl Iterator<Item = Range<u32>> {
    let step = band_size(height);
    (0..height)
        .step_by(step as usize)
        .map(move |start| start..(start + step).min(height))
}

/// Percent reported after `rows_done` of `height` rows.
pub fn band_progress(rows_done: u32, height: u32) -> f32 {
    if height == 0 {
        return SETUP_PERCENT + BANDS_PERCENT;
    }
    SETUP_PERCENT + (rows_done as f32 / height as f32) * BANDS_PERCENT
}

/// Render the rows in `rows`.
pub fn render_band(
    buffer: &PixelBuffer,
    plan: &JobPlan,
    rows: Range<u32>,
) -> Result<Vec<Vec<RenderCell>>, ConvertError> {
    let grid = plan.grid;
    rows.map(|y| {
        (0..grid.width)
            .map(|x| {
                let px = sample(buffer, grid, x, y)?;
                Ok(render_cell(px, &plan.palette, plan.color_mode))
            })
            .collect::<Result<Vec<_>, ConvertError>>()
    })
    .collect()
}

/// Convert the whole grid band by band, reporting progress to `sink`.
///
/// Events arrive in band order with non-decreasing percent and end with a
/// 100% event when the job completes.
pub fn execute<S: ProgressSink + ?Sized>(
    buffer: &PixelBuffer,
    plan: &JobPlan,
    sink: &mut S,
) -> Result<Execution, ConvertError> {
    let grid = plan.grid;
    if !sink.report(ProgressEvent::new(SETUP_PERCENT, "Starting conversion...")) {
        return Ok(Execution::Abandoned { rows_done: 0 });
    }

    let mut rows = Vec::with_capacity(grid.height as usize);
    for band in bands(grid.height) {
        let (start, end) = (band.start, band.end);
        rows.extend(render_band(buffer, plan, band)?);
        log::debug!("Converted rows {}-{} of {}", start, end, grid.height);

        let event = ProgressEvent::new(
            band_progress(end, grid.height),
            format!("Converting rows {}-{}...", start, end),
        );
        if !sink.report(event) {
            return Ok(Execution::Abandoned { rows_done: end });
        }
    }

    if !sink.report(ProgressEvent::new(FINALIZE_PERCENT, "Finalizing...")) {
        return Ok(Execution::Abandoned {
            rows_done: grid.height,
        });
    }
    let result = ConversionResult::new(grid, plan.color_mode, rows);
    // The final event is informational; the result is complete either way.
    sink.report(ProgressEvent::new(COMPLETE_PERCENT, "Complete!"));
    Ok(Execution::Complete(result))
}
