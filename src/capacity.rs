//! Pre-flight capacity checks.
//!
//! Estimates memory and wall time for a job and rejects it before any
//! sampling starts. The check runs once per job.

use crate::convert::{ColorMode, GridSpec};
use crate::error::ConvertError;

/// Largest total memory estimate accepted, in MiB.
pub const MAX_MEMORY_MB: f64 = 100.0;

/// Largest time estimate accepted, in seconds.
pub const MAX_ESTIMATED_SECONDS: u32 = 30;

/// Markup bytes per cell in color mode.
const COLOR_BYTES_PER_CHAR: u64 = 50;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Memory estimate in MiB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryEstimate {
    pub input_mb: f64,
    pub output_mb: f64,
    pub total_mb: f64,
}

/// Rough job complexity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn name(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

/// Wall time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEstimate {
    pub seconds: u32,
    pub complexity: Complexity,
}

/// Approved job estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityReport {
    pub memory: MemoryEstimate,
    pub time: TimeEstimate,
}

/// Size of the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub chars: u64,
    pub bytes: u64,
}

/// Estimate memory: 4 bytes per source pixel plus 2 bytes per output cell.
pub fn estimate_memory(source_width: u32, source_height: u32, grid: GridSpec) -> MemoryEstimate {
    let input_mb = (source_width as f64 * source_height as f64 * 4.0) / BYTES_PER_MB;
    let output_mb = (grid.cells() as f64 * 2.0) / BYTES_PER_MB;
    MemoryEstimate {
        input_mb,
        output_mb,
        total_mb: input_mb + output_mb,
    }
}

/// Estimate wall time from combined input and output pixel counts.
pub fn estimate_time(source_width: u32, source_height: u32, grid: GridSpec) -> TimeEstimate {
    let input = source_width as f64 * source_height as f64;
    let score = (input + grid.cells() as f64) / 1_000_000.0;

    let (seconds, complexity) = if score < 1.0 {
        (2, Complexity::Low)
    } else if score < 5.0 {
        (5, Complexity::Medium)
    } else {
        (10, Complexity::High)
    };
    TimeEstimate {
        seconds,
        complexity,
    }
}

/// Estimate the size of the rendered output text.
pub fn estimate_output_size(grid: GridSpec, mode: ColorMode) -> OutputSize {
    let chars = grid.cells();
    let per_char = match mode {
        ColorMode::Color => COLOR_BYTES_PER_CHAR,
        ColorMode::Grayscale | ColorMode::BlackWhite => 1,
    };
    OutputSize {
        chars,
        bytes: chars * per_char,
    }
}

/// Approve or reject a job.
///
/// # Errors
/// * `ConvertError::Capacity` - If memory or time estimates exceed the ceilings
pub fn check_capacity(
    source_width: u32,
    source_height: u32,
    grid: GridSpec,
) -> Result<CapacityReport, ConvertError> {
    let memory = estimate_memory(source_width, source_height, grid);
    let time = estimate_time(source_width, source_height, grid);

    if memory.total_mb > MAX_MEMORY_MB {
        log::warn!(
            "Rejecting {}x{} -> {}: estimated {:.1} MB exceeds {} MB",
            source_width,
            source_height,
            grid,
            memory.total_mb,
            MAX_MEMORY_MB
        );
        return Err(ConvertError::Capacity {
            reason: "Image too large to process".to_string(),
            suggestion: "Try reducing the output size or using a smaller image".to_string(),
        });
    }

    if time.seconds > MAX_ESTIMATED_SECONDS {
        log::warn!(
            "Rejecting {}x{} -> {}: estimated {}s exceeds {}s",
            source_width,
            source_height,
            grid,
            time.seconds,
            MAX_ESTIMATED_SECONDS
        );
        return Err(ConvertError::Capacity {
            reason: "Processing would take too long".to_string(),
            suggestion: "Reduce output dimensions for faster processing".to_string(),
        });
    }

    Ok(CapacityReport { memory, time })
}
