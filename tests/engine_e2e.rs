//! End-to-end tests for background conversion jobs.
//!
//! These tests drive jobs through the public handle and check:
//! - Output shape for custom and preset grids
//! - Progress ordering and the terminal event
//! - Repeatable output
//! - Rejections before any work starts

use glyph_grid::convert::{ColorMode, GridSpec, PixelBuffer, SizePreset};
use glyph_grid::engine::{convert, ConversionJob, JobEvent, JobState, ProgressEvent};
use glyph_grid::error::ErrorKind;
use glyph_grid::settings::{CharacterSet, ConversionSettings};

/// Helper to create a test image with the given pattern.
fn make_test_image(pattern: &str, width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let px = match pattern {
                "gradient_h" => {
                    let v = ((x as f32 / width as f32) * 255.0) as u8;
                    [v, v, v, 255]
                }
                "face_like" => {
                    let cx = width as f32 / 2.0;
                    let cy = height as f32 / 2.0;
                    let max = (cx.powi(2) + cy.powi(2)).sqrt();
                    let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                    let v = (255.0 * (1.0 - d / max)).max(0.0) as u8;
                    [v, (v as f32 * 0.8) as u8, (v as f32 * 0.6) as u8, 255]
                }
                "fade_alpha" => [255, 128, 0, (y * 255 / height.max(1)) as u8],
                _ => panic!("Unknown pattern: {}", pattern),
            };
            data.extend_from_slice(&px);
        }
    }
    PixelBuffer::new(width, height, data).unwrap()
}

fn custom(width: u32, height: u32, mode: ColorMode) -> ConversionSettings {
    ConversionSettings {
        size: SizePreset::Custom,
        custom_width: width,
        custom_height: height,
        color_mode: mode,
        ..Default::default()
    }
}

/// Drain a job, returning the progress events and the terminal event.
fn drain(mut job: ConversionJob) -> (Vec<ProgressEvent>, JobEvent, JobState) {
    let mut progress = Vec::new();
    loop {
        match job.recv().expect("job ended without a terminal event") {
            JobEvent::Progress(p) => progress.push(p),
            terminal => {
                assert!(job.recv().is_none(), "no events after the terminal one");
                return (progress, terminal, job.state());
            }
        }
    }
}

// ====================
// Output shape
// ====================

#[test]
fn test_custom_dimensions_round_trip() {
    for (w, h) in [(10, 10), (37, 11), (80, 120), (500, 12)] {
        let image = make_test_image("face_like", 64, 48);
        let job = ConversionJob::submit(image, &custom(w, h, ColorMode::Color)).unwrap();
        assert_eq!(job.grid(), GridSpec::new(w, h));

        let result = job.wait(|_| {}).unwrap();
        assert_eq!(result.rows().len(), h as usize);
        assert!(result.rows().iter().all(|row| row.len() == w as usize));
    }
}

#[test]
fn test_preset_uses_source_aspect() {
    let image = make_test_image("gradient_h", 640, 480);
    let settings = ConversionSettings {
        size: SizePreset::Small,
        ..Default::default()
    }
    .with_source_dimensions(image.width(), image.height());

    let result = ConversionJob::submit(image, &settings).unwrap().wait(|_| {}).unwrap();
    assert_eq!(result.grid(), GridSpec::new(80, 40));

    // Left edge dark, right edge bright (last column samples x = 632 -> 251)
    let first = result.to_plain_text().lines().next().unwrap().to_string();
    assert_eq!(first.chars().next(), Some('.'));
    assert_eq!(first.chars().last(), Some('#'));
}

#[test]
fn test_blackwhite_never_annotated() {
    let image = make_test_image("face_like", 120, 90);
    let settings = ConversionSettings {
        character_set: CharacterSet::Extended,
        ..custom(60, 30, ColorMode::BlackWhite)
    };
    let result = ConversionJob::submit(image, &settings).unwrap().wait(|_| {}).unwrap();
    assert!(result.cells().all(|c| c.color.is_none()));
    assert!(!result.to_markup().contains("<span"));
}

#[test]
fn test_grayscale_annotations_are_gray() {
    let image = make_test_image("fade_alpha", 50, 50);
    let result = ConversionJob::submit(image, &custom(25, 25, ColorMode::Grayscale))
        .unwrap()
        .wait(|_| {})
        .unwrap();
    for cell in result.cells() {
        let c = cell.color.unwrap();
        assert_eq!((c.r, c.r), (c.g, c.b));
    }
}

// ====================
// Progress and lifecycle
// ====================

#[test]
fn test_progress_is_ordered_and_ends_at_100() {
    let image = make_test_image("gradient_h", 200, 200);
    let job = ConversionJob::submit(image, &custom(40, 137, ColorMode::Color)).unwrap();
    assert_eq!(job.state(), JobState::Executing);

    let (progress, terminal, state) = drain(job);
    assert!(matches!(terminal, JobEvent::Complete(_)));
    assert_eq!(state, JobState::Complete);

    let percents: Vec<f32> = progress.iter().map(|p| p.percent).collect();
    assert_eq!(percents.first(), Some(&10.0));
    assert_eq!(percents.last(), Some(&100.0));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{:?}", percents);
    assert!(percents.iter().all(|p| (0.0..=100.0).contains(p)));

    // 137 rows in bands of 15: 10 bands
    let bands = progress
        .iter()
        .filter(|p| p.stage.starts_with("Converting rows"))
        .count();
    assert_eq!(bands, 10);
}

#[test]
fn test_inline_and_background_agree() {
    let settings = custom(33, 21, ColorMode::Color);
    let image = make_test_image("face_like", 90, 70);

    let mut inline_events = Vec::new();
    let inline = convert(&image, &settings, |e| inline_events.push(e.percent)).unwrap();

    let mut job_events = Vec::new();
    let background = ConversionJob::submit(image, &settings)
        .unwrap()
        .wait(|e| job_events.push(e.percent))
        .unwrap();

    assert_eq!(inline, background);
    assert_eq!(inline_events, job_events);
}

#[test]
fn test_repeat_conversion_is_identical() {
    let settings = ConversionSettings {
        character_set: CharacterSet::Extended,
        ..custom(64, 40, ColorMode::Color)
    };
    let a = ConversionJob::submit(make_test_image("face_like", 160, 120), &settings)
        .unwrap()
        .wait(|_| {})
        .unwrap();
    let b = ConversionJob::submit(make_test_image("face_like", 160, 120), &settings)
        .unwrap()
        .wait(|_| {})
        .unwrap();

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.to_markup(), b.to_markup());
}

#[test]
fn test_abandon_after_first_event() {
    let image = make_test_image("gradient_h", 400, 400);
    let mut job = ConversionJob::submit(image, &custom(500, 500, ColorMode::Color)).unwrap();

    match job.recv() {
        Some(JobEvent::Progress(p)) => assert_eq!(p.percent, 10.0),
        other => panic!("Expected setup progress, got {:?}", other),
    }
    assert_eq!(job.state(), JobState::Executing);

    let started = std::time::Instant::now();
    job.abandon();
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
}

#[test]
fn test_parallel_jobs_are_independent() {
    let handles: Vec<_> = [ColorMode::Color, ColorMode::Grayscale, ColorMode::BlackWhite]
        .into_iter()
        .map(|mode| {
            let image = make_test_image("face_like", 80, 60);
            ConversionJob::submit(image, &custom(40, 20, mode)).unwrap()
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|job| job.wait(|_| {}).unwrap())
        .collect();
    assert_eq!(results[0].color_mode(), ColorMode::Color);
    assert_eq!(results[1].color_mode(), ColorMode::Grayscale);
    assert_eq!(results[2].color_mode(), ColorMode::BlackWhite);
    // Same glyphs for color and grayscale; only annotations differ
    assert_eq!(results[0].to_plain_text(), results[1].to_plain_text());
}

// ====================
// Rejections
// ====================

#[test]
fn test_capacity_rejection_happens_before_work() {
    // 5121 x 5120 RGBA is just over 100 MB
    let image = PixelBuffer::new(5121, 5120, vec![0; 5121 * 5120 * 4]).unwrap();
    let err = ConversionJob::submit(image, &custom(100, 100, ColorMode::Color)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity);
    assert!(err.to_string().contains("Try reducing the output size"));
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = ConversionSettings {
        character_set: CharacterSet::Custom,
        custom_characters: String::new(),
        ..custom(9, 10, ColorMode::Color)
    };
    let err = ConversionJob::submit(make_test_image("gradient_h", 10, 10), &settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Custom character set cannot be empty"));
    assert!(err.to_string().contains("Custom width must be between 10 and 500"));
}

#[test]
fn test_degenerate_source_dimensions_rejected() {
    let settings = ConversionSettings::default().with_source_dimensions(640, 0);
    let err = ConversionJob::submit(make_test_image("gradient_h", 10, 10), &settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}
