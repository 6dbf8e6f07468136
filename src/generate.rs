//! Sign generation runs
//!
//! Composes every segment, then renders and saves the composed signs in
//! parallel. A layout error fails its whole segment; a render or save error
//! fails only its sign. A sign whose name was already composed earlier in the
//! run is failed instead of rendered, so no output file is written twice.
//! Everything is collected into a [`RunResult`].

use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::compose::{compose_segment, LayoutPolicy};
use crate::compositor::TileCompositor;
use crate::models::{LineSegment, Sign};
use crate::output::{save_png, sign_path};

/// Status of a single sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignStatus {
    /// Rendered and written
    Success,
    /// Composed only (dry run)
    Planned,
    /// Render or save failed
    Failed(String),
}

impl SignStatus {
    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, SignStatus::Failed(_))
    }
}

impl std::fmt::Display for SignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignStatus::Success => write!(f, "success"),
            SignStatus::Planned => write!(f, "planned"),
            SignStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Outcome for one sign.
#[derive(Debug, Clone)]
pub struct SignResult {
    pub name: String,
    pub status: SignStatus,
    /// File written, if any
    pub output: Option<PathBuf>,
    pub duration: Duration,
}

/// A segment whose layout could not be composed.
#[derive(Debug, Clone)]
pub struct SegmentFailure {
    /// Position of the segment in the input
    pub index: usize,
    /// Line id of the segment
    pub line: String,
    pub error: String,
}

/// Result of a complete run.
#[derive(Debug, Default)]
pub struct RunResult {
    pub signs: Vec<SignResult>,
    pub segment_failures: Vec<SegmentFailure>,
    pub total_duration: Duration,
}

impl RunResult {
    /// Number of signs written or planned.
    pub fn success_count(&self) -> usize {
        self.signs.iter().filter(|r| !r.status.is_failure()).count()
    }

    /// Number of signs that failed.
    pub fn failed_count(&self) -> usize {
        self.signs.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check that no sign and no segment failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.segment_failures.is_empty()
    }

    /// Failed sign results.
    pub fn failures(&self) -> Vec<&SignResult> {
        self.signs.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the run.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let failed = self.failed_count();
        let segments = self.segment_failures.len();

        if self.is_success() {
            lines.push(format!(
                "Generated {} sign{} in {:?}",
                self.success_count(),
                if self.success_count() == 1 { "" } else { "s" },
                self.total_duration
            ));
        } else {
            lines.push(format!(
                "Generation failed: {} succeeded, {} failed, {} segment{} aborted",
                self.success_count(),
                failed,
                segments,
                if segments == 1 { "" } else { "s" }
            ));
            for seg in &self.segment_failures {
                lines.push(format!("  - segment {} (line {}): {}", seg.index + 1, seg.line, seg.error));
            }
            for sign in self.failures() {
                lines.push(format!("  - {}: {}", sign.name, sign.status));
            }
        }

        lines.join("\n")
    }
}

/// Options for a run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub policy: LayoutPolicy,
    pub out_dir: PathBuf,
    /// Render threads; `None` uses rayon's default
    pub jobs: Option<usize>,
    /// Compose only, write nothing
    pub dry_run: bool,
}

/// Compose every segment, returning the signs of those that succeed.
pub fn compose_all(
    segments: &[LineSegment],
    policy: &LayoutPolicy,
) -> (Vec<Sign>, Vec<SegmentFailure>) {
    let mut signs = Vec::new();
    let mut failures = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        match compose_segment(segment, policy) {
            Ok(composed) => {
                info!("segment {}: {} signs", index + 1, composed.len());
                signs.extend(composed);
            }
            Err(e) => {
                warn!("segment {} aborted: {}", index + 1, e);
                failures.push(SegmentFailure {
                    index,
                    line: segment.line_id(),
                    error: e.to_string(),
                });
            }
        }
    }

    (signs, failures)
}

/// Run generation for all segments.
pub fn generate(
    segments: &[LineSegment],
    options: &GenerateOptions,
    compositor: &TileCompositor,
) -> RunResult {
    let start = Instant::now();
    let (signs, segment_failures) = compose_all(segments, &options.policy);
    let (signs, duplicates) = split_duplicates(signs);

    let mut results: Vec<SignResult> = if options.dry_run {
        signs
            .iter()
            .map(|sign| SignResult {
                name: sign.name.clone(),
                status: SignStatus::Planned,
                output: None,
                duration: Duration::ZERO,
            })
            .collect()
    } else {
        render_signs(&signs, options, compositor)
    };
    results.extend(duplicates);

    RunResult { signs: results, segment_failures, total_duration: start.elapsed() }
}

/// Keep the first sign of each name; later ones become failed results.
fn split_duplicates(signs: Vec<Sign>) -> (Vec<Sign>, Vec<SignResult>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(signs.len());
    let mut duplicates = Vec::new();

    for sign in signs {
        if seen.insert(sign.name.clone()) {
            unique.push(sign);
        } else {
            warn!("{}: duplicate sign name, not rendered", sign.name);
            duplicates.push(SignResult {
                name: sign.name,
                status: SignStatus::Failed("duplicate sign name".to_string()),
                output: None,
                duration: Duration::ZERO,
            });
        }
    }

    (unique, duplicates)
}

fn render_signs(
    signs: &[Sign],
    options: &GenerateOptions,
    compositor: &TileCompositor,
) -> Vec<SignResult> {
    let work = || -> Vec<SignResult> {
        signs.par_iter().map(|sign| render_one(sign, &options.out_dir, compositor)).collect()
    };

    match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                warn!("could not build a {}-thread pool ({}), using the global pool", jobs, e);
                work()
            }
        },
        None => work(),
    }
}

fn render_one(sign: &Sign, out_dir: &Path, compositor: &TileCompositor) -> SignResult {
    let start = Instant::now();
    let path = sign_path(out_dir, &sign.name);

    let outcome = compositor
        .render(&sign.grid)
        .map_err(|e| e.to_string())
        .and_then(|image| save_png(&image, &path).map_err(|e| e.to_string()));

    let duration = start.elapsed();
    match outcome {
        Ok(()) => {
            debug!("wrote {}", path.display());
            SignResult { name: sign.name.clone(), status: SignStatus::Success, output: Some(path), duration }
        }
        Err(e) => {
            warn!("{}: {}", sign.name, e);
            SignResult { name: sign.name.clone(), status: SignStatus::Failed(e), output: None, duration }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigCode;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn segment(stations: &[&str], anchor: &[&str], row0: &[&str], row1: &[&str]) -> LineSegment {
        let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let codes = |v: &[&str]| v.iter().map(|c| ConfigCode::parse(c).unwrap()).collect::<Vec<_>>();
        LineSegment::new(ids(stations), ids(anchor), [codes(row0), codes(row1)]).unwrap()
    }

    /// Write a tile for every token any sign needs.
    fn write_assets(dir: &Path, signs: &[Sign], cell: u32) {
        let tokens: HashSet<&String> =
            signs.iter().flat_map(|s| s.grid.iter().flatten()).filter(|t| !t.is_empty()).collect();
        for token in tokens {
            RgbaImage::from_pixel(cell, cell, Rgba([0, 0, 0, 255]))
                .save(dir.join(format!("{}.png", token)))
                .unwrap();
        }
    }

    fn options(out_dir: &Path, dry_run: bool) -> GenerateOptions {
        GenerateOptions {
            policy: LayoutPolicy { cell_size: 2, ..LayoutPolicy::default() },
            out_dir: out_dir.to_path_buf(),
            jobs: Some(2),
            dry_run,
        }
    }

    #[test]
    fn test_generate_writes_every_sign() {
        let assets = tempdir().unwrap();
        let out = tempdir().unwrap();
        let segments =
            vec![segment(&["1+01", "1+00"], &["1+01", "1+00"], &["<2", "<1"], &[">1", ">2"])];

        let (signs, _) = compose_all(&segments, &options(out.path(), false).policy);
        write_assets(assets.path(), &signs, 2);

        let compositor = TileCompositor::new(assets.path(), 2);
        let result = generate(&segments, &options(out.path(), false), &compositor);

        assert!(result.is_success(), "{}", result.summary());
        assert_eq!(result.success_count(), signs.len());
        for sign in &signs {
            let path = sign_path(out.path(), &sign.name);
            assert!(path.exists(), "missing {}", path.display());
        }

        let detailed = image::open(sign_path(out.path(), "sh1+01+")).unwrap();
        assert_eq!((detailed.width(), detailed.height()), (40, 4));
    }

    #[test]
    fn test_generate_missing_asset_fails_only_that_sign() {
        let assets = tempdir().unwrap();
        let out = tempdir().unwrap();
        let segments = vec![segment(&["1+01", "1+00"], &["1+01", "1+00"], &["<2", "<2"], &["0", "0"])];

        let (signs, _) = compose_all(&segments, &options(out.path(), false).policy);
        write_assets(assets.path(), &signs, 2);
        std::fs::remove_file(assets.path().join("tczm1+00.png")).unwrap();

        let compositor = TileCompositor::new(assets.path(), 2);
        let result = generate(&segments, &options(out.path(), false), &compositor);

        assert!(!result.is_success());
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.failures()[0].name, "sh1+00+");
        assert_eq!(result.success_count(), 1);
        assert!(sign_path(out.path(), "sh1+01+").exists());
        assert!(result.summary().contains("sh1+00+"));
    }

    #[test]
    fn test_generate_segment_failure_does_not_stop_others() {
        let out = tempdir().unwrap();
        let segments = vec![
            segment(&["1+01", "1+00"], &["1+99"], &["<2", "0"], &["0", "0"]),
            segment(&["2+01", "2+00"], &["2+01", "2+00"], &["<2", "0"], &["0", "0"]),
        ];

        let compositor = TileCompositor::new("unused", 2);
        let result = generate(&segments, &options(out.path(), true), &compositor);

        assert_eq!(result.segment_failures.len(), 1);
        assert_eq!(result.segment_failures[0].index, 0);
        assert_eq!(result.segment_failures[0].line, "1");
        assert_eq!(result.signs.len(), 1);
        assert_eq!(result.signs[0].name, "sh2+01+");
        assert!(!result.is_success());
        assert!(result.summary().contains("segment 1 (line 1)"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let out = tempdir().unwrap();
        let segments = vec![segment(&["1+01", "1+00"], &["1+01", "1+00"], &["<2", "<2"], &["0", "0"])];

        let compositor = TileCompositor::new("unused", 2);
        let result = generate(&segments, &options(out.path(), true), &compositor);

        assert!(result.is_success());
        assert!(result.signs.iter().all(|s| s.status == SignStatus::Planned));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_duplicate_names_fail_instead_of_overwriting() {
        let assets = tempdir().unwrap();
        let out = tempdir().unwrap();
        // Both segments fire a compact sign at 5+00
        let segments = vec![
            segment(&["5+01", "5+00"], &["5+01", "5+00"], &["<1", "<1"], &["0", "0"]),
            segment(&["5+00", "5-01"], &["5+00", "5-01"], &["<1", "0"], &["0", "0"]),
        ];

        let (signs, _) = compose_all(&segments, &options(out.path(), false).policy);
        let names: Vec<&str> = signs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["dh5+01+", "dh5+00+", "dh5+00+"]);
        write_assets(assets.path(), &signs, 2);

        let compositor = TileCompositor::new(assets.path(), 2);
        let result = generate(&segments, &options(out.path(), false), &compositor);

        assert!(!result.is_success());
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.failures()[0].name, "dh5+00+");
        assert!(result.summary().contains("duplicate sign name"));

        let written: Vec<_> = result.signs.iter().filter_map(|s| s.output.as_ref()).collect();
        assert_eq!(written.len(), 2);
        assert!(sign_path(out.path(), "dh5+00+").exists());
    }

    #[test]
    fn test_duplicate_names_reported_in_dry_run() {
        let out = tempdir().unwrap();
        let segments = vec![
            segment(&["5+01", "5+00"], &["5+01", "5+00"], &["<1", "<1"], &["0", "0"]),
            segment(&["5+00", "5-01"], &["5+00", "5-01"], &["<1", "0"], &["0", "0"]),
        ];

        let compositor = TileCompositor::new("unused", 2);
        let result = generate(&segments, &options(out.path(), true), &compositor);

        assert!(!result.is_success());
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.signs.iter().filter(|s| s.status == SignStatus::Planned).count(), 2);
    }

    #[test]
    fn test_summary_success() {
        let result = RunResult {
            signs: vec![SignResult {
                name: "sh1+00+".to_string(),
                status: SignStatus::Success,
                output: None,
                duration: Duration::ZERO,
            }],
            ..Default::default()
        };
        assert!(result.summary().starts_with("Generated 1 sign in"));
    }
}
