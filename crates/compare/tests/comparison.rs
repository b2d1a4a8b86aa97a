//! Integration tests for matching, differencing, and reporting

use nucdiff_compare::{
    animate_directory, Animator, Comparison, Error, Extrema, Frame, Renderer, Result,
};
use nucdiff_isotopes::parse_isotopes;
use nucdiff_series::{write_series_file, Grid, GridRecord, Series, SeriesHeader};
use rstest::{fixture, rstest};

use std::path::{Path, PathBuf};

/// Unique path in the temporary directory for this test process
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nucdiff_compare_{}_{name}", std::process::id()))
}

fn quiet() -> Comparison {
    let mut comparison = Comparison::new();
    comparison.disable_progress();
    comparison
}

fn series(dim_n: usize, dim_z: usize, records: &[(i32, f32)]) -> Series {
    let mut series = Series::new(SeriesHeader::new(dim_n as i32, dim_z as i32));
    for (timestep, value) in records {
        series
            .records
            .push(GridRecord::new(*timestep, Grid::filled(dim_n, dim_z, *value)));
    }
    series
}

/// Ten records at timesteps 0, 5, 10, ... with a steadily growing difference
#[fixture]
fn drifting() -> (Series, Series) {
    let reference = (0..10).map(|i| (i * 5, -5.0)).collect::<Vec<_>>();
    let drifted = (0..10)
        .map(|i| (i * 5, -5.0 + 0.1 * i as f32))
        .collect::<Vec<_>>();
    (series(4, 3, &reference), series(4, 3, &drifted))
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<(PathBuf, (f32, f32), Option<String>)>,
    markers: Vec<Vec<String>>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frames
            .push((frame.path.clone(), frame.scale, frame.annotation.clone()));
        self.markers
            .push(frame.markers.iter().map(|m| m.label.clone()).collect());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingAnimator {
    calls: Vec<(Vec<PathBuf>, u32, PathBuf)>,
}

impl Animator for RecordingAnimator {
    fn assemble(&mut self, frames: &[PathBuf], fps: u32, output: &Path) -> Result<()> {
        self.calls.push((frames.to_vec(), fps, output.to_path_buf()));
        Ok(())
    }
}

#[rstest]
#[case(5, 1)]
#[case(4, 0)]
#[case(0, 0)]
fn offset_decides_matches(#[case] offset: i32, #[case] expected: usize) {
    let series_1 = series(2, 2, &[(10, -2.0)]);
    let series_2 = series(2, 2, &[(15, -1.0), (20, -1.0)]);

    let mut comparison = quiet();
    comparison.set_offset(offset);
    let mut differences = comparison.compare(series_1, series_2).unwrap();

    let results = differences.by_ref().collect::<Vec<_>>();
    assert_eq!(results.len(), expected);
    assert_eq!(differences.report().tally.matched, expected);
    assert_eq!(differences.report().tally.processed, 1);
}

#[test]
fn matched_difference_is_second_minus_first() {
    let series_1 = series(2, 2, &[(10, -2.0)]);
    let series_2 = series(2, 2, &[(15, -1.5)]);

    let mut comparison = quiet();
    comparison.set_offset(5);
    let result = comparison
        .compare(series_1, series_2)
        .unwrap()
        .next()
        .unwrap();

    assert_eq!(result.timestep, 10);
    assert_eq!(result.matched_timestep, 15);
    assert!(result.diff.values().iter().all(|v| *v == 0.5));
    assert_eq!(result.frame_name(), "diff_00010.png");
}

#[rstest]
#[case(0.0, 10)]
#[case(0.05, 9)]
#[case(0.45, 5)]
#[case(1.0, 0)]
fn threshold_filters_small_differences(
    drifting: (Series, Series),
    #[case] threshold: f32,
    #[case] expected: usize,
) {
    let mut comparison = quiet();
    comparison.set_threshold(threshold);
    let mut differences = comparison.compare(drifting.0, drifting.1).unwrap();

    let results = differences.by_ref().collect::<Vec<_>>();
    assert_eq!(results.len(), expected);

    // every pair is matched and widens the extrema, emitted or not
    let report = differences.report();
    assert_eq!(report.tally.matched, 10);
    assert_eq!(report.tally.rendered, expected);
    assert!((report.extrema.max - 0.9).abs() < 1e-5);
    assert_eq!(report.extrema.min, 0.0);
}

#[rstest]
fn extrema_never_shrink(drifting: (Series, Series)) {
    let (series_1, mut series_2) = drifting;

    // alternate the sign of the drift
    for (i, record) in series_2.records.iter_mut().enumerate() {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        record.grid = Grid::filled(4, 3, -5.0 + sign * 0.1 * i as f32);
    }

    let differences = quiet().compare(series_1, series_2).unwrap();

    let mut previous = Extrema::default();
    for result in differences {
        assert!(result.extrema.max >= previous.max);
        assert!(result.extrema.min <= previous.min);
        assert!(result.extrema.max >= result.max);
        assert!(result.extrema.min <= result.min);
        previous = result.extrema;
    }

    assert!(previous.max > 0.7 && previous.min < -0.8);
}

#[test]
fn empty_first_series_is_degenerate() {
    let series_1 = series(2, 2, &[]);
    let series_2 = series(2, 2, &[(0, -1.0)]);

    let mut differences = quiet().compare(series_1, series_2).unwrap();
    assert!(differences.next().is_none());

    let report = differences.report();
    assert!(report.is_degenerate());
    assert_eq!(report.tally.records, 0);
    assert_eq!(report.extrema, Extrema::default());
}

#[rstest]
#[case(None, None, (4, 3))]
#[case(Some(2), None, (2, 3))]
#[case(Some(2), Some(1), (2, 1))]
#[case(Some(100), Some(100), (4, 3))]
fn limits_clip_the_difference(
    drifting: (Series, Series),
    #[case] limit_n: Option<usize>,
    #[case] limit_z: Option<usize>,
    #[case] expected: (usize, usize),
) {
    let mut comparison = quiet();
    comparison.set_limits(limit_n, limit_z);

    let mut differences = comparison.compare(drifting.0, drifting.1).unwrap();
    assert_eq!(differences.limits(), expected);
    assert_eq!(differences.next().unwrap().diff.shape(), expected);
}

#[test]
fn mismatched_series_are_rejected() {
    let result = quiet().compare(series(2, 2, &[(0, -1.0)]), series(2, 3, &[(0, -1.0)]));
    assert!(matches!(result, Err(Error::HeaderMismatch { .. })));
}

#[test]
fn mismatched_files_are_rejected() {
    let path_1 = temp_path("mismatch_1.dat");
    let path_2 = temp_path("mismatch_2.dat");
    write_series_file(&series(120, 120, &[(0, -1.0)]), &path_1).unwrap();
    write_series_file(&series(100, 100, &[(0, -1.0)]), &path_2).unwrap();

    let result = quiet().compare_files(&path_1, &path_2);
    std::fs::remove_file(&path_1).unwrap();
    std::fs::remove_file(&path_2).unwrap();

    match result {
        Err(Error::HeaderMismatch {
            header_1, header_2, ..
        }) => {
            assert_eq!(header_1, SeriesHeader::new(120, 120));
            assert_eq!(header_2, SeriesHeader::new(100, 100));
        }
        other => panic!("expected a header mismatch, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_open_failure() {
    let path_1 = temp_path("present.dat");
    write_series_file(&series(2, 2, &[(0, -1.0)]), &path_1).unwrap();

    let result = quiet().compare_files(&path_1, temp_path("absent.dat"));
    std::fs::remove_file(&path_1).unwrap();

    assert!(matches!(result, Err(Error::OpenFailure { .. })));
}

#[rstest]
fn files_compare_like_memory(drifting: (Series, Series)) {
    let path_1 = temp_path("drift_1.dat");
    let path_2 = temp_path("drift_2.dat");
    write_series_file(&drifting.0, &path_1).unwrap();
    write_series_file(&drifting.1, &path_2).unwrap();

    let from_files = quiet()
        .compare_files(&path_1, &path_2)
        .unwrap()
        .collect::<Vec<_>>();
    std::fs::remove_file(&path_1).unwrap();
    std::fs::remove_file(&path_2).unwrap();

    let from_memory = quiet()
        .compare(drifting.0, drifting.1)
        .unwrap()
        .collect::<Vec<_>>();
    assert_eq!(from_files, from_memory);
}

#[rstest]
fn rendered_frames_follow_results(drifting: (Series, Series)) {
    let mut comparison = quiet();
    comparison.set_threshold(0.45);
    comparison.set_output_range(2.0);

    let mut renderer = RecordingRenderer::default();
    let report = comparison
        .compare(drifting.0, drifting.1)
        .unwrap()
        .render_into(&mut renderer, "frames")
        .unwrap();

    assert_eq!(report.tally.rendered, 5);
    assert_eq!(renderer.frames.len(), 5);

    let (path, scale, annotation) = &renderer.frames[0];
    assert_eq!(path, &PathBuf::from("frames/diff_00025.png"));
    assert_eq!(*scale, (-2.0, 2.0));
    assert!(annotation
        .as_deref()
        .is_some_and(|a| a.starts_with("timestep: 25\nmax diff: 0.5")));
}

#[test]
fn long_comparison_is_fully_counted() {
    let records = (0..30).map(|i| (i, -3.0)).collect::<Vec<_>>();
    let shifted = (0..30).map(|i| (i, -2.0)).collect::<Vec<_>>();

    let mut differences = quiet()
        .compare(series(3, 3, &records), series(3, 3, &shifted))
        .unwrap();
    assert_eq!(differences.by_ref().count(), 30);

    let report = differences.report();
    assert_eq!(report.tally.processed, 30);
    assert_eq!(report.tally.rendered, 30);
    assert_eq!(report.extrema, Extrema { max: 1.0, min: 0.0 });
}

#[test]
fn report_is_written_as_json() {
    let mut differences = quiet()
        .compare(series(1, 1, &[(0, -1.0)]), series(1, 1, &[(0, -3.0)]))
        .unwrap();
    differences.by_ref().for_each(drop);

    let path = temp_path("report.json");
    differences.report().write_json(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["tally"]["matched"], 1);
    assert_eq!(json["extrema"]["min"], -2.0);
    assert_eq!(json["options"]["offset"], 0);
}

#[test]
fn directory_frames_are_animated() {
    let dir = temp_path("frames");
    std::fs::create_dir_all(&dir).unwrap();
    for name in ["diff_00003.png", "diff_00001.png", "diff_00002.png", "log.txt"] {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    let mut animator = RecordingAnimator::default();
    let count = animate_directory(&mut animator, &dir, "out.mp4", 0.25, 2).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(count, 2);
    let (frames, fps, output) = &animator.calls[0];
    assert_eq!(*fps, 4);
    assert_eq!(output, &PathBuf::from("out.mp4"));
    assert!(frames[0].ends_with("diff_00001.png"));
    assert!(frames[1].ends_with("diff_00002.png"));
}

#[rstest]
fn rendered_frames_mark_isotopes(drifting: (Series, Series)) {
    let isotopes = parse_isotopes("1 h 1 0.99\n1 h 2 0.01\n2 he 4 1.0\n".as_bytes()).unwrap();

    let mut comparison = quiet();
    comparison.set_limits(Some(2), None);

    let mut renderer = RecordingRenderer::default();
    comparison
        .compare(drifting.0, drifting.1)
        .unwrap()
        .with_isotopes(isotopes)
        .render_into(&mut renderer, "frames")
        .unwrap();

    // He4 sits at N = 2, outside of the clipped difference
    assert_eq!(renderer.markers.len(), 10);
    assert!(renderer
        .markers
        .iter()
        .all(|labels| labels == &vec!["H1".to_string(), "H2".to_string()]));
}

#[test]
fn unwritable_report_names_the_path() {
    let differences = quiet()
        .compare(series(1, 1, &[]), series(1, 1, &[]))
        .unwrap();

    let message = differences
        .report()
        .write_json("/nonexistent/report.json")
        .unwrap_err()
        .to_string();
    assert!(message.contains("/nonexistent/report.json"));
}

#[test]
fn missing_file_is_named_in_the_error() {
    let error = quiet()
        .compare_files(temp_path("gone_1.dat"), temp_path("gone_2.dat"))
        .unwrap_err();
    assert!(error.to_string().contains("gone_1.dat"));
}

#[test]
fn huge_header_only_files_compare_empty() {
    let path_1 = temp_path("huge_1.dat");
    let path_2 = temp_path("huge_2.dat");
    let mut header = Vec::new();
    header.extend((1i32 << 30).to_le_bytes());
    header.extend((1i32 << 30).to_le_bytes());
    std::fs::write(&path_1, &header).unwrap();
    std::fs::write(&path_2, &header).unwrap();

    let mut differences = quiet().compare_files(&path_1, &path_2).unwrap();
    std::fs::remove_file(&path_1).unwrap();
    std::fs::remove_file(&path_2).unwrap();

    assert!(differences.next().is_none());
    assert!(differences.report().is_degenerate());
}
