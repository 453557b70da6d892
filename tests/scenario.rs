use approx::assert_relative_eq;
use vthresh::{
    compute_error_rate, error_rates, CsvRenderer, PlotStyle, Renderer, SvgRenderer, SweepConfig,
    ThresholdModel, VoltageDomain, VthreshError,
};

fn reference_model() -> ThresholdModel {
    ThresholdModel::new(2.5, 0.7, 0.1)
}

#[test]
fn reference_sweep_matches_known_points() {
    let model = reference_model();
    let domain = VoltageDomain::new(vec![2.3, 3.0, 3.2, 3.4]).unwrap();
    let series = compute_error_rate(&domain, &model).unwrap();
    let rates = series.error_rates();

    assert!(rates[0] < 1e-18);
    assert_relative_eq!(rates[0], 1.1285884059538e-19, max_relative = 1e-9);
    assert_relative_eq!(rates[1], 0.02275013194817922, max_relative = 1e-9);
    assert_eq!(rates[2], 0.5);
    assert_relative_eq!(rates[3], 0.02275013194817922, max_relative = 1e-9);
}

#[test]
fn default_sweep_peaks_next_to_threshold() {
    let config = SweepConfig::default();
    let model = config.model();
    let series = compute_error_rate(&config.domain().unwrap(), &model).unwrap();

    assert_eq!(series.len(), 400);
    let peak = series.peak().unwrap();
    assert!((peak.voltage - model.effective_threshold()).abs() < 0.005);
    assert!(peak.error_rate <= 0.5 && peak.error_rate > 0.45);

    let first = series.points()[0];
    let last = series.points()[series.len() - 1];
    assert_eq!(first.voltage, 2.3);
    assert_eq!(last.voltage, 4.0);
    assert!(first.error_rate < 1e-15);
    assert!(last.error_rate < 1e-15);
}

#[test]
fn rises_below_and_falls_above_threshold() {
    let model = reference_model();
    let below = error_rates(&[2.9, 3.0, 3.1, 3.15, 3.19], &model).unwrap();
    let above = error_rates(&[3.2, 3.25, 3.3, 3.4, 3.5], &model).unwrap();

    let below = below.error_rates();
    let above = above.error_rates();
    assert!(below.windows(2).all(|w| w[1] > w[0]));
    assert!(above.windows(2).all(|w| w[1] < w[0]));
    assert!(below[below.len() - 1] < 0.5);
    assert_eq!(above[0], 0.5);
}

#[test]
fn negative_offset_moves_threshold_down() {
    let model = ThresholdModel::new(1.8, -0.3, 0.05);
    let series = error_rates(&[1.5], &model).unwrap();
    assert_eq!(series.points()[0].error_rate, 0.5);
}

#[test]
fn preconditions_are_enforced() {
    let domain = VoltageDomain::linspace(0.0, 1.0, 3).unwrap();
    for noise in [0.0, -0.5] {
        let model = ThresholdModel::new(0.5, 0.0, noise);
        assert!(matches!(
            compute_error_rate(&domain, &model),
            Err(VthreshError::InvalidParameter(_))
        ));
    }

    assert!(matches!(
        error_rates(&[], &reference_model()),
        Err(VthreshError::EmptyInput(_))
    ));
    assert!(matches!(
        VoltageDomain::new(Vec::new()),
        Err(VthreshError::EmptyInput(_))
    ));
}

#[test]
fn csv_file_round_trips_through_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("sweep.csv");

    let model = reference_model();
    let domain = VoltageDomain::linspace(2.3, 4.0, 18).unwrap();
    let series = compute_error_rate(&domain, &model).unwrap();

    let mut renderer = CsvRenderer::create(&path).unwrap();
    renderer.render(&series, model.effective_threshold()).unwrap();
    drop(renderer);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<(f64, f64)> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(rows.len(), series.len());
    for (row, point) in rows.iter().zip(series.iter()) {
        assert_eq!(row.0, point.voltage);
        assert_eq!(row.1, point.error_rate);
    }
}

#[test]
fn svg_renderer_writes_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("error_rate.svg");

    let model = reference_model();
    let domain = VoltageDomain::linspace(2.3, 4.0, 100).unwrap();
    let series = compute_error_rate(&domain, &model).unwrap();

    let mut renderer = SvgRenderer::new(&path, PlotStyle::default());
    assert_eq!(renderer.name(), "svg");
    renderer.render(&series, model.effective_threshold()).unwrap();

    assert_eq!(renderer.path(), path.as_path());
    let svg = std::fs::read_to_string(renderer.path()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Threshold Voltage = 3.2V"));
    assert!(svg.contains("Error Rate with Transistor Effect"));
}

#[test]
fn svg_renderer_rejects_bad_style() {
    let dir = tempfile::tempdir().unwrap();
    let style = PlotStyle {
        height: 0,
        ..Default::default()
    };
    let series = error_rates(&[3.2], &reference_model()).unwrap();

    let mut renderer = SvgRenderer::new(dir.path().join("bad.svg"), style);
    assert!(matches!(
        renderer.render(&series, 3.2),
        Err(VthreshError::InvalidConfig(_))
    ));
}
