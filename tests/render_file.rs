use goban::{
    AnnotationStyle, BoardConfig, BoardFile, FixedMetrics, GobanError, GridSize,
    StarPointPlacement, create_svg_file, render_svg,
};

#[test]
fn writes_svg_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goban_9x9.svg");

    let mut measure = FixedMetrics::default();
    create_svg_file(&BoardConfig::default(), &mut measure, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.trim_end().ends_with("</svg>"));
    assert_eq!(written, render_svg(&BoardConfig::default(), &mut measure).unwrap());
}

#[test]
fn unwritable_destination_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("board.svg");

    let mut measure = FixedMetrics::default();
    let err = create_svg_file(&BoardConfig::default(), &mut measure, &path).unwrap_err();
    assert!(matches!(err, GobanError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn annotated_preset_renders_labels_on_all_four_sides() {
    let config = BoardFile::builtin("9x9_annotated")
        .unwrap()
        .apply(BoardConfig::default())
        .unwrap();
    let mut measure = FixedMetrics::default();
    let svg = render_svg(&config, &mut measure).unwrap();

    assert_eq!(svg.matches("<text").count(), 36);
    assert!(svg.contains(">J</text>"));
    assert!(!svg.contains(">I</text>"));
    assert!(svg.contains(">9</text>"));
    assert!(svg.contains("font-family=\"'Microsoft YaHei', sans-serif\""));
}

#[test]
fn config_file_overrides_are_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("board.yaml");
    std::fs::write(
        &config_path,
        "size: [8, 5]\nstar_points: [[2, 2], [3, 4]]\nstar_point_diameter: 6\n",
    )
    .unwrap();

    let config = BoardFile::load(&config_path)
        .unwrap()
        .apply(BoardConfig::default())
        .unwrap();
    assert_eq!(config.size(), GridSize::new(8, 5).unwrap());
    assert_eq!(config.star_point_diameter(), 6.0);

    let mut measure = FixedMetrics::default();
    let svg = render_svg(&config, &mut measure).unwrap();
    // 13 grid lines, 2 star points, 1 border.
    assert_eq!(svg.matches("<path").count(), 16);
    assert!(svg.contains("A3 3 0 0 1"));
}

#[test]
fn no_star_points_when_disabled() {
    let config = BoardConfig::default()
        .with_star_points(StarPointPlacement::Explicit(Vec::new()))
        .unwrap()
        .with_annotations(None, Some(AnnotationStyle::ArabicNumerals))
        .unwrap();
    let mut measure = FixedMetrics::default();
    let svg = render_svg(&config, &mut measure).unwrap();
    assert_eq!(svg.matches("<path").count(), 19);
    assert_eq!(svg.matches("<text").count(), 18);
}
