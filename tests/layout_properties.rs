use std::collections::HashSet;
use std::f32::consts::PI;

use goban::config::{BoardConfig, GridSize, Spacing, StarPointPlacement};
use goban::fonts::{FontExtents, TextExtents};
use goban::layout::{Orientation, compute_layout, star_point_positions};
use goban::text::TextPlacement;
use goban::{AnnotationStyle, GridPoint};
use proptest::prelude::*;

fn config(cols: u32, rows: u32, spacing: (f32, f32), border: (f32, f32)) -> BoardConfig {
    BoardConfig::default()
        .with_size(GridSize::new(cols, rows).unwrap())
        .unwrap()
        .with_line_spacing(Spacing::new(spacing.0, spacing.1).unwrap())
        .unwrap()
        .with_border_spacing(Spacing::new(border.0, border.1).unwrap())
        .unwrap()
}

proptest! {
    #[test]
    fn canvas_matches_sizing_formula(
        cols in 1u32..40,
        rows in 1u32..40,
        sx in 1.0f32..50.0,
        sy in 1.0f32..50.0,
        bx in 1.0f32..50.0,
        by in 1.0f32..50.0,
    ) {
        let layout = compute_layout(&config(cols, rows, (sx, sy), (bx, by))).unwrap();
        prop_assert_eq!(layout.width, (cols - 1) as f32 * sx + 2.0 * bx);
        prop_assert_eq!(layout.height, (rows - 1) as f32 * sy + 2.0 * by);
    }

    #[test]
    fn one_line_per_index_with_thick_edges(cols in 1u32..40, rows in 1u32..40) {
        let layout = compute_layout(&config(cols, rows, (22.0, 23.7), (11.0, 12.0))).unwrap();
        let vertical: Vec<_> = layout
            .grid_lines
            .iter()
            .filter(|l| l.orientation == Orientation::Vertical)
            .collect();
        let horizontal: Vec<_> = layout
            .grid_lines
            .iter()
            .filter(|l| l.orientation == Orientation::Horizontal)
            .collect();
        prop_assert_eq!(vertical.len(), cols as usize);
        prop_assert_eq!(horizontal.len(), rows as usize);

        for line in &layout.grid_lines {
            let count = match line.orientation {
                Orientation::Vertical => cols,
                Orientation::Horizontal => rows,
            };
            let edge = line.index == 0 || line.index == count - 1;
            prop_assert_eq!(line.width, if edge { 2.0 } else { 1.0 });
        }
    }

    #[test]
    fn auto_points_stay_inside_the_grid(cols in 3u32..40, rows in 3u32..40) {
        let points = star_point_positions(GridSize::new(cols, rows).unwrap(), &StarPointPlacement::Auto);
        prop_assert!(points.len() >= 4);
        for point in points {
            prop_assert!(point.x >= 1 && point.x <= cols.max(rows));
            prop_assert!(point.y >= 1 && point.y <= rows);
        }
    }

    #[test]
    fn square_boards_get_symmetric_auto_points(size in 3u32..40) {
        let points = star_point_positions(GridSize::square(size).unwrap(), &StarPointPlacement::Auto);
        let set: HashSet<(u32, u32)> = points.iter().map(|p| (p.x, p.y)).collect();
        for &(x, y) in &set {
            prop_assert!(set.contains(&(size + 1 - x, y)));
            prop_assert!(set.contains(&(x, size + 1 - y)));
            prop_assert!(set.contains(&(y, x)));
        }
    }

    #[test]
    fn tiny_boards_get_no_auto_points(cols in 1u32..3, rows in 1u32..40) {
        prop_assert!(star_point_positions(GridSize::new(cols, rows).unwrap(), &StarPointPlacement::Auto).is_empty());
        prop_assert!(star_point_positions(GridSize::new(rows, cols).unwrap(), &StarPointPlacement::Auto).is_empty());
    }

    #[test]
    fn explicit_points_survive_unchanged(
        raw in prop::collection::vec((1u32..20, 1u32..20), 0..12)
    ) {
        let points: Vec<GridPoint> = raw.into_iter().map(GridPoint::from).collect();
        let config = BoardConfig::default()
            .with_star_points(StarPointPlacement::Explicit(points.clone()))
            .unwrap();
        prop_assert_eq!(config.star_points(), &StarPointPlacement::Explicit(points.clone()));

        let layout = compute_layout(&config).unwrap();
        let grids: Vec<GridPoint> = layout.star_points.iter().map(|s| s.grid).collect();
        prop_assert_eq!(grids, points);
    }

    #[test]
    fn text_offset_only_mirrors_under_half_turn(
        width in 0.0f32..50.0,
        bearing in -5.0f32..5.0,
        height in 1.0f32..20.0,
        ax in 0.0f32..500.0,
        ay in 0.0f32..500.0,
    ) {
        let text = TextExtents { x_bearing: bearing, width };
        let font = FontExtents { ascent: height * 0.8, descent: height * 0.2, height };
        let anchor = goban::layout::Point::new(ax, ay);

        let upright = TextPlacement::new(anchor, 0.0, text, font);
        let flipped = TextPlacement::new(anchor, PI, text, font);
        prop_assert_eq!(upright.offset, flipped.offset);

        let a = upright.origin();
        let b = flipped.origin();
        // Half a turn reflects the origin through the anchor.
        prop_assert!(((a.x - ax) + (b.x - ax)).abs() < 1e-3);
        prop_assert!(((a.y - ay) + (b.y - ay)).abs() < 1e-3);
    }
}

#[test]
fn annotation_count_follows_enabled_axes() {
    let config = config(13, 9, (22.0, 23.7), (11.0, 12.0))
        .with_annotations(
            Some(AnnotationStyle::ChineseNumerals),
            Some(AnnotationStyle::LatinLetters),
        )
        .unwrap();
    let layout = compute_layout(&config).unwrap();
    assert_eq!(layout.annotations.len(), 2 * 13 + 2 * 9);
    assert_eq!(layout.annotations[0].text, "一");
    assert_eq!(layout.annotations[2 * 13].text, "J");
}
