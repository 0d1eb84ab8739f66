// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use tiny_skia::{PathSegment, Point};

use super::{
    block_centers, primitives, ArrowStyle, Block, Brush, Direction, LinkAxis, Primitive,
};
use crate::map::fixtures::{grid_with, rows_of, text_from_rows, THREE_ROOMS};
use crate::map::Grid;

const CENTER: Block = Block { x: 2, y: 2 };

fn assert_close(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-5 && (actual.y - expected.y).abs() < 1e-5,
        "{actual:?} != {expected:?}"
    );
}

fn point(x: f32, y: f32) -> Point {
    Point::from_xy(x, y)
}

fn is_structural(ch: char) -> bool {
    if matches!(ch, '╭' | '╯' | '╳' | '↔' | '↕') {
        return true;
    }
    ArrowStyle::ALL
        .iter()
        .any(|style| Direction::ALL.iter().any(|direction| style.glyph(*direction) == ch))
}

#[test]
fn block_centers_start_before_the_grid_and_stop_past_it() {
    assert_eq!(block_centers(13).collect::<Vec<_>>(), vec![-2, 2, 6, 10, 14]);
    assert_eq!(block_centers(10).collect::<Vec<_>>(), vec![-2, 2, 6, 10]);
    assert_eq!(block_centers(0).collect::<Vec<_>>(), vec![-2]);
}

#[test]
fn lone_room_emits_exactly_one_outline() {
    let grid = grid_with(5, &[(1, 1, '╭'), (3, 3, '╯')]);
    assert_eq!(primitives(&grid), vec![Primitive::RoomOutline { at: CENTER }]);
}

#[test]
fn occupied_room_is_filled_instead_of_outlined() {
    let grid = grid_with(5, &[(1, 1, '╭'), (2, 2, '╳'), (3, 3, '╯')]);
    assert_eq!(primitives(&grid), vec![Primitive::RoomFill { at: CENTER }]);
}

#[test]
fn room_needs_both_corners() {
    assert!(primitives(&grid_with(5, &[(1, 1, '╭')])).is_empty());
    assert!(primitives(&grid_with(5, &[(3, 3, '╯')])).is_empty());
}

#[test]
fn links_point_right_and_down_from_their_block() {
    let grid = grid_with(5, &[(4, 2, '↔'), (2, 4, '↕')]);
    assert_eq!(
        primitives(&grid),
        vec![
            Primitive::Connector { at: CENTER, axis: LinkAxis::Horizontal },
            Primitive::Connector { at: CENTER, axis: LinkAxis::Vertical },
        ]
    );
}

#[rstest]
#[case(ArrowStyle::Single, Direction::East, (3, 2, '→'))]
#[case(ArrowStyle::Single, Direction::West, (1, 2, '←'))]
#[case(ArrowStyle::Single, Direction::South, (2, 3, '↓'))]
#[case(ArrowStyle::Single, Direction::North, (2, 1, '↑'))]
#[case(ArrowStyle::Single, Direction::NorthEast, (3, 1, '↗'))]
#[case(ArrowStyle::Single, Direction::SouthWest, (1, 3, '↙'))]
#[case(ArrowStyle::Double, Direction::East, (3, 2, '⇒'))]
#[case(ArrowStyle::Double, Direction::West, (1, 2, '⇐'))]
#[case(ArrowStyle::Double, Direction::South, (2, 3, '⇓'))]
#[case(ArrowStyle::Double, Direction::North, (2, 1, '⇑'))]
#[case(ArrowStyle::Double, Direction::NorthEast, (3, 1, '⇗'))]
#[case(ArrowStyle::Double, Direction::SouthWest, (1, 3, '⇙'))]
#[case(ArrowStyle::Dotted, Direction::East, (3, 2, '⇢'))]
#[case(ArrowStyle::Dotted, Direction::West, (1, 2, '⇠'))]
#[case(ArrowStyle::Dotted, Direction::South, (2, 3, '⇣'))]
#[case(ArrowStyle::Dotted, Direction::North, (2, 1, '⇡'))]
#[case(ArrowStyle::Dotted, Direction::NorthEast, (3, 1, '⤴'))]
#[case(ArrowStyle::Dotted, Direction::SouthWest, (1, 3, '⤶'))]
fn arrow_glyph_next_to_block_center_emits_one_arrow(
    #[case] style: ArrowStyle,
    #[case] direction: Direction,
    #[case] glyph: (usize, usize, char),
) {
    let grid = grid_with(5, &[glyph]);
    assert_eq!(primitives(&grid), vec![Primitive::Arrow { at: CENTER, style, direction }]);
}

#[test]
fn arrow_glyph_at_the_wrong_offset_is_ignored() {
    // `→` only counts east of the center.
    assert!(primitives(&grid_with(5, &[(1, 2, '→')])).is_empty());
    assert!(primitives(&grid_with(5, &[(2, 3, '⇒')])).is_empty());
}

#[test]
fn three_room_map_emits_every_feature_in_block_order() {
    let grid = Grid::parse(THREE_ROOMS);
    assert_eq!(grid.size(), 13);

    let home = Block { x: 6, y: 6 };
    let east = Block { x: 10, y: 6 };
    let south = Block { x: 6, y: 10 };
    assert_eq!(
        primitives(&grid),
        vec![
            Primitive::RoomFill { at: home },
            Primitive::Connector { at: home, axis: LinkAxis::Horizontal },
            Primitive::Connector { at: home, axis: LinkAxis::Vertical },
            Primitive::Arrow { at: home, style: ArrowStyle::Single, direction: Direction::NorthEast },
            Primitive::Arrow { at: home, style: ArrowStyle::Double, direction: Direction::North },
            Primitive::Arrow { at: home, style: ArrowStyle::Dotted, direction: Direction::West },
            Primitive::RoomOutline { at: east },
            Primitive::Arrow { at: east, style: ArrowStyle::Single, direction: Direction::East },
            Primitive::Arrow {
                at: east,
                style: ArrowStyle::Dotted,
                direction: Direction::SouthWest
            },
            Primitive::RoomOutline { at: south },
        ]
    );
}

#[test]
fn blanking_an_unrecognized_glyph_never_changes_the_primitives() {
    let rows = rows_of(THREE_ROOMS);
    let expected = primitives(&Grid::parse(THREE_ROOMS));

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.iter().enumerate() {
            if *ch == ' ' || is_structural(*ch) {
                continue;
            }
            let mut edited = rows.clone();
            edited[y][x] = ' ';
            let actual = primitives(&Grid::parse(&text_from_rows(&edited)));
            assert_eq!(actual, expected, "blanking {ch:?} at ({x},{y})");
        }
    }
}

#[test]
fn unknown_glyphs_everywhere_emit_nothing() {
    let text = "xxxxx\n".repeat(5);
    assert!(primitives(&Grid::parse(&text)).is_empty());
}

#[test]
fn primitives_report_their_block() {
    let grid = Grid::parse(THREE_ROOMS);
    let blocks = primitives(&grid).iter().map(Primitive::block).collect::<Vec<_>>();
    assert!(blocks.iter().all(|block| [6, 10].contains(&block.x) && [6, 10].contains(&block.y)));
}

#[test]
fn room_shapes_trace_a_closed_rounded_square() {
    let shapes = Primitive::RoomOutline { at: CENTER }.shapes();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].brush, Brush::Stroke);

    let points = shapes[0].path.points();
    assert_eq!(points.len(), 9);
    assert_close(points[0], point(0.0, -1.0));
    assert_close(points[1], point(1.0, -1.0));
    assert_close(points[8], point(0.0, -1.0));
    assert!(points.iter().all(|p| p.x.abs() <= 1.0 && p.y.abs() <= 1.0));
    assert!(shapes[0].path.segments().any(|segment| segment == PathSegment::Close));

    let filled = Primitive::RoomFill { at: CENTER }.shapes();
    assert_eq!(filled[0].brush, Brush::Fill);
    assert_eq!(filled[0].path, shapes[0].path);
}

#[test]
fn connector_shapes_span_the_gap_between_rooms() {
    let shapes = Primitive::Connector { at: CENTER, axis: LinkAxis::Vertical }.shapes();
    assert_eq!(shapes[0].path.points(), &[point(0.0, 1.0), point(0.0, 3.0)]);

    let shapes = Primitive::Connector { at: CENTER, axis: LinkAxis::Horizontal }.shapes();
    assert_eq!(shapes[0].path.points(), &[point(1.0, 0.0), point(3.0, 0.0)]);
}

#[test]
fn arrows_rotate_the_east_template() {
    let south = Primitive::Arrow { at: CENTER, style: ArrowStyle::Single, direction: Direction::South };
    let shapes = south.shapes();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].brush, Brush::Stroke);
    assert_eq!(shapes[1].brush, Brush::Fill);

    let shaft = shapes[0].path.points();
    assert_close(shaft[0], point(0.0, 1.0));
    assert_close(shaft[1], point(0.0, 1.5));
    assert_close(shapes[1].path.points()[0], point(0.0, 1.9));

    let north_east =
        Primitive::Arrow { at: CENTER, style: ArrowStyle::Dotted, direction: Direction::NorthEast };
    let shapes = north_east.shapes();
    assert_eq!(shapes.len(), 1);
    let half = 1.5 * std::f32::consts::FRAC_1_SQRT_2;
    assert_close(shapes[0].path.points()[1], point(half, -half));
}

#[test]
fn double_arrows_have_two_parallel_shafts() {
    let arrow = Primitive::Arrow { at: CENTER, style: ArrowStyle::Double, direction: Direction::East };
    let shapes = arrow.shapes();
    assert_eq!(shapes.len(), 2);

    let shafts = &shapes[0].path;
    let starts = shafts.segments().filter(|s| matches!(s, PathSegment::MoveTo(_))).count();
    assert_eq!(starts, 2);
    assert_eq!(
        shafts.points(),
        &[point(1.0, -0.2), point(1.5, -0.2), point(1.0, 0.2), point(1.5, 0.2)]
    );
}
