//! Property-based invariant tests for tile geometry.
//!
//! 1. Overlap is symmetric and agrees with a cell-by-cell check
//! 2. Overlap holds exactly when an intersection exists, and the
//!    intersection lies inside both tiles
//! 3. The enclosing boundary contains every tile and touches each edge
//! 4. Subtracting the center offset centers the boundary

use proptest::prelude::*;
use territory_core::{Boundary, Tile, overlaps_any};

// ── Strategies ──────────────────────────────────────────────────────────

fn small_tile() -> impl Strategy<Value = Tile> {
    (-8i32..8, -8i32..8, 0u32..6, 0u32..6).prop_map(|(x, y, w, h)| Tile::new(x, y, w, h))
}

fn square_tile() -> impl Strategy<Value = Tile> {
    (-500i32..500, -500i32..500, 1u32..60).prop_map(|(x, y, side)| Tile::square(x, y, side))
}

fn shares_a_cell(a: &Tile, b: &Tile) -> bool {
    (-8..14).any(|x| (-8..14).any(|y| a.contains(x, y) && b.contains(x, y)))
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Overlap
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overlap_matches_shared_cells(a in small_tile(), b in small_tile()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert_eq!(a.overlaps(&b), shares_a_cell(&a, &b), "{:?} {:?}", a, b);
        prop_assert_eq!(overlaps_any(&a, [&b]), a.overlaps(&b));
    }

    #[test]
    fn intersection_lies_inside_both(a in small_tile(), b in small_tile()) {
        match a.intersection_opt(&b) {
            Some(i) => {
                prop_assert!(a.overlaps(&b));
                prop_assert!(i.area() > 0);
                prop_assert!(Boundary::enclosing([&a]).contains_tile(&i));
                prop_assert!(Boundary::enclosing([&b]).contains_tile(&i));
            }
            None => prop_assert!(!a.overlaps(&b)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3-4. Boundary
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enclosing_is_minimal(tiles in prop::collection::vec(square_tile(), 1..40)) {
        let boundary = Boundary::enclosing(&tiles);
        for tile in &tiles {
            prop_assert!(boundary.contains_tile(tile), "{:?} outside {:?}", tile, boundary);
        }
        prop_assert!(tiles.iter().any(|t| t.left() == boundary.min_x));
        prop_assert!(tiles.iter().any(|t| t.right() == boundary.max_x));
        prop_assert!(tiles.iter().any(|t| t.top() == boundary.min_y));
        prop_assert!(tiles.iter().any(|t| t.bottom() == boundary.max_y));
    }

    #[test]
    fn center_offset_centers(tiles in prop::collection::vec(square_tile(), 1..40)) {
        let boundary = Boundary::enclosing(&tiles);
        let (dx, dy) = boundary.center_offset();
        let centered = boundary.translate(-dx, -dy);
        prop_assert!(centered.is_centered(), "{:?}", centered);
        prop_assert_eq!((centered.width, centered.height), (boundary.width, boundary.height));
        let moved: Vec<Tile> = tiles.iter().map(|t| t.translate(-dx, -dy)).collect();
        prop_assert_eq!(Boundary::enclosing(&moved), centered);
    }
}
