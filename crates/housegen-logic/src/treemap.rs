//! Room packing using the squarified treemap algorithm.
//!
//! Implements Bruls, Huizing & van Wijk's squarified treemap: areas are
//! added to a row laid along the shorter side of the remaining rectangle
//! for as long as that does not worsen the row's worst aspect ratio. When
//! it would, the row is laid out, the rectangle shrinks past it and the
//! next row starts along the new shorter side.
//!
//! Rows along the height sit at the left edge of the remaining rectangle,
//! stacked bottom-up; rows along the width sit at the bottom edge, left to
//! right. The final row is stretched to the far edge so float slack never
//! leaves a gap.

use crate::error::{GenerationError, Result};
use crate::geometry::Rect;

/// Direction a row of rectangles runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAxis {
    /// Column along the height, at the left edge.
    Vertical,
    /// Row along the width, at the bottom edge.
    Horizontal,
}

impl RowAxis {
    fn for_rect(rect: &Rect) -> RowAxis {
        if rect.height <= rect.width {
            RowAxis::Vertical
        } else {
            RowAxis::Horizontal
        }
    }
}

/// Worst aspect ratio of a row with total `sum`, laid along a side of
/// length `min_dim`, whose largest and smallest members are `max` and `min`.
pub fn worst(sum: f32, min_dim: f32, max: f32, min: f32) -> f32 {
    let side_sq = min_dim * min_dim;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

fn row_worst(areas: &[f32], row: &[usize], extra: Option<usize>, min_dim: f32) -> f32 {
    let mut sum = 0.0;
    let mut max = f32::MIN;
    let mut min = f32::MAX;
    for a in row.iter().chain(extra.iter()).map(|&i| areas[i]) {
        sum += a;
        max = max.max(a);
        min = min.min(a);
    }
    worst(sum, min_dim, max, min)
}

/// Scale `areas` so they sum to `total`, keeping their proportions.
pub fn fit_areas(areas: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = areas.iter().sum();
    if sum <= 0.0 {
        return areas.to_vec();
    }
    let scale = total / sum;
    areas.iter().map(|a| a * scale).collect()
}

/// Tile `outer` with one rectangle per area, in input order.
///
/// Areas should sum to `outer.area()` (use [`fit_areas`] first when they
/// don't). At least two areas are required: single-room floors take the
/// whole rectangle and never reach the partitioner.
pub fn squarify(outer: Rect, areas: &[f32]) -> Result<Vec<Rect>> {
    if areas.len() < 2 {
        return Err(GenerationError::TooFewAreas(areas.len()));
    }
    if areas.iter().any(|a| !(*a > 0.0)) {
        return Err(GenerationError::NonPositiveArea);
    }

    let mut placed = vec![Rect::new(0.0, 0.0, 0.0, 0.0); areas.len()];
    let mut remaining = outer;
    let mut row: Vec<usize> = Vec::new();

    for i in 0..areas.len() {
        let min_dim = remaining.shorter_side();
        if row.is_empty()
            || row_worst(areas, &row, Some(i), min_dim) <= row_worst(areas, &row, None, min_dim)
        {
            row.push(i);
            continue;
        }
        let axis = RowAxis::for_rect(&remaining);
        remaining = layout_row(areas, &row, remaining, axis, &mut placed);
        row.clear();
        row.push(i);
    }

    let axis = RowAxis::for_rect(&remaining);
    layout_row(areas, &row, remaining, axis, &mut placed);
    fill_last_row(&row, &outer, axis, &mut placed);

    Ok(placed)
}

/// Place `row` inside `rect` and return what is left of `rect`.
fn layout_row(areas: &[f32], row: &[usize], rect: Rect, axis: RowAxis, placed: &mut [Rect]) -> Rect {
    let sum: f32 = row.iter().map(|&i| areas[i]).sum();
    let last = row.len() - 1;
    match axis {
        RowAxis::Vertical => {
            let thickness = sum / rect.height;
            let mut y = rect.min_y();
            for (k, &i) in row.iter().enumerate() {
                let h = if k == last {
                    rect.max_y() - y
                } else {
                    areas[i] / thickness
                };
                placed[i] = Rect::new(rect.min_x(), y, thickness, h);
                y += h;
            }
            Rect::new(rect.min_x() + thickness, rect.min_y(), rect.width - thickness, rect.height)
        }
        RowAxis::Horizontal => {
            let thickness = sum / rect.width;
            let mut x = rect.min_x();
            for (k, &i) in row.iter().enumerate() {
                let w = if k == last {
                    rect.max_x() - x
                } else {
                    areas[i] / thickness
                };
                placed[i] = Rect::new(x, rect.min_y(), w, thickness);
                x += w;
            }
            Rect::new(rect.min_x(), rect.min_y() + thickness, rect.width, rect.height - thickness)
        }
    }
}

/// Stretch the final row to the outer rectangle's far edge.
fn fill_last_row(row: &[usize], outer: &Rect, axis: RowAxis, placed: &mut [Rect]) {
    for &i in row {
        let r = &mut placed[i];
        match axis {
            RowAxis::Vertical => r.width = outer.max_x() - r.x,
            RowAxis::Horizontal => r.height = outer.max_y() - r.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_tiles(outer: &Rect, rects: &[Rect]) {
        let total: f32 = rects.iter().map(|r| r.area()).sum();
        assert!(
            (total - outer.area()).abs() < 1e-3 * outer.area().max(1.0),
            "areas sum to {} but outer is {}",
            total,
            outer.area()
        );
        for (i, r) in rects.iter().enumerate() {
            assert!(r.width > 0.0 && r.height > 0.0, "rect {} is empty: {:?}", i, r);
            assert!(outer.contains_rect(r), "rect {} {:?} leaves {:?}", i, r, outer);
        }
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(!rects[i].overlaps(&rects[j]), "rects {} and {} overlap", i, j);
            }
        }
    }

    fn assert_rect(r: &Rect, x: f32, y: f32, w: f32, h: f32) {
        let eps = 1e-3;
        assert!(
            (r.x - x).abs() < eps && (r.y - y).abs() < eps && (r.width - w).abs() < eps && (r.height - h).abs() < eps,
            "got {:?}, expected ({}, {}, {}, {})",
            r,
            x,
            y,
            w,
            h
        );
    }

    #[test]
    fn test_worst_ratio() {
        // Row [6] along a side of 4: 16·6/36 vs 36/96
        assert!((worst(6.0, 4.0, 6.0, 6.0) - 8.0 / 3.0).abs() < 1e-5);
        // Row [6, 6]: 96/144 vs 144/96
        assert!((worst(12.0, 4.0, 6.0, 6.0) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_canonical_layout() {
        // The worked example from the squarified treemap paper.
        let outer = Rect::new(0.0, 0.0, 6.0, 4.0);
        let areas = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(outer, &areas).unwrap();
        assert_eq!(rects.len(), 7);

        // Column along the height: 6, 6
        assert_rect(&rects[0], 0.0, 0.0, 3.0, 2.0);
        assert_rect(&rects[1], 0.0, 2.0, 3.0, 2.0);
        // Row along the width of the 3×4 remainder: 4, 3
        assert_rect(&rects[2], 3.0, 0.0, 12.0 / 7.0, 7.0 / 3.0);
        assert_rect(&rects[3], 3.0 + 12.0 / 7.0, 0.0, 9.0 / 7.0, 7.0 / 3.0);
        // Then 2, 2, 1 as single-member columns/rows
        assert_rect(&rects[4], 3.0, 7.0 / 3.0, 1.2, 5.0 / 3.0);
        assert_rect(&rects[5], 4.2, 7.0 / 3.0, 1.2, 5.0 / 3.0);
        assert_rect(&rects[6], 5.4, 7.0 / 3.0, 0.6, 5.0 / 3.0);

        assert_tiles(&outer, &rects);
        for (r, a) in rects.iter().zip(areas.iter()) {
            assert!((r.area() - a).abs() < 1e-3, "area {} expected {}", r.area(), a);
        }
    }

    #[test]
    fn test_two_areas() {
        let outer = Rect::new(2.0, 1.0, 4.0, 4.0);
        let rects = squarify(outer, &[12.0, 4.0]).unwrap();
        assert_tiles(&outer, &rects);
        assert!((rects[0].area() - 12.0).abs() < 1e-4);
        assert!((rects[1].area() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_inputs_tile_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let outer = Rect::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(2.0..30.0),
                rng.gen_range(2.0..30.0),
            );
            let n = rng.gen_range(2..12);
            let raw: Vec<f32> = (0..n).map(|_| rng.gen_range(1.0..20.0)).collect();
            let areas = fit_areas(&raw, outer.area());
            let rects = squarify(outer, &areas).unwrap();
            assert_eq!(rects.len(), n);
            assert_tiles(&outer, &rects);
            for (r, a) in rects.iter().zip(areas.iter()) {
                assert!(
                    (r.area() - a).abs() < 1e-2 * a.max(1.0),
                    "area {} expected {}",
                    r.area(),
                    a
                );
            }
        }
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let outer = Rect::new(0.0, 0.0, 9.0, 7.0);
        let areas = fit_areas(&[5.0, 3.0, 8.0, 1.0, 2.0], outer.area());
        assert_eq!(squarify(outer, &areas).unwrap(), squarify(outer, &areas).unwrap());
    }

    #[test]
    fn test_fill_absorbs_slack() {
        // Slightly under-filled input: the last row still reaches the far edge.
        let outer = Rect::new(0.0, 0.0, 5.0, 5.0);
        let rects = squarify(outer, &[10.0, 10.0, 4.99]).unwrap();
        let right = rects.iter().map(|r| r.max_x()).fold(f32::MIN, f32::max);
        let top = rects.iter().map(|r| r.max_y()).fold(f32::MIN, f32::max);
        assert!((right - 5.0).abs() < 1e-5);
        assert!((top - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_too_few_areas() {
        let outer = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(squarify(outer, &[1.0]), Err(GenerationError::TooFewAreas(1))));
        assert!(matches!(squarify(outer, &[]), Err(GenerationError::TooFewAreas(0))));
    }

    #[test]
    fn test_non_positive_area_rejected() {
        let outer = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(matches!(
            squarify(outer, &[4.0, 0.0]),
            Err(GenerationError::NonPositiveArea)
        ));
        assert!(matches!(
            squarify(outer, &[4.0, f32::NAN]),
            Err(GenerationError::NonPositiveArea)
        ));
    }

    #[test]
    fn test_fit_areas_preserves_proportions() {
        let fitted = fit_areas(&[1.0, 3.0], 8.0);
        assert!((fitted[0] - 2.0).abs() < 1e-6);
        assert!((fitted[1] - 6.0).abs() < 1e-6);
    }
}
