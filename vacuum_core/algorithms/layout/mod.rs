//! Wall layouts
//!
//! Helpers that produce wall cell lists for [`HouseGrid::set_walls`].
//!
//! [`HouseGrid::set_walls`]: crate::algorithms::house_grid::HouseGrid::set_walls

/// Brush size used when walls are drawn by hand
pub const DEFAULT_BRUSH_SIZE: usize = 3;

/// One-cell wall ring with corners at (min_x, min_y) and (max_x, max_y)
pub fn rectangle(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();

    for x in min_x..=max_x {
        cells.push((x, min_y));
        if max_y != min_y {
            cells.push((x, max_y));
        }
    }
    for y in min_y + 1..max_y {
        cells.push((min_x, y));
        if max_x != min_x {
            cells.push((max_x, y));
        }
    }

    cells
}

/// Layout used when the user draws nothing usable
///
/// A rectangle spanning the middle third of the grid on both axes.
pub fn default_layout(width: usize, height: usize) -> Vec<(usize, usize)> {
    let (x0, x1) = (width / 3, 2 * width / 3);
    let (y0, y1) = (height / 3, 2 * height / 3);
    rectangle(x0, y0, x1, y1)
}

/// Stamp a `size x size` square around every drawn point
///
/// Stamps are clamped to the grid, so strokes along the border stay on it.
pub fn brush_stroke<I>(points: I, size: usize, width: usize, height: usize) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let half = (size / 2) as i64;
    let mut cells = Vec::new();

    if width == 0 || height == 0 {
        return cells;
    }

    for (px, py) in points {
        for dy in -half..=half {
            for dx in -half..=half {
                let x = (px as i64 + dx).clamp(0, width as i64 - 1) as usize;
                let y = (py as i64 + dy).clamp(0, height as i64 - 1) as usize;
                cells.push((x, y));
            }
        }
    }

    cells.sort_unstable();
    cells.dedup();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_ring() {
        let cells = rectangle(1, 1, 4, 3);
        // Perimeter of a 4x3 ring
        assert_eq!(cells.len(), 2 * 4 + 2 * 1);
        assert!(cells.contains(&(1, 1)));
        assert!(cells.contains(&(4, 3)));
        assert!(cells.contains(&(1, 2)));
        assert!(!cells.contains(&(2, 2)));
    }

    #[test]
    fn test_degenerate_rectangle() {
        assert_eq!(rectangle(2, 5, 6, 5).len(), 5);
        assert_eq!(rectangle(3, 3, 3, 3), vec![(3, 3)]);
    }

    #[test]
    fn test_default_layout_middle_third() {
        let cells = default_layout(960, 540);
        assert!(cells.contains(&(320, 180)));
        assert!(cells.contains(&(640, 360)));
        assert!(cells.iter().all(|&(x, y)| (320..=640).contains(&x) && (180..=360).contains(&y)));
    }

    #[test]
    fn test_brush_stroke_square() {
        let cells = brush_stroke(vec![(5, 5)], 3, 20, 20);
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&(4, 4)));
        assert!(cells.contains(&(6, 6)));
    }

    #[test]
    fn test_brush_stroke_clamped() {
        let cells = brush_stroke(vec![(0, 9)], 3, 10, 10);
        assert!(cells.iter().all(|&(x, y)| x < 10 && y < 10));
        // 2x2 of the 3x3 stamp survives the clamp
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_brush_stroke_overlap_dedup() {
        let cells = brush_stroke(vec![(5, 5), (6, 5)], 3, 20, 20);
        assert_eq!(cells.len(), 12);
    }
}
