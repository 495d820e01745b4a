//! Small integer geometry kernel used by the region builders.

use crate::error::GeometryError;
use crate::types::Point;

/// Rotate a vector by 90 degrees: `(x, y) -> (-y, x)`.
pub fn perpendicular(v: Point) -> Point {
    v.perpendicular()
}

/// Intersection of the infinite line through `a1`,`a2` with the infinite line
/// through `b1`,`b2`.
///
/// Solves `b1 + t * (b2 - b1)` for the `t` where `perp(a2 - a1)` is orthogonal
/// to the offset from `a1`. The rational result is computed exactly and
/// truncated toward zero, so swapping the two lines yields the same point.
/// Nearly parallel lines can meet far outside the `i32` range; that is an
/// `OutOfRange` error rather than a wrapped coordinate.
pub fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Result<Point, GeometryError> {
    let da = a2 - a1;
    let db = b2 - b1;
    let dp = a1 - b1;
    let dap = da.perpendicular();

    let denom = dap.dot(db);
    if denom == 0 {
        return Err(GeometryError::ParallelLines);
    }
    let num = dap.dot(dp);

    let (denom, num) = (denom as i128, num as i128);
    let x = (b1.x as i128 * denom + db.x as i128 * num) / denom;
    let y = (b1.y as i128 * denom + db.y as i128 * num) / denom;
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
        _ => Err(GeometryError::OutOfRange),
    }
}

/// Stroke thicknesses for `count` consecutive segments, changing by `step`
/// after each one.
pub fn taper(start: i32, step: i32, count: usize) -> Vec<i32> {
    (0..count as i32).map(|i| start + i * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_of_axis_vectors() {
        assert_eq!(perpendicular(Point::new(1, 0)), Point::new(0, 1));
        assert_eq!(perpendicular(Point::new(0, 1)), Point::new(-1, 0));
    }

    #[test]
    fn intersection_of_axes() {
        let p = line_intersection(
            Point::new(-5, 0),
            Point::new(5, 0),
            Point::new(0, -5),
            Point::new(0, 5),
        )
        .unwrap();
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn intersection_of_diagonals() {
        let p = line_intersection(
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(10, 0),
        )
        .unwrap();
        assert_eq!(p, Point::new(5, 5));
    }

    #[test]
    fn intersection_may_lie_outside_both_segments() {
        let p = line_intersection(
            Point::new(0, 0),
            Point::new(1, 1),
            Point::new(100, 0),
            Point::new(100, 1),
        )
        .unwrap();
        assert_eq!(p, Point::new(100, 100));
    }

    #[test]
    fn intersection_truncates_toward_zero() {
        // Exact intersection is (2.5, 2.5)
        let p = line_intersection(
            Point::new(0, 0),
            Point::new(5, 5),
            Point::new(0, 5),
            Point::new(5, 0),
        )
        .unwrap();
        assert_eq!(p, Point::new(2, 2));

        // Exact intersection is (-2.5, 2.5)
        let q = line_intersection(
            Point::new(0, 0),
            Point::new(-5, 5),
            Point::new(0, 5),
            Point::new(-5, 0),
        )
        .unwrap();
        assert_eq!(q, Point::new(-2, 2));
    }

    #[test]
    fn intersection_is_symmetric() {
        let lines = [
            (Point::new(90, 190), Point::new(250, 210), Point::new(210, 281), Point::new(202, 182)),
            (Point::new(3, 7), Point::new(41, 13), Point::new(17, -9), Point::new(23, 50)),
            (Point::new(0, 0), Point::new(7, 3), Point::new(1, 9), Point::new(4, -2)),
        ];
        for (a1, a2, b1, b2) in lines {
            let ab = line_intersection(a1, a2, b1, b2).unwrap();
            let ba = line_intersection(b1, b2, a1, a2).unwrap();
            assert_eq!(ab, ba);
            // Same input, same answer
            assert_eq!(ab, line_intersection(a1, a2, b1, b2).unwrap());
        }
    }

    #[test]
    fn parallel_lines_fail() {
        let err = line_intersection(
            Point::new(0, 0),
            Point::new(4, 2),
            Point::new(0, 5),
            Point::new(8, 9),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::ParallelLines);
    }

    #[test]
    fn coincident_lines_fail() {
        let err = line_intersection(
            Point::new(0, 0),
            Point::new(2, 2),
            Point::new(5, 5),
            Point::new(9, 9),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::ParallelLines);
    }

    #[test]
    fn degenerate_line_fails() {
        // Both endpoints of the second line coincide
        let p = Point::new(30, 40);
        assert_eq!(
            line_intersection(Point::new(0, 0), Point::new(10, 3), p, p),
            Err(GeometryError::ParallelLines)
        );
    }

    #[test]
    fn nearly_parallel_lines_meet_out_of_range() {
        // Exact intersection is (7992000000, 7988004000)
        let a1 = Point::new(0, 0);
        let a2 = Point::new(2000, 1999);
        let b1 = Point::new(1998, 0);
        let b2 = Point::new(3999, 2000);
        assert_eq!(line_intersection(a1, a2, b1, b2), Err(GeometryError::OutOfRange));
        assert_eq!(line_intersection(b1, b2, a1, a2), Err(GeometryError::OutOfRange));
    }

    #[test]
    fn large_coordinates_do_not_overflow() {
        let p = line_intersection(
            Point::new(-1_000_000_000, 0),
            Point::new(1_000_000_000, 0),
            Point::new(7, -1_000_000_000),
            Point::new(7, 1_000_000_000),
        );
        assert_eq!(p, Ok(Point::new(7, 0)));
    }

    #[test]
    fn taper_sequences() {
        assert_eq!(taper(10, -1, 3), vec![10, 9, 8]);
        assert_eq!(taper(8, 1, 3), vec![8, 9, 10]);
        assert_eq!(taper(15, -2, 4), vec![15, 13, 11, 9]);
        assert!(taper(5, 1, 0).is_empty());
    }
}
