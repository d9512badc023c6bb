//! Dashing a polyline in pixel space

/// Split `points` into the "on" pieces of a repeating dash `pattern`.
///
/// `pattern` alternates on and off lengths in pixels, starting with on. The
/// pattern continues across vertices, so dashes bend with the line. A
/// pattern with no positive length yields the whole polyline as one piece.
#[must_use]
pub fn dash_polyline(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if !pattern.iter().any(|len| *len > 0.0) {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current: Vec<(f64, f64)> = vec![points[0]];
    let mut index = 0;
    let mut left = pattern[0];
    let mut on = true;

    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let length = (end.0 - start.0).hypot(end.1 - start.1);
        let mut travelled = 0.0;

        while length - travelled > left {
            travelled += left;
            let t = travelled / length;
            let split = (
                (end.0 - start.0).mul_add(t, start.0),
                (end.1 - start.1).mul_add(t, start.1),
            );
            if on {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            on = !on;
            index = (index + 1) % pattern.len();
            left = pattern[index];
        }

        left -= length - travelled;
        if on {
            current.push(end);
        }
    }

    if on && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dash(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a.0 - e.0).abs() < 1e-9 && (a.1 - e.1).abs() < 1e-9,
                "{actual:?} vs {expected:?}"
            );
        }
    }

    fn length(dash: &[(f64, f64)]) -> f64 {
        dash.windows(2)
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum()
    }

    #[test]
    fn test_straight_line() {
        let dashes = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], &[2.0, 3.0]);
        assert_eq!(dashes.len(), 2);
        assert_dash(&dashes[0], &[(0.0, 0.0), (2.0, 0.0)]);
        assert_dash(&dashes[1], &[(5.0, 0.0), (7.0, 0.0)]);
    }

    #[test]
    fn test_dash_bends_at_vertex() {
        let dashes = dash_polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 10.0)], &[3.0, 1.0]);
        assert_dash(&dashes[0], &[(0.0, 0.0), (1.0, 0.0), (1.0, 2.0)]);
        assert!((length(&dashes[0]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_partial_dash_kept() {
        let dashes = dash_polyline(&[(0.0, 0.0), (6.0, 0.0)], &[2.0, 3.0]);
        assert_eq!(dashes.len(), 2);
        assert_dash(&dashes[1], &[(5.0, 0.0), (6.0, 0.0)]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(dash_polyline(&[(0.0, 0.0)], &[1.0, 1.0]).is_empty());
        let whole = dash_polyline(&[(0.0, 0.0), (4.0, 0.0)], &[0.0]);
        assert_eq!(whole, vec![vec![(0.0, 0.0), (4.0, 0.0)]]);
    }
}
