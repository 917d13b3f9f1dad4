use itertools::{izip, Itertools};

/// Find the first x where the ys reach `target_y`, interpolating between the point that reaches
/// it and the point before.
///
/// Points where either value is not finite are skipped, so the points on either side of them are
/// used for the interpolation. If the first point already reaches the target its x is returned.
/// Returns `None` if the target is never reached.
pub(crate) fn first_reaching(xs: &[f64], ys: &[f64], target_y: f64) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());

    let mut pnts = izip!(xs, ys)
        // Remove non-finite levels
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .peekable();

    let &(x_first, y_first) = pnts.peek()?;
    if y_first >= target_y {
        return Some(x_first);
    }

    pnts
        // Look at them in pairs.
        .tuple_windows::<(_, _)>()
        // Every point before this pair was below the target
        .find(|&(_, (_, y1))| y1 >= target_y)
        .map(|((x0, y0), (x1, y1))| linear_interp(target_y, y0, y1, x0, x1))
}

#[inline]
pub(crate) fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert!(x1 != x2);

    let run = x2 - x1;
    let rise = y2 - y1;
    let dx = x_val - x1;

    y1 + dx * (rise / run)
}
