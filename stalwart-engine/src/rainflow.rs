//! Rainflow cycle counting (ASTM E1049-85, three-point method).
//!
//! Decomposes an irregular load history into equivalent constant-amplitude
//! cycles for fatigue damage accumulation.

/// One counted cycle: a full cycle has `count == 1.0`, a half cycle `0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    pub range: f64,
    pub mean: f64,
    pub count: f64,
}

impl Cycle {
    fn between(a: f64, b: f64, count: f64) -> Self {
        Self {
            range: (a - b).abs(),
            mean: 0.5 * (a + b),
            count,
        }
    }
}

/// Reduce a series to its turning points, keeping the first and last sample.
///
/// Flat runs are collapsed.
pub fn reversals(series: &[f64]) -> Vec<f64> {
    let Some((&first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let mut points = vec![first];
    let mut previous = first;
    let mut direction = 0.0;

    for &x in rest {
        let delta = x - previous;
        if delta == 0.0 {
            continue;
        }
        if direction != 0.0 && delta.signum() != direction {
            points.push(previous);
        }
        direction = delta.signum();
        previous = x;
    }

    if direction != 0.0 {
        points.push(previous);
    }
    points
}

/// Count cycles in a load history.
///
/// Residual ranges left on the stack at the end are reported as half cycles.
pub fn count_cycles(series: &[f64]) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut stack: Vec<f64> = Vec::new();

    for point in reversals(series) {
        stack.push(point);

        while stack.len() >= 3 {
            let n = stack.len();
            let x = (stack[n - 1] - stack[n - 2]).abs();
            let y = (stack[n - 2] - stack[n - 3]).abs();
            if x < y {
                break;
            }

            if n == 3 {
                // Range y includes the starting point.
                cycles.push(Cycle::between(stack[0], stack[1], 0.5));
                stack.remove(0);
            } else {
                cycles.push(Cycle::between(stack[n - 3], stack[n - 2], 1.0));
                stack.drain(n - 3..n - 1);
            }
        }
    }

    cycles.extend(stack.windows(2).map(|w| Cycle::between(w[0], w[1], 0.5)));
    cycles
}
