//! Derivative-free minimization used for SARIMA parameter estimation.
//!
//! A plain Nelder-Mead downhill simplex with the standard reflection,
//! expansion, contraction, and shrink coefficients. Deterministic: the same
//! objective and start point always produce the same result, which keeps
//! repeated pipeline runs reproducible.

/// Stopping criteria and simplex seeding.
#[derive(Debug, Clone, Copy)]
pub struct SimplexOptions {
    /// Maximum number of iterations before giving up.
    pub max_iter: usize,
    /// Convergence tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Relative step used to seed the initial simplex.
    pub initial_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex minimization.
#[derive(Debug, Clone)]
pub struct SimplexOutcome {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the stopping tolerance was reached within `max_iter`.
    pub converged: bool,
}

// Standard Nelder-Mead coefficients: reflection, expansion, contraction, shrink.
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Minimize `objective` starting from `initial`, optionally clamping each
/// coordinate to `bounds`.
pub fn minimize_simplex<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: SimplexOptions,
) -> SimplexOutcome
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return SimplexOutcome {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        match bounds {
            None => point,
            Some(limits) => point
                .into_iter()
                .enumerate()
                .map(|(i, x)| match limits.get(i) {
                    Some(&(lo, hi)) => x.clamp(lo, hi),
                    None => x,
                })
                .collect(),
        }
    };

    // Seed the simplex: the start point plus one perturbed vertex per axis.
    let mut vertices: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    let start = clamp(initial.to_vec());
    let start_value = objective(&start);
    vertices.push((start.clone(), start_value));
    for axis in 0..dim {
        let mut vertex = start.clone();
        let step = if vertex[axis].abs() > 1e-10 {
            options.initial_step * vertex[axis].abs()
        } else {
            options.initial_step
        };
        vertex[axis] += step;
        let vertex = clamp(vertex);
        let value = objective(&vertex);
        vertices.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        iterations += 1;
        vertices.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let spread = vertices[dim].1 - vertices[0].1;
        if spread.abs() < options.tolerance {
            converged = true;
            break;
        }

        // Centroid of every vertex except the worst.
        let mut centroid = vec![0.0; dim];
        for (vertex, _) in &vertices[..dim] {
            for (c, &x) in centroid.iter_mut().zip(vertex.iter()) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= dim as f64;
        }

        let worst = vertices[dim].clone();
        let blend = |coef: f64, toward: &[f64]| -> Vec<f64> {
            clamp(
                centroid
                    .iter()
                    .zip(toward.iter())
                    .map(|(&c, &t)| c + coef * (t - c))
                    .collect(),
            )
        };

        let reflected = blend(-ALPHA, &worst.0);
        let reflected_value = objective(&reflected);

        if reflected_value < vertices[0].1 {
            // Try to go further in the same direction.
            let expanded = blend(GAMMA, &reflected);
            let expanded_value = objective(&expanded);
            vertices[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < vertices[dim - 1].1 {
            vertices[dim] = (reflected, reflected_value);
            continue;
        }

        let (contracted, contracted_value) = if reflected_value < worst.1 {
            let point = blend(RHO, &reflected);
            let value = objective(&point);
            (point, value)
        } else {
            let point = blend(RHO, &worst.0);
            let value = objective(&point);
            (point, value)
        };

        if contracted_value < worst.1.min(reflected_value) {
            vertices[dim] = (contracted, contracted_value);
            continue;
        }

        // Shrink everything toward the best vertex.
        let best = vertices[0].0.clone();
        for (vertex, value) in vertices.iter_mut().skip(1) {
            for (x, &b) in vertex.iter_mut().zip(best.iter()) {
                *x = b + SIGMA * (*x - b);
            }
            *vertex = clamp(std::mem::take(vertex));
            *value = objective(vertex);
        }
    }

    vertices.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (point, value) = vertices.swap_remove(0);
    SimplexOutcome {
        point,
        value,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimizes_a_quadratic_bowl() {
        let outcome = minimize_simplex(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            SimplexOptions::default(),
        );

        assert!(outcome.converged);
        assert_relative_eq!(outcome.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.point[1], 3.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn respects_coordinate_bounds() {
        // Unconstrained minimum at x = 5, but x is clamped to [0, 3].
        let outcome = minimize_simplex(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            SimplexOptions::default(),
        );

        assert_relative_eq!(outcome.point[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn handles_rosenbrock_valley() {
        let options = SimplexOptions {
            max_iter: 5000,
            tolerance: 1e-10,
            ..Default::default()
        };
        let outcome = minimize_simplex(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-1.0, 1.0],
            None,
            options,
        );

        assert_relative_eq!(outcome.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(outcome.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn empty_start_point_does_not_converge() {
        let outcome = minimize_simplex(|_| 0.0, &[], None, SimplexOptions::default());
        assert!(!outcome.converged);
        assert!(outcome.value.is_nan());
    }

    #[test]
    fn starting_at_the_optimum_converges_quickly() {
        let outcome = minimize_simplex(
            |x| (x[0] - 2.0).powi(2),
            &[2.0],
            None,
            SimplexOptions::default(),
        );

        assert!(outcome.converged);
        assert_relative_eq!(outcome.point[0], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn is_deterministic_across_runs() {
        let run = || {
            minimize_simplex(
                |x| (x[0] - 1.5).powi(2) + x[1].powi(2) + 0.1 * (x[0] * x[1]).powi(2),
                &[0.3, 0.7],
                None,
                SimplexOptions::default(),
            )
        };
        let a = run();
        let b = run();
        assert_eq!(a.point, b.point);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let options = SimplexOptions {
            max_iter: 2,
            tolerance: 1e-16,
            ..Default::default()
        };
        let outcome = minimize_simplex(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-1.5, 2.0],
            None,
            options,
        );
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 2);
    }
}
