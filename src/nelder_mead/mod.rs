//! Derivative-free Nelder-Mead minimizer over fixed-size parameter vectors

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod simplex;
pub use simplex::{Bounds, Simplex, inner_simplex};

mod vector;
use vector::{centroid_without, scaled_add};

/// Nelder-Mead downhill simplex minimizer
///
/// Every iteration reflects the worst vertex through the centroid of the others and then expands,
/// contracts or shrinks the simplex depending on how good the reflected point is. The run stops
/// after `max_iter` iterations or when the spread between the worst and the best objective values
/// stays below `term_eps` for `term_iter` consecutive iterations.
///
/// The minimizer itself never fails. NaN objective values are treated as $+\infty$, so objective
/// functions may return infinity for parameters outside of their domain and the search steers
/// away from them.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NelderMead {
    pub max_iter: usize,
    pub term_eps: f64,
    pub term_iter: usize,
    pub ref_factor: f64,
    pub exp_factor: f64,
    pub con_factor: f64,
    pub shr_factor: f64,
}

impl NelderMead {
    /// Create a new [NelderMead].
    ///
    /// # Arguments
    /// - `max_iter`: maximum number of iterations
    /// - `term_eps`: spread of the objective values over the simplex treated as converged
    /// - `term_iter`: number of consecutive converged iterations to stop
    /// - `ref_factor`: reflection factor
    /// - `exp_factor`: expansion factor
    /// - `con_factor`: contraction factor, must be in $(0, 1)$
    /// - `shr_factor`: shrink factor, must be in $(0, 1)$
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_iter: usize,
        term_eps: f64,
        term_iter: usize,
        ref_factor: f64,
        exp_factor: f64,
        con_factor: f64,
        shr_factor: f64,
    ) -> Self {
        assert!(term_eps >= 0.0, "term_eps must be non-negative");
        assert!(term_iter > 0, "term_iter must be positive");
        assert!(
            ref_factor > 0.0 && ref_factor.is_finite(),
            "ref_factor must be positive and finite"
        );
        assert!(
            exp_factor > 0.0 && exp_factor.is_finite(),
            "exp_factor must be positive and finite"
        );
        assert!(
            con_factor > 0.0 && con_factor < 1.0,
            "con_factor must be in (0, 1)"
        );
        assert!(
            shr_factor > 0.0 && shr_factor < 1.0,
            "shr_factor must be in (0, 1)"
        );
        Self {
            max_iter,
            term_eps,
            term_iter,
            ref_factor,
            exp_factor,
            con_factor,
            shr_factor,
        }
    }

    #[inline]
    pub fn default_max_iter() -> usize {
        300
    }

    #[inline]
    pub fn default_term_eps() -> f64 {
        f64::EPSILON.sqrt()
    }

    #[inline]
    pub fn default_term_iter() -> usize {
        10
    }

    #[inline]
    pub fn default_ref_factor() -> f64 {
        1.0
    }

    #[inline]
    pub fn default_exp_factor() -> f64 {
        2.0
    }

    #[inline]
    pub fn default_con_factor() -> f64 {
        0.5
    }

    #[inline]
    pub fn default_shr_factor() -> f64 {
        0.5
    }

    /// Same settings with another iteration limit
    pub fn with_max_iter(self, max_iter: usize) -> Self {
        Self { max_iter, ..self }
    }

    /// Same settings with another number of consecutive converged iterations
    pub fn with_term_iter(self, term_iter: usize) -> Self {
        assert!(term_iter > 0, "term_iter must be positive");
        Self { term_iter, ..self }
    }

    /// Minimize `objective` starting from `simplex`
    pub fn minimize<F, const N: usize>(
        &self,
        objective: F,
        simplex: &Simplex<N>,
    ) -> NelderMeadResult<N>
    where
        F: FnMut(&[f64; N]) -> f64,
    {
        let mut run = Run::new(objective, simplex);

        let mut iterations = 0;
        let mut converged_iterations = 0;
        while converged_iterations < self.term_iter && iterations < self.max_iter {
            run.step(self);
            if run.spread() < self.term_eps {
                converged_iterations += 1;
            } else {
                converged_iterations = 0;
            }
            iterations += 1;
        }

        let best = argmin(&run.values);
        let result = NelderMeadResult {
            x: run.vertices[best],
            value: run.values[best],
            iterations,
            converged: converged_iterations >= self.term_iter,
        };
        log::debug!(
            "Nelder-Mead finished after {} iterations, converged: {}, best value: {}",
            result.iterations,
            result.converged,
            result.value,
        );
        result
    }
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::new(
            Self::default_max_iter(),
            Self::default_term_eps(),
            Self::default_term_iter(),
            Self::default_ref_factor(),
            Self::default_exp_factor(),
            Self::default_con_factor(),
            Self::default_shr_factor(),
        )
    }
}

/// Output of [NelderMead::minimize]
#[derive(Clone, Debug, PartialEq)]
pub struct NelderMeadResult<const N: usize> {
    /// Best vertex of the final simplex
    pub x: [f64; N],
    /// Objective value at `x`, NaN is reported as infinity
    pub value: f64,
    pub iterations: usize,
    /// `false` if the iteration limit was reached first
    pub converged: bool,
}

/// Minimize `objective` with explicitly given Nelder-Mead settings and return the best vertex
///
/// See [NelderMead] for the meaning of the arguments.
#[allow(clippy::too_many_arguments)]
pub fn nelder_mead<F, const N: usize>(
    objective: F,
    simplex: &Simplex<N>,
    max_iter: usize,
    term_eps: f64,
    term_iter: usize,
    ref_factor: f64,
    exp_factor: f64,
    con_factor: f64,
    shr_factor: f64,
) -> [f64; N]
where
    F: FnMut(&[f64; N]) -> f64,
{
    NelderMead::new(
        max_iter, term_eps, term_iter, ref_factor, exp_factor, con_factor, shr_factor,
    )
    .minimize(objective, simplex)
    .x
}

/// State of a single minimization
struct Run<F, const N: usize> {
    objective: F,
    vertices: Vec<[f64; N]>,
    values: Vec<f64>,
    best: usize,
    worst: usize,
    centroid: [f64; N],
}

impl<F, const N: usize> Run<F, N>
where
    F: FnMut(&[f64; N]) -> f64,
{
    fn new(mut objective: F, simplex: &Simplex<N>) -> Self {
        let vertices = simplex.vertices().to_vec();
        let values = vertices.iter().map(|x| eval(&mut objective, x)).collect();
        let mut run = Self {
            objective,
            vertices,
            values,
            best: 0,
            worst: 0,
            centroid: [0.0; N],
        };
        run.best = argmin(&run.values);
        run.update_worst();
        run
    }

    fn eval(&mut self, x: &[f64; N]) -> f64 {
        eval(&mut self.objective, x)
    }

    fn update_worst(&mut self) {
        self.worst = argmax(&self.values);
        self.centroid = centroid_without(&self.vertices, self.worst);
    }

    fn replace_worst(&mut self, x: [f64; N], value: f64) {
        self.vertices[self.worst] = x;
        self.values[self.worst] = value;
        if value < self.values[self.best] {
            self.best = self.worst;
        }
    }

    fn spread(&self) -> f64 {
        self.values[self.worst] - self.values[self.best]
    }

    fn step(&mut self, settings: &NelderMead) {
        let NelderMead {
            ref_factor,
            exp_factor,
            con_factor,
            shr_factor,
            ..
        } = *settings;

        let worst_x = self.vertices[self.worst];
        let worst_value = self.values[self.worst];

        let reflected = scaled_add(&self.centroid, 1.0 + ref_factor, &worst_x, -ref_factor);
        let reflected_value = self.eval(&reflected);

        if reflected_value < self.values[self.best] {
            let expanded = scaled_add(&self.centroid, 1.0 - exp_factor, &reflected, exp_factor);
            let expanded_value = self.eval(&expanded);
            if expanded_value < reflected_value {
                self.replace_worst(expanded, expanded_value);
            } else {
                self.replace_worst(reflected, reflected_value);
            }
            self.update_worst();
            return;
        }

        let beats_other_vertex = self
            .values
            .iter()
            .enumerate()
            .any(|(i, &value)| i != self.worst && value > reflected_value);
        if beats_other_vertex {
            self.replace_worst(reflected, reflected_value);
            self.update_worst();
            return;
        }

        if reflected_value < worst_value {
            // outside contraction
            let contracted = scaled_add(&self.centroid, 1.0 - con_factor, &reflected, con_factor);
            let contracted_value = self.eval(&contracted);
            if contracted_value <= reflected_value {
                self.replace_worst(contracted, contracted_value);
                self.update_worst();
                return;
            }
        } else {
            // inside contraction
            let contracted = scaled_add(&self.centroid, 1.0 - con_factor, &worst_x, con_factor);
            let contracted_value = self.eval(&contracted);
            if contracted_value < worst_value {
                self.replace_worst(contracted, contracted_value);
                self.update_worst();
                return;
            }
        }

        self.shrink(shr_factor);
    }

    fn shrink(&mut self, shr_factor: f64) {
        log::trace!("Nelder-Mead shrinks simplex toward vertex {}", self.best);
        let best_x = self.vertices[self.best];
        for i in 0..self.vertices.len() {
            if i == self.best {
                continue;
            }
            let x = scaled_add(&best_x, 1.0 - shr_factor, &self.vertices[i], shr_factor);
            self.values[i] = self.eval(&x);
            self.vertices[i] = x;
        }
        self.best = argmin(&self.values);
        self.update_worst();
    }
}

fn eval<F, const N: usize>(objective: &mut F, x: &[f64; N]) -> f64
where
    F: FnMut(&[f64; N]) -> f64,
{
    let value = objective(x);
    if value.is_nan() { f64::INFINITY } else { value }
}

/// Index of the first smallest value
fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(i_min, min), (i, &x)| {
            if x < min { (i, x) } else { (i_min, min) }
        })
        .0
}

/// Index of the first largest value
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(i_max, max), (i, &x)| {
            if x > max { (i, x) } else { (i_max, max) }
        })
        .0
}
