//! Solve for the mixing ratios of a palette of inks that approximate a target.
//!
//! The search is a forward-difference gradient descent over the probability
//! simplex: every ratio is probed on its own, stepped against the gradient,
//! clamped at zero and the whole vector renormalized to sum to one.

use crate::cmyk::Cmyk;
use crate::error::{Error, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Amount added to a single ratio when estimating its partial derivative.
const PROBE_STEP: f64 = 0.01;

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop once the error, or its change between two iterations, falls
    /// below this value.
    pub tolerance: f64,

    /// Upper bound of ratio updates. Running out is not an error, the last
    /// state is returned as a best effort.
    pub max_iterations: usize,

    /// Factor applied to the gradient on each update.
    pub step_size: f64,

    /// Stop when two consecutive iterations have nearly equal error. This
    /// may halt away from the optimum on a plateau, disable it to only stop
    /// on a small error or exhausted iterations.
    pub stall_detection: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 0.0001,
            max_iterations: 1000,
            step_size: 0.05,
            stall_detection: true,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }

        if !self.step_size.is_finite() || self.step_size < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "step size must be a non-negative number, got {}",
                self.step_size
            )));
        }

        Ok(())
    }
}

/// Why a solve stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// The error dropped below the tolerance.
    Converged,
    /// The error changed less than the tolerance between two iterations.
    Stalled,
    /// All iterations were used up.
    Exhausted,
    /// An update pushed every ratio to zero, the previous ratios were kept.
    Degenerate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MixResult {
    pub mixed_color: Cmyk,
    pub ratios: Vec<f64>,
    pub error: f64,
    pub iterations: usize,
    pub termination: Termination,
}

fn mix(colors: &[Cmyk], ratios: &[f64]) -> Cmyk {
    colors
        .iter()
        .zip(ratios)
        .fold(Cmyk::WHITE, |acc, (color, ratio)| acc + *color * *ratio)
}

fn validate(colors: &[Cmyk], target: &Cmyk) -> Result<()> {
    if colors.is_empty() {
        return Err(Error::EmptyPalette);
    }

    if let Some((index, color)) = colors.iter().enumerate().find(|(_, c)| !c.is_valid()) {
        return Err(Error::OutOfRange {
            what: format!("ink {}", index + 1),
            color: *color,
        });
    }

    if !target.is_valid() {
        return Err(Error::OutOfRange {
            what: "target".to_string(),
            color: *target,
        });
    }

    Ok(())
}

/// Find non-negative ratios summing to one whose weighted mix of `colors`
/// is closest to `target` in L1 distance.
///
/// Fails if `colors` is empty or any color has a channel outside [0, 1].
/// The result is deterministic for identical inputs.
pub fn calculate_ratios(
    colors: &[Cmyk],
    target: Cmyk,
    config: &SolverConfig,
) -> Result<MixResult> {
    config.validate()?;
    validate(colors, &target)?;

    let n = colors.len();
    let mut ratios = vec![1.0 / n as f64; n];
    let mut last_error = f64::INFINITY;

    let finish = |ratios: Vec<f64>,
                  mixed_color: Cmyk,
                  error: f64,
                  iterations: usize,
                  termination: Termination| {
        debug!(
            "Mixing {} inks stopped after {} iterations: {:?} with error {:.6}",
            n, iterations, termination, error
        );

        MixResult {
            mixed_color,
            ratios,
            error,
            iterations,
            termination,
        }
    };

    for iteration in 0..config.max_iterations {
        let mixed_color = mix(colors, &ratios);
        let error = mixed_color.diff_error(target);
        trace!("Iteration {}: error {:.6}", iteration, error);

        if error < config.tolerance {
            return Ok(finish(
                ratios,
                mixed_color,
                error,
                iteration,
                Termination::Converged,
            ));
        }

        if config.stall_detection && (last_error - error).abs() < config.tolerance {
            return Ok(finish(
                ratios,
                mixed_color,
                error,
                iteration,
                Termination::Stalled,
            ));
        }

        last_error = error;

        let gradients = (0..n)
            .map(|i| {
                let mut probe = ratios.clone();
                probe[i] += PROBE_STEP;
                mix(colors, &probe).diff_error(target) - error
            })
            .collect::<Vec<_>>();

        let updated = ratios
            .iter()
            .zip(&gradients)
            .map(|(ratio, gradient)| (ratio - config.step_size * gradient).max(0.0))
            .collect::<Vec<_>>();

        let total = updated.iter().sum::<f64>();

        if total == 0.0 || !total.is_finite() {
            warn!(
                "Update in iteration {} left no ink to renormalize, keeping previous ratios",
                iteration
            );
            return Ok(finish(
                ratios,
                mixed_color,
                error,
                iteration,
                Termination::Degenerate,
            ));
        }

        ratios = updated.into_iter().map(|ratio| ratio / total).collect();
    }

    let mixed_color = mix(colors, &ratios);
    let error = mixed_color.diff_error(target);

    Ok(finish(
        ratios,
        mixed_color,
        error,
        config.max_iterations,
        Termination::Exhausted,
    ))
}
