//! Sequential multi-model RANSAC.
//!
//! Each attempt searches the remaining pool for the model with the largest
//! consensus set. Accepted inliers are removed before the next attempt, so
//! several independent models (several posts, several lines) can be pulled
//! out of one frame without a joint fit.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A model type the fitter can instantiate and score.
pub trait RansacModel<T>: Sized {
    /// Smallest sample that determines a model.
    const MIN_SAMPLES: usize;

    /// Fit a model to `sample`; `None` for a degenerate sample.
    fn fit(sample: &[T]) -> Option<Self>;

    /// Distance of an observation to the model, in pixels.
    fn distance_to(&self, observation: &T) -> f32;
}

/// Parameters of [`find_multiple_models`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacParams {
    /// Observations closer than this (inclusive) count as inliers.
    pub consensus_margin: f32,
    /// Minimal consensus size to accept a model.
    pub min_inliers: usize,
    /// Random samples drawn per fitting attempt.
    pub iterations_per_attempt: usize,
    /// Hard cap on fitting attempts (and thus on returned models).
    pub max_attempts: usize,
    /// Seed of the sampling RNG.
    pub seed: u64,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            consensus_margin: 8.0,
            min_inliers: 10,
            iterations_per_attempt: 40,
            max_attempts: 3,
            seed: 0,
        }
    }
}

impl RansacParams {
    pub fn validate(&self) -> Result<(), RansacError> {
        if !self.consensus_margin.is_finite() || self.consensus_margin < 0.0 {
            return Err(RansacError::InvalidParams(format!(
                "consensus_margin must be finite and non-negative, got {}",
                self.consensus_margin
            )));
        }
        if self.min_inliers == 0 {
            return Err(RansacError::InvalidParams(
                "min_inliers must be at least 1".into(),
            ));
        }
        if self.iterations_per_attempt == 0 {
            return Err(RansacError::InvalidParams(
                "iterations_per_attempt must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RansacError {
    #[error("invalid RANSAC parameters: {0}")]
    InvalidParams(String),
}

/// One accepted model together with the observations that support it.
#[derive(Clone, Debug, Serialize)]
pub struct RansacFit<M, T> {
    pub model: M,
    pub inliers: Vec<T>,
}

/// Extract up to `params.max_attempts` models from `observations`.
///
/// Sampling is driven by a `StdRng` seeded from `params.seed`, so the same
/// input always yields the same models. An empty result is not an error.
pub fn find_multiple_models<M, T>(
    observations: &[T],
    params: &RansacParams,
) -> Result<Vec<RansacFit<M, T>>, RansacError>
where
    M: RansacModel<T>,
    T: Clone,
{
    let mut rng = StdRng::seed_from_u64(params.seed);
    find_multiple_models_with_rng(observations, params, &mut rng)
}

/// [`find_multiple_models`] with a caller-supplied random source.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(observations = observations.len()))
)]
pub fn find_multiple_models_with_rng<M, T, R>(
    observations: &[T],
    params: &RansacParams,
    rng: &mut R,
) -> Result<Vec<RansacFit<M, T>>, RansacError>
where
    M: RansacModel<T>,
    T: Clone,
    R: Rng + ?Sized,
{
    params.validate()?;

    let needed = params.min_inliers.max(M::MIN_SAMPLES);
    let mut pool: Vec<T> = observations.to_vec();
    let mut fits = Vec::new();

    for attempt in 0..params.max_attempts {
        if pool.len() < needed {
            debug!(
                "attempt {attempt}: {} observations left, need {needed}",
                pool.len()
            );
            break;
        }

        let Some((model, mask, count)) = best_consensus::<M, T, R>(&pool, params, rng) else {
            debug!("attempt {attempt}: no non-degenerate sample");
            break;
        };
        if count < params.min_inliers {
            debug!(
                "attempt {attempt}: best consensus {count} < {}",
                params.min_inliers
            );
            break;
        }

        let mut inliers = Vec::with_capacity(count);
        let mut rest = Vec::with_capacity(pool.len() - count);
        for (obs, is_inlier) in pool.into_iter().zip(mask) {
            if is_inlier {
                inliers.push(obs);
            } else {
                rest.push(obs);
            }
        }
        pool = rest;
        debug!(
            "attempt {attempt}: accepted model with {count} inliers, {} left",
            pool.len()
        );
        fits.push(RansacFit { model, inliers });
    }

    Ok(fits)
}

fn best_consensus<M, T, R>(
    pool: &[T],
    params: &RansacParams,
    rng: &mut R,
) -> Option<(M, Vec<bool>, usize)>
where
    M: RansacModel<T>,
    T: Clone,
    R: Rng + ?Sized,
{
    let mut best: Option<(M, Vec<bool>, usize)> = None;
    for _ in 0..params.iterations_per_attempt {
        let sample: Vec<T> = sample_indices(rng, pool.len(), M::MIN_SAMPLES)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect();
        let Some(model) = M::fit(&sample) else {
            continue;
        };

        let mask: Vec<bool> = pool
            .iter()
            .map(|obs| model.distance_to(obs) <= params.consensus_margin)
            .collect();
        let count = mask.iter().filter(|&&m| m).count();

        if best.as_ref().is_none_or(|(_, _, c)| count > *c) {
            best = Some((model, mask, count));
        }
    }
    best
}

/// Sample `k` distinct indices from `0..n` using a partial Fisher–Yates shuffle.
fn sample_indices<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    debug_assert!(k <= n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
