use crate::{GoalDetectError, PostCandidate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Plausibility limits for a post outline, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    pub min_width_px: f32,
    pub min_height_px: f32,
    /// Lower bound on height / width.
    pub min_aspect_ratio: f32,
    /// Upper bound on height / width.
    pub max_aspect_ratio: f32,
    /// Overlap fraction above which two outlines describe the same post.
    pub max_overlap: f32,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            min_width_px: 2.0,
            min_height_px: 8.0,
            min_aspect_ratio: 1.0,
            max_aspect_ratio: 60.0,
            max_overlap: 0.3,
        }
    }
}

impl ValidationParams {
    pub fn validate(&self) -> Result<(), GoalDetectError> {
        let non_negative = |name: &str, v: f32| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(GoalDetectError::InvalidArgument(format!(
                    "{name} must be finite and >= 0, got {v}"
                )))
            }
        };
        non_negative("min_width_px", self.min_width_px)?;
        non_negative("min_height_px", self.min_height_px)?;
        non_negative("min_aspect_ratio", self.min_aspect_ratio)?;
        non_negative("max_aspect_ratio", self.max_aspect_ratio)?;
        if self.min_aspect_ratio > self.max_aspect_ratio {
            return Err(GoalDetectError::InvalidArgument(format!(
                "min_aspect_ratio {} exceeds max_aspect_ratio {}",
                self.min_aspect_ratio, self.max_aspect_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.max_overlap) {
            return Err(GoalDetectError::InvalidArgument(format!(
                "max_overlap must be in [0, 1], got {}",
                self.max_overlap
            )));
        }
        Ok(())
    }
}

/// Whether the outline could be a post: positively wound, wide and tall
/// enough, and within the aspect ratio bounds.
pub fn is_valid_post(candidate: &PostCandidate, params: &ValidationParams) -> bool {
    let q = &candidate.quad;
    if q.signed_area() <= 0.0 {
        return false;
    }
    let (w, h) = (q.width(), q.height());
    if w < params.min_width_px || h < params.min_height_px {
        return false;
    }
    let ratio = q.aspect_ratio();
    ratio >= params.min_aspect_ratio && ratio <= params.max_aspect_ratio
}

/// Drop implausible outlines, keeping the order of the rest.
pub fn remove_invalid_posts(candidates: &mut Vec<PostCandidate>, params: &ValidationParams) {
    let before = candidates.len();
    candidates.retain(|c| is_valid_post(c, params));
    if candidates.len() != before {
        debug!(
            "removed {} invalid post outlines, {} left",
            before - candidates.len(),
            candidates.len()
        );
    }
}

/// Drop the weaker of every pair overlapping by more than `max_overlap`.
///
/// Pairs are visited in index order and already dropped candidates are not
/// compared again. Larger support wins; on a tie the earlier candidate stays.
pub fn resolve_overlaps(candidates: &mut Vec<PostCandidate>, max_overlap: f32) {
    let n = candidates.len();
    let mut alive = vec![true; n];
    for i in 0..n {
        for k in (i + 1)..n {
            if !alive[i] {
                break;
            }
            if !alive[k] {
                continue;
            }
            let overlap = candidates[i].quad.overlap_fraction(&candidates[k].quad);
            if overlap <= max_overlap {
                continue;
            }
            if candidates[k].support > candidates[i].support {
                alive[i] = false;
            } else {
                alive[k] = false;
            }
        }
    }

    let mut idx = 0usize;
    candidates.retain(|_| {
        let keep = alive[idx];
        idx += 1;
        keep
    });
    if candidates.len() != n {
        debug!("overlap resolution kept {} of {n} outlines", candidates.len());
    }
}
