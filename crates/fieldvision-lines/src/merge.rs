use crate::LineDetectError;
use fieldvision_core::LsFittedLine;
use log::debug;
use std::f32::consts::FRAC_PI_2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Merge lines that lie on the same edge.
///
/// Two lines are merge candidates when their angle is at most
/// `angle_threshold` (radians) *and* their average distance is at most
/// `distance_threshold` (pixels). Lines are taken from the back of the input
/// one at a time; the current line absorbs every candidate from the
/// remaining input and from the already merged output, and the scan repeats
/// until a full pass absorbs nothing. Absorption thus follows chains
/// (A~B, B~C), and no two returned lines are merge candidates of each other,
/// so merging the output again changes nothing.
///
/// O(L²) comparisons per pass for L lines.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(lines = lines.len()))
)]
pub fn merge_colinear(
    mut lines: Vec<LsFittedLine>,
    angle_threshold: f32,
    distance_threshold: f32,
) -> Result<Vec<LsFittedLine>, LineDetectError> {
    validate_merge_thresholds(angle_threshold, distance_threshold)?;

    let input = lines.len();
    let mut merged: Vec<LsFittedLine> = Vec::with_capacity(lines.len());

    while let Some(mut current) = lines.pop() {
        loop {
            let absorbed = absorb_candidates(
                &mut current,
                &mut lines,
                angle_threshold,
                distance_threshold,
            ) + absorb_candidates(
                &mut current,
                &mut merged,
                angle_threshold,
                distance_threshold,
            );
            if absorbed == 0 {
                break;
            }
        }
        merged.push(current);
    }

    debug!("merge_colinear: {input} -> {} lines", merged.len());
    Ok(merged)
}

pub(crate) fn validate_merge_thresholds(
    angle_threshold: f32,
    distance_threshold: f32,
) -> Result<(), LineDetectError> {
    if !(0.0..=FRAC_PI_2).contains(&angle_threshold) {
        return Err(LineDetectError::InvalidArgument(format!(
            "angle_threshold must be in [0, pi/2], got {angle_threshold}"
        )));
    }
    if !distance_threshold.is_finite() || distance_threshold < 0.0 {
        return Err(LineDetectError::InvalidArgument(format!(
            "distance_threshold must be finite and non-negative, got {distance_threshold}"
        )));
    }
    Ok(())
}

/// One pass over `others`; returns how many lines were joined into `current`.
fn absorb_candidates(
    current: &mut LsFittedLine,
    others: &mut Vec<LsFittedLine>,
    angle_threshold: f32,
    distance_threshold: f32,
) -> usize {
    let mut absorbed = 0;
    let mut i = 0;
    while i < others.len() {
        let other = &others[i];
        if current.angle_between(other) <= angle_threshold
            && current.average_distance_between(other) <= distance_threshold
        {
            current.join_line(others.remove(i));
            absorbed += 1;
        } else {
            i += 1;
        }
    }
    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    /// Points from the origin along `angle_deg`, spanning `len` pixels.
    fn ray(angle_deg: f32, len: f32, n: usize, origin: (f32, f32)) -> LsFittedLine {
        let (s, c) = angle_deg.to_radians().sin_cos();
        LsFittedLine::from_points((0..n).map(|i| {
            let t = len * i as f32 / (n - 1) as f32;
            Point2::new(origin.0 + c * t, origin.1 + s * t)
        }))
    }

    #[test]
    fn merges_colinear_pieces_and_keeps_others() {
        let lines = vec![
            ray(0.0, 100.0, 10, (0.0, 0.0)),
            ray(0.5, 100.0, 10, (110.0, 1.0)),
            ray(90.0, 80.0, 10, (300.0, 0.0)),
        ];
        let out = merge_colinear(lines, 5f32.to_radians(), 5.0).unwrap();
        assert_eq!(out.len(), 2);
        let counts: Vec<usize> = out.iter().map(|l| l.num_points()).collect();
        assert!(counts.contains(&20));
        assert!(counts.contains(&10));
    }

    #[test]
    fn chain_collapses_into_one_line() {
        // A (0°) and C (6°) differ by more than the threshold; both are close to B (3°),
        // which dominates the fit once joined.
        let a = ray(0.0, 100.0, 5, (0.0, 0.0));
        let b = ray(3.0, 100.0, 100, (0.0, 0.0));
        let c = ray(6.0, 100.0, 5, (0.0, 0.0));
        let angle = 4f32.to_radians();
        assert!(a.angle_between(&c) > angle);

        for order in [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), b.clone(), a.clone()],
            vec![b.clone(), a.clone(), c.clone()],
        ] {
            let out = merge_colinear(order, angle, 10.0).unwrap();
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].num_points(), 110);
        }
    }

    #[test]
    fn merging_is_idempotent() {
        let lines = vec![
            ray(0.0, 60.0, 8, (0.0, 0.0)),
            ray(1.0, 60.0, 8, (70.0, 0.5)),
            ray(45.0, 60.0, 8, (0.0, 100.0)),
            ray(44.0, 60.0, 8, (45.0, 146.0)),
            ray(90.0, 60.0, 8, (400.0, 0.0)),
        ];
        let angle = 3f32.to_radians();
        let once = merge_colinear(lines, angle, 4.0).unwrap();
        let twice = merge_colinear(once.clone(), angle, 4.0).unwrap();
        assert_eq!(once.len(), twice.len());
        let mut a: Vec<usize> = once.iter().map(|l| l.num_points()).collect();
        let mut b: Vec<usize> = twice.iter().map(|l| l.num_points()).collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        for (i, x) in once.iter().enumerate() {
            for y in once.iter().skip(i + 1) {
                assert!(
                    x.angle_between(y) > angle || x.average_distance_between(y) > 4.0,
                    "output still holds a mergeable pair"
                );
            }
        }
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(merge_colinear(Vec::new(), 0.1, 1.0).unwrap().is_empty());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        assert!(matches!(
            merge_colinear(Vec::new(), 2.0, 1.0),
            Err(LineDetectError::InvalidArgument(_))
        ));
        assert!(matches!(
            merge_colinear(Vec::new(), 0.1, -1.0),
            Err(LineDetectError::InvalidArgument(_))
        ));
    }
}
