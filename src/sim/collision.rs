//! Projectile vs answer collision detection
//!
//! Answers are treated as circles of `HIT_RADIUS` around their center and
//! projectiles as points.

use serde::{Deserialize, Serialize};

use super::state::{Candidate, Projectile};
use crate::consts::HIT_RADIUS;

/// A projectile reaching a candidate this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub projectile_id: u32,
    pub candidate_id: u32,
}

/// Check if a projectile is inside a candidate's hit circle
#[inline]
pub fn projectile_hits(projectile: &Projectile, candidate: &Candidate) -> bool {
    projectile.pos.distance(candidate.pos) < HIT_RADIUS
}

/// Find this frame's hits without touching the state.
///
/// Projectiles are checked in firing order against candidates in slot order.
/// A projectile stops at its first hit, a candidate can only be hit once per
/// frame, and candidates already marked as hit are passed through.
pub fn detect_hits(projectiles: &[Projectile], candidates: &[Candidate]) -> Vec<Hit> {
    let mut hits: Vec<Hit> = Vec::new();

    for projectile in projectiles {
        let target = candidates.iter().find(|candidate| {
            !candidate.hit
                && !hits.iter().any(|h| h.candidate_id == candidate.id)
                && projectile_hits(projectile, candidate)
        });
        if let Some(candidate) = target {
            hits.push(Hit {
                projectile_id: projectile.id,
                candidate_id: candidate.id,
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn candidate(id: u32, x: f32, y: f32) -> Candidate {
        Candidate {
            id,
            value: id as i32,
            pos: Vec2::new(x, y),
            is_correct: false,
            hit: false,
        }
    }

    fn projectile(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id,
            pos: Vec2::new(x, y),
            speed: -10.0,
        }
    }

    #[test]
    fn test_hit_radius_boundary() {
        let c = candidate(1, 100.0, 100.0);
        assert!(projectile_hits(&projectile(1, 100.0, 100.0), &c));
        assert!(projectile_hits(&projectile(1, 100.0, 100.0 + HIT_RADIUS - 0.5), &c));
        // Strictly below the radius
        assert!(!projectile_hits(&projectile(1, 100.0, 100.0 + HIT_RADIUS), &c));
        assert!(!projectile_hits(&projectile(1, 200.0, 100.0), &c));
    }

    #[test]
    fn test_no_hits_when_far() {
        let candidates = [candidate(1, 100.0, 100.0), candidate(2, 300.0, 100.0)];
        let projectiles = [projectile(10, 200.0, 100.0), projectile(11, 100.0, 400.0)];
        assert!(detect_hits(&projectiles, &candidates).is_empty());
    }

    #[test]
    fn test_first_candidate_in_order_wins() {
        // Overlapping hit circles: the projectile qualifies for both
        let candidates = [candidate(1, 100.0, 100.0), candidate(2, 130.0, 100.0)];
        let projectiles = [projectile(10, 115.0, 100.0)];
        let hits = detect_hits(&projectiles, &candidates);
        assert_eq!(
            hits,
            vec![Hit {
                projectile_id: 10,
                candidate_id: 1
            }]
        );
    }

    #[test]
    fn test_candidate_hit_once_per_frame() {
        let candidates = [candidate(1, 100.0, 100.0)];
        let projectiles = [projectile(10, 100.0, 105.0), projectile(11, 100.0, 95.0)];
        let hits = detect_hits(&projectiles, &candidates);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].projectile_id, 10);
    }

    #[test]
    fn test_hit_candidate_is_passed_through() {
        let mut shot = candidate(1, 100.0, 100.0);
        shot.hit = true;
        let candidates = [shot, candidate(2, 100.0, 60.0)];
        let projectiles = [projectile(10, 100.0, 90.0)];
        let hits = detect_hits(&projectiles, &candidates);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].candidate_id, 2);
    }

    #[test]
    fn test_second_projectile_falls_through_to_next_candidate() {
        let candidates = [candidate(1, 100.0, 100.0), candidate(2, 130.0, 100.0)];
        let projectiles = [projectile(10, 115.0, 100.0), projectile(11, 116.0, 100.0)];
        let hits = detect_hits(&projectiles, &candidates);
        let ids: Vec<_> = hits.iter().map(|h| h.candidate_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
