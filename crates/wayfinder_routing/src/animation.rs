use crate::geopoint::{GeoPoint, cumulative_distances};

/// Nominal animation tick rate; the host drives `tick` from its own timer.
pub const FRAME_RATE: f64 = 60.0;
/// Baseline seconds to traverse a full path.
pub const BASE_TRAVERSAL_SECONDS: f64 = 5.0;
/// Speed floor so short paths still move at a perceptible rate.
pub const MIN_SPEED_MPS: f64 = 1.0;

/// Coordinate path annotated with the running distance to each point.
#[derive(Debug, Clone)]
pub struct AnnotatedPath {
    points: Vec<GeoPoint>,
    cumulative: Vec<f64>,
}

impl AnnotatedPath {
    pub fn new(points: Vec<GeoPoint>) -> Option<AnnotatedPath> {
        if points.is_empty() {
            return None;
        }

        let cumulative = cumulative_distances(&points);
        Some(AnnotatedPath { points, cumulative })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn total_length(&self) -> f64 {
        *self.cumulative.last().unwrap_or(&0.0)
    }

    /// Prefix of the path up to `traveled` meters, closed off with one point
    /// spherically interpolated along the bounding segment: offset from the
    /// segment start by its bearing and the residual distance. The
    /// interpolation rule is a contract; linear lat/lng does not reproduce
    /// the same motion near the poles or over long segments.
    pub fn prefix(&self, traveled: f64) -> Vec<GeoPoint> {
        let total = self.total_length();
        if traveled >= total {
            return self.points.clone();
        }
        let traveled = traveled.max(0.0);

        let mut prefix = Vec::new();
        for (point, &distance) in self.points.iter().zip(&self.cumulative) {
            if distance > traveled {
                break;
            }
            prefix.push(*point);
        }

        let segment_start = prefix.len() - 1;
        if segment_start + 1 < self.points.len() {
            let from = self.points[segment_start];
            let to = self.points[segment_start + 1];
            let residual = traveled - self.cumulative[segment_start];
            if residual > 0.0 {
                prefix.push(from.destination(from.bearing_to(&to), residual));
            }
        }

        prefix
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub path: Vec<GeoPoint>,
    pub done: bool,
}

/// Constant-speed progression along a path, advanced by a pure `tick` so it
/// can be driven by any scheduling primitive and tested without timers.
/// Stops at the path end; it never loops.
#[derive(Debug, Clone)]
pub struct PathAnimation {
    path: AnnotatedPath,
    speed: f64,
    traveled: f64,
    done: bool,
}

impl PathAnimation {
    pub fn new(path: AnnotatedPath) -> PathAnimation {
        let speed = (path.total_length() / BASE_TRAVERSAL_SECONDS).max(MIN_SPEED_MPS);
        PathAnimation {
            path,
            speed,
            traveled: 0.0,
            done: false,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances by `elapsed` seconds and returns the frame to render. Once
    /// the traveled distance reaches the path length the frame carries the
    /// full path and `done`; the host cancels its timer on that frame.
    pub fn tick(&mut self, elapsed: f64) -> AnimationFrame {
        self.traveled += self.speed * elapsed;

        if self.traveled >= self.path.total_length() {
            self.traveled = self.path.total_length();
            self.done = true;
            return AnimationFrame {
                path: self.path.points().to_vec(),
                done: true,
            };
        }

        AnimationFrame {
            path: self.path.prefix(self.traveled),
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> AnnotatedPath {
        // Three points heading north, roughly 111 m per 0.001 degree of
        // latitude, so ~222 m total.
        AnnotatedPath::new(vec![
            GeoPoint::new(50.0, 4.0),
            GeoPoint::new(50.001, 4.0),
            GeoPoint::new(50.002, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(AnnotatedPath::new(Vec::new()).is_none());
    }

    #[test]
    fn test_speed_floor_applies_to_short_paths() {
        let short = AnnotatedPath::new(vec![
            GeoPoint::new(50.0, 4.0),
            GeoPoint::new(50.00001, 4.0),
        ])
        .unwrap();

        let animation = PathAnimation::new(short);
        assert_eq!(animation.speed(), MIN_SPEED_MPS);
    }

    #[test]
    fn test_speed_scales_with_length() {
        let path = straight_path();
        let total = path.total_length();
        let animation = PathAnimation::new(path);

        assert!((animation.speed() - total / BASE_TRAVERSAL_SECONDS).abs() < 1e-9);
    }

    #[test]
    fn test_tick_interpolates_between_points() {
        let path = straight_path();
        let total = path.total_length();
        let mut animation = PathAnimation::new(path.clone());

        // Half of the baseline duration puts us halfway along the path,
        // inside the second segment.
        let frame = animation.tick(BASE_TRAVERSAL_SECONDS / 2.0);
        assert!(!frame.done);
        assert_eq!(frame.path.len(), 3);

        let tip = *frame.path.last().unwrap();
        let from_start = path.points()[0].haversine_distance(&tip);
        assert!((from_start - total / 2.0).abs() < 1.0);
    }

    #[test]
    fn test_tick_stops_at_end_without_looping() {
        let path = straight_path();
        let mut animation = PathAnimation::new(path.clone());

        let frame = animation.tick(BASE_TRAVERSAL_SECONDS * 2.0);
        assert!(frame.done);
        assert_eq!(frame.path, path.points().to_vec());
        assert!(animation.is_done());

        // Further ticks keep reporting the settled full path.
        let frame = animation.tick(1.0);
        assert!(frame.done);
        assert_eq!(frame.path, path.points().to_vec());
    }

    #[test]
    fn test_prefix_clamps_negative_travel() {
        let path = straight_path();
        let prefix = path.prefix(-5.0);
        assert_eq!(prefix, vec![path.points()[0]]);
    }
}
