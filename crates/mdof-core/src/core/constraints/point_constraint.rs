use nalgebra::{Matrix3, Vector3};

/// Directions closer to parallel/orthogonal than this are treated as exactly so.
pub const CONSTRAINT_TOLERANCE: f64 = 1e-10;

/// Accumulates locked directions of a three-dimensional quantity.
///
/// The accumulator holds the number of locked directions and one characteristic
/// direction:
///
/// | locked | direction          | free subspace |
/// |--------|--------------------|---------------|
/// | 0      | unused             | everything    |
/// | 1      | locked normal `n`  | plane ⟂ `n`   |
/// | 2      | free line `d`      | line along `d`|
/// | 3      | unused             | nothing       |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointConstraint {
    locked: u8,
    direction: Vector3<f64>,
}

impl Default for PointConstraint {
    fn default() -> Self {
        Self::free()
    }
}

impl PointConstraint {
    pub fn free() -> Self {
        Self {
            locked: 0,
            direction: Vector3::zeros(),
        }
    }

    /// Motion confined to the plane with the given (unit) normal.
    pub fn plane(normal: Vector3<f64>) -> Self {
        Self {
            locked: 1,
            direction: normal,
        }
    }

    /// Motion confined to the line along the given (unit) direction.
    pub fn line(direction: Vector3<f64>) -> Self {
        Self {
            locked: 2,
            direction,
        }
    }

    pub fn fixed() -> Self {
        Self {
            locked: 3,
            direction: Vector3::zeros(),
        }
    }

    pub fn locked(&self) -> u8 {
        self.locked
    }

    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// Locks the (unit) direction `cd` in addition to what is already locked.
    pub fn apply_constraint(&mut self, cd: &Vector3<f64>) {
        match self.locked {
            0 => *self = Self::plane(*cd),
            1 => {
                let n = self.direction.cross(cd);
                let mag = n.norm();
                if mag > CONSTRAINT_TOLERANCE {
                    *self = Self::line(n / mag);
                }
            }
            2 => {
                if cd.dot(&self.direction).abs() > CONSTRAINT_TOLERANCE {
                    *self = Self::fixed();
                }
            }
            _ => {}
        }
    }

    /// Intersects the free subspace with that of `other`.
    pub fn combine(&mut self, other: &PointConstraint) {
        match (self.locked, other.locked) {
            (_, 0) => {}
            (0, _) => *self = *other,
            (3, _) | (_, 3) => *self = Self::fixed(),
            (1, 1) => self.apply_constraint(&other.direction),
            (1, 2) => {
                // A line lying in the plane survives, any other line does not.
                if self.direction.dot(&other.direction).abs() > CONSTRAINT_TOLERANCE {
                    *self = Self::fixed();
                } else {
                    *self = *other;
                }
            }
            (2, 1) => {
                if self.direction.dot(&other.direction).abs() > CONSTRAINT_TOLERANCE {
                    *self = Self::fixed();
                }
            }
            (2, 2) => {
                if self.direction.cross(&other.direction).norm() > CONSTRAINT_TOLERANCE {
                    *self = Self::fixed();
                }
            }
            _ => {}
        }
    }

    /// The projector onto the free subspace.
    pub fn transformation(&self) -> Matrix3<f64> {
        match self.locked {
            0 => Matrix3::identity(),
            1 => Matrix3::identity() - self.direction * self.direction.transpose(),
            2 => self.direction * self.direction.transpose(),
            _ => Matrix3::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(p: &Matrix3<f64>) {
        assert!((p * p - p).norm() < 1e-14);
    }

    #[test]
    fn free_accumulator_is_identity() {
        assert_eq!(PointConstraint::free().transformation(), Matrix3::identity());
    }

    #[test]
    fn single_plane_removes_normal_component_exactly() {
        let p = PointConstraint::plane(Vector3::z()).transformation();
        let v = p * Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(v, Vector3::new(1.0, -2.0, 0.0));
        assert_idempotent(&p);
    }

    #[test]
    fn two_planes_leave_their_intersection_line() {
        let mut pc = PointConstraint::plane(Vector3::x());
        pc.apply_constraint(&Vector3::y());
        assert_eq!(pc.locked(), 2);

        let v = pc.transformation() * Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v, Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn parallel_planes_do_not_lock_twice() {
        let mut pc = PointConstraint::plane(Vector3::x());
        pc.apply_constraint(&Vector3::x());
        assert_eq!(pc.locked(), 1);
    }

    #[test]
    fn line_outside_plane_locks_everything() {
        let mut pc = PointConstraint::plane(Vector3::z());
        pc.combine(&PointConstraint::line(Vector3::z()));
        assert_eq!(pc.locked(), 3);
        assert_eq!(pc.transformation(), Matrix3::zeros());
    }

    #[test]
    fn line_inside_plane_survives_combination() {
        let mut pc = PointConstraint::plane(Vector3::z());
        pc.combine(&PointConstraint::line(Vector3::x()));
        assert_eq!(pc.locked(), 2);
        assert_eq!(*pc.direction(), Vector3::x());

        let mut reversed = PointConstraint::line(Vector3::x());
        reversed.combine(&PointConstraint::plane(Vector3::z()));
        assert_eq!(reversed, pc);
    }

    #[test]
    fn crossing_lines_lock_everything() {
        let mut pc = PointConstraint::line(Vector3::x());
        pc.combine(&PointConstraint::line(Vector3::y()));
        assert_eq!(pc.locked(), 3);
    }

    #[test]
    fn combining_with_free_is_a_no_op_and_with_fixed_is_absorbing() {
        let mut pc = PointConstraint::line(Vector3::y());
        pc.combine(&PointConstraint::free());
        assert_eq!(pc, PointConstraint::line(Vector3::y()));

        pc.combine(&PointConstraint::fixed());
        assert_eq!(pc, PointConstraint::fixed());
    }

    #[test]
    fn oblique_projectors_are_idempotent() {
        let n = Vector3::new(1.0, 2.0, -2.0).normalize();
        assert_idempotent(&PointConstraint::plane(n).transformation());
        assert_idempotent(&PointConstraint::line(n).transformation());
    }
}
