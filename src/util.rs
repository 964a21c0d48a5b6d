use std::f64::consts::PI;

use faer::{ColMut, ColRef};

pub trait Quat {
    fn quat_from_rotation_vector(&mut self, v: ColRef<f64>);
    fn quat_from_identity(&mut self);
}

/// Reduces a quaternion to Euler angles for the x-y-z rotation sequence
/// (roll, pitch, yaw).
#[inline]
pub fn quat_as_euler_angles(q: ColRef<f64>, mut v: ColMut<f64>) {
    let norm = q.norm_l2();
    let (w, x, y, z) = (q[0] / norm, q[1] / norm, q[2] / norm, q[3] / norm);

    v[0] = (2. * (w * x + y * z)).atan2(1. - 2. * (x * x + y * y));
    let a = (1. + 2. * (w * y - x * z)).sqrt();
    let b = (1. - 2. * (w * y - x * z)).sqrt();
    v[1] = -PI / 2. + 2. * a.atan2(b);
    v[2] = (2. * (w * z + x * y)).atan2(1. - 2. * (y * y + z * z));
}

impl Quat for ColMut<'_, f64> {
    #[inline]
    fn quat_from_identity(&mut self) {
        self[0] = 1.;
        self[1] = 0.;
        self[2] = 0.;
        self[3] = 0.;
    }

    /// Populates Quaternion from rotation vector
    ///
    /// # Panics
    /// Panics if `self.nrows() < 4`.
    /// Panics if `v.nrows() < 3`.
    #[inline]
    fn quat_from_rotation_vector(&mut self, v: ColRef<f64>) {
        let angle = v.norm_l2();
        if angle < 1e-12 {
            self.quat_from_identity();
        } else {
            let (sin, cos) = (angle / 2.).sin_cos();
            let factor = sin / angle;
            self[0] = cos;
            self[1] = v[0] * factor;
            self[2] = v[1] * factor;
            self[3] = v[2] * factor;
        }
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;
    use faer::prelude::*;

    #[test]
    fn test_euler_angles_single_axis() {
        let mut q = Col::<f64>::zeros(4);
        let mut e = Col::<f64>::zeros(3);

        q.as_mut().quat_from_rotation_vector(col![0.3, 0., 0.].as_ref());
        quat_as_euler_angles(q.as_ref(), e.as_mut());
        assert_relative_eq!(e[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(e[1], 0., epsilon = 1e-12);
        assert_relative_eq!(e[2], 0., epsilon = 1e-12);

        q.as_mut().quat_from_rotation_vector(col![0., -0.2, 0.].as_ref());
        quat_as_euler_angles(q.as_ref(), e.as_mut());
        assert_relative_eq!(e[0], 0., epsilon = 1e-12);
        assert_relative_eq!(e[1], -0.2, epsilon = 1e-12);
        assert_relative_eq!(e[2], 0., epsilon = 1e-12);

        q.as_mut().quat_from_rotation_vector(col![0., 0., 1.1].as_ref());
        quat_as_euler_angles(q.as_ref(), e.as_mut());
        assert_relative_eq!(e[0], 0., epsilon = 1e-12);
        assert_relative_eq!(e[1], 0., epsilon = 1e-12);
        assert_relative_eq!(e[2], 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_identity() {
        let mut q = Col::<f64>::zeros(4);
        q.as_mut().quat_from_rotation_vector(col![0., 0., 0.].as_ref());
        assert_eq!(q, col![1., 0., 0., 0.]);
    }
}
