use faer::prelude::*;

use crate::util::{quat_as_euler_angles, Quat};

/// Kinematic state of a rigid body supplied by the host each step.
#[derive(Debug, Clone)]
pub struct BodyState {
    /// Simulation time
    pub time: f64,
    /// Position and orientation quaternion `[7]` (x, y, z, w, i, j, k)
    pub x: Col<f64>,
    /// Translational and angular velocity `[6]`
    pub v: Col<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyState {
    /// Body at the origin with identity orientation, at rest, at time zero
    pub fn new() -> Self {
        Self {
            time: 0.,
            x: col![0., 0., 0., 1., 0., 0., 0.],
            v: Col::zeros(6),
        }
    }

    /// Sets simulation time
    pub fn time(mut self, t: f64) -> Self {
        self.time = t;
        self
    }

    /// Sets position and orientation
    pub fn position(mut self, x: f64, y: f64, z: f64, w: f64, i: f64, j: f64, k: f64) -> Self {
        self.x.copy_from(col![x, y, z, w, i, j, k].as_ref());
        self
    }

    /// Sets position
    pub fn position_xyz(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x[0] = x;
        self.x[1] = y;
        self.x[2] = z;
        self
    }

    /// Sets orientation from quaternion
    pub fn orientation(mut self, w: f64, i: f64, j: f64, k: f64) -> Self {
        self.x[3] = w;
        self.x[4] = i;
        self.x[5] = j;
        self.x[6] = k;
        self
    }

    /// Sets orientation from rotation vector (axis * angle)
    pub fn orientation_rotation_vector(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x
            .subrows_mut(3, 4)
            .quat_from_rotation_vector(col![x, y, z].as_ref());
        self
    }

    /// Sets translational and angular velocity
    pub fn velocity(mut self, x: f64, y: f64, z: f64, i: f64, j: f64, k: f64) -> Self {
        self.v.copy_from(col![x, y, z, i, j, k].as_ref());
        self
    }

    /// Sets translational velocity
    pub fn translation_velocity(mut self, x: f64, y: f64, z: f64) -> Self {
        self.v[0] = x;
        self.v[1] = y;
        self.v[2] = z;
        self
    }

    /// Sets angular velocity
    pub fn angular_velocity(mut self, x: f64, y: f64, z: f64) -> Self {
        self.v[3] = x;
        self.v[4] = y;
        self.v[5] = z;
        self
    }

    /// Orientation reduced to x-y-z Euler angles `[3]`
    pub fn euler_angles(&self) -> Col<f64> {
        let mut e = Col::<f64>::zeros(3);
        quat_as_euler_angles(self.x.subrows(3, 4), e.as_mut());
        e
    }

    /// Pose in the six degrees of freedom: position followed by Euler angles `[6]`
    pub fn pose(&self) -> Col<f64> {
        let e = self.euler_angles();
        Col::from_fn(6, |i| if i < 3 { self.x[i] } else { e[i - 3] })
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
