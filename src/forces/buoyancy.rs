use faer::prelude::*;

use super::HydroForce;
use crate::hydro_data::HydroData;
use crate::state::BodyState;

/// Constant hydrostatic buoyancy, `rho * g * V` along +z.
///
/// Does not depend on the submerged volume of the current pose; changes in
/// displacement are handled by the restoring force.
pub struct BuoyancyForce {
    magnitude: f64,
    force: Col<f64>,
}

impl BuoyancyForce {
    pub fn new(data: &HydroData) -> Self {
        let magnitude = data.rho() * data.g() * data.displaced_volume();
        Self {
            magnitude,
            force: col![0., 0., magnitude, 0., 0., 0.],
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }
}

impl HydroForce for BuoyancyForce {
    fn force(&self, _state: &BodyState) -> Col<f64> {
        self.force.clone()
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use crate::hydro_data::tests::test_source;
    use approx::assert_relative_eq;

    #[test]
    fn test_buoyancy_magnitude() {
        // rho = 1000, g = 9.81, V = 0.5
        let data = HydroData::load(&test_source(2, |_, _, _| 0.), "body1").unwrap();
        let buoyancy = BuoyancyForce::new(&data);
        assert_relative_eq!(buoyancy.magnitude(), 4905.0, max_relative = 1e-12);

        let moving = BodyState::new()
            .time(3.)
            .position_xyz(1., 2., -4.)
            .velocity(1., 1., 1., 1., 1., 1.);
        let f = buoyancy.force(&moving);
        assert_eq!(f, buoyancy.force(&BodyState::new()));
        assert_eq!(f[0], 0.);
        assert_eq!(f[1], 0.);
        assert_eq!(f[2], buoyancy.magnitude());
        assert_eq!(buoyancy.coordinate(2, &moving), buoyancy.magnitude());
        assert_eq!(buoyancy.coordinate(3, &moving), 0.);
    }
}
