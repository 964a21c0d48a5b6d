use std::rc::Rc;

use faer::prelude::*;

use super::{HydroForce, StepCache};
use crate::hydro_data::{HydroData, N_DOFS};
use crate::state::BodyState;

/// Linear hydrostatic restoring force, `F = K (x_eq - x)`.
pub struct RestoringForce {
    data: Rc<HydroData>,
    /// Equilibrium pose, center of gravity with zero rotation `[6]`
    equilibrium: Col<f64>,
    cache: StepCache,
}

impl RestoringForce {
    pub fn new(data: Rc<HydroData>) -> Self {
        let cg = data.cg();
        Self {
            equilibrium: col![cg[0], cg[1], cg[2], 0., 0., 0.],
            data,
            cache: StepCache::new(),
        }
    }

    pub fn equilibrium(&self) -> ColRef<f64> {
        self.equilibrium.as_ref()
    }

    /// Number of times the force has been computed rather than read from the cache
    pub fn n_evaluations(&self) -> usize {
        self.cache.evaluations()
    }
}

impl HydroForce for RestoringForce {
    fn force(&self, state: &BodyState) -> Col<f64> {
        self.cache.get_or_compute(state.time, |mut f| {
            let pose = state.pose();
            let displacement = Col::<f64>::from_fn(N_DOFS, |i| self.equilibrium[i] - pose[i]);
            let k_d = self.data.restoring_matrix() * displacement.as_ref();
            f.copy_from(k_d.as_ref());
        })
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
