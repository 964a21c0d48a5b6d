use std::cell::RefCell;
use std::rc::Rc;

use faer::prelude::*;

use super::{HydroForce, StepCache};
use crate::history::VelocityHistory;
use crate::hydro_data::{HydroData, N_DOFS};
use crate::state::BodyState;

/// Radiation damping force from the convolution of the body's velocity
/// history with the impulse response function.
///
/// The integral over the lag window is evaluated with the trapezoidal rule
/// on the kernel's time samples:
///
/// `F_r = -sum_s (g_r(s-1) + g_r(s)) / 2 * (t_s - t_(s-1))`,
/// `g_r(s) = sum_c K(r, c, s) v_c(t - s)`
///
/// where `v(t - s)` is the velocity recorded `s` steps ago. The window holds
/// one sample per kernel step, so the cost per step is fixed regardless of
/// how long the simulation has run.
pub struct RadiationForce {
    data: Rc<HydroData>,
    history: RefCell<VelocityHistory>,
    cache: StepCache,
}

impl RadiationForce {
    pub fn new(data: Rc<HydroData>) -> Self {
        Self {
            history: RefCell::new(VelocityHistory::new(data.n_steps())),
            data,
            cache: StepCache::new(),
        }
    }

    /// Snapshot of the velocity samples recorded so far, newest first
    pub fn history(&self) -> VelocityHistory {
        self.history.borrow().clone()
    }

    /// Number of steps computed, one per distinct simulation time
    pub fn n_evaluations(&self) -> usize {
        self.cache.evaluations()
    }

    /// Forgets the velocity history and the cached force.
    pub fn reset(&self) {
        self.history.borrow_mut().clear();
        self.cache.invalidate();
    }

    /// Records the current velocity and evaluates the convolution into `f`.
    fn step(&self, state: &BodyState, mut f: ColMut<f64>) {
        let mut history = self.history.borrow_mut();
        history.push(state.v.as_ref());

        let t = self.data.time_samples();
        let mut total = [0.; N_DOFS];
        let mut g_prev = [0.; N_DOFS];
        for s in 0..history.capacity() {
            let v = history.get(s);
            let g: [f64; N_DOFS] = std::array::from_fn(|r| {
                (0..N_DOFS)
                    .map(|c| self.data.kernel(r, c, s) * v[c])
                    .sum::<f64>()
            });
            if s > 0 {
                let dt = t[s] - t[s - 1];
                (0..N_DOFS).for_each(|r| total[r] -= (g_prev[r] + g[r]) / 2. * dt);
            }
            g_prev = g;
        }
        (0..N_DOFS).for_each(|r| f[r] = total[r]);
    }
}

impl HydroForce for RadiationForce {
    fn force(&self, state: &BodyState) -> Col<f64> {
        self.cache
            .get_or_compute(state.time, |f| self.step(state, f))
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
