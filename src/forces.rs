pub mod added_mass;
pub mod buoyancy;
pub mod radiation;
pub mod restoring;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use faer::prelude::*;

use crate::config::{ForceSelection, HydroConfig};
use crate::error::HydroResult;
use crate::hydro_data::{HydroData, N_DOFS};
use crate::state::BodyState;

use added_mass::AddedMass;
use buoyancy::BuoyancyForce;
use radiation::RadiationForce;
use restoring::RestoringForce;

/// Hydrodynamic force acting on a rigid body.
///
/// Forces are queried once per coordinate each step; implementations cache
/// the full vector so every query at the same time sees the same result.
pub trait HydroForce {
    /// Force and torque `[6]` (fx, fy, fz, mx, my, mz) for the given state
    fn force(&self, state: &BodyState) -> Col<f64>;

    /// Component `i` of the force vector; indices outside `[0, 6)` log a
    /// warning and evaluate to zero.
    fn coordinate(&self, i: usize, state: &BodyState) -> f64 {
        if i < N_DOFS {
            self.force(state)[i]
        } else {
            log::warn!("force coordinate index {} out of range [0, {})", i, N_DOFS);
            0.
        }
    }

    /// One callback per coordinate, all sharing this force
    fn coordinate_funcs(&self) -> [CoordinateFunc<'_>; N_DOFS]
    where
        Self: Sized,
    {
        std::array::from_fn(|index| CoordinateFunc { base: self, index })
    }

    /// Callbacks for the force components (fx, fy, fz)
    fn force_funcs(&self) -> [CoordinateFunc<'_>; 3]
    where
        Self: Sized,
    {
        std::array::from_fn(|index| CoordinateFunc { base: self, index })
    }

    /// Callbacks for the torque components (mx, my, mz)
    fn torque_funcs(&self) -> [CoordinateFunc<'_>; 3]
    where
        Self: Sized,
    {
        std::array::from_fn(|i| CoordinateFunc {
            base: self,
            index: i + 3,
        })
    }
}

/// Scalar callback evaluating one coordinate of a [`HydroForce`].
#[derive(Clone, Copy)]
pub struct CoordinateFunc<'a> {
    base: &'a dyn HydroForce,
    index: usize,
}

impl<'a> CoordinateFunc<'a> {
    pub fn new(base: &'a dyn HydroForce, index: usize) -> Self {
        Self { base, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn eval(&self, state: &BodyState) -> f64 {
        self.base.coordinate(self.index, state)
    }
}

//------------------------------------------------------------------------------
// Step cache
//------------------------------------------------------------------------------

/// Force vector keyed by the simulation time it was computed at.
#[derive(Debug)]
pub(crate) struct StepCache {
    /// Bit pattern of the cached time, so NaN matches itself
    time: Cell<Option<u64>>,
    value: RefCell<Col<f64>>,
    evaluations: Cell<usize>,
}

impl StepCache {
    pub(crate) fn new() -> Self {
        Self {
            time: Cell::new(None),
            value: RefCell::new(Col::zeros(N_DOFS)),
            evaluations: Cell::new(0),
        }
    }

    /// Returns the cached value for `time`, running `compute` first if the
    /// cache holds a different time.
    pub(crate) fn get_or_compute(&self, time: f64, compute: impl FnOnce(ColMut<f64>)) -> Col<f64> {
        // Adding zero maps -0.0 onto 0.0
        let key = (time + 0.).to_bits();
        if self.time.get() != Some(key) {
            if !time.is_finite() {
                log::warn!("force evaluated at non-finite simulation time {}", time);
            }
            {
                let mut value = self.value.borrow_mut();
                compute(value.as_mut());
            }
            self.time.set(Some(key));
            self.evaluations.set(self.evaluations.get() + 1);
        }
        self.value.borrow().clone()
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub(crate) fn invalidate(&self) {
        self.time.set(None);
    }
}

//------------------------------------------------------------------------------
// Aggregate
//------------------------------------------------------------------------------

/// All hydrodynamic loads attached to one body, sharing one coefficient store.
pub struct HydroLoads {
    pub data: Rc<HydroData>,
    pub restoring: Option<RestoringForce>,
    pub buoyancy: Option<BuoyancyForce>,
    pub radiation: Option<RadiationForce>,
    pub added_mass: Option<AddedMass>,
}

impl HydroLoads {
    pub fn new(data: Rc<HydroData>, selection: &ForceSelection) -> Self {
        Self {
            restoring: selection
                .restoring
                .then(|| RestoringForce::new(data.clone())),
            buoyancy: selection.buoyancy.then(|| BuoyancyForce::new(&data)),
            radiation: selection
                .radiation
                .then(|| RadiationForce::new(data.clone())),
            added_mass: selection.added_mass.then(|| AddedMass::new(&data)),
            data,
        }
    }

    /// Loads the coefficient file named by `config` and creates the selected forces.
    pub fn from_config(config: &HydroConfig) -> HydroResult<Self> {
        let data = HydroData::from_file(&config.coefficients, &config.body)?;
        log::info!(
            "hydrodynamic loads for '{}' from {}: {:?}",
            config.body,
            config.coefficients.display(),
            config.forces
        );
        Ok(Self::new(Rc::new(data), &config.forces))
    }

    /// Enabled force components
    pub fn forces(&self) -> Vec<&dyn HydroForce> {
        let mut forces: Vec<&dyn HydroForce> = vec![];
        if let Some(f) = &self.restoring {
            forces.push(f);
        }
        if let Some(f) = &self.buoyancy {
            forces.push(f);
        }
        if let Some(f) = &self.radiation {
            forces.push(f);
        }
        forces
    }

    /// Sum of all enabled force vectors `[6]`
    pub fn total_force(&self, state: &BodyState) -> Col<f64> {
        let mut total = Col::<f64>::zeros(N_DOFS);
        self.forces().iter().for_each(|f| {
            let force = f.force(state);
            zip!(&mut total.as_mut(), &force).for_each(|unzip!(t, f)| *t += *f);
        });
        total
    }

    /// Adds the total force into the host's load vector `r`, starting at `first_dof`.
    pub fn assemble_residual(&self, state: &BodyState, mut r: ColMut<f64>, first_dof: usize) {
        let total = self.total_force(state);
        zip!(&mut r.as_mut().subrows_mut(first_dof, N_DOFS), &total)
            .for_each(|unzip!(l, f)| *l += *f);
    }

    /// Adds `c` times the added mass matrix into the host's mass matrix block at `first_dof`.
    pub fn assemble_mass(&self, m: MatMut<f64>, first_dof: usize, c: f64) {
        if let Some(added_mass) = &self.added_mass {
            added_mass.assemble_mass(m, first_dof, c);
        }
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
