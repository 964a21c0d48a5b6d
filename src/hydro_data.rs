use std::cell::Cell;
use std::path::Path;

use faer::prelude::*;
use itertools::Itertools;
use ndarray::Array3;

use crate::error::{HydroError, HydroResult};
use crate::source::{open_source, CoefficientSource, Dataset};

/// Number of rigid body degrees of freedom (3 translations, 3 rotations)
pub const N_DOFS: usize = 6;

/// Hydrodynamic coefficients of one body.
///
/// The restoring matrix is scaled by `rho * g` when loaded. The added mass
/// matrix and the impulse response kernel are kept unscaled and multiplied by
/// `rho` each time they are read.
#[derive(Debug)]
pub struct HydroData {
    body: String,
    /// Linear restoring stiffness, scaled by `rho * g` `[6][6]`
    restoring: Mat<f64>,
    /// Added mass at infinite frequency, unscaled `[6][6]`
    added_mass: Mat<f64>,
    /// Radiation impulse response function, unscaled `[6][6][n_steps]`
    kernel: Array3<f64>,
    /// Lag time of each kernel step `[n_steps]`
    time_samples: Vec<f64>,
    /// Center of gravity
    cg: [f64; 3],
    /// Center of buoyancy
    cb: [f64; 3],
    /// Displaced volume at equilibrium
    disp_vol: f64,
    /// Fluid density
    rho: f64,
    /// Gravitational acceleration
    g: f64,
    /// Number of out-of-range kernel lookups
    index_warnings: Cell<usize>,
}

impl HydroData {
    /// Reads the coefficients of `body` from the file at `path`, choosing the
    /// reader from the file extension.
    pub fn from_file(path: impl AsRef<Path>, body: &str) -> HydroResult<Self> {
        let source = open_source(path)?;
        Self::load(source.as_ref(), body)
    }

    /// Reads the coefficients of `body` from `source`.
    pub fn load<S: CoefficientSource + ?Sized>(source: &S, body: &str) -> HydroResult<Self> {
        let body = body.trim_matches('/');
        let coeffs = format!("{}/hydro_coeffs", body);
        let props = format!("{}/properties", body);
        let irf = format!("{}/radiation_damping/impulse_response_fun", coeffs);

        let rho = read_scalar(source, "simulation_parameters/rho")?;
        let g = read_scalar(source, "simulation_parameters/g")?;

        let k = read_matrix(source, &format!("{}/linear_restoring_stiffness", coeffs))?;
        let restoring = Mat::from_fn(N_DOFS, N_DOFS, |i, j| k[(i, j)] * rho * g);

        let added_mass = read_matrix(source, &format!("{}/added_mass/inf_freq", coeffs))?;

        let kernel = read_kernel(source, &format!("{}/K", irf))?;
        let time_samples = read_series(source, &format!("{}/t", irf))?;

        if kernel.dim().2 != time_samples.len() {
            return Err(HydroError::format(format!(
                "impulse response has {} steps but {} time samples",
                kernel.dim().2,
                time_samples.len()
            )));
        }
        if time_samples.len() < 2 {
            return Err(HydroError::format(
                "impulse response needs at least two time samples",
            ));
        }
        if let Some((i, _)) = time_samples
            .iter()
            .tuple_windows()
            .find_position(|(t0, t1)| t1 <= t0)
        {
            return Err(HydroError::format(format!(
                "impulse response time samples must increase, sample {} does not",
                i + 1
            )));
        }

        let data = Self {
            body: body.to_string(),
            restoring,
            added_mass,
            kernel,
            time_samples,
            cg: read_vector3(source, &format!("{}/cg", props))?,
            cb: read_vector3(source, &format!("{}/cb", props))?,
            disp_vol: read_scalar(source, &format!("{}/disp_vol", props))?,
            rho,
            g,
            index_warnings: Cell::new(0),
        };

        log::debug!(
            "loaded hydrodynamic coefficients for '{}': {} dofs, {} kernel steps, dt={}",
            data.body,
            data.n_dofs(),
            data.n_steps(),
            data.delta_t()
        );

        Ok(data)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Linear restoring stiffness matrix, already scaled by `rho * g`
    pub fn restoring_matrix(&self) -> MatRef<f64> {
        self.restoring.as_ref()
    }

    /// Added mass matrix at infinite frequency, scaled by `rho`
    pub fn added_mass_matrix(&self) -> Mat<f64> {
        Mat::from_fn(N_DOFS, N_DOFS, |i, j| self.added_mass[(i, j)] * self.rho)
    }

    /// Impulse response value for `row`, `col` and lag `step`, scaled by `rho`.
    ///
    /// Out-of-range indices log a warning and return zero.
    pub fn kernel(&self, row: usize, col: usize, step: usize) -> f64 {
        match self.kernel.get((row, col, step)) {
            Some(&k) => k * self.rho,
            None => {
                self.index_warnings.set(self.index_warnings.get() + 1);
                log::warn!(
                    "impulse response index ({}, {}, {}) out of range {:?} for '{}'",
                    row,
                    col,
                    step,
                    self.kernel.dim(),
                    self.body
                );
                0.
            }
        }
    }

    pub fn displaced_volume(&self) -> f64 {
        self.disp_vol
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn cg(&self) -> [f64; 3] {
        self.cg
    }

    pub fn cb(&self) -> [f64; 3] {
        self.cb
    }

    pub fn time_samples(&self) -> &[f64] {
        &self.time_samples
    }

    /// Spacing of the first two kernel time samples
    pub fn delta_t(&self) -> f64 {
        self.time_samples[1] - self.time_samples[0]
    }

    pub fn n_dofs(&self) -> usize {
        self.restoring.nrows()
    }

    /// Number of lag steps in the impulse response
    pub fn n_steps(&self) -> usize {
        self.kernel.dim().2
    }

    /// Number of out-of-range kernel lookups so far
    pub fn index_warnings(&self) -> usize {
        self.index_warnings.get()
    }
}

//------------------------------------------------------------------------------
// Dataset readers
//------------------------------------------------------------------------------

fn read_scalar<S: CoefficientSource + ?Sized>(source: &S, path: &str) -> HydroResult<f64> {
    let ds = source.dataset(path)?;
    if ds.len() != 1 {
        return Err(shape_error(path, &ds, "a single value"));
    }
    Ok(ds.data[0])
}

fn read_vector3<S: CoefficientSource + ?Sized>(source: &S, path: &str) -> HydroResult<[f64; 3]> {
    let ds = source.dataset(path)?;
    if ds.squeezed_shape() != [3] {
        return Err(shape_error(path, &ds, "3 values"));
    }
    Ok([ds.data[0], ds.data[1], ds.data[2]])
}

fn read_series<S: CoefficientSource + ?Sized>(source: &S, path: &str) -> HydroResult<Vec<f64>> {
    let ds = source.dataset(path)?;
    if ds.squeezed_shape().len() != 1 {
        return Err(shape_error(path, &ds, "a vector"));
    }
    Ok(ds.data)
}

fn read_matrix<S: CoefficientSource + ?Sized>(source: &S, path: &str) -> HydroResult<Mat<f64>> {
    let ds = source.dataset(path)?;
    if ds.shape != [N_DOFS, N_DOFS] {
        return Err(shape_error(path, &ds, "a 6x6 matrix"));
    }
    Ok(Mat::from_fn(N_DOFS, N_DOFS, |i, j| ds.data[i * N_DOFS + j]))
}

fn read_kernel<S: CoefficientSource + ?Sized>(source: &S, path: &str) -> HydroResult<Array3<f64>> {
    let ds = source.dataset(path)?;
    if ds.rank() != 3 || ds.shape[0] != N_DOFS || ds.shape[1] != N_DOFS {
        return Err(shape_error(path, &ds, "a 6x6xN array"));
    }
    let dim = (ds.shape[0], ds.shape[1], ds.shape[2]);
    Array3::from_shape_vec(dim, ds.data).map_err(|e| HydroError::format(e.to_string()))
}

fn shape_error(path: &str, ds: &Dataset, expected: &str) -> HydroError {
    HydroError::format(format!(
        "'{}' has shape {:?}, expected {}",
        path, ds.shape, expected
    ))
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
