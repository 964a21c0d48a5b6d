use faer::prelude::*;

use crate::hydro_data::{HydroData, N_DOFS};

/// Infinite-frequency added mass, a constant inertial contribution to the
/// body's mass matrix.
///
/// The load carries no damping or stiffness; its only effect on the
/// residual is `c * M * w`.
pub struct AddedMass {
    /// Added mass matrix scaled by density `[6][6]`
    m: Mat<f64>,
    zero: Mat<f64>,
}

impl AddedMass {
    pub fn new(data: &HydroData) -> Self {
        Self {
            m: data.added_mass_matrix(),
            zero: Mat::zeros(N_DOFS, N_DOFS),
        }
    }

    pub fn mass_matrix(&self) -> MatRef<f64> {
        self.m.as_ref()
    }

    pub fn damping_matrix(&self) -> MatRef<f64> {
        self.zero.as_ref()
    }

    pub fn stiffness_matrix(&self) -> MatRef<f64> {
        self.zero.as_ref()
    }

    /// Adds `c * M * w` into the residual `r`, both of length 6.
    pub fn load_residual_mv(&self, mut r: ColMut<f64>, w: ColRef<f64>, c: f64) {
        let mw = self.m.as_ref() * w;
        zip!(&mut r, &mw).for_each(|unzip!(r, mw)| *r += c * *mw);
    }

    /// Adds `c * M` into the 6x6 block of the host mass matrix `m` at `first_dof`.
    pub fn assemble_mass(&self, mut m: MatMut<f64>, first_dof: usize, c: f64) {
        zip!(
            &mut m.as_mut().submatrix_mut(first_dof, first_dof, N_DOFS, N_DOFS),
            &self.m
        )
        .for_each(|unzip!(m, ma)| *m += c * *ma);
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use crate::hydro_data::tests::test_source;
    use crate::source::Dataset;
    use equator::assert;
    use faer::utils::approx::*;

    fn added_mass() -> AddedMass {
        // rho = 1000, surge-pitch coupling 0.1
        let mut source = test_source(2, |_, _, _| 0.);
        let mut m = vec![0.; 36];
        (0..6).for_each(|i| m[i * 6 + i] = (i + 1) as f64);
        m[4] = 0.1;
        m[4 * 6] = 0.1;
        source.insert(
            "body1/hydro_coeffs/added_mass/inf_freq",
            Dataset::new(&[6, 6], m).unwrap(),
        );
        AddedMass::new(&HydroData::load(&source, "body1").unwrap())
    }

    #[test]
    fn test_matrices() {
        let approx_eq = CwiseMat(ApproxEq::eps());
        let am = added_mass();

        assert!(am.mass_matrix() ~ mat![
            [1000., 0., 0., 0., 100., 0.],
            [0., 2000., 0., 0., 0., 0.],
            [0., 0., 3000., 0., 0., 0.],
            [0., 0., 0., 4000., 0., 0.],
            [100., 0., 0., 0., 5000., 0.],
            [0., 0., 0., 0., 0., 6000.],
        ]);
        assert!(am.damping_matrix() ~ Mat::<f64>::zeros(6, 6));
        assert!(am.stiffness_matrix() ~ Mat::<f64>::zeros(6, 6));
    }

    #[test]
    fn test_load_residual_mv() {
        let approx_eq = CwiseMat(ApproxEq::eps());
        let am = added_mass();

        let mut r = col![1., 1., 1., 1., 1., 1.];
        let w = col![1., 0., 0., 0., 2., 0.];
        am.load_residual_mv(r.as_mut(), w.as_ref(), 0.5);
        assert!(r ~ col![
            1. + 0.5 * (1000. + 200.),
            1.,
            1.,
            1.,
            1. + 0.5 * (100. + 10000.),
            1.
        ]);

        // Zero scale leaves the residual untouched
        let mut r = Col::<f64>::zeros(6);
        am.load_residual_mv(r.as_mut(), w.as_ref(), 0.);
        assert!(r ~ Col::<f64>::zeros(6));
    }

    #[test]
    fn test_assemble_mass_block() {
        let am = added_mass();

        // Host system with the hydro body in the second 6x6 block
        let mut m = Mat::<f64>::from_fn(12, 12, |i, j| if i == j { 1. } else { 0. });
        am.assemble_mass(m.as_mut(), 6, 2.);

        assert_eq!(m[(0, 0)], 1.);
        assert_eq!(m[(0, 6)], 0.);
        assert_eq!(m[(6, 6)], 1. + 2000.);
        assert_eq!(m[(6, 10)], 200.);
        assert_eq!(m[(10, 6)], 200.);
        assert_eq!(m[(11, 11)], 1. + 12000.);
        assert_eq!(m[(5, 5)], 1.);
    }
}
