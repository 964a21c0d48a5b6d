pub mod config;
pub mod error;
pub mod forces;
pub mod history;
pub mod hydro_data;
pub mod source;
pub mod state;
pub mod util;

pub use config::{read_config_from_file, ForceSelection, HydroConfig};
pub use error::{HydroError, HydroResult};
pub use forces::{
    added_mass::AddedMass, buoyancy::BuoyancyForce, radiation::RadiationForce,
    restoring::RestoringForce, CoordinateFunc, HydroForce, HydroLoads,
};
pub use hydro_data::HydroData;
pub use state::BodyState;
