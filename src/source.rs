use std::collections::HashMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde_yaml::Value;

use crate::error::{HydroError, HydroResult};

/// Named array read from a coefficient source, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl Dataset {
    pub fn new(shape: &[usize], data: Vec<f64>) -> HydroResult<Self> {
        let n = shape.iter().product::<usize>();
        if n != data.len() {
            return Err(HydroError::format(format!(
                "dataset shape {:?} holds {} values, got {}",
                shape,
                n,
                data.len()
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn scalar(value: f64) -> Self {
        Self {
            shape: vec![],
            data: vec![value],
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shape with unit dimensions removed, so `[3, 1]` and `[1, 3]` both read as `[3]`.
    pub fn squeezed_shape(&self) -> Vec<usize> {
        self.shape.iter().copied().filter(|&d| d != 1).collect_vec()
    }
}

/// Hierarchical store of named datasets, addressed by `/`-separated paths.
pub trait CoefficientSource {
    /// Reads the dataset at `path`, or fails with [`HydroError::Format`] if it does not exist.
    fn dataset(&self, path: &str) -> HydroResult<Dataset>;
}

fn missing(path: &str) -> HydroError {
    HydroError::format(format!("missing dataset '{}'", path))
}

//------------------------------------------------------------------------------
// In-memory source
//------------------------------------------------------------------------------

/// Datasets held in memory, for hosts that compute coefficients in-process.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    datasets: HashMap<String, Dataset>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, dataset: Dataset) -> &mut Self {
        self.datasets
            .insert(path.trim_matches('/').to_string(), dataset);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<Dataset> {
        self.datasets.remove(path.trim_matches('/'))
    }
}

impl CoefficientSource for MemorySource {
    fn dataset(&self, path: &str) -> HydroResult<Dataset> {
        self.datasets
            .get(path.trim_matches('/'))
            .cloned()
            .ok_or_else(|| missing(path))
    }
}

//------------------------------------------------------------------------------
// YAML source
//------------------------------------------------------------------------------

/// Coefficient file written as nested YAML maps; datasets are numbers or
/// nested sequences of numbers.
///
/// ```yaml
/// simulation_parameters:
///   rho: 1000.0
///   g: 9.81
/// body1:
///   properties:
///     cg: [0.0, 0.0, -2.0]
/// ```
pub struct YamlSource {
    root: Value,
}

impl YamlSource {
    pub fn open(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HydroError::file(path, e))?;
        let root = serde_yaml::from_str(&text).map_err(|e| HydroError::file(path, e))?;
        Ok(Self { root })
    }

    pub fn parse(text: &str) -> HydroResult<Self> {
        let root = serde_yaml::from_str(text).map_err(|e| HydroError::file("<memory>", e))?;
        Ok(Self { root })
    }
}

impl CoefficientSource for YamlSource {
    fn dataset(&self, path: &str) -> HydroResult<Dataset> {
        let value = path
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(&self.root, |node, key| node.get(key))
            .ok_or_else(|| missing(path))?;
        let mut data = vec![];
        let shape = flatten_value(value, path, &mut data)?;
        Dataset::new(&shape, data)
    }
}

/// Appends the numbers in `value` to `data` in row-major order and returns its shape.
fn flatten_value(value: &Value, path: &str, data: &mut Vec<f64>) -> HydroResult<Vec<usize>> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| {
                HydroError::format(format!("'{}' holds a non-finite number", path))
            })?;
            data.push(v);
            Ok(vec![])
        }
        Value::Sequence(items) => {
            let child_shapes = items
                .iter()
                .map(|item| flatten_value(item, path, data))
                .collect::<HydroResult<Vec<_>>>()?;
            let child_shape = match child_shapes.first() {
                Some(first) => first.clone(),
                None => vec![],
            };
            if child_shapes.iter().any(|s| *s != child_shape) {
                return Err(HydroError::format(format!(
                    "'{}' is ragged, rows have shapes {:?}",
                    path,
                    child_shapes.iter().unique().collect_vec()
                )));
            }
            Ok(std::iter::once(items.len()).chain(child_shape).collect_vec())
        }
        _ => Err(HydroError::format(format!("'{}' is not numeric", path))),
    }
}

//------------------------------------------------------------------------------
// NetCDF-4 / HDF5 source
//------------------------------------------------------------------------------

/// Coefficient file in NetCDF-4 format; groups map to path segments.
#[cfg(feature = "netcdf")]
pub struct NetCdfSource {
    path: PathBuf,
    file: netcdf::File,
}

#[cfg(feature = "netcdf")]
impl NetCdfSource {
    pub fn open(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HydroError::file(path, "file not found"));
        }
        let file = netcdf::open(path).map_err(|e| HydroError::file(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

#[cfg(feature = "netcdf")]
impl CoefficientSource for NetCdfSource {
    fn dataset(&self, path: &str) -> HydroResult<Dataset> {
        let var = self
            .file
            .variable(path.trim_matches('/'))
            .ok_or_else(|| missing(path))?;
        let shape = var.dimensions().iter().map(|d| d.len()).collect_vec();
        let data = var
            .get_values::<f64, _>(..)
            .map_err(|e| HydroError::file(&self.path, e))?;
        Dataset::new(&shape, data)
    }
}

/// Opens the source matching the file extension.
pub fn open_source(path: impl AsRef<Path>) -> HydroResult<Box<dyn CoefficientSource>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "yaml" | "yml" => Ok(Box::new(YamlSource::open(&path)?)),
        #[cfg(feature = "netcdf")]
        "nc" | "h5" | "hdf5" => Ok(Box::new(NetCdfSource::open(&path)?)),
        #[cfg(not(feature = "netcdf"))]
        "nc" | "h5" | "hdf5" => Err(HydroError::file(
            &path,
            "NetCDF/HDF5 support requires the `netcdf` feature",
        )),
        _ => Err(HydroError::file(
            &path,
            format!("unsupported coefficient file extension '{}'", ext),
        )),
    }
}

//------------------------------------------------------------------------------
// Testing
//------------------------------------------------------------------------------
