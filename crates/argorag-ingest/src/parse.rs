//! Depth-series variable extraction from NetCDF measurement files.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{DepthVariable, RawProfile};
use std::path::Path;

const PRESSURE_VAR: &str = "PRES";
const TEMPERATURE_VAR: &str = "TEMP";
const SALINITY_VAR: &str = "PSAL";

/// Extract the three fixed depth-series variables from a measurement file.
///
/// A variable absent from the file yields `DepthVariable::Absent` rather
/// than an error; salinity in particular is commonly missing. Only an
/// unreadable or corrupt container fails.
pub fn parse_profile(path: &Path) -> Result<RawProfile> {
    let file = netcdf::open(path).map_err(|e| ArgoragError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(RawProfile {
        pressure: read_variable(&file, PRESSURE_VAR, path)?,
        temperature: read_variable(&file, TEMPERATURE_VAR, path)?,
        salinity: read_variable(&file, SALINITY_VAR, path)?,
    })
}

/// Read one named variable, flattening any multi-dimensional array into a
/// 1-D sequence in row-major order.
fn read_variable(file: &netcdf::File, name: &str, path: &Path) -> Result<DepthVariable> {
    match file.variable(name) {
        Some(variable) => {
            let values = variable.get_values::<f64, _>(..).map_err(|e| ArgoragError::Parse {
                path: path.to_path_buf(),
                reason: format!("failed to read {}: {}", name, e),
            })?;
            Ok(DepthVariable::Present(values))
        }
        None => Ok(DepthVariable::Absent),
    }
}
