//! GPS coordinate computation.
//!
//! Latitude and longitude are stored as three rationals (degrees, minutes,
//! seconds) plus a one-letter hemisphere reference. Altitude is a single
//! rational plus a byte saying whether it is above or below sea level.

use serde::Serialize;

use crate::error::ExifError;
use crate::format::tiff::Rational;

/// Minutes per degree.
const MINUTES_PER_DEGREE: f64 = 60.0;

/// Seconds per degree.
const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Position decoded from the GPS directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsCoordinate {
    /// Signed decimal degrees, negative south of the equator
    pub latitude: f64,
    /// Signed decimal degrees, negative west of Greenwich
    pub longitude: f64,
    /// Meters relative to sea level, when recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// Convert a degrees/minutes/seconds triple to signed decimal degrees.
///
/// `reference` must be one of `N`, `S`, `E`, `W`; `S` and `W` negate the
/// result. The combination of reference and axis is not checked here, so a
/// latitude tagged `E` is accepted as positive.
///
/// # Errors
/// - `InvalidReference` for any other reference character
/// - `DivisionByZero` if any of the three denominators is zero
pub fn compute(coords: &[Rational; 3], reference: char) -> Result<f64, ExifError> {
    let sign = match reference {
        'N' | 'E' => 1.0,
        'S' | 'W' => -1.0,
        other => return Err(ExifError::InvalidReference(other.to_string())),
    };

    let degrees = coords[0].to_f64()?;
    let minutes = coords[1].to_f64()?;
    let seconds = coords[2].to_f64()?;

    Ok(sign * (degrees + minutes / MINUTES_PER_DEGREE + seconds / SECONDS_PER_DEGREE))
}

/// Convert a GPS altitude to signed meters.
///
/// Reference 0 is above sea level, 1 is below (negated).
///
/// # Errors
/// - `InvalidReference` for any other reference byte
/// - `DivisionByZero` if the denominator is zero
pub fn altitude(value: Rational, reference: u8) -> Result<f64, ExifError> {
    let sign = match reference {
        0 => 1.0,
        1 => -1.0,
        other => return Err(ExifError::InvalidReference(other.to_string())),
    };
    Ok(sign * value.to_f64()?)
}

// =============================================================================
// Tests
// =============================================================================
