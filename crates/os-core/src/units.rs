//! Unit handling for imported geometry.
//!
//! The model is SI throughout; XML formats may carry IP lengths.

use core::str::FromStr;

use uom::si::f64::{Area as UomArea, Length as UomLength};
use uom::si::length::{centimeter, foot, inch, kilometer, meter, mile, millimeter, yard};

use crate::OsError;

pub type Length = UomLength;
pub type Area = UomArea;

#[inline]
pub fn m(v: f64) -> Length {
    Length::new::<meter>(v)
}

#[inline]
pub fn ft(v: f64) -> Length {
    Length::new::<foot>(v)
}

// ----------------------------------------------------------------------
// IP envelope properties
// ----------------------------------------------------------------------

/// Btu/(h·ft·°F) to W/(m·K).
pub const CONDUCTIVITY_IP_TO_SI: f64 = 1.730_734_666;
/// lb/ft³ to kg/m³.
pub const DENSITY_IP_TO_SI: f64 = 16.018_463_37;
/// Btu/(lb·°F) to J/(kg·K).
pub const SPECIFIC_HEAT_IP_TO_SI: f64 = 4_186.8;
/// Btu/(h·ft²·°F) to W/(m²·K).
pub const U_FACTOR_IP_TO_SI: f64 = 5.678_263_341;

/// Length units accepted by the interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Kilometers,
    Centimeters,
    Millimeters,
    Meters,
    Miles,
    Yards,
    Feet,
    Inches,
}

impl LengthUnit {
    pub fn length(self, v: f64) -> Length {
        match self {
            LengthUnit::Kilometers => Length::new::<kilometer>(v),
            LengthUnit::Centimeters => Length::new::<centimeter>(v),
            LengthUnit::Millimeters => Length::new::<millimeter>(v),
            LengthUnit::Meters => Length::new::<meter>(v),
            LengthUnit::Miles => Length::new::<mile>(v),
            LengthUnit::Yards => Length::new::<yard>(v),
            LengthUnit::Feet => Length::new::<foot>(v),
            LengthUnit::Inches => Length::new::<inch>(v),
        }
    }

    /// Factor that converts a value in this unit to meters.
    pub fn meters_per_unit(self) -> f64 {
        self.length(1.0).get::<meter>()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Kilometers => "Kilometers",
            LengthUnit::Centimeters => "Centimeters",
            LengthUnit::Millimeters => "Millimeters",
            LengthUnit::Meters => "Meters",
            LengthUnit::Miles => "Miles",
            LengthUnit::Yards => "Yards",
            LengthUnit::Feet => "Feet",
            LengthUnit::Inches => "Inches",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = OsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "kilometers" => LengthUnit::Kilometers,
            "centimeters" => LengthUnit::Centimeters,
            "millimeters" => LengthUnit::Millimeters,
            "meters" => LengthUnit::Meters,
            "miles" => LengthUnit::Miles,
            "yards" => LengthUnit::Yards,
            "feet" => LengthUnit::Feet,
            "inches" => LengthUnit::Inches,
            _ => {
                return Err(OsError::UnknownUnit {
                    unit: s.to_string(),
                });
            }
        };
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feet_to_meters() {
        assert!((LengthUnit::Feet.meters_per_unit() - 0.3048).abs() < 1e-12);
        assert!((ft(10.0).get::<meter>() - 3.048).abs() < 1e-12);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("feet".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!("Meters".parse::<LengthUnit>().unwrap(), LengthUnit::Meters);
        assert!("cubits".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn ip_factors_are_consistent() {
        // A U-factor is a conductivity per foot of thickness.
        let per_foot = CONDUCTIVITY_IP_TO_SI / ft(1.0).get::<meter>();
        assert!((per_foot - U_FACTOR_IP_TO_SI).abs() < 1e-6);
    }

    #[test]
    fn kilometers_scale() {
        assert!((LengthUnit::Kilometers.meters_per_unit() - 1000.0).abs() < 1e-9);
        assert!((LengthUnit::Inches.meters_per_unit() - 0.0254).abs() < 1e-12);
    }
}
