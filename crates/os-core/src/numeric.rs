use crate::OsError;

/// Tolerance used for geometric comparisons (vertex matching, planarity), meters.
pub const GEOMETRY_TOL: f64 = 1e-4;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, OsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(OsError::NonFinite { what, value: v })
    }
}

/// Format a number the way IDF files carry them: shortest text that parses back.
pub fn format_real(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_rejects_nan() {
        assert!(ensure_finite(f64::NAN, "x").is_err());
        assert!(ensure_finite(f64::INFINITY, "x").is_err());
        assert_eq!(ensure_finite(2.5, "x").unwrap(), 2.5);
    }

    #[test]
    fn format_real_drops_trailing_zero() {
        assert_eq!(format_real(3.0), "3");
        assert_eq!(format_real(-0.5), "-0.5");
        assert_eq!(format_real(0.1 + 0.2), "0.30000000000000004");
    }
}
