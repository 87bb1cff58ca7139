//! Login input checks that run before any network call.

use crate::error::{Result, RouteError};

pub const VEHICLE_NUMBER_LEN: std::ops::RangeInclusive<usize> = 8..=15;
pub const LICENSE_NUMBER_LEN: std::ops::RangeInclusive<usize> = 10..=20;

/// Vehicle and licence numbers that passed length checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    vehicle_number: String,
    license_number: String,
}

impl Credentials {
    /// Trims both values and checks their character counts.
    pub fn new(vehicle_number: &str, license_number: &str) -> Result<Self> {
        let vehicle_number = vehicle_number.trim();
        let license_number = license_number.trim();
        check_len("vehicle number", vehicle_number, &VEHICLE_NUMBER_LEN)?;
        check_len("license number", license_number, &LICENSE_NUMBER_LEN)?;
        Ok(Self {
            vehicle_number: vehicle_number.to_string(),
            license_number: license_number.to_string(),
        })
    }

    pub fn vehicle_number(&self) -> &str {
        &self.vehicle_number
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }
}

fn check_len(field: &str, value: &str, range: &std::ops::RangeInclusive<usize>) -> Result<()> {
    let len = value.chars().count();
    if range.contains(&len) {
        Ok(())
    } else {
        Err(RouteError::validation(format!(
            "{field} must be {}-{} characters, got {len}",
            range.start(),
            range.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bounds() {
        assert!(Credentials::new("KA01AB12", "DL01234567").is_ok());
        assert!(Credentials::new("KA01AB123456789", "DL012345678901234567").is_ok());
    }

    #[test]
    fn test_rejects_short_and_long() {
        assert!(Credentials::new("KA01AB1", "DL01234567").unwrap_err().is_validation());
        assert!(Credentials::new("KA01AB1234567890", "DL01234567").is_err());
        assert!(Credentials::new("KA01AB1234", "DL0123456").is_err());
        assert!(Credentials::new("KA01AB1234", "DL0123456789012345678").is_err());
    }

    #[test]
    fn test_trims_whitespace() {
        let creds = Credentials::new("  KA01AB1234 ", " DL0420110012345\n").unwrap();
        assert_eq!(creds.vehicle_number(), "KA01AB1234");
        assert_eq!(creds.license_number(), "DL0420110012345");
        assert!(Credentials::new("   KA01   ", "DL0420110012345").is_err());
    }
}
