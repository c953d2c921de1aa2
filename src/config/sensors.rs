//! Sensor threshold configuration.
//!
//! All thresholds are compile-time constants with validation assertions.

// =============================================================================
// Alert Thresholds
// =============================================================================

/// CO2 concentration (ppm) at or above which the monitor switches to the alert palette.
pub const CO2_THRESHOLD: u16 = 1000;

/// TVOC concentration (ppb) at or above which the VOC label turns red.
pub const VOC_THRESHOLD: u16 = 250;

/// Outdoor air is ~420 ppm; a threshold below that would alert permanently.
const _: () = assert!(CO2_THRESHOLD > 420);
const _: () = assert!(VOC_THRESHOLD > 0);

// =============================================================================
// SGP30 Humidity Compensation
// =============================================================================

/// Ambient temperature (°C) assumed for SGP30 humidity compensation.
pub const SGP30_COMPENSATION_CELSIUS: f32 = 22.1;

/// Relative humidity (%) assumed for SGP30 humidity compensation.
pub const SGP30_COMPENSATION_RH: f32 = 44.0;

/// Check if a CO2 reading is in the alert range.
#[inline]
pub const fn is_high_co2(co2_ppm: u16) -> bool { co2_ppm >= CO2_THRESHOLD }

/// Check if a TVOC reading is in the alert range.
#[inline]
pub const fn is_high_voc(voc_ppb: u16) -> bool { voc_ppb >= VOC_THRESHOLD }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co2_threshold_is_inclusive() {
        assert!(!is_high_co2(CO2_THRESHOLD - 1));
        assert!(is_high_co2(CO2_THRESHOLD));
    }

    #[test]
    fn test_voc_threshold_is_inclusive() {
        assert!(!is_high_voc(249));
        assert!(is_high_voc(250));
    }
}
