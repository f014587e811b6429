//! Volume units used by the EIA natural-gas series.

/// Million cubic feet in one billion cubic feet.
pub const MMCF_PER_BCF: f64 = 1000.0;

/// Converts a volume in MMcf (the unit of the consumption series) to Bcf.
pub fn mmcf_to_bcf(mmcf: f64) -> f64 {
    mmcf / MMCF_PER_BCF
}
