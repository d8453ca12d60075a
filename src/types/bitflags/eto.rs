use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Describes which inputs of an ETo value were estimated, fused or missing,
    /// and whether the output itself was corrected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EtoFlags: u32 {
        /// At least one input is a weighted mean of several sources.
        const FUSED                 = 1 << 0;
        /// At least one input was interpolated in time.
        const INTERPOLATED          = 1 << 1;
        /// Mean temperature was estimated from max/min.
        const ESTIMATED             = 1 << 2;
        const MISSING_HUMIDITY      = 1 << 3;
        const MISSING_WIND          = 1 << 4;
        const MISSING_RADIATION     = 1 << 5;
        /// The raw formula result was negative and clamped to zero.
        const NON_PHYSICAL_CLAMPED  = 1 << 6;

        const NONE = 0;
    }
}

impl EtoFlags {
    /// Flag names in bit order, as stored by downstream consumers.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name_of(name)).collect()
    }
}

fn name_of(const_name: &str) -> &'static str {
    match const_name {
        "FUSED" => "fused",
        "INTERPOLATED" => "interpolated",
        "ESTIMATED" => "estimated",
        "MISSING_HUMIDITY" => "missing_humidity",
        "MISSING_WIND" => "missing_wind",
        "MISSING_RADIATION" => "missing_radiation",
        "NON_PHYSICAL_CLAMPED" => "non_physical_clamped",
        _ => "unknown",
    }
}

impl Default for EtoFlags {
    fn default() -> Self {
        EtoFlags::NONE
    }
}
