//! Supported GreenPAK4 devices and their LUT resources

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported target devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetPart {
    Slg46140v,
    Slg46620v,
    #[default]
    Slg46621v,
}

impl TargetPart {
    pub const ALL: [TargetPart; 3] = [
        TargetPart::Slg46140v,
        TargetPart::Slg46620v,
        TargetPart::Slg46621v,
    ];

    /// Part number as given on the command line
    pub fn name(&self) -> &'static str {
        match self {
            TargetPart::Slg46140v => "SLG46140V",
            TargetPart::Slg46620v => "SLG46620V",
            TargetPart::Slg46621v => "SLG46621V",
        }
    }

    /// LUT budget handed to the LUT mapper for this device
    pub fn lut_buckets(&self) -> LutBuckets {
        match self {
            TargetPart::Slg46140v => LutBuckets([0, 6, 8, 2]),
            TargetPart::Slg46620v | TargetPart::Slg46621v => LutBuckets([2, 8, 16, 2]),
        }
    }
}

impl fmt::Display for TargetPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetPart {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.name() == s)
            .ok_or_else(|| PipelineError::InvalidPart(s.to_string()))
    }
}

/// Number of LUTs the mapper may use per size, indexed by input count minus
/// one (entry 0 counts 1-input LUTs, entry 3 counts 4-input LUTs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LutBuckets(pub [u32; 4]);

impl fmt::Display for LutBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a},{b},{c},{d}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_names() {
        for part in TargetPart::ALL {
            assert_eq!(part.name().parse::<TargetPart>().unwrap(), part);
        }
        assert_eq!(TargetPart::default(), TargetPart::Slg46621v);
    }

    #[test]
    fn test_invalid_part() {
        let err = "SLG46622V".parse::<TargetPart>().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPart(ref p) if p == "SLG46622V"));
        assert!("slg46620v".parse::<TargetPart>().is_err());
    }

    #[test]
    fn test_bucket_table() {
        assert_eq!(TargetPart::Slg46140v.lut_buckets().to_string(), "0,6,8,2");
        assert_eq!(TargetPart::Slg46620v.lut_buckets().to_string(), "2,8,16,2");
        assert_eq!(TargetPart::Slg46621v.lut_buckets().to_string(), "2,8,16,2");
    }
}
