use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which stage of the pipeline a diagnostic or stage record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Normalize,
    Compose,
    Generate,
    Repair,
    Validate,
}
