use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detector::{DetectorPreset, DetectorProfile};
use crate::error::Result;
use crate::grid::{LinearGrid, LogGrid};
use crate::observation::ObservationConfig;
use crate::search::SearchPolicy;
use crate::survey::SurveyAssumptions;

/// Everything a batch run needs, as read from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub detector: DetectorPreset,
    #[serde(default)]
    pub observation: ObservationConfig,
    #[serde(default)]
    pub grids: GridConfig,
    #[serde(default)]
    pub survey: SurveyAssumptions,
}

impl RunConfig {
    /// SuperWASP detector and observing setup with 30 s exposures.
    pub fn wasp() -> Self {
        Self {
            detector: DetectorPreset::Wasp,
            observation: ObservationConfig::wasp(30.0),
            ..Self::default()
        }
    }

    /// Resolve the detector and check both halves of the setup.
    pub fn resolve(&self) -> Result<(DetectorProfile, ObservationConfig)> {
        let detector = self.detector.resolve()?;
        self.observation.validate()?;
        self.observation.n_exposures(&detector)?;
        Ok((detector, self.observation.clone()))
    }
}

/// Sampling used by sweeps and searches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub magnitude: LinearGrid,
    #[serde(default)]
    pub exposure: LogGrid,
    #[serde(default)]
    pub policy: SearchPolicy,
}

impl fmt::Display for GridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mag {}..{} ({} samples), exposure {}..{} s ({} samples), {}",
            self.magnitude.start,
            self.magnitude.end,
            self.magnitude.samples,
            self.exposure.start,
            self.exposure.end,
            self.exposure.samples,
            self.policy
        )
    }
}
