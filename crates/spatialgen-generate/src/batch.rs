//! Several datasets described in one TOML document.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{GenerationEngine, GenerationResult};
use crate::errors::GenerationError;
use crate::model::DatasetConfig;

/// A list of `[[dataset]]` tables sharing an optional batch seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Seeds every dataset that has none of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetConfig>,
}

impl BatchConfig {
    /// Dataset configs with their effective seeds filled in.
    ///
    /// A dataset without a seed gets one derived from the batch seed and its
    /// output path, so adding or reordering entries does not change the
    /// others.
    pub fn resolved(&self) -> Vec<DatasetConfig> {
        self.datasets
            .iter()
            .map(|dataset| {
                let mut dataset = dataset.clone();
                if dataset.seed.is_none() {
                    dataset.seed = self.seed.map(|seed| {
                        hash_seed(seed, &dataset.output_path().to_string_lossy())
                    });
                }
                dataset
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.datasets.is_empty() {
            return Err(GenerationError::InvalidConfig(
                "batch contains no [[dataset]] entries".to_string(),
            ));
        }
        for (index, dataset) in self.datasets.iter().enumerate() {
            dataset.validate().map_err(|err| match err {
                GenerationError::InvalidConfig(message) => GenerationError::InvalidConfig(
                    format!("dataset #{index} ({}): {message}", dataset.output.display()),
                ),
                other => other,
            })?;
        }
        let mut outputs: Vec<_> = self.datasets.iter().map(|d| d.output_path()).collect();
        outputs.sort();
        if let Some(pair) = outputs.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GenerationError::InvalidConfig(format!(
                "output {} is used by more than one dataset",
                pair[0].display()
            )));
        }
        Ok(())
    }
}

/// Runs every dataset of the batch in order; stops at the first failure.
///
/// All entries are validated before any file is written.
pub fn run_batch(
    engine: &GenerationEngine,
    batch: &BatchConfig,
) -> Result<Vec<GenerationResult>, GenerationError> {
    batch.validate()?;
    info!(datasets = batch.datasets.len(), "batch started");
    let results = batch
        .resolved()
        .iter()
        .map(|dataset| engine.run(dataset))
        .collect::<Result<Vec<_>, _>>()?;
    info!(datasets = results.len(), "batch completed");
    Ok(results)
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
