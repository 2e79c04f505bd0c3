//! Seeded train/validation/test partitioning

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::PipelineError;
use super::frame::LabeledFrame;

/// Share of all rows reserved for the test partition
pub const TEST_FRACTION: f64 = 0.15;

/// Share of all rows reserved for the validation partition
pub const VALIDATION_FRACTION: f64 = 0.15;

/// Default seed for every random step
pub const DEFAULT_SEED: u64 = 42;

/// The three partitions
#[derive(Debug, Clone)]
pub struct DataSplits {
    pub train: LabeledFrame,
    pub validation: LabeledFrame,
    pub test: LabeledFrame,
}

impl DataSplits {
    pub fn total_rows(&self) -> usize {
        self.train.height() + self.validation.height() + self.test.height()
    }

    /// (name, partition) pairs in train, validation, test order
    pub fn partitions(&self) -> [(&'static str, &LabeledFrame); 3] {
        [
            ("train", &self.train),
            ("val", &self.validation),
            ("test", &self.test),
        ]
    }
}

/// Shuffle positions `0..n` with `seed` and hold out `ceil(fraction * n)` of them.
///
/// Returns `(rest, held_out)`; both keep the shuffled order.
pub fn shuffle_split(n: usize, fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    let held = (fraction * n as f64).ceil() as usize;

    if held == 0 || held >= n {
        return Err(PipelineError::InvalidInput(format!(
            "holding out {:.4} of {} row(s) leaves an empty partition",
            fraction, n
        ))
        .into());
    }

    let mut positions: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    positions.shuffle(&mut rng);

    let rest = positions.split_off(held);
    Ok((rest, positions))
}

/// Split into train (~70%), validation (~15%) and test (~15%).
///
/// Test rows are held out first; validation is then drawn from the remainder
/// with a fresh generator seeded identically.
pub fn split_dataset(frame: &LabeledFrame, seed: u64) -> Result<DataSplits> {
    let (temp_pos, test_pos) = shuffle_split(frame.height(), TEST_FRACTION, seed)?;
    let temp = frame.take_rows(&temp_pos)?;
    let test = frame.take_rows(&test_pos)?;

    let validation_share = VALIDATION_FRACTION / (1.0 - TEST_FRACTION);
    let (train_pos, val_pos) = shuffle_split(temp.height(), validation_share, seed)?;

    Ok(DataSplits {
        train: temp.take_rows(&train_pos)?,
        validation: temp.take_rows(&val_pos)?,
        test,
    })
}
