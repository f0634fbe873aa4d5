//! Precomputed timeline of the presence-marking algorithm.
//!
//! The algorithm finds the numbers in `1..=n` missing from an array of
//! length `n` without extra storage:
//!
//! 1. **Marking**: for each slot `i`, read `v = nums[i]` and add `n` to
//!    `nums[(v - 1) mod n]`. A slot whose value exceeds `n` has been seen.
//! 2. **Scanning**: every slot `i` still `<= n` means `i + 1` is missing.
//!
//! Marking reads the array as it stands, so a value already raised by an
//! earlier step is folded back with `mod n`.
//!
//! Every atomic step is captured as a full copy of the array so any step
//! can be inspected later, independent of what came after it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seed array used when none is configured.
pub const DEFAULT_SEED: [i64; 8] = [4, 3, 2, 7, 8, 2, 3, 1];

/// A validated, non-empty input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Seed(Vec<i64>);

impl Seed {
    /// Validate a seed. Empty input has no `n` to take a modulus by.
    pub fn new(values: Vec<i64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidInput("seed sequence is empty".into()));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the seed has no values. `Seed::new` rejects that, so this
    /// is false for every constructed seed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(DEFAULT_SEED.to_vec())
    }
}

impl TryFrom<Vec<i64>> for Seed {
    type Error = Error;

    fn try_from(values: Vec<i64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<Seed> for Vec<i64> {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

/// Where a step sits in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Step 0: the untouched input
    Initial,
    /// Marking pass; `index` was just processed and `target` got `+n`
    Marking { index: usize, target: usize },
    /// Scanning pass; `index` was just checked
    Scanning { index: usize },
}

/// The full record of one algorithm run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    snapshots: Vec<Vec<i64>>,
    logs: Vec<String>,
    result: Vec<i64>,
}

impl Timeline {
    /// Run the algorithm on `seed`, recording every step.
    ///
    /// Produces `2n + 1` snapshots: the input, `n` marking steps and `n`
    /// scanning steps. Pure: the same seed always yields the same timeline.
    pub fn generate(seed: &Seed) -> Self {
        let input = seed.values();
        let n = input.len();
        let modulus = n as i64;

        let mut snapshots = Vec::with_capacity(2 * n + 1);
        let mut logs = Vec::with_capacity(2 * n + 1);
        let mut result = Vec::new();

        snapshots.push(input.to_vec());
        logs.push(format!("Initialize array [{}]", join(input)));

        let mut current = input.to_vec();

        for i in 0..n {
            let value = current[i];
            let target = mark_index(value, modulus);
            current[target] = current[target].wrapping_add(modulus);

            snapshots.push(current.clone());
            logs.push(format!(
                "Process index {}: value is {}, mark the element at index {}",
                i, value, target
            ));
        }

        for i in 0..n {
            let slot = i as i64 + 1;
            if current[i] <= modulus {
                result.push(slot);
                logs.push(format!(
                    "Value at index {} is <= {}, missing number is {}",
                    i, n, slot
                ));
            } else {
                logs.push(format!(
                    "Value at index {} is > {}, number {} is present",
                    i, n, slot
                ));
            }
            snapshots.push(current.clone());
        }

        tracing::debug!(
            n,
            steps = snapshots.len(),
            missing = result.len(),
            "generated timeline"
        );

        Self {
            snapshots,
            logs,
            result,
        }
    }

    /// Validate `values` and generate.
    pub fn from_values(values: &[i64]) -> Result<Self> {
        Ok(Self::generate(&Seed::new(values.to_vec())?))
    }

    /// Length of the input array.
    pub fn len(&self) -> usize {
        self.snapshots[0].len()
    }

    /// Whether the input array is empty. Generation rejects empty input,
    /// so this is false for every timeline.
    pub fn is_empty(&self) -> bool {
        self.snapshots[0].is_empty()
    }

    /// Index of the last step (`2n`).
    pub fn total_steps(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn snapshots(&self) -> &[Vec<i64>] {
        &self.snapshots
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Missing numbers in ascending order.
    pub fn result(&self) -> &[i64] {
        &self.result
    }

    /// The original input (step 0).
    pub fn input(&self) -> &[i64] {
        &self.snapshots[0]
    }

    pub fn snapshot(&self, step: usize) -> Option<&[i64]> {
        self.snapshots.get(step).map(Vec::as_slice)
    }

    pub fn log(&self, step: usize) -> Option<&str> {
        self.logs.get(step).map(String::as_str)
    }

    /// Classify a step. Steps past the end are reported as the last one.
    pub fn phase(&self, step: usize) -> Phase {
        let n = self.len();
        let step = step.min(self.total_steps());
        if step == 0 {
            Phase::Initial
        } else if step <= n {
            let index = step - 1;
            let before = &self.snapshots[step - 1];
            Phase::Marking {
                index,
                target: mark_index(before[index], n as i64),
            }
        } else {
            Phase::Scanning { index: step - n - 1 }
        }
    }

    /// Result entries revealed once `step` is on screen.
    ///
    /// Empty until the scanning phase, then a prefix of
    /// `min(step - n, result.len())` entries.
    pub fn revealed_result(&self, step: usize) -> &[i64] {
        let n = self.len();
        if step <= n {
            return &[];
        }
        let shown = (step - n).min(self.result.len());
        &self.result[..shown]
    }
}

/// Slot marked by `value` in an array of length `modulus`.
fn mark_index(value: i64, modulus: i64) -> usize {
    value.wrapping_sub(1).rem_euclid(modulus) as usize
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
