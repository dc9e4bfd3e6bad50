use crate::models::{CycleRecord, FloatCycles, ResultTree};
use crate::utils::progress::ProgressReporter;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub groups: usize,
    pub floats: usize,
    pub cycles: usize,
    /// Floats whose cycle keys were not all integers and were sorted as text.
    pub lexical_fallbacks: Vec<String>,
}

impl fmt::Display for NormalizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Normalization Report ===")?;
        writeln!(f, "Groups: {}", self.groups)?;
        writeln!(f, "Floats: {}", self.floats)?;
        writeln!(f, "Cycles: {}", self.cycles)?;
        write!(f, "Lexically sorted floats: {}", self.lexical_fallbacks.len())?;
        if !self.lexical_fallbacks.is_empty() {
            write!(f, " ({})", self.lexical_fallbacks.join(", "))?;
        }
        Ok(())
    }
}

/// Orders the cycles of every float numerically.
pub struct ResultNormalizer;

impl ResultNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Rebuild `tree` with each float's cycles in ascending numeric order.
    ///
    /// Group and float order are kept. If any cycle key of a float is not an
    /// integer, that float alone is sorted lexically. Never fails.
    pub fn normalize(&self, tree: &ResultTree, progress: Option<&ProgressReporter>) -> (ResultTree, NormalizationReport) {
        let mut report = NormalizationReport {
            groups: tree.len(),
            ..Default::default()
        };
        info!("Found {} location(s) to process", tree.len());

        let mut normalized = ResultTree::with_capacity(tree.len());
        for (group, floats) in tree.iter() {
            debug!("Processing group '{}' with {} float(s)", group, floats.len());

            let mut sorted_floats = FloatCycles::with_capacity(floats.len());
            for (float_id, cycles) in floats.iter() {
                report.floats += 1;
                report.cycles += cycles.len();

                let (sorted, numeric) = self.sort_cycles(cycles);
                if !numeric {
                    warn!(
                        "Non-numeric cycle numbers in float {}. Using string sort.",
                        float_id
                    );
                    report.lexical_fallbacks.push(float_id.to_string());
                }
                sorted_floats.insert(float_id, sorted);
            }
            normalized.insert(group, sorted_floats);

            if let Some(progress) = progress {
                progress.increment(1);
            }
        }

        (normalized, report)
    }

    /// Sort one float's cycles; the flag is false when the lexical fallback was used.
    pub fn sort_cycles(&self, cycles: &CycleRecord) -> (CycleRecord, bool) {
        let parsed: Option<Vec<(i64, &str)>> = cycles
            .keys()
            .map(|key| key.trim().parse::<i64>().ok().map(|n| (n, key)))
            .collect();

        let (order, numeric): (Vec<&str>, bool) = match parsed {
            Some(mut numbered) => {
                numbered.sort_by_key(|(n, _)| *n);
                (numbered.into_iter().map(|(_, key)| key).collect(), true)
            }
            None => {
                let mut keys: Vec<&str> = cycles.keys().collect();
                keys.sort_unstable();
                (keys, false)
            }
        };

        let mut sorted = CycleRecord::with_capacity(order.len());
        for key in order {
            if let Some(payload) = cycles.get(key) {
                sorted.insert(key, payload.clone());
            }
        }
        (sorted, numeric)
    }
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
