mod aggregate;
mod frequency;
mod normalize;
mod tokenize;

pub use aggregate::LabelCounts;
pub use frequency::FrequencyTable;
pub use normalize::{normalize_with_report, CleaningReport, CleaningRules};
#[cfg(test)]
pub use normalize::NOISE_IDS;
pub use tokenize::TextFilter;
