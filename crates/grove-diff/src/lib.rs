//! Grove Diff — three-phase structural matching engine and diff result

pub mod compare;
pub mod config;
pub mod result;
pub mod similarity;


#[cfg(test)]
pub mod test_utils;

pub use compare::StructuralComparator;
pub use config::MatchConfig;
pub use result::{Correspondence, CorrespondenceKind, StructuralDiff};
pub use similarity::{SourceRepresentationBuilder, TokenBag, TokenBagBuilder};
