//! # tpgen-engine
//!
//! Section-generation orchestration for test-plan documents.
//!
//! The engine walks a fixed [`SectionCatalog`](tpgen_core::SectionCatalog)
//! strictly in order against one chat model:
//!
//! - [`prompt`] builds the per-section prompts and generation limits
//! - [`extract::FeatureExtractor`] runs the one-shot feature extraction
//!   that seeds the feature-dependent sections
//! - [`assemble`] renders the sections that never touch the model
//! - [`dispatch::PlanGenerator`] sequences everything and accumulates
//!   the final [`dispatch::TestPlan`]

pub mod assemble;
pub mod dispatch;
pub mod extract;
pub mod prompt;

pub use dispatch::{DispatchConfig, PlanGenerator, SectionRecord, TestPlan};
pub use extract::FeatureExtractor;
pub use prompt::Prompt;
