//! Text matching used by the clinic agents
//!
//! Agents never inspect query text directly. They go through two small
//! interfaces so a smarter matcher can replace substring matching without
//! touching agent logic:
//!
//! - [`EntityResolver`]: free text → canonical entity (patient, item, procedure)
//! - [`IntentClassifier`]: free text → domain intent
//!
//! Both default implementations are ordered and deterministic: the first
//! declared alias or rule that matches wins.

mod classifier;
mod resolver;

pub use classifier::{IntentClassifier, KeywordRule, KeywordRules, contains_any};
pub use resolver::{EntityResolver, Resolution, Vocabulary};
