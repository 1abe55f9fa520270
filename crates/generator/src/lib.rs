//! Deterministic campaign payload generation from an advertiser brief.

pub mod budget;
pub mod creative;
pub mod generator;
pub mod keywords;
pub mod naming;

pub use creative::{CreativeProvider, CreativeSet, TemplateCreativeProvider};
pub use generator::{GeneratorOptions, PayloadGenerator};
