//! # Terraclass Pipeline
//!
//! Ties the archive and the algorithms into one supervised classification
//! run: query scenes, composite, derive indices, sample training polygons,
//! split, fit a random forest, classify, evaluate, summarize areas and
//! export. Stages run strictly in order; any failure aborts the run before
//! the export stage writes anything.

pub mod config;
pub mod report;
pub mod run;

pub use config::{ClassDef, RunConfig, TrainingRegion};
pub use report::render_report;
pub use run::{run, PipelineError, RunReport};
