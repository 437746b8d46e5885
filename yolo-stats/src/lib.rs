//! Descriptive statistics over YOLO-style object detection datasets.
//!
//! The entry point is [analyze](stats::analyze), which scans the image and
//! label directories of every split named by a [DatasetConfig] and returns
//! an immutable [DatasetStats]. The result is rendered by
//! [TextReport](report::TextReport) or [TableReport](report::TableReport).

mod common;
pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod stats;

pub use config::{ClassId, Classes, DatasetConfig, Split};
pub use dataset::{label_dir_for, SizeProbe};
pub use error::{ConfigError, Error, ParseError, Result};
pub use report::{ReportFormat, TableReport, TextReport};
pub use stats::{
    analyze, AnalyzeOptions, ClassCounts, DatasetStats, SplitName, SplitStats, TotalSizes,
};
