//! LabelMe to PASCAL VOC dataset preparation
//!
//! This library converts LabelMe XML annotations to the PASCAL VOC schema
//! and generates the VOC `ImageSets` train/val lists for object detection
//! training.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod xml_doc;

// Re-export commonly used types and functions
pub use config::{ConvertArgs, ImageSetsArgs, PrepareArgs, SourceFormat, SplitOptions, SplitPolicy};
pub use conversion::convert_directory;
pub use dataset::{ClassLabelTable, LineStyle, PosNeg, Split};
pub use error::{Error, ErrorKind, Result};
pub use io::generate_image_sets;
pub use pipeline::prepare_dataset;
pub use types::{ConversionSummary, DatasetLayout, ImageSetsSummary};
