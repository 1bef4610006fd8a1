use clap::{Args as ClapArgs, Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;
use crate::types::DatasetLayout;

/// Options shared by every tool: where the dataset lives.
#[derive(ClapArgs, Debug, Clone)]
pub struct DatasetArgs {
    /// Root directory holding one sub-directory per image DB
    #[arg(long = "data_dir", env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Image DB name containing the XML files
    #[arg(long = "imdb_name")]
    pub imdb_name: String,
}

impl DatasetArgs {
    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(&self.data_dir, &self.imdb_name)
    }
}

/// Convert annotation XML files in place to the PASCAL VOC schema.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// XML format of the files to be converted
    #[arg(long = "xml_format_orig", default_value = "labelme")]
    pub xml_format_orig: String,
}

impl ConvertArgs {
    pub fn source_format(&self) -> Result<SourceFormat, Error> {
        self.xml_format_orig.parse()
    }
}

/// Generate PASCAL VOC ImageSets lists from an Annotations directory.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct ImageSetsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub split: SplitArgs,
}

/// Convert a LabelMe dataset and generate its ImageSets in one run.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// XML format of the files to be converted
    #[arg(long = "xml_format_orig", default_value = "labelme")]
    pub xml_format_orig: String,

    #[command(flatten)]
    pub split: SplitArgs,
}

impl PrepareArgs {
    pub fn source_format(&self) -> Result<SourceFormat, Error> {
        self.xml_format_orig.parse()
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SplitArgs {
    /// Validation data portion in the entire data
    #[arg(long = "val_portion", default_value_t = 0.25, value_parser = validate_val_portion)]
    pub val_portion: f64,

    /// Seed for the train/val shuffle
    #[arg(long = "seed", default_value_t = 2016)]
    pub seed: u64,

    /// How the validation subset is drawn
    #[arg(long = "policy", value_enum, default_value = "global")]
    pub policy: SplitPolicy,
}

impl SplitArgs {
    pub fn options(&self) -> SplitOptions {
        SplitOptions {
            val_portion: self.val_portion,
            seed: self.seed,
            policy: self.policy,
        }
    }
}

/// Annotation schemas the converter knows how to read.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SourceFormat {
    LabelMe,
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "labelme" => Ok(SourceFormat::LabelMe),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Strategy for drawing the validation subset.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum SplitPolicy {
    /// One shuffle shared by every class; writes train/val lists into ImageSets/Main
    #[default]
    #[value(name = "global")]
    GlobalSplit,
    /// Each class gets its own shuffled train/val split; writes trainval lists into ImageSets
    #[value(name = "per-class")]
    PerClassSplit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    pub val_portion: f64,
    pub seed: u64,
    pub policy: SplitPolicy,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            val_portion: 0.25,
            seed: 2016,
            policy: SplitPolicy::GlobalSplit,
        }
    }
}

// Validate that the portion is in [0, 1)
pub fn validate_val_portion(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..1.0).contains(&val) => Ok(val),
        _ => Err("VAL_PORTION must be in [0.0, 1.0)".to_string()),
    }
}
