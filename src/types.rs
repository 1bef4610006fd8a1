use std::path::{Path, PathBuf};

use crate::config::SplitPolicy;

/// Depth written for every converted image; the legacy schema has no channel count.
pub const IMAGE_DEPTH: u32 = 3;

/// Pose written for every converted object.
pub const UNSPECIFIED_POSE: &str = "Unspecified";

/// Where a dataset's annotations and ImageSets live under a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub data_root: PathBuf,
    pub imdb_name: String,
}

impl DatasetLayout {
    pub fn new(data_root: impl AsRef<Path>, imdb_name: impl Into<String>) -> Self {
        Self {
            data_root: data_root.as_ref().to_path_buf(),
            imdb_name: imdb_name.into(),
        }
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.data_root.join(&self.imdb_name)
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.dataset_dir().join("Annotations")
    }

    pub fn image_sets_dir(&self, policy: SplitPolicy) -> PathBuf {
        let image_sets = self.dataset_dir().join("ImageSets");
        match policy {
            SplitPolicy::GlobalSplit => image_sets.join("Main"),
            SplitPolicy::PerClassSplit => image_sets,
        }
    }
}

// LabelMe annotation fields read by the converter. Text is carried as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMeAnnotation {
    pub filename: String,
    pub imagesize: LabelMeImageSize,
    pub objects: Vec<LabelMeObject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMeImageSize {
    pub nrows: String,
    pub ncols: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMeObject {
    pub name: String,
    pub bbox: LabelMeBox,
    /// Whether `segm/scribbles` is present.
    pub scribbles: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMeBox {
    pub xmin: String,
    pub ymin: String,
    pub xmax: String,
    pub ymax: String,
}

/// A PASCAL VOC annotation record, ready to be rendered as XML.
///
/// Size and coordinate values are kept as the text they were read from so
/// the conversion never re-formats numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocAnnotation {
    pub folder: String,
    pub filename: String,
    pub source: VocSource,
    pub size: VocSize,
    pub segmented: bool,
    pub objects: Vec<VocObject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocSource {
    pub database: String,
    pub annotation: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocSize {
    pub width: String,
    pub height: String,
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub pose: String,
    pub truncated: bool,
    pub occluded: bool,
    pub difficult: bool,
    pub bndbox: VocBndBox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocBndBox {
    pub xmin: String,
    pub ymin: String,
    pub xmax: String,
    pub ymax: String,
}

/// Counts reported after a conversion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub files: usize,
    pub objects: usize,
    pub segmented: usize,
}

/// Counts reported after an ImageSets run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageSetsSummary {
    pub examples: usize,
    pub classes: usize,
    pub train: usize,
    pub val: usize,
    pub files: Vec<PathBuf>,
}

impl ConversionSummary {
    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Files converted: {}", self.files);
        log::info!("Objects written: {}", self.objects);
        log::info!("Segmented images: {}", self.segmented);
    }
}

impl ImageSetsSummary {
    pub fn print_summary(&self) {
        log::info!("=== ImageSets Summary ===");
        log::info!("Examples: {}", self.examples);
        log::info!("Classes: {}", self.classes);
        log::info!("Train examples: {}", self.train);
        log::info!("Val examples: {}", self.val);
        log::info!("Files written: {}", self.files.len());
    }
}
