//! Explicit sequencing of the two dataset preparation stages.
//!
//! Conversion rewrites `Annotations/` in place and indexing reads the
//! converted files, so the stages must run in this order against the same
//! directory.

use log::info;

use crate::config::{SourceFormat, SplitOptions};
use crate::conversion::convert_directory;
use crate::error::Result;
use crate::io::generate_image_sets;
use crate::types::{ConversionSummary, DatasetLayout, ImageSetsSummary};

pub fn prepare_dataset(
    layout: &DatasetLayout,
    format: SourceFormat,
    options: &SplitOptions,
) -> Result<(ConversionSummary, ImageSetsSummary)> {
    let annotations_dir = layout.annotations_dir();

    info!("Stage 1/2: converting {}", annotations_dir.display());
    let conversion = convert_directory(&annotations_dir, &layout.imdb_name, format)?;

    let image_sets_dir = layout.image_sets_dir(options.policy);
    info!("Stage 2/2: writing ImageSets to {}", image_sets_dir.display());
    let image_sets = generate_image_sets(&annotations_dir, &image_sets_dir, options)?;

    Ok((conversion, image_sets))
}
