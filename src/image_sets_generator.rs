use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use labelme2voc::{generate_image_sets, ImageSetsArgs};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ImageSetsArgs::parse();

    let options = args.split.options();
    let layout = args.dataset.layout();
    let xml_dir = layout.annotations_dir();
    let image_sets_dir = layout.image_sets_dir(options.policy);

    info!("Generating ImageSets for {}...", layout.imdb_name);

    match generate_image_sets(&xml_dir, &image_sets_dir, &options) {
        Ok(summary) => {
            summary.print_summary();
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to generate ImageSets ({:?}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
