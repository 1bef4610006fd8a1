use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use labelme2voc::{prepare_dataset, PrepareArgs};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = PrepareArgs::parse();

    let format = match args.source_format() {
        Ok(format) => format,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let layout = args.dataset.layout();
    info!("Preparing dataset {}...", layout.imdb_name);

    match prepare_dataset(&layout, format, &args.split.options()) {
        Ok((conversion, image_sets)) => {
            conversion.print_summary();
            image_sets.print_summary();
            info!("Dataset preparation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to prepare dataset ({:?}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
