use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use labelme2voc::{convert_directory, ConvertArgs};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ConvertArgs::parse();

    let format = match args.source_format() {
        Ok(format) => format,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let layout = args.dataset.layout();
    let xml_dir = layout.annotations_dir();
    info!("Starting the conversion process...");

    match convert_directory(&xml_dir, &layout.imdb_name, format) {
        Ok(summary) => {
            summary.print_summary();
            info!("Conversion process completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to convert annotations ({:?}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
