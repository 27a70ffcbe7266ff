use barcode_attendance_client::{api::HttpAttendanceApi, config, gui, logging};
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    match config::app_data_dir() {
        Ok(data_dir) => {
            if let Err(e) = logging::setup_logging(&data_dir) {
                eprintln!("Failed to set up logging: {}", e);
            }
        }
        Err(e) => eprintln!("Logging to files disabled: {}", e),
    }

    let config = match config::get_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let api = match HttpAttendanceApi::new(&config.api_base_url, config.request_timeout()) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        backend = api.base_url(),
        scanner = ?config.scanner,
        "starting attendance scanner"
    );
    std::process::exit(gui::run(config, Arc::new(api)));
}
