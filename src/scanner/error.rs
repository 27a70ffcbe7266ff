use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to open scanner on {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to read from scanner: {0}")]
    Read(#[from] std::io::Error),
}
