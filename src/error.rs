//! Error types for gpuwatch

use std::io;

use nvml_wrapper::error::NvmlError;
use thiserror::Error;

/// Main error type for gpuwatch
#[derive(Debug, Error)]
pub enum GpuWatchError {
    /// NVML initialization or telemetry query failed
    #[error("NVML error: {0}")]
    Nvml(#[from] NvmlError),

    /// Terminal setup, drawing or input polling failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// A token in the device-id list did not parse as an index
    #[error("Invalid device id '{token}': expected a non-negative integer")]
    InvalidDeviceId { token: String },

    /// A selected index is outside the detected device range
    #[error("Device id {id} out of range (0-{max})")]
    IdOutOfRange { id: u32, max: u32 },

    /// NVML reported zero devices
    #[error("No NVIDIA devices detected")]
    NoDevices,

    /// Snapshot serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for gpuwatch operations
pub type Result<T> = std::result::Result<T, GpuWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GpuWatchError::InvalidDeviceId {
            token: "abc".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));

        let err = GpuWatchError::IdOutOfRange { id: 5, max: 3 };
        assert_eq!(err.to_string(), "Device id 5 out of range (0-3)");
    }
}
