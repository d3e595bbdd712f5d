//! Core telemetry structures and NVML query logic

use chrono::{DateTime, Utc};
use nvml_wrapper::{Device, Nvml};
use serde::Serialize;

use crate::error::Result;

const MIB: u64 = 1024 * 1024;

/// Vendor marketing tokens stripped from device names for display.
const MARKETING_TOKENS: [&str; 3] = ["NVIDIA", "GeForce", "Graphics"];

/// Strip marketing tokens from a raw device name.
///
/// Removal is exact and case-sensitive. Whitespace left behind by removed
/// tokens is collapsed, so adjacent tokens never produce double spaces.
/// `"NVIDIA GeForce RTX 4090 Graphics"` becomes `"RTX 4090"`.
pub fn normalize_name(raw: &str) -> String {
    let mut name = raw.to_string();
    for token in MARKETING_TOKENS {
        name = name.replace(token, "");
    }
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Telemetry for a single device at one tick
#[derive(Debug, Clone, Serialize)]
pub struct DeviceTelemetry {
    pub index: u32,
    pub name: String,
    pub power_draw: u32,  // W
    pub memory_used: u64, // MiB
    pub utilization: u32, // percent
}

/// One full query with host info, used by the JSON output mode
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub hostname: String,
    pub query_time: DateTime<Utc>,
    pub driver_version: Option<String>,
    pub devices: Vec<DeviceTelemetry>,
}

struct MonitoredDevice<'nvml> {
    index: u32,
    name: String,
    handle: Device<'nvml>,
}

/// Resolved device handles for the monitored selection.
///
/// Handles are obtained once at startup and reused every tick; they borrow
/// the NVML context and live no longer than it does.
pub struct DevicePoller<'nvml> {
    devices: Vec<MonitoredDevice<'nvml>>,
}

impl<'nvml> DevicePoller<'nvml> {
    /// Resolve a range-validated selection to device handles and display names.
    pub fn new(nvml: &'nvml Nvml, ids: &[u32]) -> Result<Self> {
        let mut devices = Vec::with_capacity(ids.len());
        for &index in ids {
            let handle = nvml.device_by_index(index)?;
            let name = normalize_name(&handle.name()?);
            devices.push(MonitoredDevice {
                index,
                name,
                handle,
            });
        }
        Ok(Self { devices })
    }

    /// Longest normalized name in the selection; drives the name column width.
    pub fn max_name_len(&self) -> usize {
        self.devices.iter().map(|d| d.name.len()).max().unwrap_or(0)
    }

    /// Query power, memory and utilization for every monitored device.
    ///
    /// Any failed call aborts the whole tick; the caller treats that as fatal.
    pub fn poll(&self) -> Result<Vec<DeviceTelemetry>> {
        let mut out = Vec::with_capacity(self.devices.len());
        for dev in &self.devices {
            // NVML reports milliwatts and bytes; display wants W and MiB
            let power = dev.handle.power_usage()?;
            let memory = dev.handle.memory_info()?;
            let utilization = dev.handle.utilization_rates()?;
            out.push(DeviceTelemetry {
                index: dev.index,
                name: dev.name.clone(),
                power_draw: power / 1000,
                memory_used: memory.used / MIB,
                utilization: utilization.gpu,
            });
        }
        Ok(out)
    }

    /// Query once and wrap with host info, for the JSON output mode.
    pub fn snapshot(&self, nvml: &Nvml) -> Result<TelemetrySnapshot> {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Ok(TelemetrySnapshot {
            hostname,
            query_time: Utc::now(),
            driver_version: nvml.sys_driver_version().ok(),
            devices: self.poll()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_marketing_tokens() {
        assert_eq!(
            normalize_name("NVIDIA GeForce RTX 4090 Graphics"),
            "RTX 4090"
        );
        assert_eq!(normalize_name("NVIDIA TITAN RTX"), "TITAN RTX");
    }

    #[test]
    fn test_normalize_collapses_adjacent_token_gaps() {
        assert_eq!(normalize_name("NVIDIA GeForce GTX 1080 Ti"), "GTX 1080 Ti");
    }

    #[test]
    fn test_normalize_leaves_other_names_alone() {
        assert_eq!(
            normalize_name("Tesla V100-SXM2-16GB"),
            "Tesla V100-SXM2-16GB"
        );
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        assert_eq!(normalize_name("nvidia geforce RTX"), "nvidia geforce RTX");
    }

    #[test]
    fn test_normalize_all_tokens_yields_empty() {
        assert_eq!(normalize_name("NVIDIA Graphics"), "");
    }
}
