//! Device-selection parsing and validation

use crate::error::{GpuWatchError, Result};

/// Parse a comma-separated list of device indices into an ordered,
/// duplicate-free selection.
///
/// Tokens are trimmed and empty tokens (e.g. a trailing comma) are skipped.
/// Duplicates keep their first occurrence; the result is sorted ascending.
/// A token that does not parse as a non-negative integer is rejected.
pub fn parse_gpu_ids(input: &str) -> Result<Vec<u32>> {
    let mut ids: Vec<u32> = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let id: u32 = token
            .parse()
            .map_err(|_| GpuWatchError::InvalidDeviceId {
                token: token.to_string(),
            })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// Check every selected index against the detected device count.
pub fn validate_selection(ids: &[u32], device_count: u32) -> Result<()> {
    if device_count == 0 {
        return Err(GpuWatchError::NoDevices);
    }
    for &id in ids {
        if id >= device_count {
            return Err(GpuWatchError::IdOutOfRange {
                id,
                max: device_count - 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_and_dedups() {
        assert_eq!(parse_gpu_ids("0,0,2,1").unwrap(), vec![0, 1, 2]);
        assert_eq!(parse_gpu_ids("3,1,3,2").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let ids = parse_gpu_ids("7,3,7,0,3").unwrap();
        assert_eq!(ids, vec![0, 3, 7]);
        for id in &ids {
            assert!([7u32, 3, 0].contains(id));
        }
    }

    #[test]
    fn test_empty_input_yields_empty_selection() {
        assert!(parse_gpu_ids("").unwrap().is_empty());
        assert!(parse_gpu_ids(",").unwrap().is_empty());
        assert!(parse_gpu_ids(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_around_tokens() {
        assert_eq!(parse_gpu_ids(" 0 , 2 ,1").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_trailing_comma_skipped() {
        assert_eq!(parse_gpu_ids("0,1,").unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let err = parse_gpu_ids("0,x,1").unwrap_err();
        assert!(matches!(err, GpuWatchError::InvalidDeviceId { token } if token == "x"));
        assert!(parse_gpu_ids("-1").is_err());
        assert!(parse_gpu_ids("1.5").is_err());
    }

    #[test]
    fn test_validate_in_range() {
        assert!(validate_selection(&[0, 1], 2).is_ok());
        assert!(validate_selection(&[], 2).is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        let err = validate_selection(&[0, 4], 4).unwrap_err();
        assert!(matches!(err, GpuWatchError::IdOutOfRange { id: 4, max: 3 }));
    }

    #[test]
    fn test_validate_no_devices() {
        assert!(matches!(
            validate_selection(&[], 0).unwrap_err(),
            GpuWatchError::NoDevices
        ));
    }
}
