//! Parser for the DS18B20 `w1_slave` report.
//!
//! The kernel's w1-therm driver renders each sample as two lines:
//!
//! ```text
//! 01 4b 46 ff ff 0c 10 10 7f : crc=7f YES
//! 01 4b 46 ff ff 0c 10 10 7f t=23562
//! ```
//!
//! Only the trailing `YES`/`NO` token of the first line and the `t=` field
//! of the second line carry meaning. These are pure functions so they can
//! be tested with string inputs.

use crate::sensor::error::ProbeError;
use crate::temperature::Temperature;

/// Integrity marker the driver prints when the scratchpad CRC matched.
const CRC_OK: &str = "YES";

/// Separator in front of the raw milli-Celsius reading.
const TEMP_MARKER: &str = "t=";

/// Parses a complete report into a temperature.
///
/// A missing line is treated as an empty one, so a truncated report fails
/// the CRC check or the format check rather than panicking.
pub fn parse_report(content: &str) -> Result<Temperature, ProbeError> {
    let mut lines = content.lines();
    check_crc_line(lines.next().unwrap_or(""))?;
    let millidegrees = parse_millidegrees(lines.next().unwrap_or(""))?;
    Ok(Temperature::from_millidegrees(millidegrees))
}

/// Verifies that the first report line ends with the `YES` marker.
pub fn check_crc_line(line: &str) -> Result<(), ProbeError> {
    match line.split_whitespace().last() {
        Some(CRC_OK) => Ok(()),
        _ => Err(ProbeError::Crc(line.to_string())),
    }
}

/// Extracts the raw milli-Celsius value from the second report line.
pub fn parse_millidegrees(line: &str) -> Result<u32, ProbeError> {
    let parts: Vec<&str> = line.split(TEMP_MARKER).collect();
    if parts.len() != 2 {
        return Err(ProbeError::Format(line.to_string()));
    }

    let digits = parts[1].trim();
    digits
        .parse::<u32>()
        .map_err(|e| ProbeError::Parse(format!("invalid reading {:?}: {}", digits, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str =
        "01 4b 46 ff ff 0c 10 10 7f : crc=7f YES\n02 01 4b 46 ff ff 0c 10 t=23562\n";

    #[test]
    fn test_parse_report_fixture() {
        let t = parse_report(FIXTURE).unwrap();
        assert!((t.celsius() - 23.562).abs() < 1e-3);
    }

    #[test]
    fn test_parse_report_values() {
        for raw in [0u32, 1, 625, 19125, 85000, 125000] {
            let content = format!("aa : crc=aa YES\nbb t={}\n", raw);
            let t = parse_report(&content).unwrap();
            assert_eq!(t.celsius(), raw as f32 / 1000.0);
        }
    }

    #[test]
    fn test_parse_report_crlf() {
        let t = parse_report("aa : crc=aa YES\r\nbb t=1500\r\n").unwrap();
        assert_eq!(t.celsius(), 1.5);
    }

    #[test]
    fn test_crc_failure() {
        let err = parse_report("aa : crc=00 NO\nbb t=23562\n").unwrap_err();
        assert!(matches!(err, ProbeError::Crc(ref line) if line.ends_with("NO")));
    }

    #[test]
    fn test_crc_marker_must_be_last_token() {
        assert!(check_crc_line("aa : crc=aa YES").is_ok());
        assert!(check_crc_line("aa : crc=aa YES  ").is_ok());
        assert!(check_crc_line("aa : crc=aa YESNO").is_err());
        assert!(check_crc_line("YES crc=aa NO").is_err());
        assert!(check_crc_line("").is_err());
    }

    #[test]
    fn test_empty_report_fails_crc() {
        assert!(matches!(parse_report(""), Err(ProbeError::Crc(_))));
    }

    #[test]
    fn test_missing_temperature_line() {
        assert!(matches!(
            parse_report("aa : crc=aa YES\n"),
            Err(ProbeError::Format(_))
        ));
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(
            parse_millidegrees("01 4b 46 ff ff 0c 10 10 7f"),
            Err(ProbeError::Format(_))
        ));
        assert!(matches!(
            parse_millidegrees("t=1 t=2"),
            Err(ProbeError::Format(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_millidegrees("aa t=abc"),
            Err(ProbeError::Parse(_))
        ));
        assert!(matches!(parse_millidegrees("aa t="), Err(ProbeError::Parse(_))));
        assert!(matches!(
            parse_millidegrees("aa t=12.5"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_millidegrees_trims() {
        assert_eq!(parse_millidegrees("aa t=23562 \n").unwrap(), 23562);
    }
}
