//! Temperature value type with unit conversion views.

use std::fmt;

use serde::{Serialize, Serializer};

/// A temperature reading in degrees Celsius.
///
/// The Celsius value is the only thing stored; every other unit is a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Temperature(f32);

impl Temperature {
    /// Creates a temperature from degrees Celsius.
    pub fn from_celsius(celsius: f32) -> Self {
        Self(celsius)
    }

    /// Creates a temperature from the sensor's raw milli-Celsius reading.
    pub fn from_millidegrees(millidegrees: u32) -> Self {
        Self(millidegrees as f32 / 1000.0)
    }

    pub fn celsius(self) -> f32 {
        self.0
    }

    pub fn fahrenheit(self) -> f32 {
        self.0 * 1.8 + 32.0
    }

    pub fn kelvin(self) -> f32 {
        self.0 + 273.15
    }

    /// Centigrade is another name for the Celsius scale.
    pub fn centigrade(self) -> f32 {
        self.celsius()
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} C", self.0)
    }
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_conversions() {
        let t = Temperature::from_celsius(100.0);
        assert!(approx(t.celsius(), 100.0));
        assert!(approx(t.fahrenheit(), 212.0));
        assert!(approx(t.kelvin(), 373.15));
        assert!(approx(t.centigrade(), 100.0));

        let freezing = Temperature::from_celsius(0.0);
        assert!(approx(freezing.fahrenheit(), 32.0));
        assert!(approx(freezing.kelvin(), 273.15));
    }

    #[test]
    fn test_from_millidegrees() {
        assert!(approx(Temperature::from_millidegrees(23562).celsius(), 23.562));
        assert!(approx(Temperature::from_millidegrees(0).celsius(), 0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Temperature::from_millidegrees(23562).to_string(), "23.562 C");
        assert_eq!(Temperature::from_celsius(85.0).to_string(), "85.000 C");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Temperature::from_celsius(19.5)).unwrap();
        assert_eq!(json, "19.5");
    }
}
