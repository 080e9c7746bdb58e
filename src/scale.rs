//! CWP scale factor convention and unit normalization.
//!
//! A header scale factor `s` applies to the integer it scales as follows:
//! negative divides by `|s|`, positive multiplies by `s`, and both 0 and 1
//! leave the value untouched.

use crate::types::{LengthUnit, TimeUnit};

const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

fn apply(raw: f64, scale: i16) -> f64 {
    match scale {
        0 | 1 => raw,
        s if s < 0 => raw / f64::from(s.unsigned_abs()),
        s => raw * f64::from(s),
    }
}

/// Real coordinate from a stored coordinate and its `scalco`.
pub fn coordinate_scale(raw: f64, scalco: i16) -> f64 {
    apply(raw, scalco)
}

/// Real elevation from a stored elevation and its `scalel`.
pub fn elevation_scale(raw: f64, scalel: i16) -> f64 {
    apply(raw, scalel)
}

/// Value to store for `value` so that `coordinate_scale(stored, scalco)`
/// gives back `value` once rounded to the integer field.
///
/// `scalco` is stored as is in the header.
pub fn encode_coordinate(value: f64, scalco: i16) -> f64 {
    match scalco {
        0 | 1 => value,
        s if s < 0 => value * f64::from(s.unsigned_abs()),
        s => value / f64::from(s),
    }
}

/// Value to store for an elevation with a caller elevation scale of `scalel`
/// (a positive multiplier). Pair with `elevation_header_scale`.
pub fn encode_elevation(value: f64, scalel: i16) -> f64 {
    value * f64::from(scalel)
}

/// The header `scalel` for a caller elevation scale, its negation.
pub fn elevation_header_scale(scalel: i16) -> i16 {
    -scalel
}

/// Header sampling interval (integer microseconds before rounding) for an
/// interval in seconds. Intervals below one microsecond are scaled by an extra
/// 1000 and the time axis switches to milliseconds.
pub fn sampling_interval(seconds: f64) -> (f64, TimeUnit) {
    if seconds < 1e-6 {
        (seconds * MICROSECONDS_PER_SECOND * 1000.0, TimeUnit::Milliseconds)
    } else {
        (seconds * MICROSECONDS_PER_SECOND, TimeUnit::Seconds)
    }
}

/// Header sampling interval back to the time axis unit.
pub fn interval_from_header(dt: u16) -> f64 {
    f64::from(dt) / MICROSECONDS_PER_SECOND
}

/// Recording delay for the `delrt` field. Values below 1 are taken as seconds
/// and converted to milliseconds, larger values are already milliseconds.
pub fn delay_milliseconds(delay: f64) -> f64 {
    if delay < 1.0 {
        delay * 1000.0
    } else {
        delay
    }
}

/// `counit` code and length unit for a SEG-2 `UNITS` value.
pub fn coordinate_units(units: &str) -> Option<(i16, LengthUnit)> {
    Some(match units.trim() {
        "FEET" => (1, LengthUnit::Feet),
        "METERS" => (1, LengthUnit::Meters),
        "INCHES" => (5, LengthUnit::Inches),
        "CENTIMETERS" => (5, LengthUnit::Centimeters),
        // reduced-scale laboratory modeling
        "MILLIMETERS" => (6, LengthUnit::Millimeters),
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scale_convention() {
        assert_eq!(coordinate_scale(1234.0, -100), 12.34);
        assert_eq!(coordinate_scale(12.0, 10), 120.0);
        assert_eq!(coordinate_scale(12.0, 0), 12.0);
        assert_eq!(coordinate_scale(12.0, 1), 12.0);
        assert_eq!(coordinate_scale(12.0, -1), 12.0);
        assert_eq!(elevation_scale(-250.0, -10), -25.0);
    }

    #[test]
    fn coordinate_encoding_is_invertible() {
        let values = [0.0, 10.0, -3.25, 1234.5678, 0.01, -999.99];
        for s in [-10000_i16, -1000, -100, -10, -1, 1, 10, 100] {
            for v in values {
                let stored = encode_coordinate(v, s).round();
                let back = coordinate_scale(stored, s);
                let resolution = if s < 0 {
                    0.5 / f64::from(s.unsigned_abs())
                } else {
                    0.5 * f64::from(s)
                };
                assert!(
                    (back - v).abs() <= resolution + 1e-9,
                    "v={v} s={s} back={back}"
                );
            }
        }
        assert_eq!(encode_coordinate(10.0, 0), 10.0);
    }

    #[test]
    fn elevation_encoding_is_invertible() {
        for s in [1_i16, 10, 100, 1000] {
            for v in [0.0, 12.5, -3.001, 250.75] {
                let stored = encode_elevation(v, s).round();
                let back = elevation_scale(stored, elevation_header_scale(s));
                assert!((back - v).abs() <= 0.5 / f64::from(s) + 1e-9);
            }
        }
    }

    #[test]
    fn time_units() {
        assert_eq!(sampling_interval(0.001), (1000.0, TimeUnit::Seconds));
        let (dt, unit) = sampling_interval(2.5e-7);
        assert!((dt - 250.0).abs() < 1e-6);
        assert_eq!(unit, TimeUnit::Milliseconds);
        assert_eq!(interval_from_header(1000), 0.001);
        assert_eq!(delay_milliseconds(0.05), 50.0);
        assert_eq!(delay_milliseconds(-0.01), -10.0);
        assert_eq!(delay_milliseconds(20.0), 20.0);
    }

    #[test]
    fn length_units() {
        assert_eq!(coordinate_units("METERS"), Some((1, LengthUnit::Meters)));
        assert_eq!(coordinate_units("FEET"), Some((1, LengthUnit::Feet)));
        assert_eq!(coordinate_units("INCHES"), Some((5, LengthUnit::Inches)));
        assert_eq!(
            coordinate_units("CENTIMETERS"),
            Some((5, LengthUnit::Centimeters))
        );
        assert_eq!(
            coordinate_units("MILLIMETERS"),
            Some((6, LengthUnit::Millimeters))
        );
        assert_eq!(coordinate_units("meters"), None);
    }
}
