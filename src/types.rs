use crate::samples::ElementType;
use derive_more::{Display, From, Into};

/// Byte order of a decoded or written stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum Endianness {
    #[display(fmt = "little-endian")]
    Little,
    #[display(fmt = "big-endian")]
    Big,
}

impl Endianness {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum SourceFormat {
    #[default]
    #[display(fmt = "memory")]
    Memory,
    #[display(fmt = "seg-2")]
    Seg2,
    #[display(fmt = "su")]
    Su,
}

/// Unit of the time axis. `Milliseconds` means the header sampling interval
/// and delay were scaled by 1000 to keep sub-microsecond sampling representable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum TimeUnit {
    #[default]
    #[display(fmt = "seconds")]
    Seconds,
    #[display(fmt = "milliseconds")]
    Milliseconds,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum LengthUnit {
    #[display(fmt = "feet")]
    Feet,
    #[default]
    #[display(fmt = "meters")]
    Meters,
    #[display(fmt = "inches")]
    Inches,
    #[display(fmt = "centimeters")]
    Centimeters,
    #[display(fmt = "millimeters")]
    Millimeters,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Units {
    pub time: TimeUnit,
    pub length: LengthUnit,
}

/// The `trid` trace identification code.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, From, Into, Display)]
#[repr(transparent)]
pub struct TraceType(pub i16);

impl TraceType {
    pub const UNKNOWN: TraceType = TraceType(0);
    pub const SEISMIC_DATA: TraceType = TraceType(1);
    pub const DEAD: TraceType = TraceType(2);
    pub const TEST_DATA: TraceType = TraceType(3);
    pub const UPHOLE: TraceType = TraceType(4);
    /// Amplitude of a complex trace from 0 to Nyquist
    pub const AMPLITUDE_SPECTRUM: TraceType = TraceType(118);
    /// Frequency/wavenumber amplitude
    pub const FK_AMPLITUDE: TraceType = TraceType(122);

    /// Codes 0 through 4 are all recordings along a time axis; derived
    /// spectral products use the 100+ range.
    pub fn is_time_series(self) -> bool {
        (0..=4).contains(&self.0)
    }

    /// Maps a SEG-2 `TRACE_TYPE` free-form value, anything unrecognized is `UNKNOWN`.
    pub fn from_seg2_keyword(s: &str) -> Self {
        match s.trim() {
            "SEISMIC_DATA" => TraceType::SEISMIC_DATA,
            "DEAD" => TraceType::DEAD,
            "TEST_DATA" => TraceType::TEST_DATA,
            "UPHOLE" => TraceType::UPHOLE,
            _ => TraceType::UNKNOWN,
        }
    }
}

impl Default for TraceType {
    fn default() -> Self {
        TraceType::SEISMIC_DATA
    }
}

/// SEG-2 sample data type code, byte 12 of the trace descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum SampleFormat {
    #[display(fmt = "16-bit integer")]
    Int16,
    #[display(fmt = "32-bit integer")]
    Int32,
    #[display(fmt = "20-bit float")]
    Float20,
    #[display(fmt = "32-bit float")]
    Float32,
    #[display(fmt = "64-bit float")]
    Float64,
}

impl SampleFormat {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => SampleFormat::Int16,
            2 => SampleFormat::Int32,
            3 => SampleFormat::Float20,
            4 => SampleFormat::Float32,
            5 => SampleFormat::Float64,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            SampleFormat::Int16 => 1,
            SampleFormat::Int32 => 2,
            SampleFormat::Float20 => 3,
            SampleFormat::Float32 => 4,
            SampleFormat::Float64 => 5,
        }
    }

    /// The in-memory element type, `None` for the unsupported 20-bit float.
    pub fn element(self) -> Option<ElementType> {
        match self {
            SampleFormat::Int16 => Some(ElementType::I16),
            SampleFormat::Int32 => Some(ElementType::I32),
            SampleFormat::Float20 => None,
            SampleFormat::Float32 => Some(ElementType::F32),
            SampleFormat::Float64 => Some(ElementType::F64),
        }
    }

    /// Bytes occupied by `count` samples on disk.
    pub fn payload_len(self, count: usize) -> usize {
        match self.element() {
            Some(e) => count * e.width(),
            // 4 samples share 10 bytes
            None => (count * 5 + 1) / 2,
        }
    }
}

impl From<ElementType> for SampleFormat {
    fn from(e: ElementType) -> Self {
        match e {
            ElementType::I16 => SampleFormat::Int16,
            ElementType::I32 => SampleFormat::Int32,
            ElementType::F32 => SampleFormat::Float32,
            ElementType::F64 => SampleFormat::Float64,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trace_type_keywords() {
        assert_eq!(TraceType::from_seg2_keyword("SEISMIC_DATA"), TraceType(1));
        assert_eq!(TraceType::from_seg2_keyword("DEAD"), TraceType(2));
        assert_eq!(TraceType::from_seg2_keyword("TEST_DATA"), TraceType(3));
        assert_eq!(TraceType::from_seg2_keyword("UPHOLE"), TraceType(4));
        assert_eq!(TraceType::from_seg2_keyword("UNKNOWN"), TraceType(0));
        assert_eq!(TraceType::from_seg2_keyword("seismic_data"), TraceType(0));
        assert!(TraceType::DEAD.is_time_series());
        assert!(!TraceType::AMPLITUDE_SPECTRUM.is_time_series());
    }

    #[test]
    fn sample_format_codes() {
        for code in 1..=5 {
            assert_eq!(SampleFormat::from_code(code).map(|f| f.code()), Some(code));
        }
        assert_eq!(SampleFormat::from_code(0), None);
        assert_eq!(SampleFormat::from_code(6), None);
        assert_eq!(SampleFormat::Float32.payload_len(8), 32);
        assert_eq!(SampleFormat::Float20.payload_len(4), 10);
        assert_eq!(SampleFormat::Float20.element(), None);
    }
}
