use crate::header::HeaderKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Encountered an I/O error. {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed SEG-2 stream at byte offset {offset}: {reason}")]
    Format { offset: u64, reason: String },

    #[error(
        "Stream ended early at byte offset {offset}, expected {expected} bytes but only {actual} were available"
    )]
    Truncated {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Trace {trace} uses the unknown sample data type code {code}")]
    UnknownSampleFormat { trace: usize, code: u8 },

    #[error("The value {value} does not fit in the {field} header field")]
    FieldOverflow { field: HeaderKey, value: f64 },

    #[error("Sample rows must share one length, row {row} has {actual} samples instead of {expected}")]
    RaggedSamples {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("The sample matrix holds {rows} traces but the container has {headers} trace headers")]
    TraceCountMismatch { rows: usize, headers: usize },

    #[error("'{0}' is not a trace header field")]
    UnknownHeaderField(String),

    #[error("Trace range {start}..{end} is outside of the {len} available traces")]
    IndexOutOfRange { start: usize, end: usize, len: usize },

    #[error("Sample window {first}..={last} is outside of the {len} available samples")]
    SampleWindow {
        first: usize,
        last: usize,
        len: usize,
    },

    #[error("Invalid option. {0}")]
    InvalidOption(String),

    #[error("Failed to read the configuration file. {0}")]
    ConfigRead(#[source] std::io::Error),

    #[error("Failed to parse the configuration file. {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Conditions that affect a single trace and never abort a decode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeWarning {
    #[error("Trace {trace} uses sample data type code {code} (20-bit float) which is unsupported, its samples were zero-filled")]
    UnsupportedEncoding { trace: usize, code: u8 },

    #[error("Trace {trace} stores samples as code {code} while the container uses code {container}, samples were converted")]
    SampleFormatMismatch { trace: usize, code: u8, container: u8 },

    #[error("Trace {trace} descriptor block starts with identifier 0x{found:04X} instead of 0x4422")]
    UnexpectedTraceBlockId { trace: usize, found: u16 },
}
