//! # Overview
//!
//! Reads SEG-2 seismic recordings into an in-memory trace container and
//! writes the container as Seismic Unix (CWP) trace files.
//!
//! * A [`stream::Stream`] owns one SU trace header per trace, a rectangular
//!   sample matrix, the SEG-2 free-form descriptors and a history log
//! * [`seg2::read`] decodes a SEG-2 file of either byte order
//! * [`su::write`] encodes a container as SU records in native byte order
//!
//! # Header Mappings
//!
//! SEG-2 keyword to SU header field
//! * trace index + 1
//!   - tracl, tracr, tracf
//! * `TRACE_TYPE`
//!   - trid (UNKNOWN 0, SEISMIC_DATA 1, DEAD 2, TEST_DATA 3, UPHOLE 4)
//! * sample count of the trace descriptor block
//!   - ns, counts above 65535 are rejected
//! * `SAMPLE_INTERVAL` (seconds)
//!   - dt in microseconds, or nanoseconds with a millisecond time unit when
//!     the interval is below one microsecond. A trace without the keyword
//!     keeps the interval of the previous trace in table order, dt stays 0
//!     when no trace so far stated one
//! * `DELAY`
//!   - delrt in milliseconds, values below 1 are taken as seconds
//! * `RECEIVER_LOCATION` x y z
//!   - gx, gy, gelev
//! * `SOURCE_LOCATION` x y z
//!   - sx, sy, selev
//! * `DATUM`
//!   - gdel, sdel
//! * `UNITS` of the file descriptor
//!   - counit (FEET, METERS 1; INCHES, CENTIMETERS 5; MILLIMETERS 6)
//!
//! # Scale Conventions
//!
//! Coordinates are stored with the caller's coordinate scale `s` in scalco.
//! A negative `s` stores `value * |s|`, a positive `s` stores `value / s`,
//! so applying scalco to the stored integer gives back the value.
//!
//! Elevations are stored as `value * s` for the caller's elevation scale `s`
//! and scalel holds `-s`.
#![deny(clippy::all)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod opts;
pub mod prelude;
pub mod samples;
pub mod scale;
pub mod seg2;
pub mod stream;
pub mod su;
pub mod tracing;
pub mod types;
