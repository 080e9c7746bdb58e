//! In-memory trace container.
//!
//! A `Stream` owns one SU header per trace, a rectangular sample matrix,
//! where the data came from, the SEG-2 descriptor mappings, unit labels and
//! a text history of everything applied to it.
//!
//! Invariants kept by every operation:
//! * `headers.len() == samples.ntraces() == trace_descriptors.len()`
//! * every header's `ns` equals `samples.nsamples()`
//! * `tracf` runs 1..=N after any change of the trace count

use crate::descriptor::Descriptor;
use crate::error::{DecodeWarning, Error};
use crate::header::{HeaderKey, HeaderWord, TraceHeader};
use crate::samples::{ElementType, SampleMatrix};
use crate::scale;
use crate::types::{Endianness, SourceFormat, TraceType, Units};
use derive_more::Display;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

const HISTORY_HEADER: &str = ">> History log\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provenance {
    pub origin: Option<PathBuf>,
    pub format: SourceFormat,
    pub revision: u16,
    pub endianness: Option<Endianness>,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            origin: None,
            format: SourceFormat::Memory,
            revision: 1,
            endianness: None,
        }
    }
}

/// Options for `Stream::create`.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateOptions {
    pub trace_type: TraceType,

    /// Seconds between samples, used when `trace_type` is a time series
    pub sampling_interval: f64,

    /// First and second axis sample spacing, used for every other trace type
    pub axis_spacing: (f32, f32),
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            trace_type: TraceType::SEISMIC_DATA,
            sampling_interval: 0.01,
            axis_spacing: (1.0, 1.0),
        }
    }
}

impl CreateOptions {
    pub fn with_trace_type(mut self, trace_type: TraceType) -> Self {
        self.trace_type = trace_type;
        self
    }

    pub fn with_sampling_interval(mut self, seconds: f64) -> Self {
        self.sampling_interval = seconds;
        self
    }

    pub fn with_axis_spacing(mut self, d1: f32, d2: f32) -> Self {
        self.axis_spacing = (d1, d2);
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.trace_type.is_time_series()
            && !(self.sampling_interval.is_finite() && self.sampling_interval > 0.0)
        {
            return Err(Error::InvalidOption(format!(
                "sampling interval must be a positive number of seconds, got {}",
                self.sampling_interval
            )));
        }
        Ok(())
    }
}

/// Amplitude reference for `Stream::normalize`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum Normalization {
    /// Largest absolute sample of the whole stream
    #[default]
    #[display(fmt = "max")]
    Max,
    /// Largest absolute sample of each trace
    #[display(fmt = "trace")]
    Trace,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub(crate) headers: Vec<TraceHeader>,
    pub(crate) samples: SampleMatrix,
    pub(crate) provenance: Provenance,
    pub(crate) file_descriptor: Descriptor,
    pub(crate) trace_descriptors: Vec<Descriptor>,
    pub(crate) units: Units,
    pub(crate) history: String,
    pub(crate) warnings: Vec<DecodeWarning>,
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            samples: SampleMatrix::default(),
            provenance: Provenance::default(),
            file_descriptor: Descriptor::default(),
            trace_descriptors: Vec::new(),
            units: Units::default(),
            history: HISTORY_HEADER.to_owned(),
            warnings: Vec::new(),
        }
    }

    /// Replaces the content of the stream with `samples`, one default header
    /// per trace. Provenance, descriptors and decode warnings start over.
    ///
    /// Time series get `ns`/`dt` from the sampling interval, everything else
    /// gets `ns` and the `d1`/`d2` axis spacings. Nothing is modified when a
    /// header value does not fit its field.
    pub fn create(&mut self, samples: SampleMatrix, opts: &CreateOptions) -> Result<(), Error> {
        opts.validate()?;
        let ns = samples.nsamples() as f64;
        let mut units = self.units;
        let mut headers = Vec::with_capacity(samples.ntraces());
        for i in 0..samples.ntraces() {
            let mut h = TraceHeader {
                trid: opts.trace_type.0,
                ..Default::default()
            };
            let seq = (i + 1) as f64;
            h.set(HeaderKey::Tracl, seq)?;
            h.set(HeaderKey::Tracr, seq)?;
            h.set(HeaderKey::Tracf, seq)?;
            h.set(HeaderKey::Ns, ns)?;
            if opts.trace_type.is_time_series() {
                let (dt, time_unit) = scale::sampling_interval(opts.sampling_interval);
                h.set(HeaderKey::Dt, dt)?;
                units.time = time_unit;
            } else {
                h.set(HeaderKey::D1, f64::from(opts.axis_spacing.0))?;
                h.set(HeaderKey::D2, f64::from(opts.axis_spacing.1))?;
            }
            headers.push(h);
        }

        let n = headers.len();
        self.trace_descriptors = vec![Descriptor::default(); n];
        self.headers = headers;
        self.units = units;
        self.provenance = Provenance::default();
        self.file_descriptor = Descriptor::default();
        self.warnings.clear();
        self.log(format_args!(
            "create: {n} traces, {} samples of {}, trid={}",
            samples.nsamples(),
            samples.element(),
            opts.trace_type
        ));
        self.samples = samples;
        Ok(())
    }

    pub fn ntraces(&self) -> usize {
        self.headers.len()
    }

    pub fn nsamples(&self) -> usize {
        self.samples.nsamples()
    }

    pub fn headers(&self) -> &[TraceHeader] {
        &self.headers
    }

    pub fn header(&self, trace: usize) -> Option<&TraceHeader> {
        self.headers.get(trace)
    }

    pub fn samples(&self) -> &SampleMatrix {
        &self.samples
    }

    /// In-place access for numeric operations that keep the shape.
    /// Use `set_samples` when the shape changes.
    pub fn samples_mut(&mut self) -> &mut SampleMatrix {
        &mut self.samples
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn file_descriptor(&self) -> &Descriptor {
        &self.file_descriptor
    }

    pub fn trace_descriptors(&self) -> &[Descriptor] {
        &self.trace_descriptors
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    /// Recoverable conditions met while decoding.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Appends one line to the history log.
    pub fn add_history(&mut self, entry: &str) {
        self.history.push_str(entry);
        self.history.push('\n');
    }

    pub(crate) fn log(&mut self, entry: std::fmt::Arguments<'_>) {
        debug!("{entry}");
        let _ = self.history.write_fmt(entry);
        self.history.push('\n');
    }

    /// Values of `key` for every trace, or for `count` traces (default 1)
    /// from `start`.
    ///
    /// Coordinates and elevations have their scale factor applied, `dt`
    /// is returned in the time axis unit.
    pub fn header_values(
        &self,
        key: HeaderKey,
        start: Option<usize>,
        count: Option<usize>,
    ) -> Result<Vec<f64>, Error> {
        let range = match start {
            None => 0..self.headers.len(),
            Some(s) => {
                let end = s.saturating_add(count.unwrap_or(1));
                if end > self.headers.len() {
                    return Err(Error::IndexOutOfRange {
                        start: s,
                        end,
                        len: self.headers.len(),
                    });
                }
                s..end
            }
        };
        Ok(self.headers[range]
            .iter()
            .map(|h| scaled_value(h, key))
            .collect())
    }

    /// Checked assignment of one header field. `ns` follows the sample
    /// matrix and cannot be set directly.
    pub fn set_header(&mut self, trace: usize, key: HeaderKey, value: f64) -> Result<(), Error> {
        if key == HeaderKey::Ns {
            return Err(Error::InvalidOption(
                "ns is derived from the sample matrix".to_owned(),
            ));
        }
        let len = self.headers.len();
        let h = self
            .headers
            .get_mut(trace)
            .ok_or(Error::IndexOutOfRange {
                start: trace,
                end: trace + 1,
                len,
            })?;
        h.set(key, value)
    }

    /// Hands back the result of a numeric operation. The trace count must not
    /// change, the sample count may.
    pub fn set_samples(&mut self, samples: SampleMatrix) -> Result<(), Error> {
        if samples.ntraces() != self.headers.len() {
            return Err(Error::TraceCountMismatch {
                rows: samples.ntraces(),
                headers: self.headers.len(),
            });
        }
        let ns = <u16 as HeaderWord>::checked_from(HeaderKey::Ns, samples.nsamples() as f64)?;
        for h in self.headers.iter_mut() {
            h.ns = ns;
        }
        self.log(format_args!(
            "set_samples: {} samples of {}",
            samples.nsamples(),
            samples.element()
        ));
        self.samples = samples;
        Ok(())
    }

    /// Keeps samples `first..=last` of every trace and shifts `delrt` by the
    /// removed leading samples.
    pub fn window_samples(&mut self, first: usize, last: usize) -> Result<(), Error> {
        let len = self.samples.nsamples();
        if first > last || last >= len {
            return Err(Error::SampleWindow { first, last, len });
        }
        let ns = (last + 1 - first) as f64;
        let mut headers = self.headers.clone();
        for h in headers.iter_mut() {
            let shift_ms = first as f64 * f64::from(h.dt) / 1000.0;
            h.set(HeaderKey::Delrt, f64::from(h.delrt) + shift_ms)?;
            h.set(HeaderKey::Ns, ns)?;
        }
        self.headers = headers;
        self.samples.window_columns(first, last);
        self.log(format_args!("window_samples: first={first}, last={last}"));
        Ok(())
    }

    /// Time window in the time axis unit, using the first trace's delay and
    /// sampling interval. Times map to the nearest sample and are clamped to
    /// the available samples.
    pub fn wind(&mut self, tmin: f64, tmax: f64) -> Result<(), Error> {
        let h = self
            .headers
            .first()
            .ok_or_else(|| Error::InvalidOption("cannot window an empty stream".to_owned()))?;
        if h.dt == 0 {
            return Err(Error::InvalidOption(
                "time windowing needs a sampling interval".to_owned(),
            ));
        }
        let dt = scale::interval_from_header(h.dt);
        let delay = f64::from(h.delrt) / 1000.0;
        let last_index = self.samples.nsamples().saturating_sub(1) as f64;
        let to_index = |t: f64| ((t - delay) / dt).round().clamp(0.0, last_index) as usize;
        let (first, last) = (to_index(tmin), to_index(tmax));
        self.window_samples(first, last)?;
        self.log(format_args!("wind: tmin={tmin}, tmax={tmax}"));
        Ok(())
    }

    /// Keeps `count` traces starting at `start`.
    pub fn select_range(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let range = self.trace_range(start, count)?;
        self.retain_traces(range.collect());
        self.log(format_args!("select_range: start={start}, count={count}"));
        Ok(())
    }

    /// Removes `count` traces starting at `start`.
    pub fn delete_range(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let range = self.trace_range(start, count)?;
        let kept = (0..self.headers.len())
            .filter(|i| !range.contains(i))
            .collect();
        self.retain_traces(kept);
        self.log(format_args!("delete_range: start={start}, count={count}"));
        Ok(())
    }

    /// Keeps the traces whose `key` value (scaled as in `header_values`) lies
    /// within `vmin..=vmax`.
    pub fn select_by_key(&mut self, key: HeaderKey, vmin: f64, vmax: f64) {
        let kept = self.traces_where(key, |v| (vmin..=vmax).contains(&v));
        self.retain_traces(kept);
        self.log(format_args!("select_by_key: {key} in {vmin}..={vmax}"));
    }

    /// Removes the traces whose `key` value lies within `vmin..=vmax`.
    pub fn delete_by_key(&mut self, key: HeaderKey, vmin: f64, vmax: f64) {
        let kept = self.traces_where(key, |v| !(vmin..=vmax).contains(&v));
        self.retain_traces(kept);
        self.log(format_args!("delete_by_key: {key} in {vmin}..={vmax}"));
    }

    /// Zeroes `count` traces from `start`, the trace count is unchanged.
    pub fn kill(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let range = self.trace_range(start, count)?;
        self.samples.zero_rows(range);
        self.log(format_args!("kill: start={start}, count={count}"));
        Ok(())
    }

    /// Zeroes up to `count` traces starting at the trace whose `key` value is
    /// closest to `value`.
    pub fn kill_by_key(&mut self, key: HeaderKey, value: f64, count: usize) {
        let start = self
            .headers
            .iter()
            .map(|h| (scaled_value(h, key) - value).abs())
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        if let Some(start) = start {
            let end = start.saturating_add(count).min(self.headers.len());
            self.samples.zero_rows(start..end);
        }
        self.log(format_args!("kill_by_key: {key}={value}, count={count}"));
    }

    /// Sums every trace into a single one, trace `i` scaled by `weights[i]`
    /// (all ones by default). With `mean` the sum is divided by the total
    /// weight.
    ///
    /// The remaining header is the first trace's, renumbered to 1. Integer
    /// samples are stacked as `f32`.
    pub fn stack(&mut self, weights: Option<&[f64]>, mean: bool) -> Result<(), Error> {
        let n = self.headers.len();
        if n == 0 {
            return Err(Error::InvalidOption("cannot stack an empty stream".to_owned()));
        }
        let weights = match weights {
            Some(w) if w.len() != n => {
                return Err(Error::InvalidOption(format!(
                    "{} stacking weights for {n} traces",
                    w.len()
                )))
            }
            Some(w) => w.to_vec(),
            None => vec![1.0; n],
        };
        let total: f64 = weights.iter().sum();
        if mean && total == 0.0 {
            return Err(Error::InvalidOption(
                "mean stack needs weights with a nonzero sum".to_owned(),
            ));
        }

        let float = std::mem::take(&mut self.samples).into_float();
        let mut row = float.weighted_row_sum(&weights);
        if mean {
            row.iter_mut().for_each(|v| *v /= total);
        }
        self.samples = match float.element() {
            ElementType::F64 => SampleMatrix::from_trace(row),
            _ => SampleMatrix::from_trace(row.iter().map(|v| *v as f32).collect::<Vec<_>>()),
        };

        self.headers.truncate(1);
        self.trace_descriptors.truncate(1);
        for h in self.headers.iter_mut() {
            h.tracl = 1;
            h.tracr = 1;
            h.tracf = 1;
        }
        self.log(format_args!("stack: {n} traces, mean={mean}"));
        Ok(())
    }

    /// Scales amplitudes to at most 1 in magnitude, by the largest sample of
    /// the whole stream or of each trace. All-zero traces are left alone.
    /// Integer samples are converted to `f32` first.
    pub fn normalize(&mut self, mode: Normalization) {
        let mut samples = std::mem::take(&mut self.samples).into_float();
        let n = samples.ntraces();
        let groups = match mode {
            Normalization::Max => vec![0..n],
            Normalization::Trace => (0..n).map(|t| t..t + 1).collect(),
        };
        for rows in groups {
            let max = samples.max_abs(rows.clone());
            if max > 0.0 {
                samples.scale_rows(rows, 1.0 / max);
            }
        }
        self.samples = samples;
        self.log(format_args!("normalize: mode={mode}"));
    }

    fn trace_range(&self, start: usize, count: usize) -> Result<std::ops::Range<usize>, Error> {
        let end = start.saturating_add(count);
        if end > self.headers.len() {
            return Err(Error::IndexOutOfRange {
                start,
                end,
                len: self.headers.len(),
            });
        }
        Ok(start..end)
    }

    fn traces_where(&self, key: HeaderKey, keep: impl Fn(f64) -> bool) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| keep(scaled_value(h, key)))
            .map(|(i, _)| i)
            .collect()
    }

    fn retain_traces(&mut self, kept: Vec<usize>) {
        self.headers = kept.iter().map(|i| self.headers[*i].clone()).collect();
        self.trace_descriptors = kept
            .iter()
            .map(|i| self.trace_descriptors[*i].clone())
            .collect();
        self.samples.select_rows(&kept);
        // N never exceeds the input trace count, which already fit in i32
        for (i, h) in self.headers.iter_mut().enumerate() {
            h.tracf = (i + 1) as i32;
        }
    }
}

fn scaled_value(h: &TraceHeader, key: HeaderKey) -> f64 {
    let raw = h.get(key);
    if key == HeaderKey::Dt {
        scale::interval_from_header(h.dt)
    } else if key.is_coordinate() {
        scale::coordinate_scale(raw, h.scalco)
    } else if key.is_elevation() {
        scale::elevation_scale(raw, h.scalel)
    } else {
        raw
    }
}
