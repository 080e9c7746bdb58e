//! Rectangular trace x sample matrix with a single element type.

use crate::error::Error;
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use derive_more::Display;
use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::ops::Range;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum ElementType {
    #[display(fmt = "i16")]
    I16,
    #[display(fmt = "i32")]
    I32,
    #[display(fmt = "f32")]
    F32,
    #[display(fmt = "f64")]
    F64,
}

impl ElementType {
    /// Width of one sample in bytes
    pub fn width(self) -> usize {
        match self {
            ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SampleData {
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! with_data {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            SampleData::I16($v) => $body,
            SampleData::I32($v) => $body,
            SampleData::F32($v) => $body,
            SampleData::F64($v) => $body,
        }
    };
}

/// A sample element type the container can hold.
pub trait Sample: Copy + Default + PartialEq + Debug + 'static {
    const ELEMENT: ElementType;

    fn wrap(v: Vec<Self>) -> SampleData;
    fn slice(data: &SampleData) -> Option<&[Self]>;
    fn slice_mut(data: &mut SampleData) -> Option<&mut [Self]>;

    /// Lossless for values produced by `to_f64` of the same type, integer
    /// targets saturate.
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    fn read<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self>;
    fn write<B: ByteOrder, W: Write>(self, w: &mut W) -> io::Result<()>;
}

macro_rules! impl_sample {
    ($t:ty, $variant:ident, $read:ident, $write:ident) => {
        impl Sample for $t {
            const ELEMENT: ElementType = ElementType::$variant;

            fn wrap(v: Vec<Self>) -> SampleData {
                SampleData::$variant(v)
            }

            fn slice(data: &SampleData) -> Option<&[Self]> {
                match data {
                    SampleData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut SampleData) -> Option<&mut [Self]> {
                match data {
                    SampleData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_f64(v: f64) -> Self {
                v as $t
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn read<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
                r.$read::<B>()
            }

            fn write<B: ByteOrder, W: Write>(self, w: &mut W) -> io::Result<()> {
                w.$write::<B>(self)
            }
        }
    };
}

impl_sample!(i16, I16, read_i16, write_i16);
impl_sample!(i32, I32, read_i32, write_i32);
impl_sample!(f32, F32, read_f32, write_f32);
impl_sample!(f64, F64, read_f64, write_f64);

#[derive(Clone, Debug, PartialEq)]
pub struct SampleMatrix {
    data: SampleData,
    ntraces: usize,
    nsamples: usize,
}

impl Default for SampleMatrix {
    fn default() -> Self {
        SampleMatrix::zeros(ElementType::F32, 0, 0)
    }
}

impl SampleMatrix {
    pub fn zeros(element: ElementType, ntraces: usize, nsamples: usize) -> Self {
        let len = ntraces * nsamples;
        let data = match element {
            ElementType::I16 => SampleData::I16(vec![0; len]),
            ElementType::I32 => SampleData::I32(vec![0; len]),
            ElementType::F32 => SampleData::F32(vec![0.0; len]),
            ElementType::F64 => SampleData::F64(vec![0.0; len]),
        };
        Self {
            data,
            ntraces,
            nsamples,
        }
    }

    /// A single trace.
    pub fn from_trace<T: Sample>(samples: Vec<T>) -> Self {
        let nsamples = samples.len();
        Self {
            data: T::wrap(samples),
            ntraces: 1,
            nsamples,
        }
    }

    /// One trace per row, every row must have the same length.
    pub fn from_rows<T: Sample>(rows: Vec<Vec<T>>) -> Result<Self, Error> {
        let ntraces = rows.len();
        let nsamples = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(ntraces * nsamples);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != nsamples {
                return Err(Error::RaggedSamples {
                    row,
                    expected: nsamples,
                    actual: r.len(),
                });
            }
            flat.extend(r);
        }
        Ok(Self {
            data: T::wrap(flat),
            ntraces,
            nsamples,
        })
    }

    /// Row-major samples, `data.len()` must equal `ntraces * nsamples`.
    pub fn from_flat<T: Sample>(
        data: Vec<T>,
        ntraces: usize,
        nsamples: usize,
    ) -> Result<Self, Error> {
        if data.len() != ntraces * nsamples {
            return Err(Error::InvalidOption(format!(
                "{} samples cannot be shaped into {ntraces} traces of {nsamples} samples",
                data.len()
            )));
        }
        Ok(Self {
            data: T::wrap(data),
            ntraces,
            nsamples,
        })
    }

    pub fn element(&self) -> ElementType {
        match self.data {
            SampleData::I16(_) => ElementType::I16,
            SampleData::I32(_) => ElementType::I32,
            SampleData::F32(_) => ElementType::F32,
            SampleData::F64(_) => ElementType::F64,
        }
    }

    pub fn ntraces(&self) -> usize {
        self.ntraces
    }

    pub fn nsamples(&self) -> usize {
        self.nsamples
    }

    pub fn data(&self) -> &SampleData {
        &self.data
    }

    /// The whole matrix, row-major, when it holds `T` elements.
    pub fn as_slice<T: Sample>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Mutable view for in-place numeric operations. The shape cannot change
    /// through this view.
    pub fn as_mut_slice<T: Sample>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.data)
    }

    pub fn row<T: Sample>(&self, trace: usize) -> Option<&[T]> {
        if trace >= self.ntraces {
            return None;
        }
        let r = self.row_range(trace);
        self.as_slice::<T>().map(|s| &s[r])
    }

    pub fn row_f64(&self, trace: usize) -> Option<Vec<f64>> {
        if trace >= self.ntraces {
            return None;
        }
        let r = self.row_range(trace);
        Some(with_data!(&self.data, v => v[r].iter().map(|s| s.to_f64()).collect()))
    }

    fn row_range(&self, trace: usize) -> Range<usize> {
        trace * self.nsamples..(trace + 1) * self.nsamples
    }

    /// Decodes `bytes` holding samples of type `src` into row `trace`,
    /// converting to the matrix element type when they differ.
    pub(crate) fn fill_row<B: ByteOrder>(
        &mut self,
        trace: usize,
        src: ElementType,
        mut bytes: &[u8],
    ) -> io::Result<()> {
        let r = self.row_range(trace);
        with_data!(&mut self.data, v => {
            for out in v[r].iter_mut() {
                *out = Sample::from_f64(read_as_f64::<B, _>(src, &mut bytes)?);
            }
        });
        Ok(())
    }

    pub(crate) fn read_row<B: ByteOrder, R: Read>(
        &mut self,
        trace: usize,
        r: &mut R,
    ) -> io::Result<()> {
        let range = self.row_range(trace);
        with_data!(&mut self.data, v => {
            for out in v[range].iter_mut() {
                *out = Sample::read::<B, R>(r)?;
            }
        });
        Ok(())
    }

    pub(crate) fn write_row<B: ByteOrder, W: Write>(
        &self,
        trace: usize,
        w: &mut W,
    ) -> io::Result<()> {
        let r = self.row_range(trace);
        with_data!(&self.data, v => {
            for s in v[r].iter() {
                s.write::<B, W>(w)?;
            }
        });
        Ok(())
    }

    pub(crate) fn zero_rows(&mut self, rows: Range<usize>) {
        let r = rows.start * self.nsamples..rows.end * self.nsamples;
        with_data!(&mut self.data, v => v[r].iter_mut().for_each(|s| *s = Default::default()));
    }

    /// Keeps the sample columns `first..=last` of every trace.
    pub(crate) fn window_columns(&mut self, first: usize, last: usize) {
        let ns = self.nsamples;
        let ntraces = self.ntraces;
        with_data!(&mut self.data, v => {
            let kept = (0..ntraces)
                .flat_map(|t| v[t * ns + first..=t * ns + last].iter().copied())
                .collect();
            *v = kept;
        });
        self.nsamples = last + 1 - first;
    }

    /// Same samples with a floating point element type, integer samples
    /// become `f32`.
    pub(crate) fn into_float(self) -> Self {
        let SampleMatrix {
            data,
            ntraces,
            nsamples,
        } = self;
        let data = match data {
            SampleData::I16(v) => SampleData::F32(v.into_iter().map(f32::from).collect()),
            SampleData::I32(v) => SampleData::F32(v.into_iter().map(|s| s as f32).collect()),
            float => float,
        };
        Self {
            data,
            ntraces,
            nsamples,
        }
    }

    /// Sample-wise sum of the rows, row `t` scaled by `weights[t]`.
    pub(crate) fn weighted_row_sum(&self, weights: &[f64]) -> Vec<f64> {
        let mut sum = vec![0.0; self.nsamples];
        for (t, w) in weights.iter().enumerate().take(self.ntraces) {
            let r = self.row_range(t);
            with_data!(&self.data, v => {
                for (acc, s) in sum.iter_mut().zip(&v[r]) {
                    *acc += s.to_f64() * w;
                }
            });
        }
        sum
    }

    /// Largest absolute sample of `rows`, zero for empty rows.
    pub(crate) fn max_abs(&self, rows: Range<usize>) -> f64 {
        let r = rows.start * self.nsamples..rows.end * self.nsamples;
        with_data!(&self.data, v => v[r].iter().map(|s| s.to_f64().abs()).fold(0.0, f64::max))
    }

    pub(crate) fn scale_rows(&mut self, rows: Range<usize>, factor: f64) {
        let r = rows.start * self.nsamples..rows.end * self.nsamples;
        with_data!(&mut self.data, v => {
            for s in v[r].iter_mut() {
                *s = Sample::from_f64(s.to_f64() * factor);
            }
        });
    }

    /// Keeps the rows whose index is in `rows`, in that order.
    pub(crate) fn select_rows(&mut self, rows: &[usize]) {
        let ns = self.nsamples;
        with_data!(&mut self.data, v => {
            let kept = rows
                .iter()
                .flat_map(|t| v[t * ns..(t + 1) * ns].iter().copied())
                .collect();
            *v = kept;
        });
        self.ntraces = rows.len();
    }
}

fn read_as_f64<B: ByteOrder, R: Read>(src: ElementType, r: &mut R) -> io::Result<f64> {
    Ok(match src {
        ElementType::I16 => r.read_i16::<B>()? as f64,
        ElementType::I32 => r.read_i32::<B>()? as f64,
        ElementType::F32 => r.read_f32::<B>()? as f64,
        ElementType::F64 => r.read_f64::<B>()?,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};
    use pretty_assertions::assert_eq;

    #[test]
    fn ragged_rows_are_rejected() {
        let err = SampleMatrix::from_rows(vec![vec![1.0_f32, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedSamples {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn fill_row_converts_between_types() {
        let mut m = SampleMatrix::zeros(ElementType::F32, 2, 3);
        let mut bytes = Vec::new();
        for v in [1_i16, -2, 3] {
            bytes.write_i16::<BigEndian>(v).unwrap();
        }
        m.fill_row::<BigEndian>(1, ElementType::I16, &bytes).unwrap();
        assert_eq!(m.row::<f32>(0), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(m.row::<f32>(1), Some(&[1.0, -2.0, 3.0][..]));
        assert_eq!(m.row::<f64>(1), None);
    }

    #[test]
    fn fill_row_reports_short_payload() {
        let mut m = SampleMatrix::zeros(ElementType::F64, 1, 2);
        let err = m
            .fill_row::<LittleEndian>(0, ElementType::F64, &[0; 12])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn window_and_select() {
        let mut m =
            SampleMatrix::from_rows(vec![vec![1_i32, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]])
                .unwrap();
        m.window_columns(1, 2);
        assert_eq!(m.nsamples(), 2);
        assert_eq!(m.as_slice::<i32>(), Some(&[2, 3, 6, 7, 10, 11][..]));
        m.select_rows(&[0, 2]);
        assert_eq!(m.ntraces(), 2);
        assert_eq!(m.as_slice::<i32>(), Some(&[2, 3, 10, 11][..]));
        m.zero_rows(1..2);
        assert_eq!(m.row_f64(1), Some(vec![0.0, 0.0]));
    }

    #[test]
    fn float_arithmetic_helpers() {
        let m = SampleMatrix::from_rows(vec![vec![1_i16, -4, 2], vec![3, 2, -1]])
            .unwrap()
            .into_float();
        assert_eq!(m.element(), ElementType::F32);
        assert_eq!(m.row::<f32>(0), Some(&[1.0, -4.0, 2.0][..]));
        assert_eq!(m.weighted_row_sum(&[1.0, 2.0]), vec![7.0, 0.0, 0.0]);
        assert_eq!(m.max_abs(0..2), 4.0);
        assert_eq!(m.max_abs(1..2), 3.0);

        let mut m = m;
        m.scale_rows(1..2, 0.5);
        assert_eq!(m.row::<f32>(1), Some(&[1.5, 1.0, -0.5][..]));
        assert_eq!(m.row::<f32>(0), Some(&[1.0, -4.0, 2.0][..]));

        let f = SampleMatrix::from_trace(vec![0.25_f64]);
        assert_eq!(f.clone().into_float(), f);
    }
}
