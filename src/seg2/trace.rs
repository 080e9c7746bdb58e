use super::free_form::Entry;
use super::read_bytes;
use crate::config::ReadOptions;
use crate::descriptor::{Descriptor, DescriptorValue};
use crate::error::Error;
use crate::header::{HeaderKey, TraceHeader};
use crate::scale;
use crate::types::{TraceType, Units};
use byteorder::ByteOrder;
use std::io::{Read, Seek};

/// Size of the fixed part of a trace descriptor block
pub(crate) const TRACE_DESCRIPTOR_LEN: usize = 32;

pub(crate) const TRACE_BLOCK_ID: u16 = 0x4422;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TraceBlock {
    pub block_id: u16,
    /// Descriptor block size, the samples start this many bytes after the block
    pub block_size: u16,
    pub data_size: u32,
    pub nsamples: u32,
    pub format_code: u8,
}

impl TraceBlock {
    pub fn read<B: ByteOrder, R: Read + Seek>(r: &mut R) -> Result<Self, Error> {
        let buf = read_bytes(r, TRACE_DESCRIPTOR_LEN)?;
        Ok(Self {
            block_id: B::read_u16(&buf[0..2]),
            block_size: B::read_u16(&buf[2..4]),
            data_size: B::read_u32(&buf[4..8]),
            nsamples: B::read_u32(&buf[8..12]),
            format_code: buf[12],
        })
    }
}

/// Builds a trace descriptor from the trace defaults and the entries of one
/// trace block.
///
/// The keywords that feed the SU header must parse. The rest of the
/// vocabulary takes the shape of its default, unknown keys stay text.
pub(crate) fn trace_descriptor(entries: Vec<Entry>, offset: u64) -> Result<Descriptor, Error> {
    let mut desc = Descriptor::trace_defaults();
    for Entry { key, value } in entries {
        let parsed = match key.as_str() {
            "SAMPLE_INTERVAL" | "DATUM" | "DELAY" => {
                let first = value.split_whitespace().next().unwrap_or_default();
                DescriptorValue::Number(parse_number(&key, first, offset)?)
            }
            "RECEIVER_LOCATION" | "SOURCE_LOCATION" => {
                let values = value
                    .split_whitespace()
                    .map(|v| parse_number(&key, v, offset))
                    .collect::<Result<Vec<_>, _>>()?;
                if values.is_empty() || values.len() > 3 {
                    return Err(Error::Format {
                        offset,
                        reason: format!(
                            "{key} holds {} values, expected 1 to 3",
                            values.len()
                        ),
                    });
                }
                DescriptorValue::Numbers(values)
            }
            _ => {
                desc.insert_raw(key, &value);
                continue;
            }
        };
        desc.insert(key, parsed);
    }
    Ok(desc)
}

fn parse_number(key: &str, value: &str, offset: u64) -> Result<f64, Error> {
    value.parse::<f64>().map_err(|_| Error::Format {
        offset,
        reason: format!("{key} value '{value}' is not a number"),
    })
}

/// Fills the SU header of trace `index` from its descriptor and the file
/// descriptor. Unit information is written back into `units`.
///
/// `interval` is the sampling interval in seconds the file actually states
/// for this trace (or carried over from an earlier one). Without it dt stays
/// zero, the descriptor default is never written to the header.
pub(crate) fn synthesize_header(
    index: usize,
    nsamples: usize,
    interval: Option<f64>,
    trace: &Descriptor,
    file: &Descriptor,
    opts: &ReadOptions,
    units: &mut Units,
) -> Result<TraceHeader, Error> {
    let mut h = TraceHeader::default();
    let seq = (index + 1) as f64;
    h.set(HeaderKey::Tracl, seq)?;
    h.set(HeaderKey::Tracr, seq)?;
    h.set(HeaderKey::Tracf, seq)?;

    let trace_type = TraceType::from_seg2_keyword(trace.text("TRACE_TYPE").unwrap_or_default());
    h.trid = trace_type.into();
    h.set(HeaderKey::Ns, nsamples as f64)?;

    if let Some(interval) = interval {
        let (dt, time_unit) = scale::sampling_interval(interval);
        h.set(HeaderKey::Dt, dt)?;
        units.time = time_unit;
    }

    let delay = trace.number("DELAY").unwrap_or_default();
    h.set(HeaderKey::Delrt, scale::delay_milliseconds(delay))?;

    let scalco = opts.coordinate_scale;
    let scalel = opts.elevation_scale;
    h.scalco = scalco;
    h.scalel = scale::elevation_header_scale(scalel);

    let locations = [
        ("RECEIVER_LOCATION", HeaderKey::Gx, HeaderKey::Gy, HeaderKey::Gelev),
        ("SOURCE_LOCATION", HeaderKey::Sx, HeaderKey::Sy, HeaderKey::Selev),
    ];
    for (keyword, x, y, z) in locations {
        let position = trace.numbers(keyword).unwrap_or_default();
        for (key, value) in [x, y].into_iter().zip(position) {
            h.set(key, scale::encode_coordinate(*value, scalco))?;
        }
        if let Some(elevation) = position.get(2) {
            h.set(z, scale::encode_elevation(*elevation, scalel))?;
        }
    }

    let datum = trace.number("DATUM").unwrap_or_default();
    if datum != 0.0 {
        let stored = scale::encode_elevation(datum, scalel);
        h.set(HeaderKey::Gdel, stored)?;
        h.set(HeaderKey::Sdel, stored)?;
    }

    if let Some((counit, length)) = file.text("UNITS").and_then(scale::coordinate_units) {
        h.counit = counit;
        units.length = length;
    }

    Ok(h)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{LengthUnit, TimeUnit};
    use pretty_assertions::assert_eq;

    fn entries(pairs: &[(&str, &str)]) -> Vec<Entry> {
        pairs
            .iter()
            .map(|(k, v)| Entry {
                key: (*k).to_owned(),
                value: (*v).to_owned(),
            })
            .collect()
    }

    #[test]
    fn descriptor_keywords() {
        let desc = trace_descriptor(
            entries(&[
                ("SAMPLE_INTERVAL", "0.00025"),
                ("RECEIVER_LOCATION", "10.5 -2 3.25"),
                ("SOURCE_LOCATION", "4"),
                ("TRACE_TYPE", "SEISMIC_DATA"),
                ("VENDOR_TAG", "abc def"),
                ("ALIAS_FILTER", "250 18"),
                ("CHANNEL_NUMBER", "12"),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(desc.number("SAMPLE_INTERVAL"), Some(0.00025));
        assert_eq!(desc.numbers("RECEIVER_LOCATION"), Some(&[10.5, -2.0, 3.25][..]));
        assert_eq!(desc.numbers("SOURCE_LOCATION"), Some(&[4.0][..]));
        assert_eq!(desc.text("TRACE_TYPE"), Some("SEISMIC_DATA"));
        assert_eq!(desc.text("VENDOR_TAG"), Some("abc def"));
        assert_eq!(desc.numbers("ALIAS_FILTER"), Some(&[250.0, 18.0][..]));
        assert_eq!(desc.number("CHANNEL_NUMBER"), Some(12.0));
        assert_eq!(desc.number("DELAY"), Some(0.0));
        assert_eq!(Descriptor::trace_defaults().number("SAMPLE_INTERVAL"), Some(1.0));
    }

    #[test]
    fn bad_descriptor_values() {
        let err = trace_descriptor(entries(&[("DELAY", "soon")]), 96).unwrap_err();
        assert!(matches!(err, Error::Format { offset: 96, .. }));
        let err =
            trace_descriptor(entries(&[("SOURCE_LOCATION", "1 2 3 4")]), 96).unwrap_err();
        assert!(matches!(err, Error::Format { offset: 96, .. }));
        assert!(trace_descriptor(entries(&[("RECEIVER_LOCATION", "")]), 0).is_err());
    }

    #[test]
    fn header_from_descriptors() {
        let trace = trace_descriptor(
            entries(&[
                ("SAMPLE_INTERVAL", "0.001"),
                ("RECEIVER_LOCATION", "10.0 0.0"),
                ("SOURCE_LOCATION", "-5.5 1.25 2.5"),
                ("DELAY", "0.02"),
                ("DATUM", "100"),
                ("TRACE_TYPE", "SEISMIC_DATA"),
            ]),
            0,
        )
        .unwrap();
        let mut file = Descriptor::file_defaults();
        file.insert("UNITS", "FEET");
        let opts = ReadOptions::new(-100, 10).unwrap();
        let mut units = Units::default();
        let interval = trace.number("SAMPLE_INTERVAL");
        let h = synthesize_header(2, 8, interval, &trace, &file, &opts, &mut units).unwrap();

        assert_eq!((h.tracl, h.tracr, h.tracf), (3, 3, 3));
        assert_eq!(h.trid, 1);
        assert_eq!((h.ns, h.dt), (8, 1000));
        assert_eq!(h.delrt, 20);
        assert_eq!((h.scalco, h.scalel), (-100, -10));
        assert_eq!((h.gx, h.gy, h.gelev), (1000, 0, 0));
        assert_eq!((h.sx, h.sy, h.selev), (-550, 125, 25));
        assert_eq!((h.gdel, h.sdel), (1000, 1000));
        assert_eq!(h.counit, 1);
        assert_eq!(units.length, LengthUnit::Feet);
        assert_eq!(units.time, TimeUnit::Seconds);
    }

    #[test]
    fn header_overflow_is_reported() {
        let trace = trace_descriptor(entries(&[("RECEIVER_LOCATION", "3000000")]), 0).unwrap();
        let opts = ReadOptions::new(-1000, 1).unwrap();
        let err = synthesize_header(
            0,
            4,
            None,
            &trace,
            &Descriptor::file_defaults(),
            &opts,
            &mut Units::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::FieldOverflow {
                field: HeaderKey::Gx,
                ..
            }
        ));
    }

    #[test]
    fn unstated_interval_leaves_dt_unset() {
        let trace = trace_descriptor(entries(&[("DELAY", "0.5")]), 0).unwrap();
        let mut units = Units::default();
        let h = synthesize_header(
            0,
            4,
            None,
            &trace,
            &Descriptor::file_defaults(),
            &ReadOptions::default(),
            &mut units,
        )
        .unwrap();
        assert_eq!((h.ns, h.dt, h.delrt), (4, 0, 500));
        assert_eq!(units, Units::default());

        let err = synthesize_header(
            0,
            4,
            Some(1.0),
            &trace,
            &Descriptor::file_defaults(),
            &ReadOptions::default(),
            &mut units,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::FieldOverflow {
                field: HeaderKey::Dt,
                ..
            }
        ));
    }
}
