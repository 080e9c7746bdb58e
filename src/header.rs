//! # SU/CWP rev.0 trace header
//!
//! 87 fields, 240 bytes, no padding. Field order below is the on-disk order.
//!
//! | Bytes   | Fields                                                   | Type |
//! |---------|----------------------------------------------------------|------|
//! | 0-27    | tracl tracr fldr tracf ep cdp cdpt                       | i32  |
//! | 28-35   | trid nvs nhs duse                                        | i16  |
//! | 36-67   | offset gelev selev sdepth gdel sdel swdep gwdep          | i32  |
//! | 68-71   | scalel scalco                                            | i16  |
//! | 72-87   | sx sy gx gy                                              | i32  |
//! | 88-113  | counit .. mute                                           | i16  |
//! | 114-117 | ns dt                                                    | u16  |
//! | 118-179 | gain .. otrav                                            | i16  |
//! | 180-203 | d1 f1 d2 f2 ungpow unscale                               | f32  |
//! | 204-207 | ntr                                                      | i32  |
//! | 208-211 | mark shortpad                                            | i16  |
//! | 212-227 | unassignedInt1..4                                        | i32  |
//! | 228-239 | unassignedFloat1..3                                      | f32  |

use crate::error::Error;
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use derive_more::Display;
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

/// Size of one encoded header record
pub const HEADER_LEN: usize = 240;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum FieldType {
    #[display(fmt = "i16")]
    I16,
    #[display(fmt = "u16")]
    U16,
    #[display(fmt = "i32")]
    I32,
    #[display(fmt = "f32")]
    F32,
}

impl FieldType {
    pub fn width(self) -> usize {
        match self {
            FieldType::I16 | FieldType::U16 => 2,
            FieldType::I32 | FieldType::F32 => 4,
        }
    }
}

/// A primitive that can be stored in a header field.
pub trait HeaderWord: Copy + Default {
    const FIELD_TYPE: FieldType;

    fn to_f64(self) -> f64;

    /// Integer fields round to the nearest integer, then reject anything
    /// outside of the type's range instead of wrapping.
    fn checked_from(key: HeaderKey, value: f64) -> Result<Self, Error>;

    fn read<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self>;
    fn write<B: ByteOrder, W: Write>(self, w: &mut W) -> io::Result<()>;
}

macro_rules! integer_word {
    ($t:ty, $ft:ident, $read:ident, $write:ident) => {
        impl HeaderWord for $t {
            const FIELD_TYPE: FieldType = FieldType::$ft;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn checked_from(key: HeaderKey, value: f64) -> Result<Self, Error> {
                let r = value.round();
                if !r.is_finite() || r < <$t>::MIN as f64 || r > <$t>::MAX as f64 {
                    return Err(Error::FieldOverflow { field: key, value });
                }
                Ok(r as $t)
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

integer_word!(i16, I16, read_i16, write_i16);
integer_word!(u16, U16, read_u16, write_u16);
integer_word!(i32, I32, read_i32, write_i32);

impl HeaderWord for f32 {
    const FIELD_TYPE: FieldType = FieldType::F32;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn checked_from(key: HeaderKey, value: f64) -> Result<Self, Error> {
        if value.abs() > f32::MAX as f64 {
            return Err(Error::FieldOverflow { field: key, value });
        }
        Ok(value as f32)
    }

    fn read<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_f32::<B>()
    }

    fn write<B: ByteOrder, W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_f32::<B>(self)
    }
}

macro_rules! trace_header {
    ($( $(#[$doc:meta])* $field:ident : $ty:ty => $key:ident $name:literal ),+ $(,)?) => {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct TraceHeader {
            $( $(#[$doc])* pub $field: $ty, )+
        }

        /// Names a single trace header field.
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub enum HeaderKey {
            $( $key, )+
        }

        impl fmt::Display for HeaderKey {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl HeaderKey {
            /// Every field, in on-disk order
            pub const ALL: &'static [HeaderKey] = &[ $( HeaderKey::$key, )+ ];

            pub fn name(self) -> &'static str {
                match self {
                    $( HeaderKey::$key => $name, )+
                }
            }

            pub fn field_type(self) -> FieldType {
                match self {
                    $( HeaderKey::$key => <$ty as HeaderWord>::FIELD_TYPE, )+
                }
            }
        }

        impl FromStr for HeaderKey {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(HeaderKey::$key), )+
                    _ => Err(Error::UnknownHeaderField(s.to_owned())),
                }
            }
        }

        impl TraceHeader {
            /// Raw stored value, no scale factors applied.
            pub fn get(&self, key: HeaderKey) -> f64 {
                match key {
                    $( HeaderKey::$key => HeaderWord::to_f64(self.$field), )+
                }
            }

            /// Range-checked assignment, the field is untouched on overflow.
            pub fn set(&mut self, key: HeaderKey, value: f64) -> Result<(), Error> {
                match key {
                    $( HeaderKey::$key => self.$field = <$ty as HeaderWord>::checked_from(key, value)?, )+
                }
                Ok(())
            }

            pub fn read_from<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
                Ok(Self {
                    $( $field: <$ty as HeaderWord>::read::<B, R>(r)?, )+
                })
            }

            pub fn write_to<B: ByteOrder, W: Write>(&self, w: &mut W) -> io::Result<()> {
                $( HeaderWord::write::<B, W>(self.$field, w)?; )+
                Ok(())
            }
        }
    };
}

trace_header! {
    /// Trace sequence number within line
    tracl: i32 => Tracl "tracl",
    /// Trace sequence number within reel
    tracr: i32 => Tracr "tracr",
    /// Field record number
    fldr: i32 => Fldr "fldr",
    /// Trace number within field record
    tracf: i32 => Tracf "tracf",
    ep: i32 => Ep "ep",
    cdp: i32 => Cdp "cdp",
    cdpt: i32 => Cdpt "cdpt",
    /// Trace identification code
    trid: i16 => Trid "trid",
    nvs: i16 => Nvs "nvs",
    nhs: i16 => Nhs "nhs",
    duse: i16 => Duse "duse",
    offset: i32 => Offset "offset",
    /// Receiver group elevation, scaled by `scalel`
    gelev: i32 => Gelev "gelev",
    /// Source elevation, scaled by `scalel`
    selev: i32 => Selev "selev",
    sdepth: i32 => Sdepth "sdepth",
    /// Datum elevation at receiver group, scaled by `scalel`
    gdel: i32 => Gdel "gdel",
    /// Datum elevation at source, scaled by `scalel`
    sdel: i32 => Sdel "sdel",
    swdep: i32 => Swdep "swdep",
    gwdep: i32 => Gwdep "gwdep",
    /// Elevation scale factor
    scalel: i16 => Scalel "scalel",
    /// Coordinate scale factor
    scalco: i16 => Scalco "scalco",
    sx: i32 => Sx "sx",
    sy: i32 => Sy "sy",
    gx: i32 => Gx "gx",
    gy: i32 => Gy "gy",
    /// Coordinate units code
    counit: i16 => Counit "counit",
    wevel: i16 => Wevel "wevel",
    swevel: i16 => Swevel "swevel",
    sut: i16 => Sut "sut",
    gut: i16 => Gut "gut",
    sstat: i16 => Sstat "sstat",
    gstat: i16 => Gstat "gstat",
    tstat: i16 => Tstat "tstat",
    laga: i16 => Laga "laga",
    lagb: i16 => Lagb "lagb",
    /// Delay recording time in milliseconds
    delrt: i16 => Delrt "delrt",
    muts: i16 => Muts "muts",
    mute: i16 => Mute "mute",
    /// Number of samples in this trace
    ns: u16 => Ns "ns",
    /// Sample interval in microseconds
    dt: u16 => Dt "dt",
    gain: i16 => Gain "gain",
    igc: i16 => Igc "igc",
    igi: i16 => Igi "igi",
    corr: i16 => Corr "corr",
    sfs: i16 => Sfs "sfs",
    sfe: i16 => Sfe "sfe",
    slen: i16 => Slen "slen",
    styp: i16 => Styp "styp",
    stas: i16 => Stas "stas",
    stae: i16 => Stae "stae",
    tatyp: i16 => Tatyp "tatyp",
    afilf: i16 => Afilf "afilf",
    afils: i16 => Afils "afils",
    nofilf: i16 => Nofilf "nofilf",
    nofils: i16 => Nofils "nofils",
    lcf: i16 => Lcf "lcf",
    hcf: i16 => Hcf "hcf",
    lcs: i16 => Lcs "lcs",
    hcs: i16 => Hcs "hcs",
    year: i16 => Year "year",
    day: i16 => Day "day",
    hour: i16 => Hour "hour",
    minute: i16 => Minute "minute",
    sec: i16 => Sec "sec",
    timebas: i16 => Timebas "timebas",
    trwf: i16 => Trwf "trwf",
    grnors: i16 => Grnors "grnors",
    grnofr: i16 => Grnofr "grnofr",
    grnlof: i16 => Grnlof "grnlof",
    gaps: i16 => Gaps "gaps",
    otrav: i16 => Otrav "otrav",
    /// Sample spacing along the first axis of non time-series traces
    d1: f32 => D1 "d1",
    /// First sample location along the first axis
    f1: f32 => F1 "f1",
    /// Sample spacing along the second axis
    d2: f32 => D2 "d2",
    /// First sample location along the second axis
    f2: f32 => F2 "f2",
    ungpow: f32 => Ungpow "ungpow",
    unscale: f32 => Unscale "unscale",
    ntr: i32 => Ntr "ntr",
    mark: i16 => Mark "mark",
    shortpad: i16 => Shortpad "shortpad",
    unassigned_int1: i32 => UnassignedInt1 "unassignedInt1",
    unassigned_int2: i32 => UnassignedInt2 "unassignedInt2",
    unassigned_int3: i32 => UnassignedInt3 "unassignedInt3",
    unassigned_int4: i32 => UnassignedInt4 "unassignedInt4",
    unassigned_float1: f32 => UnassignedFloat1 "unassignedFloat1",
    unassigned_float2: f32 => UnassignedFloat2 "unassignedFloat2",
    unassigned_float3: f32 => UnassignedFloat3 "unassignedFloat3",
}

impl HeaderKey {
    /// Fields scaled by `scalco`
    pub fn is_coordinate(self) -> bool {
        matches!(
            self,
            HeaderKey::Sx | HeaderKey::Sy | HeaderKey::Gx | HeaderKey::Gy
        )
    }

    /// Fields scaled by `scalel`
    pub fn is_elevation(self) -> bool {
        matches!(
            self,
            HeaderKey::Gelev
                | HeaderKey::Selev
                | HeaderKey::Sdepth
                | HeaderKey::Gdel
                | HeaderKey::Sdel
                | HeaderKey::Swdep
                | HeaderKey::Gwdep
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::{BigEndian, NativeEndian};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn layout_is_240_bytes() {
        assert_eq!(HeaderKey::ALL.len(), 87);
        let total: usize = HeaderKey::ALL.iter().map(|k| k.field_type().width()).sum();
        assert_eq!(total, HEADER_LEN);

        let mut buf = Vec::new();
        TraceHeader::default()
            .write_to::<NativeEndian, _>(&mut buf)
            .unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
    }

    #[test]
    fn field_offsets() {
        let h = TraceHeader {
            tracl: 7,
            ns: 0x0102,
            dt: 0x0304,
            scalco: -100,
            unassigned_float3: 1.5,
            ..Default::default()
        };
        let mut buf = Vec::new();
        h.write_to::<BigEndian, _>(&mut buf).unwrap();
        assert_eq!(&buf[0..4], &[0, 0, 0, 7]);
        assert_eq!(&buf[70..72], &(-100_i16).to_be_bytes());
        assert_eq!(&buf[114..118], &[1, 2, 3, 4]);
        assert_eq!(&buf[236..240], &1.5_f32.to_be_bytes());

        let back = TraceHeader::read_from::<BigEndian, _>(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn checked_setter() {
        let mut h = TraceHeader::default();
        h.set(HeaderKey::Ns, 65535.0).unwrap();
        assert_eq!(h.ns, 65535);

        let err = h.set(HeaderKey::Ns, 65536.0).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldOverflow {
                field: HeaderKey::Ns,
                ..
            }
        ));
        assert_eq!(h.ns, 65535);

        assert!(h.set(HeaderKey::Dt, -1.0).is_err());
        assert!(h.set(HeaderKey::Scalco, 40000.0).is_err());
        assert!(h.set(HeaderKey::Gx, f64::NAN).is_err());

        h.set(HeaderKey::Gx, 999.6).unwrap();
        assert_eq!(h.get(HeaderKey::Gx), 1000.0);
        h.set(HeaderKey::D1, 0.25).unwrap();
        assert_eq!(h.d1, 0.25);
    }

    #[test]
    fn keys_by_name() {
        assert_eq!("tracf".parse::<HeaderKey>().unwrap(), HeaderKey::Tracf);
        assert_eq!(
            "unassignedInt2".parse::<HeaderKey>().unwrap(),
            HeaderKey::UnassignedInt2
        );
        assert!("TRACF".parse::<HeaderKey>().is_err());
        for k in HeaderKey::ALL {
            assert_eq!(k.name().parse::<HeaderKey>().unwrap(), *k);
            assert_eq!(k.to_string(), k.name());
        }
    }
}
