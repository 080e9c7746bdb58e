//! SEG-2 free-form descriptor mappings.
//!
//! Each decode builds fresh mappings from the default vocabularies below, so
//! no state is shared between decodes or between traces.

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum DescriptorValue {
    /// Declared by the vocabulary but without a default
    Empty,
    Text(String),
    Texts(Vec<String>),
    Number(f64),
    Numbers(Vec<f64>),
}

impl DescriptorValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DescriptorValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DescriptorValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            DescriptorValue::Numbers(n) => Some(n),
            _ => None,
        }
    }
}

impl From<&str> for DescriptorValue {
    fn from(s: &str) -> Self {
        DescriptorValue::Text(s.to_owned())
    }
}

impl From<f64> for DescriptorValue {
    fn from(n: f64) -> Self {
        DescriptorValue::Number(n)
    }
}

impl From<Vec<f64>> for DescriptorValue {
    fn from(n: Vec<f64>) -> Self {
        DescriptorValue::Numbers(n)
    }
}

/// Key/value metadata from one free-form block.
///
/// Keys are case-sensitive. Keys outside of the vocabulary the mapping was
/// created with are kept verbatim as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Descriptor {
    entries: BTreeMap<String, DescriptorValue>,
}

impl Descriptor {
    /// File descriptor block vocabulary with its defaults.
    pub fn file_defaults() -> Self {
        use DescriptorValue::*;
        Self::from_entries([
            ("ACQUISITION_DATE", Text(String::new())),
            ("ACQUISITION_TIME", Text(String::new())),
            ("CLIENT", Text(String::new())),
            ("COMPANY", Text(String::new())),
            ("GENERAL_CONSTANT", Text(String::new())),
            ("INSTRUMENT", Texts(vec![String::new(); 3])),
            ("JOB_ID", Text(String::new())),
            ("OBSERVER", Text(String::new())),
            ("PROCESSING_DATE", Text(String::new())),
            ("PROCESSING_TIME", Text(String::new())),
            ("TRACE_SORT", Text("AS_ACQUIRED".to_owned())),
            ("UNITS", Text("METERS".to_owned())),
            ("NOTE", Text(String::new())),
        ])
    }

    /// Trace descriptor block vocabulary with its defaults.
    pub fn trace_defaults() -> Self {
        use DescriptorValue::*;
        Self::from_entries([
            ("ALIAS_FILTER", Numbers(vec![0.0, 0.0])),
            ("AMPLITUDE_RECOVERY", Empty),
            ("BAND_REJECT_FILTER", Numbers(vec![0.0; 4])),
            ("CDP_NUMBER", Number(0.0)),
            ("CDP_TRACE", Number(0.0)),
            ("CHANNEL_NUMBER", Number(0.0)),
            ("DATUM", Number(0.0)),
            ("DELAY", Number(0.0)),
            ("DESCALING_FACTOR", Number(0.0)),
            ("DIGITAL_BAND_REJECT_FILTER", Numbers(vec![0.0; 4])),
            ("DIGITAL_HIGH_CUT_FILTER", Numbers(vec![0.0, 0.0])),
            ("DIGITAL_LOW_CUT_FILTER", Numbers(vec![0.0, 0.0])),
            ("END_OF_GROUP", Number(0.0)),
            ("FIXED_GAIN", Empty),
            ("HIGH_CUT_FILTER", Numbers(vec![0.0, 0.0])),
            ("LINE_ID", Empty),
            ("LOW_CUT_FILTER", Numbers(vec![0.0, 0.0])),
            ("NOTCH_FREQUENCY", Number(0.0)),
            ("POLARITY", Number(1.0)),
            ("RAW_RECORD", Empty),
            ("RECEIVER", Empty),
            ("RECEIVER_GEOMETRY", Numbers(vec![0.0])),
            ("RECEIVER_LOCATION", Numbers(vec![0.0])),
            ("RECEIVER_SPECS", Texts(vec![String::new(); 2])),
            ("RECEIVER_STATION_NUMBER", Number(1.0)),
            ("SAMPLE_INTERVAL", Number(1.0)),
            ("SHOT_SEQUENCE_NUMBER", Number(1.0)),
            ("SKEW", Number(0.0)),
            ("SOURCE", Empty),
            ("SOURCE_GEOMETRY", Numbers(vec![0.0])),
            ("SOURCE_LOCATION", Numbers(vec![0.0])),
            ("SOURCE_STATION_NUMBER", Number(1.0)),
            ("STACK", Number(1.0)),
            ("STATIC_CORRECTIONS", Texts(vec![String::new(); 3])),
            ("TRACE_TYPE", Text("UNKNOWN".to_owned())),
            ("NOTE", Text(String::new())),
        ])
    }

    fn from_entries<const N: usize>(entries: [(&str, DescriptorValue); N]) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&DescriptorValue> {
        self.entries.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DescriptorValue::as_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DescriptorValue::as_number)
    }

    pub fn numbers(&self, key: &str) -> Option<&[f64]> {
        self.get(key).and_then(DescriptorValue::as_numbers)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DescriptorValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Stores a raw free-form value shaped like the vocabulary default held
    /// under `key`. A numeric keyword whose value does not parse is kept as
    /// text, keys outside the vocabulary are always text.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: &str) {
        let key = key.into();
        let text = || DescriptorValue::Text(raw.to_owned());
        let value = match self.entries.get(&key) {
            Some(DescriptorValue::Number(_)) => {
                raw.trim().parse().map_or_else(|_| text(), DescriptorValue::Number)
            }
            Some(DescriptorValue::Numbers(_)) => {
                let values = raw
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<Vec<f64>, _>>();
                match values {
                    Ok(v) if !v.is_empty() => DescriptorValue::Numbers(v),
                    _ => text(),
                }
            }
            Some(DescriptorValue::Texts(_)) => {
                DescriptorValue::Texts(raw.split_whitespace().map(str::to_owned).collect())
            }
            _ => text(),
        };
        self.entries.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
