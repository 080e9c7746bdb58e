pub use crate::config::{ConvertConfig, ReadOptions};
pub use crate::descriptor::{Descriptor, DescriptorValue};
pub use crate::error::{DecodeWarning, Error};
pub use crate::header::{HeaderKey, TraceHeader};
pub use crate::opts::ConvertOpts;
pub use crate::samples::{ElementType, Sample, SampleMatrix};
pub use crate::stream::{CreateOptions, Normalization, Stream};
pub use crate::types::{Endianness, LengthUnit, SampleFormat, TimeUnit, TraceType};
