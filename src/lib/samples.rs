//! Resolution of the sample each record belongs to.
//!
//! A record's sample is taken from its `RG` tag via the header's `@RG` line: the `SM` field
//! when present, otherwise the read group identifier itself. Headers without any read group
//! place every record in a single sample named [`UNKNOWN_SAMPLE`].

use ahash::AHashMap;
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;

use crate::errors::{FgreduceError, Result};

/// Sample name used when the header declares no read groups.
pub const UNKNOWN_SAMPLE: &str = "unknown";

/// Maps records to sample names using the header's read groups.
#[derive(Debug, Clone)]
pub struct SampleResolver {
    by_read_group: AHashMap<String, String>,
    samples: Vec<String>,
}

impl SampleResolver {
    /// Builds a resolver from the `@RG` lines of `header`.
    #[must_use]
    pub fn from_header(header: &Header) -> Self {
        let mut by_read_group = AHashMap::new();
        for (id, rg) in header.read_groups() {
            let sample = rg
                .other_fields()
                .get(&rg_tag::SAMPLE)
                .map_or_else(|| id.to_string(), std::string::ToString::to_string);
            by_read_group.insert(id.to_string(), sample);
        }

        let mut samples: Vec<String> = if by_read_group.is_empty() {
            vec![UNKNOWN_SAMPLE.to_string()]
        } else {
            by_read_group.values().cloned().collect()
        };
        samples.sort();
        samples.dedup();

        Self { by_read_group, samples }
    }

    /// The distinct sample names, sorted.
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Returns the sample of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`FgreduceError::ReadGroupNotFound`] if the header declares read groups and the
    /// record's `RG` tag is missing or names an undeclared read group.
    pub fn resolve(&self, record: &RecordBuf) -> Result<&str> {
        if self.by_read_group.is_empty() {
            return Ok(UNKNOWN_SAMPLE);
        }

        let read_group = match record.data().get(&Tag::READ_GROUP) {
            Some(Value::String(id)) => id.to_string(),
            _ => String::new(),
        };
        self.by_read_group.get(&read_group).map(String::as_str).ok_or_else(|| {
            FgreduceError::ReadGroupNotFound {
                read_group,
                read_name: record
                    .name()
                    .map_or_else(|| "<unnamed>".to_string(), std::string::ToString::to_string),
            }
        })
    }
}
