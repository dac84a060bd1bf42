//! Structured time-series points produced by the mapper.

use crate::error::MappingError;
use crate::schema::ValueType;
use serde::Serialize;

/// Sentinel the log format uses for "no value".
pub const NO_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measure {
    pub name: String,
    pub value_type: ValueType,
    pub value: String,
}

impl Measure {
    pub fn new(name: impl Into<String>, value_type: ValueType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type,
            value: value.into(),
        }
    }
}

/// One multi-measure point: dimensions, measures and a millisecond timestamp.
///
/// Dimension names are unique, as are measure names. Entries keep the order in
/// which their fields appeared in the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedRecord {
    pub dimensions: Vec<Dimension>,
    pub measures: Vec<Measure>,
    pub timestamp_millis: i64,
}

impl MappedRecord {
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name == name)
    }

    /// Timestamp in the store's string encoding.
    pub fn time(&self) -> String {
        self.timestamp_millis.to_string()
    }
}

/// Accumulates entries for one line while the mapper walks the schema.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    dimensions: Vec<Dimension>,
    measures: Vec<Measure>,
    timestamp_millis: Option<i64>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension; a repeated name overwrites the earlier value in place.
    pub fn dimension(&mut self, dimension: Dimension) {
        match self.dimensions.iter_mut().find(|d| d.name == dimension.name) {
            Some(existing) => existing.value = dimension.value,
            None => self.dimensions.push(dimension),
        }
    }

    /// Add a measure unless its value is the "no value" sentinel.
    pub fn measure(&mut self, measure: Measure) {
        if measure.value == NO_VALUE {
            return;
        }
        match self.measures.iter_mut().find(|m| m.name == measure.name) {
            Some(existing) => *existing = measure,
            None => self.measures.push(measure),
        }
    }

    pub fn timestamp_millis(&mut self, millis: i64) {
        self.timestamp_millis = Some(millis);
    }

    pub fn has_timestamp(&self) -> bool {
        self.timestamp_millis.is_some()
    }

    pub fn finish(self) -> Result<MappedRecord, MappingError> {
        let timestamp_millis = self.timestamp_millis.ok_or(MappingError::MissingTimestamp)?;
        Ok(MappedRecord {
            dimensions: self.dimensions,
            measures: self.measures,
            timestamp_millis,
        })
    }
}
