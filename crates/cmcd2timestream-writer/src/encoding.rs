//! Mapped records in the store's multi-measure wire shape.

use aws_sdk_timestreamwrite::types::{
    Dimension, DimensionValueType, MeasureValue, MeasureValueType, Record, TimeUnit,
};
use cmcd2timestream_core::{MappedRecord, ValueType};
use serde::Serialize;

use crate::error::{Result, WriterError};

/// Value type of every submitted record.
pub const MULTI_MEASURE_VALUE_TYPE: &str = "MULTI";
pub const TIME_UNIT: &str = "MILLISECONDS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDimension {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireMeasure {
    pub name: String,
    #[serde(rename = "Type")]
    pub value_type: &'static str,
    pub value: String,
}

/// One record exactly as it is submitted in a write call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRecord {
    pub dimensions: Vec<WireDimension>,
    pub measure_name: String,
    pub measure_values: Vec<WireMeasure>,
    pub measure_value_type: &'static str,
    pub time: String,
    pub time_unit: &'static str,
}

impl WireRecord {
    pub fn from_mapped(record: &MappedRecord, measure_name: &str) -> Self {
        Self {
            dimensions: record
                .dimensions
                .iter()
                .map(|d| WireDimension {
                    name: d.name.clone(),
                    value: d.value.clone(),
                })
                .collect(),
            measure_name: measure_name.to_string(),
            measure_values: record
                .measures
                .iter()
                .map(|m| WireMeasure {
                    name: m.name.clone(),
                    value_type: m.value_type.as_store_type(),
                    value: m.value.clone(),
                })
                .collect(),
            measure_value_type: MULTI_MEASURE_VALUE_TYPE,
            time: record.time(),
            time_unit: TIME_UNIT,
        }
    }
}

fn measure_value_type(value_type: ValueType) -> MeasureValueType {
    match value_type {
        ValueType::Text => MeasureValueType::Varchar,
        ValueType::Integer => MeasureValueType::Bigint,
        ValueType::Float => MeasureValueType::Double,
        ValueType::Boolean => MeasureValueType::Boolean,
        ValueType::Time => MeasureValueType::Timestamp,
    }
}

/// Build the SDK record for the batch-local position `index`.
pub fn encode_record(index: usize, record: &MappedRecord, measure_name: &str) -> Result<Record> {
    let dimensions = record
        .dimensions
        .iter()
        .map(|d| {
            Dimension::builder()
                .name(&d.name)
                .value(&d.value)
                .dimension_value_type(DimensionValueType::Varchar)
                .build()
                .map_err(|e| WriterError::encoding(index, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let measures = record
        .measures
        .iter()
        .map(|m| {
            MeasureValue::builder()
                .name(&m.name)
                .value(&m.value)
                .r#type(measure_value_type(m.value_type))
                .build()
                .map_err(|e| WriterError::encoding(index, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Record::builder()
        .set_dimensions(Some(dimensions))
        .measure_name(measure_name)
        .set_measure_values(Some(measures))
        .measure_value_type(MeasureValueType::Multi)
        .time(record.time())
        .time_unit(TimeUnit::Milliseconds)
        .build())
}

/// Encode every record of a batch, failing on the first that cannot be built.
pub fn encode_records(records: &[MappedRecord], measure_name: &str) -> Result<Vec<Record>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| encode_record(index, record, measure_name))
        .collect()
}
