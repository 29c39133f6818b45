// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Parquet encoding of the processed table
//!
//! Records go through `serde_arrow` into a single `RecordBatch` whose
//! schema comes from [`ForArrow`], then into an in-memory Parquet buffer.

use crate::records::FlatRecord;
use crate::{PipelineError, Result};
use arrow::datatypes::{DataType, Field, FieldRef};
use arrow_array::RecordBatch;
use bytes::Bytes;
use parquet::arrow::{ArrowWriter, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Arrow schema of a serializable row type
pub trait ForArrow {
    fn for_arrow() -> Vec<FieldRef>;
}

impl ForArrow for FlatRecord {
    fn for_arrow() -> Vec<FieldRef> {
        let utf8 = |name: &str| Arc::new(Field::new(name, DataType::Utf8, true));
        let int64 = |name: &str| Arc::new(Field::new(name, DataType::Int64, true));
        vec![
            utf8("videoId"),
            utf8("title"),
            utf8("channelTitle"),
            utf8("publishedAt"),
            utf8("categoryId"),
            int64("viewCount"),
            int64("likeCount"),
            int64("commentCount"),
            utf8("duration"),
            utf8("definition"),
            utf8("caption"),
        ]
    }
}

/// Build the record batch for `records`
pub fn records_to_batch(records: &[FlatRecord]) -> Result<RecordBatch> {
    let fields = FlatRecord::for_arrow();
    Ok(serde_arrow::to_record_batch(&fields, &records)?)
}

/// Encode records as one Parquet object
pub fn encode_records(records: &[FlatRecord]) -> Result<Vec<u8>> {
    let batch = records_to_batch(records)?;
    serialize_batch_to_parquet(&batch)
}

/// Decode a Parquet object written by [`encode_records`]
pub fn decode_records(data: Bytes) -> Result<Vec<FlatRecord>> {
    let mut records = Vec::new();
    for batch in read_batches(data)? {
        let mut rows: Vec<FlatRecord> = serde_arrow::from_record_batch(&batch)?;
        records.append(&mut rows);
    }
    Ok(records)
}

/// All record batches of a Parquet object
pub fn read_batches(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    reader
        .map(|batch| batch.map_err(PipelineError::from))
        .collect()
}

fn serialize_batch_to_parquet(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(buffer)
}
