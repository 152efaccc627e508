#![cfg(feature = "io-parquet")]

use anyhow::Result;
use arrow::datatypes::{DataType, Field, Schema};
use recordcodec::testing::{fake_remote, parquet_bytes, stdin_bytes, write_parquet_fixture};
use recordcodec::{
    Compression, DecodeError, DecodeOptions, Decoder, FilterOp, Filters, Format, LocalFs,
    Predicate, RecordSequence, decode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Reading {
    id: i64,
    city: String,
    temp: f64,
}

fn readings() -> Vec<Reading> {
    vec![
        Reading {
            id: 1,
            city: "Oslo".into(),
            temp: -3.5,
        },
        Reading {
            id: 2,
            city: "Rome".into(),
            temp: 14.5,
        },
        Reading {
            id: 3,
            city: "Lima".into(),
            temp: 19.25,
        },
    ]
}

fn rows(records: &RecordSequence) -> Vec<Value> {
    records.iter().cloned().map(Value::Object).collect()
}

fn ids(records: &RecordSequence) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

#[test]
fn local_file_rows_in_field_order() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    assert_eq!(write_parquet_fixture(&path, &readings())?, 3);

    let records = decode(&path.to_string_lossy(), &DecodeOptions::new("parquet"))?;
    assert_eq!(
        rows(&records),
        vec![
            json!({"id": 1, "city": "Oslo", "temp": -3.5}),
            json!({"id": 2, "city": "Rome", "temp": 14.5}),
            json!({"id": 3, "city": "Lima", "temp": 19.25}),
        ]
    );
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "city", "temp"]);
    Ok(())
}

#[test]
fn directory_reads_every_parquet_file_in_path_order() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let all = readings();
    write_parquet_fixture(tmp.path().join("part-0.parquet"), &all[..1])?;
    write_parquet_fixture(tmp.path().join("sub/part-1.parquet"), &all[1..])?;
    std::fs::write(tmp.path().join("README.txt"), "not parquet")?;

    let records = decode(&tmp.path().to_string_lossy(), &DecodeOptions::new("parquet"))?;
    assert_eq!(ids(&records), [1, 2, 3]);
    Ok(())
}

#[test]
fn schema_projects_and_casts() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("city", DataType::Utf8, true),
        Field::new("id", DataType::Int32, true),
    ]));
    let options = DecodeOptions::new("parquet").with_schema(schema);
    let records = decode(&path.to_string_lossy(), &options)?;
    assert_eq!(rows(&records)[1], json!({"city": "Rome", "id": 2}));
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["city", "id"]);
    Ok(())
}

#[test]
fn schema_with_missing_column_is_malformed() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;

    let schema = Arc::new(Schema::new(vec![Field::new("humidity", DataType::Float64, true)]));
    let err = decode(
        &path.to_string_lossy(),
        &DecodeOptions::new("parquet").with_schema(schema),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MalformedInput {
            format: Format::Parquet,
            ..
        }
    ));
    Ok(())
}

#[test]
fn conjunction_and_disjunction_filters() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;
    let src = path.to_string_lossy();

    let warm = Filters::all(vec![
        Predicate::new("temp", FilterOp::Gt, 0.0),
        Predicate::new("city", FilterOp::Ne, "Lima"),
    ]);
    let records = decode(&src, &DecodeOptions::new("parquet").with_filters(warm))?;
    assert_eq!(ids(&records), [2]);

    let either = Filters::any(vec![
        vec![Predicate::new("city", FilterOp::Eq, "Oslo")],
        vec![Predicate::new("id", FilterOp::Ge, 3)],
    ]);
    let records = decode(&src, &DecodeOptions::new("parquet").with_filters(either))?;
    assert_eq!(ids(&records), [1, 3]);

    let listed: Filters = serde_json::from_str(r#"[["city", "in", ["Rome", "Lima"]]]"#)?;
    let records = decode(&src, &DecodeOptions::new("parquet").with_filters(listed))?;
    assert_eq!(ids(&records), [2, 3]);
    Ok(())
}

#[test]
fn filter_on_unknown_column_is_malformed() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;

    let filters = Filters::all(vec![Predicate::new("country", FilterOp::Eq, "NO")]);
    let err = decode(
        &path.to_string_lossy(),
        &DecodeOptions::new("parquet").with_filters(filters),
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::MalformedInput { .. }));
    Ok(())
}

#[test]
fn buffer_size_does_not_change_the_result() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;
    let src = path.to_string_lossy();

    let default = decode(&src, &DecodeOptions::new("parquet"))?;
    for size in [0, 1, 2, 4096] {
        let batched = decode(&src, &DecodeOptions::new("parquet").with_buffer_size(size))?;
        assert_eq!(batched, default, "buffer_size {size}");
    }
    Ok(())
}

#[test]
fn transport_compression_is_ignored() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.parquet");
    write_parquet_fixture(&path, &readings())?;

    let options = DecodeOptions::new("parquet").with_compression(Compression::Gzip);
    assert_eq!(decode(&path.to_string_lossy(), &options)?.len(), 3);
    Ok(())
}

#[test]
fn remote_and_stdin_are_buffered() -> Result<()> {
    let bytes = parquet_bytes(&readings())?;
    let options = DecodeOptions::new("parquet");

    let remote = Decoder::builder()
        .filesystem(fake_remote([("lake", "t/readings.parquet", bytes.as_slice())])?)
        .build();
    let from_remote = remote.decode("lake/t/readings.parquet", &options)?;

    let stdin = Decoder::builder().stdin(stdin_bytes(bytes)).build();
    let from_stdin = stdin.decode("-", &options)?;

    assert_eq!(ids(&from_remote), [1, 2, 3]);
    assert_eq!(from_remote, from_stdin);
    Ok(())
}

#[test]
fn remote_prefix_reads_every_parquet_object_in_key_order() -> Result<()> {
    let all = readings();
    let first = parquet_bytes(&all[..1])?;
    let rest = parquet_bytes(&all[1..])?;
    let stray = parquet_bytes(&readings()[2..])?;
    let remote = fake_remote([
        ("lake", "dir/part-1.parquet", rest.as_slice()),
        ("lake", "dir/part-0.parquet", first.as_slice()),
        ("lake", "dir/_SUCCESS", b"".as_slice()),
        ("lake", "dirty/part-9.parquet", stray.as_slice()),
    ])?;
    let decoder = Decoder::builder().filesystem(remote).build();

    let options = DecodeOptions::new("parquet");
    assert_eq!(ids(&decoder.decode("lake/dir", &options)?), [1, 2, 3]);
    assert_eq!(ids(&decoder.decode("lake/dir/", &options)?), [1, 2, 3]);
    assert_eq!(ids(&decoder.decode("lake/dir/part-1.parquet", &options)?), [2, 3]);
    Ok(())
}

#[test]
fn rooted_local_filesystem_reads_a_dataset_directory() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let all = readings();
    write_parquet_fixture(tmp.path().join("ds/b.parquet"), &all[1..])?;
    write_parquet_fixture(tmp.path().join("ds/a.parquet"), &all[..1])?;

    let decoder = Decoder::builder().filesystem(LocalFs::rooted(tmp.path())).build();
    let records = decoder.decode("ds", &DecodeOptions::new("parquet"))?;
    assert_eq!(ids(&records), [1, 2, 3]);
    Ok(())
}

#[test]
fn empty_file_has_no_records() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.parquet");
    write_parquet_fixture::<Reading>(&path, &[])?;
    assert!(decode(&path.to_string_lossy(), &DecodeOptions::new("parquet"))?.is_empty());
    Ok(())
}

#[test]
fn non_parquet_bytes_are_malformed() {
    let decoder = Decoder::builder()
        .stdin(stdin_bytes(b"id,city\n1,Oslo\n".to_vec()))
        .build();
    let err = decoder.decode("-", &DecodeOptions::new("parquet")).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MalformedInput {
            format: Format::Parquet,
            ..
        }
    ));
}

#[test]
fn cleaning_applies_to_parquet_rows() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("blank.parquet");
    let rows = vec![Reading {
        id: 7,
        city: "   ".into(),
        temp: 1.5,
    }];
    write_parquet_fixture(&path, &rows)?;

    let options = DecodeOptions::new("parquet").with_drop_blanks(true);
    let records = decode(&path.to_string_lossy(), &options)?;
    assert_eq!(records[0].get("city"), None);
    assert_eq!(records[0]["id"], json!(7));
    Ok(())
}
