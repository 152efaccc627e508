use anyhow::Result;
use recordcodec::testing::stdin_bytes;
use recordcodec::{Clean, DecodeOptions, Decoder, FieldCleaner, Record, RecordSequence};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn record(v: Value) -> Record {
    match v {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn nulls_and_blanks_are_removed_at_every_depth() {
    let input = vec![record(json!({
        "a": "x",
        "b": null,
        "c": " \t",
        "nested": {"d": null, "e": "", "f": 0},
        "list": [{"g": null, "h": "y"}, null, ""]
    }))];

    let out = FieldCleaner.clean(input, true, true);
    assert_eq!(
        Value::Object(out[0].clone()),
        json!({"a": "x", "nested": {"f": 0}, "list": [{"h": "y"}, null, ""]})
    );
}

#[test]
fn each_flag_alone() {
    let input = || vec![record(json!({"a": null, "b": "", "c": false}))];

    let no_nulls = FieldCleaner.clean(input(), true, false);
    assert_eq!(Value::Object(no_nulls[0].clone()), json!({"b": "", "c": false}));

    let no_blanks = FieldCleaner.clean(input(), false, true);
    assert_eq!(Value::Object(no_blanks[0].clone()), json!({"a": null, "c": false}));

    let untouched = FieldCleaner.clean(input(), false, false);
    assert_eq!(untouched, input());
}

#[test]
fn records_are_never_dropped() {
    let input = vec![record(json!({"a": null})), record(json!({"b": "  "}))];
    let out = FieldCleaner.clean(input, true, true);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(Record::is_empty));
}

#[derive(Default)]
struct CountingCleaner {
    calls: Arc<AtomicUsize>,
}

impl Clean for CountingCleaner {
    fn clean(&self, records: RecordSequence, drop_nulls: bool, drop_blanks: bool) -> RecordSequence {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FieldCleaner.clean(records, drop_nulls, drop_blanks)
    }
}

#[test]
fn decoder_cleans_once_and_only_when_asked() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let decoder = Decoder::builder()
        .stdin(stdin_bytes(b"{\"a\":null}\n{\"a\":1}\n{\"a\":\"\"}\n".to_vec()))
        .cleaner(CountingCleaner {
            calls: Arc::clone(&calls),
        })
        .build();

    let plain = decoder.decode("-", &DecodeOptions::new("jsonl"))?;
    assert_eq!(plain.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let cleaned = decoder.decode(
        "-",
        &DecodeOptions::new("jsonl")
            .with_drop_nulls(true)
            .with_drop_blanks(true),
    )?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        cleaned.into_iter().map(Value::Object).collect::<Vec<_>>(),
        vec![json!({}), json!({"a": 1}), json!({})]
    );
    Ok(())
}
