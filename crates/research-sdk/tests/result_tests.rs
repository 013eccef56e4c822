use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use research_domain::{AnswerValue, DomainError};
use research_sdk::hashing::hash_value;
use research_sdk::{decode_result, AnswerResult, CollectionResult, ResultBase, ResultRecord, TaskResult};
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

fn answer(id: &str, value: impl Into<AnswerValue>) -> AnswerResult<AnswerValue> {
    AnswerResult::builder().identifier(id).start_date(t(0)).end_date(t(1)).answer(value).build().unwrap()
}

#[test]
fn step_results_keep_append_order() {
    let mut task = TaskResult::new(t(0), t(60));
    let r1: Box<dyn ResultRecord> = Box::new(answer("q1", "yes"));
    let r2: Box<dyn ResultRecord> = Box::new(answer("q2", 3i64));
    task.add_step_result(r1.clone());
    task.add_step_result(r2.clone());
    assert_eq!(task.step_results(), &[r1, r2]);
}

#[test]
fn each_task_run_gets_its_own_uuid() {
    let a = TaskResult::new(t(0), t(1));
    let b = TaskResult::new(t(0), t(1));
    assert!(!a.task_run_uuid().is_nil());
    assert_ne!(a.task_run_uuid(), b.task_run_uuid());
    // same dates, different run identity
    assert_ne!(a, b);
}

#[test]
fn appending_duplicates_is_allowed_and_latest_wins() {
    let mut task = TaskResult::new(t(0), t(60));
    task.add_step_result(Box::new(answer("q1", "first")));
    task.add_step_result(Box::new(answer("q1", "first")));
    task.add_step_result(Box::new(answer("q1", "corrected")));
    assert_eq!(task.step_results().len(), 3);
    let latest = task.step_result("q1").and_then(|r| r.downcast_ref::<AnswerResult<AnswerValue>>()).unwrap();
    assert_eq!(latest.answer(), &AnswerValue::from("corrected"));
    assert!(task.step_result("missing").is_none());
}

#[test]
fn async_results_are_unique_by_value() {
    let mut task = TaskResult::new(t(0), t(60));
    assert!(task.add_async_result(Box::new(answer("accel", 1.5))));
    assert!(!task.add_async_result(Box::new(answer("accel", 1.5))));
    assert!(task.add_async_result(Box::new(ResultBase::new(t(0), t(1)))));
    assert_eq!(task.async_results().len(), 2);
}

#[test]
fn answer_equality_tracks_answer_and_metadata() {
    let a = AnswerResult::with_metadata(t(0), t(1), AnswerValue::from(70i64), [("units".to_string(), "kg".into())]);
    let b = AnswerResult::with_metadata(t(0), t(1), AnswerValue::from(70i64), [("units".to_string(), "kg".into())]);
    let other_answer = AnswerResult::with_metadata(t(0), t(1), AnswerValue::from(71i64), [("units".to_string(), "kg".into())]);
    let other_meta = AnswerResult::with_metadata(t(0), t(1), AnswerValue::from(70i64), [("units".to_string(), "lb".into())]);
    let other_dates = AnswerResult::with_metadata(t(0), t(2), AnswerValue::from(70i64), [("units".to_string(), "kg".into())]);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, other_answer);
    assert_ne!(a, other_meta);
    assert_ne!(a, other_dates);
}

#[test]
fn metadata_lookup_returns_stored_value_or_none() {
    let r = AnswerResult::new(t(0), t(1), "42".to_string());
    assert_eq!(r.answer(), "42");
    assert_eq!(r.metadata("units"), None);

    let r = AnswerResult::with_metadata(t(0), t(1), "42".to_string(), [("units".to_string(), "years".to_string())]);
    assert_eq!(r.metadata("units").map(String::as_str), Some("years"));
    assert_eq!(r.metadata("raw"), None);
}

#[test]
fn result_variants_with_same_base_are_not_equal() {
    let base: Box<dyn ResultRecord> = Box::new(ResultBase::identified("x", t(0), t(1)).unwrap());
    let collection: Box<dyn ResultRecord> = Box::new(CollectionResult::new("x", t(0), t(1), vec![]).unwrap());
    assert_eq!(base.base(), collection.base());
    assert_ne!(*base, *collection);
}

#[test]
fn task_result_roundtrips_through_registry() -> Result<(), DomainError> {
    let mut form = CollectionResult::new("form1", t(0), t(30), vec![])?;
    form.append_input_result(Box::new(answer("name", "Ada")));
    form.append_input_result(Box::new(answer("tags", AnswerValue::List(vec!["a".into(), true.into()]))));

    let mut task = TaskResult::new(t(0), t(90));
    task.add_step_result(Box::new(ResultBase::identified("intro", t(0), t(5))?));
    task.add_step_result(Box::new(form));
    task.add_step_result(Box::new(answer("when", AnswerValue::Date(t(40)))));
    task.add_async_result(Box::new(answer("steps", 1200i64)));
    task.add_async_result(Box::new(answer("heart", 71.5)));

    let json = task.to_json()?;
    assert_eq!(json["type"], json!("task"));
    assert_eq!(json["taskRunUUID"], json!(task.task_run_uuid().to_string()));

    let decoded = decode_result(&json)?;
    let decoded_task = decoded.downcast_ref::<TaskResult>().expect("task result");
    assert_eq!(decoded_task, &task);
    assert_eq!(hash_of(decoded_task), hash_of(&task));
    Ok(())
}

#[test]
fn full_precision_decimal_survives_text_roundtrip() -> Result<(), DomainError> {
    let mut task = TaskResult::new(t(0), t(10));
    task.add_step_result(Box::new(answer("weight", 985.6906946328695)));
    task.add_async_result(Box::new(answer("ratio", 0.1 + 0.2)));

    let text = serde_json::to_string(&task.to_json()?).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let decoded = decode_result(&reparsed)?;
    let decoded_task = decoded.downcast_ref::<TaskResult>().expect("task result");
    assert_eq!(decoded_task, &task);
    assert_eq!(decoded_task.fingerprint()?, task.fingerprint()?);
    Ok(())
}

#[test]
fn typed_answers_are_stored_through_answer_value() -> Result<(), DomainError> {
    let typed = AnswerResult::with_metadata(t(0), t(1), "42".to_string(), [("units".to_string(), "years".to_string())]);
    let mut task = TaskResult::new(t(0), t(10));
    task.add_step_result(Box::new(typed.into_answer_value()));

    let decoded = decode_result(&task.to_json()?)?;
    assert_eq!(decoded.downcast_ref::<TaskResult>(), Some(&task));
    let stored = task.step_results()[0].downcast_ref::<AnswerResult<AnswerValue>>().unwrap();
    assert_eq!(stored.answer(), &AnswerValue::from("42"));
    assert_eq!(stored.metadata("units"), Some(&AnswerValue::from("years")));
    Ok(())
}

#[test]
fn task_display_renders_nested_results() -> Result<(), DomainError> {
    let mut form = CollectionResult::new("form1", t(0), t(30), vec![])?;
    form.append_input_result(Box::new(answer("name", "Ada")));
    let mut task = TaskResult::new(t(0), t(60));
    task.add_step_result(Box::new(answer("q1", "yes")));
    task.add_step_result(Box::new(form));
    task.add_async_result(Box::new(answer("steps", 10i64)));

    let shown = task.to_string();
    assert!(shown.contains("stepResults=[AnswerResult{identifier=Some(\"q1\")"), "{shown}");
    assert!(shown.contains("CollectionResult{identifier=Some(\"form1\")"), "{shown}");
    assert!(shown.contains("inputResults=[AnswerResult{identifier=Some(\"name\")"), "{shown}");
    assert!(shown.contains("asyncResults=[AnswerResult{identifier=Some(\"steps\")"), "{shown}");
    Ok(())
}

#[test]
fn unknown_result_type_is_a_deserialization_error() {
    let err = decode_result(&json!({"type": "video", "startDate": t(0), "endDate": t(1)})).unwrap_err();
    assert!(matches!(err, DomainError::Deserialization(_)));
}

#[test]
fn task_result_requires_run_uuid_when_decoding() {
    let err = decode_result(&json!({"type": "task", "startDate": t(0), "endDate": t(1)})).unwrap_err();
    assert!(matches!(err, DomainError::Deserialization(msg) if msg.contains("taskRunUUID")));
}

#[test]
fn fingerprint_ignores_async_insertion_order() -> Result<(), DomainError> {
    let mut a = TaskResult::new(t(0), t(10));
    a.add_async_result(Box::new(answer("x", 1i64)));
    a.add_async_result(Box::new(answer("y", 2i64)));
    a.add_async_result(Box::new(answer("z", 3i64)));

    let mut json = a.to_json()?;
    let reversed: Vec<_> = json["asyncResults"].as_array().unwrap().iter().rev().cloned().collect();
    json["asyncResults"] = serde_json::Value::Array(reversed);
    let b = decode_result(&json)?;

    assert_eq!(a.fingerprint()?, b.downcast_ref::<TaskResult>().unwrap().fingerprint()?);
    assert_eq!(a.fingerprint()?.len(), 64);
    assert_eq!(a.fingerprint()?, hash_value(&a.to_json()?));
    Ok(())
}

#[test]
fn end_before_start_is_not_rejected() {
    let r = ResultBase::new(t(10), t(0));
    assert!(r.end_date() < r.start_date());
}

proptest! {
    #[test]
    fn appends_preserve_count_and_order(answers in proptest::collection::vec(any::<i64>(), 0..20)) {
        let mut task = TaskResult::new(t(0), t(0) + Duration::seconds(answers.len() as i64));
        for (i, a) in answers.iter().enumerate() {
            task.add_step_result(Box::new(answer(&format!("s{i}"), *a)));
        }
        prop_assert_eq!(task.step_results().len(), answers.len());
        for (i, r) in task.step_results().iter().enumerate() {
            let recorded = r.downcast_ref::<AnswerResult<AnswerValue>>().unwrap();
            prop_assert_eq!(recorded.answer().as_i64(), Some(answers[i]));
            let expected = format!("s{i}");
            prop_assert_eq!(r.identifier(), Some(expected.as_str()));
        }
    }

    #[test]
    fn identical_answers_are_equal_with_equal_hash(text in ".{0,16}", key in "[a-z]{1,6}", meta in ".{0,8}") {
        let a = AnswerResult::with_metadata(t(0), t(1), text.clone(), [(key.clone(), meta.clone())]);
        let b = AnswerResult::with_metadata(t(0), t(1), text, [(key.clone(), meta.clone())]);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a.metadata(&key), Some(&meta));
    }

    #[test]
    fn finite_decimals_keep_their_bits_through_text(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let original = answer("d", value);
        let text = serde_json::to_string(&original.to_json().unwrap()).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let decoded = decode_result(&reparsed).unwrap();
        prop_assert_eq!(decoded.downcast_ref::<AnswerResult<AnswerValue>>(), Some(&original));
    }
}
