//! Form data source: section layout, index conversion, selection rules and
//! the collection result handed to the task result.

use chrono::{TimeZone, Utc};
use research_adapters::{preferred_ui_hint, FormDataSource, FormItem, IndexPath};
use research_domain::{AnswerValue, Choice, DomainError, FormDataType, FormUiStep, InputField, InputUiHint, UiStepBase};
use research_sdk::{AnswerResult, ResultRecord};

fn survey() -> FormUiStep {
    FormUiStep::builder("about_you").title("About you")
                                    .input_field(InputField::new(FormDataType::String).with_identifier("name"))
                                    .input_field(InputField::new(FormDataType::Integer).with_identifier("age")
                                                                                        .optional())
                                    .input_field(InputField::choice("mood",
                                                                    FormDataType::SingleChoice,
                                                                    vec![Choice::new("good", "Good"),
                                                                         Choice::new("bad", "Bad")])
                                                 .with_prompt("How do you feel?")
                                                 .with_prompt_detail("Pick one"))
                                    .input_field(InputField::choice("symptoms",
                                                                    FormDataType::MultipleChoice,
                                                                    vec![Choice::new("cough", "Cough"),
                                                                         Choice::new("fever", "Fever"),
                                                                         Choice::new("none", "None of these").exclusive()]))
                                    .input_field(InputField::new(FormDataType::Boolean).with_identifier("consent"))
                                    .build()
                                    .unwrap()
}

#[test]
fn sections_follow_exclusivity_rules() {
    let source = FormDataSource::new(&survey());
    let sections = source.sections();
    // name+age share a section, each choice group is exclusive, consent opens a new one
    assert_eq!(sections.len(), 4);
    assert_eq!(sections.iter().map(|s| s.row_count).collect::<Vec<_>>(), vec![2, 2, 3, 1]);
    assert_eq!(sections[1].title.as_deref(), Some("How do you feel?"));
    assert_eq!(sections[1].subtitle.as_deref(), Some("Pick one"));
    assert!(sections[1].exclusive);
    assert!(!sections[3].exclusive);
    assert_eq!(source.item_count(), 8);
    assert_eq!(source.item_groups().len(), 5);
}

#[test]
fn index_conversion_roundtrips_and_rejects_out_of_range() {
    let source = FormDataSource::new(&survey());
    for flat in 0..source.item_count() {
        let path = source.index_path(flat).unwrap();
        assert_eq!(source.flat_index(path), Some(flat));
        assert!(source.item(flat).is_some());
    }
    assert_eq!(source.index_path(3), Some(IndexPath::new(1, 1)));
    assert_eq!(source.index_path(8), None);
    assert!(source.item(99).is_none());
    assert_eq!(source.flat_index(IndexPath::new(0, 2)), None);
    assert_eq!(source.flat_index(IndexPath::new(7, 0)), None);
}

#[test]
fn items_carry_field_and_choice_identity() {
    let source = FormDataSource::new(&survey());
    assert_eq!(source.item(0).map(FormItem::identifier), Some("name"));
    match source.item(6) {
        Some(FormItem::Choice(item)) => {
            assert_eq!(item.identifier, "symptoms.2");
            assert!(item.choice.is_exclusive());
            assert_eq!(item.index_path, IndexPath::new(2, 2));
        }
        other => panic!("expected choice item, got {other:?}"),
    }
}

#[test]
fn single_choice_deselects_siblings() {
    let mut source = FormDataSource::new(&survey());
    let first = source.select_choice(IndexPath::new(1, 0), true).unwrap();
    assert!(!first.reload);
    let second = source.select_choice(IndexPath::new(1, 1), true).unwrap();
    assert!(second.is_selected);
    assert!(second.reload);
    assert_eq!(source.item_group_for_field("mood").and_then(|g| g.answer()), Some(&AnswerValue::from("bad")));
}

#[test]
fn exclusive_choice_clears_others_and_vice_versa() {
    let mut source = FormDataSource::new(&survey());
    source.select_choice(IndexPath::new(2, 0), true).unwrap();
    source.select_choice(IndexPath::new(2, 1), true).unwrap();
    let symptoms = || source.item_group_for_field("symptoms").and_then(|g| g.answer()).cloned();
    assert_eq!(symptoms(), Some(AnswerValue::List(vec!["cough".into(), "fever".into()])));

    let outcome = source.select_choice(IndexPath::new(2, 2), true).unwrap();
    assert!(outcome.reload);
    assert_eq!(source.item_group_for_field("symptoms").and_then(|g| g.answer()),
               Some(&AnswerValue::List(vec!["none".into()])));

    let outcome = source.select_choice(IndexPath::new(2, 0), true).unwrap();
    assert!(outcome.reload);
    assert_eq!(source.item_group_for_field("symptoms").and_then(|g| g.answer()),
               Some(&AnswerValue::List(vec!["cough".into()])));

    source.select_choice(IndexPath::new(2, 0), false).unwrap();
    assert_eq!(source.item_group_for_field("symptoms").and_then(|g| g.answer()), None);
}

#[test]
fn selection_and_answers_reject_wrong_targets() {
    let mut source = FormDataSource::new(&survey());
    assert!(matches!(source.select_choice(IndexPath::new(0, 0), true), Err(DomainError::InvalidArgument(_))));
    assert!(matches!(source.select_choice(IndexPath::new(9, 0), true), Err(DomainError::InvalidArgument(_))));
    assert!(matches!(source.set_answer("mood", "good"), Err(DomainError::InvalidArgument(_))));
    assert!(matches!(source.set_answer("missing", 1i64), Err(DomainError::InvalidArgument(_))));
}

#[test]
fn required_fields_gate_validity() {
    let mut source = FormDataSource::new(&survey());
    assert!(!source.all_answers_valid());
    source.set_answer("name", "Ada").unwrap();
    source.set_answer("consent", true).unwrap();
    source.select_choice(IndexPath::new(1, 0), true).unwrap();
    assert!(!source.all_answers_valid());
    source.select_choice(IndexPath::new(2, 1), true).unwrap();
    // age is optional
    assert!(source.all_answers_valid());
    source.clear_answer("consent").unwrap();
    assert!(!source.all_answers_valid());
}

#[test]
fn collection_result_lists_answered_fields_in_order() {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let end = Utc.timestamp_opt(1_700_000_090, 0).unwrap();
    let mut source = FormDataSource::new(&survey());
    source.set_answer("consent", true).unwrap();
    source.set_answer("name", "Ada").unwrap();
    source.select_choice(IndexPath::new(1, 0), true).unwrap();

    let collection = source.collection_result(start, end).unwrap();
    assert_eq!(collection.identifier(), Some("about_you"));
    let ids: Vec<_> = collection.input_results().iter().map(|r| r.identifier()).collect();
    assert_eq!(ids, vec![Some("name"), Some("mood"), Some("consent")]);

    let mood = collection.find("mood").and_then(|r| r.downcast_ref::<AnswerResult<AnswerValue>>()).unwrap();
    assert_eq!(mood.answer(), &AnswerValue::from("good"));
    assert_eq!(mood.start_date(), start);
    assert!(collection.find("age").is_none());
}

#[test]
fn non_form_step_yields_empty_source() {
    let step = UiStepBase::builder("intro").title("Welcome").build().unwrap();
    let source = FormDataSource::new(&step);
    assert_eq!(source.step_identifier(), step.identifier());
    assert!(source.sections().is_empty());
    assert_eq!(source.item_count(), 0);
    assert!(source.all_answers_valid());
}

#[test]
fn ui_hint_falls_back_by_field_kind() {
    let text = InputField::new(FormDataType::Date);
    let choice = InputField::choice("c", FormDataType::SingleChoice, vec![Choice::new(1i64, "one")]);
    assert_eq!(preferred_ui_hint(&text), InputUiHint::TEXTFIELD);
    assert_eq!(preferred_ui_hint(&choice), InputUiHint::LIST);
    assert_eq!(preferred_ui_hint(&choice.clone().with_ui_hint("radioButton")), InputUiHint::RADIO_BUTTON);
    assert_eq!(preferred_ui_hint(&choice.with_ui_hint("carousel")), InputUiHint::LIST);
    assert_eq!(preferred_ui_hint(&text.with_ui_hint("picker")), InputUiHint::PICKER);
}

#[test]
fn unidentified_fields_use_their_position() {
    let step = FormUiStep::builder("f").input_field(InputField::new(FormDataType::Decimal))
                                       .input_field(InputField::new(FormDataType::String))
                                       .build()
                                       .unwrap();
    let mut source = FormDataSource::new(&step);
    source.set_answer("1", "free text").unwrap();
    assert_eq!(source.answers().get("1"), Some(&&AnswerValue::from("free text")));
    assert_eq!(source.answers().len(), 1);
}
