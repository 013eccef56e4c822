//! Carga de definiciones de tarea y ejecución simulada.
//!
//! Una definición de tarea es un arreglo JSON de pasos, decodificado con el
//! registro global de pasos. `simulate_run` recorre los pasos como lo haría
//! un controlador de flujo: cada paso dura `STEP_SECONDS`, los formularios
//! se responden con valores de muestra a través de `FormDataSource` y todo
//! termina en un `TaskResult`.
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use research_adapters::{FormDataSource, FormItem};
use research_domain::{decode_step, AnswerValue, FormDataType, FormUiStep, Step};
use research_sdk::{AnswerResult, ResultBase, ResultRecord, TaskResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::errors::AppError;

/// Tarea de muestra usada cuando no se configura `RESEARCH_TASK_FILE`.
pub const SAMPLE_TASK: &str = include_str!("sample_task.json");

pub const STEP_SECONDS: i64 = 30;

/// Decodifica un arreglo JSON de pasos, en orden.
pub fn load_task(source: &str) -> Result<Vec<Box<dyn Step>>, AppError> {
    let value: Value = serde_json::from_str(source)?;
    let Some(items) = value.as_array() else {
        return Err(AppError::Config("task definition must be a JSON array of steps".into()));
    };
    let steps = items.iter().map(decode_step).collect::<Result<Vec<_>, _>>()?;
    debug!("session:load_task steps={}", steps.len());
    Ok(steps)
}

pub fn load_task_file(path: &Path) -> Result<Vec<Box<dyn Step>>, AppError> {
    info!("session:load_task_file path={}", path.display());
    load_task(&fs::read_to_string(path)?)
}

/// Ejecuta los pasos con respuestas de muestra a partir de `start`.
pub fn simulate_run(steps: &[Box<dyn Step>], start: DateTime<Utc>) -> Result<TaskResult, AppError> {
    let step_duration = Duration::seconds(STEP_SECONDS);
    let mut results: Vec<Box<dyn ResultRecord>> = Vec::with_capacity(steps.len());
    let mut cursor = start;
    for step in steps {
        let end = cursor + step_duration;
        results.push(step_result(&**step, cursor, end)?);
        cursor = end;
    }

    let mut task = TaskResult::new(start, cursor);
    for result in results {
        task.add_step_result(result);
    }
    let duration = AnswerResult::<AnswerValue>::builder().identifier("run_duration_seconds")
                                                         .start_date(start)
                                                         .end_date(cursor)
                                                         .answer((cursor - start).num_seconds())
                                                         .build()?;
    task.add_async_result(Box::new(duration));
    info!("session:simulate_run run={} steps={}", task.task_run_uuid(), task.step_results().len());
    Ok(task)
}

fn step_result(step: &dyn Step,
               start: DateTime<Utc>,
               end: DateTime<Utc>)
               -> Result<Box<dyn ResultRecord>, AppError> {
    if step.step_type() != FormUiStep::TYPE_KEY {
        return Ok(Box::new(ResultBase::identified(step.identifier(), start, end)?));
    }
    let mut source = FormDataSource::new(step);
    let groups: Vec<(String, FormDataType, Option<FormItem>)> =
        source.item_groups()
              .iter()
              .map(|g| (g.identifier().to_string(), g.input_field().data_type(), g.items().first().cloned()))
              .collect();
    for (identifier, data_type, first_item) in groups {
        match (data_type, first_item) {
            (FormDataType::SingleChoice | FormDataType::MultipleChoice, Some(item)) => {
                source.select_choice(item.index_path(), true)?;
            }
            (FormDataType::SingleChoice | FormDataType::MultipleChoice, None) => {}
            (data_type, _) => source.set_answer(&identifier, sample_answer(data_type, start))?,
        }
    }
    debug!("session:step_result form={} complete={}", step.identifier(), source.all_answers_valid());
    Ok(Box::new(source.collection_result(start, end)?))
}

fn sample_answer(data_type: FormDataType, at: DateTime<Utc>) -> AnswerValue {
    match data_type {
        FormDataType::Integer => AnswerValue::Integer(1),
        FormDataType::Decimal => AnswerValue::Decimal(0.5),
        FormDataType::Boolean => AnswerValue::Boolean(true),
        FormDataType::Date => AnswerValue::Date(at),
        _ => AnswerValue::String("sample".to_string()),
    }
}
