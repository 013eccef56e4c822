//! research-demo: decodifica una tarea, la ejecuta con respuestas de
//! muestra e imprime el `TaskResult` resultante junto con su huella.
use chrono::Utc;
use log::info;
use research_kit::config::CONFIG;
use research_kit::sdk::ResultRecord;
use research_kit::session::{load_task, load_task_file, simulate_run, SAMPLE_TASK};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    research_kit::init_logging(&CONFIG);

    let steps = match &CONFIG.task_file {
        Some(path) => load_task_file(path)?,
        None => {
            info!("research-demo: sin RESEARCH_TASK_FILE, usando tarea de muestra");
            load_task(SAMPLE_TASK)?
        }
    };
    let task = simulate_run(&steps, Utc::now())?;
    let json = task.to_json()?;

    let rendered = if CONFIG.pretty_output {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    println!("{rendered}");
    println!("fingerprint: {}", task.fingerprint()?);
    Ok(())
}
