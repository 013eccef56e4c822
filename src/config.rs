//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) con el nivel de log, la tarea a cargar y el formato de salida.
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

pub const LOG_LEVEL_VAR: &str = "RESEARCH_LOG_LEVEL";
pub const TASK_FILE_VAR: &str = "RESEARCH_TASK_FILE";
pub const PRETTY_OUTPUT_VAR: &str = "RESEARCH_PRETTY_OUTPUT";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Filtro para `env_logger` (`info` por defecto).
    pub log_level: String,
    /// Definición de tarea (arreglo JSON de pasos); sin valor se usa la
    /// tarea de muestra embebida.
    pub task_file: Option<PathBuf>,
    /// JSON indentado en la salida.
    pub pretty_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { log_level: "info".to_string(),
                    task_file: None,
                    pretty_output: true }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda; los
    /// valores vacíos o inválidos caen en el valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let defaults = AppConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        AppConfig { log_level: non_empty(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
                    task_file: non_empty(TASK_FILE_VAR).map(PathBuf::from),
                    pretty_output: non_empty(PRETTY_OUTPUT_VAR).and_then(|v| parse_flag(&v))
                                                               .unwrap_or(defaults.pretty_output) }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
