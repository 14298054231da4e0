use std::{env, sync::Once};

use student_api::{
    config,
    students::Student,
    summary::{CommandSummaryGenerator, SummaryGenerator},
};

static INIT: Once = Once::new();

fn set_default_env(key: &str, value: &str) {
    let needs_value = env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true);
    if needs_value {
        // SAFETY: Tests run serially via Once and we intentionally mutate process env.
        unsafe {
            env::set_var(key, value);
        }
    }
}

fn init_env_once() {
    INIT.call_once(|| {
        set_default_env("OLLAMA_COMMAND", "ollama");
        set_default_env("OLLAMA_MODEL", "llama3:latest");
        set_default_env("OLLAMA_API_URL", "http://127.0.0.1:11434");
    });
}

#[tokio::test]
#[ignore = "Requires a local Ollama install with the configured model pulled"]
async fn live_ollama_summary_roundtrip() {
    init_env_once();
    let settings = config::init_config().expect("configuration");
    let generator = CommandSummaryGenerator::new(settings.summary);
    let student = Student {
        id: 1,
        name: "Ana".into(),
        age: 20,
        email: "ana@x.com".into(),
    };

    let summary = generator
        .generate(&student)
        .await
        .expect("failed to generate summary with the local runner");
    assert!(!summary.is_empty(), "summary should not be empty");
    assert!(!summary.contains('\x1B'), "escape sequences must be stripped");
    assert!(!summary.contains('\n'), "newlines must be stripped");
}
