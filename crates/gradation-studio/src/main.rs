use std::process::ExitCode;

use gradation_engine::logging::{init_logging, LoggingConfig};
use gradation_ui::{Application, GradientEditorWindow};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let result = Application::new()
        .title("gradation")
        .size(500.0, 50.0)
        .run_widget(|| GradientEditorWindow::new().into());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("gradation failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
