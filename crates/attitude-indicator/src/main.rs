mod app;
mod config;
mod horizon;

use attitude_engine::logging::{init_logging, LoggingConfig};
use attitude_engine::window::Runtime;

use crate::app::IndicatorApp;
use crate::config::IndicatorConfig;

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run(IndicatorConfig::default()) {
        log::error!("{err:#}");
        std::process::exit(-1);
    }
}

fn run(config: IndicatorConfig) -> anyhow::Result<()> {
    log::info!("arrow keys: pitch and roll, Esc: quit");

    let runtime = config.runtime_config();
    let gpu_init = config.gpu_init();
    Runtime::run(runtime, gpu_init, IndicatorApp::new(config))
}
