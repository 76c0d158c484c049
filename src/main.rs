use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use video_audio_extractor::core::report;
use video_audio_extractor::utils::logging::init_tracing;
use video_audio_extractor::{Application, Cli, NAME, VERSION};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return exit_code(e.exit_code());
        }
    };

    init_tracing(&config.log_level);
    info!("🚀 Starting {} v{}", NAME, VERSION);

    report::print_welcome(VERSION);

    let input = match cli.input() {
        Ok(input) => input,
        Err(e) => {
            println!("错误: {}", e);
            report::print_usage_hint();
            return exit_code(e.exit_code());
        }
    };

    let app = Application::new(config);
    match app.run(&input).await {
        // per-item failures were already reported; they do not change the exit status
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            println!("错误: {}", e);
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
