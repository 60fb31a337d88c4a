use clap::Parser;
use std::time::Duration;
use zalo_kit::app::{ClipboardFactory, LinkTool, StickerTool, ZnsTool};
use zalo_kit::config::Command;
use zalo_kit::core::ClipboardSink;
use zalo_kit::utils::error::{ErrorSeverity, ZaloError};
use zalo_kit::utils::logger;
use zalo_kit::{CliConfig, LocalStorage, SystemClipboard, ToolEngine};

fn system_clipboard(hold: Duration) -> zalo_kit::Result<Box<dyn ClipboardSink>> {
    Ok(Box::new(SystemClipboard::new(hold)?))
}

async fn run(cli: CliConfig) -> zalo_kit::Result<Vec<String>> {
    let config = cli.load_toolkit_config()?;

    match cli.command {
        Command::Link(args) => {
            let settings = args.into_settings(&config)?;
            let storage = LocalStorage::new(settings.output_path.clone());
            let clipboard = settings.copy.then_some(system_clipboard as ClipboardFactory);
            ToolEngine::new(LinkTool::new(settings, storage, clipboard))
                .run()
                .await
        }
        Command::Zns(args) => {
            let settings = args.into_settings(&config)?;
            ToolEngine::new(ZnsTool::new(
                settings,
                LocalStorage::new(".".to_string()),
                LocalStorage::new(".".to_string()),
            ))
            .run()
            .await
        }
        Command::Sticker(args) => {
            let settings = args.into_settings(&config)?;
            let output = LocalStorage::new(settings.output_path.clone());
            ToolEngine::new(StickerTool::new(
                settings,
                LocalStorage::new(".".to_string()),
                output,
            ))
            .run()
            .await
        }
    }
}

fn report_failure(e: &ZaloError) {
    tracing::error!(
        "❌ Failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    match run(cli).await {
        Ok(written) => {
            for path in &written {
                println!("📁 {}", path);
            }
        }
        Err(e) => {
            report_failure(&e);

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
