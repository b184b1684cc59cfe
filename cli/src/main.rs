use clap::Parser;
use fitbuddy_cli::app;
use fitbuddy_cli::commands::cli;
use fitbuddy_core::api as core_api;
use fitbuddy_plugins::services::PluginServicesFactory;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, core_api::CliError> {
    let args = cli::Args::parse();
    let cfg = core_api::load_default().map_err(|e| core_api::CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(core_api::CliError::Command)?;

    let ctx = core_api::AppContext::new(cfg, Arc::new(PluginServicesFactory)).await?;

    let mut events = ctx.state().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let at = event.timestamp();
            match event {
                core_api::StateEvent::SessionChanged {
                    old_phase,
                    new_phase,
                    ..
                } => {
                    tracing::debug!("Session {} -> {} at {}", old_phase, new_phase, at);
                }
                core_api::StateEvent::ItemsChanged {
                    count, offline, ..
                } => {
                    tracing::debug!(
                        "Items loaded (count={}, offline={}) at {}",
                        count,
                        offline,
                        at
                    );
                }
                _ => {}
            }
        }
    });

    let report = app::run_command(args.command, ctx).await?;
    let out = report.render(args.json);
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(0)
}

fn exit_code_for_error(e: &core_api::CliError) -> i32 {
    // 0: success
    // 11: config error
    // 30: invalid input or a command the current screen does not allow
    // 50: internal/uncategorized
    match e {
        core_api::CliError::Config(_) => 11,
        core_api::CliError::Validation(_) => 30,
        core_api::CliError::Command(_) => 30,
        core_api::CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &core_api::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("fitbuddy"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("fitbuddy.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
