//! CLI 应用装配层：恢复会话、驱动导航门，并把命令分发到各个处理函数。
use crate::commands::cli::Commands;
use crate::commands::{exercises, favourites, session, Report};
use fitbuddy_core::api as core_api;
use tokio::sync::broadcast;

/// One command's view of the app: the context plus a navigation gate that
/// follows the session phase.
pub struct Driver {
    ctx: core_api::AppContext,
    gate: core_api::NavigationGate,
    events: broadcast::Receiver<core_api::StateEvent>,
}

impl Driver {
    /// Subscribe before bootstrapping so the gate sees the first phase change.
    pub async fn start(ctx: core_api::AppContext) -> Self {
        let events = ctx.state().subscribe();
        let mut driver = Self {
            ctx,
            gate: core_api::NavigationGate::new(),
            events,
        };
        let phase = driver.ctx.state().bootstrap().await;
        driver.sync();
        // 会话已在本进程内恢复过时不会再发事件
        driver.gate.sync(phase);
        driver
    }

    pub fn ctx(&self) -> &core_api::AppContext {
        &self.ctx
    }

    pub fn gate(&self) -> &core_api::NavigationGate {
        &self.gate
    }

    pub fn sync(&mut self) -> bool {
        self.gate.pump(&mut self.events)
    }

    pub fn enter(&mut self, route: core_api::Route) -> Result<(), core_api::CliError> {
        self.sync();
        self.gate.navigate(route).map_err(|e| {
            let core_api::NavigationError::Unreachable { graph, .. } = &e;
            let hint = match graph {
                core_api::GraphKind::Auth => "not signed in; run `login` or `register` first",
                core_api::GraphKind::Main => "already signed in; run `logout` first",
                core_api::GraphKind::Loading => "session is still loading",
            };
            core_api::CliError::Command(format!("{hint} ({e})"))
        })
    }

    /// Go back one screen; leaving Details drops the selected exercise.
    pub async fn leave(&mut self) {
        if self.gate.back() == Some(core_api::Route::Details) {
            self.ctx.state().clear_selection().await;
        }
    }

    /// Wait for queued writes and report ones that did not make it to disk.
    pub async fn finish(&self) -> u64 {
        self.ctx.state().flush().await;
        let failures = self.ctx.state().persist_failures();
        if failures > 0 {
            tracing::warn!(
                target: "fitbuddy.cli",
                stage = "cli.persist_failures",
                failures = failures
            );
        }
        failures
    }
}

#[tracing::instrument(name = "cli.run_command", skip(cmd, ctx))]
pub async fn run_command(
    cmd: Commands,
    ctx: core_api::AppContext,
) -> Result<Report, core_api::CliError> {
    let mut driver = Driver::start(ctx).await;
    let result = dispatch(cmd, &mut driver).await;
    let failures = driver.finish().await;
    let report = result?;
    if failures > 0 {
        return Ok(report.line(format!(
            "warning: {failures} change(s) could not be saved and will be lost on exit"
        )));
    }
    Ok(report)
}

async fn dispatch(cmd: Commands, driver: &mut Driver) -> Result<Report, core_api::CliError> {
    match cmd {
        Commands::Status => session::handle_status(driver).await,
        Commands::Login(args) => session::handle_login(args, driver).await,
        Commands::Register(args) => session::handle_register(args, driver).await,
        Commands::Logout => session::handle_logout(driver).await,
        Commands::Exercises(args) => exercises::handle_exercises(args, driver).await,
        Commands::Details(args) => exercises::handle_details(args, driver).await,
        Commands::Favourites(cmd) => favourites::handle_favourites(cmd, driver).await,
    }
}
