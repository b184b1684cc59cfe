//! 会话命令：status / login / register / logout
use crate::app::Driver;
use crate::commands::cli::{LoginArgs, RegisterArgs};
use crate::commands::Report;
use fitbuddy_core::api as core_api;
use serde_json::json;

pub async fn handle_status(driver: &mut Driver) -> Result<Report, core_api::CliError> {
    driver.sync();
    let state = driver.ctx().state().handle();
    let snapshot = state.session().await;
    let favourites = state.favourites().await.len();
    let graph = driver.gate().active().kind;
    let route = driver.gate().current();

    let mut report = Report::new(json!({
        "phase": snapshot.phase.as_str(),
        "user": snapshot.session,
        "favourites": favourites,
        "graph": graph,
        "route": route,
    }));
    report = match &snapshot.session {
        Some(user) => report
            .line(format!("Signed in as {} <{}> (id {})", user.name, user.email, user.id))
            .line(format!("Favourites: {favourites}")),
        None => report.line("Not signed in"),
    };
    Ok(report.line(format!("Screen: {route:?} ({graph:?} graph)")))
}

pub async fn handle_login(
    args: LoginArgs,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Login)?;
    let form = core_api::LoginForm {
        email: args.email,
        password: args.password,
    };
    let session = form.into_session()?;
    sign_in(session, driver).await
}

pub async fn handle_register(
    args: RegisterArgs,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Register)?;
    let form = core_api::RegisterForm {
        name: args.name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
    };
    let session = form.into_session()?;
    sign_in(session, driver).await
}

async fn sign_in(
    session: core_api::Session,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    let phase = driver.ctx().state().login(session.clone()).await;
    driver.sync();
    let favourites = driver.ctx().state().favourites().len().await;
    tracing::info!(target: "fitbuddy.cli", stage = "cli.login", phase = %phase);

    Ok(Report::new(json!({
        "phase": phase.as_str(),
        "user": session,
        "favourites": favourites,
    }))
    .line(format!("Signed in as {} <{}>", session.name, session.email))
    .line(format!("Favourites: {favourites}")))
}

pub async fn handle_logout(driver: &mut Driver) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Profile)?;
    let phase = driver.ctx().state().logout().await;
    driver.sync();
    tracing::info!(target: "fitbuddy.cli", stage = "cli.logout", phase = %phase);
    Ok(Report::new(json!({ "phase": phase.as_str() })).line("Signed out"))
}
