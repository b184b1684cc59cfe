//! Favourites commands
use crate::app::Driver;
use crate::commands::cli::{FavouriteAddArgs, FavouriteRemoveArgs, FavouritesCommand};
use crate::commands::exercises::resolve_exercise;
use crate::commands::Report;
use fitbuddy_core::api as core_api;
use serde_json::json;

pub async fn handle_favourites(
    cmd: FavouritesCommand,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Favourites)?;
    match cmd {
        FavouritesCommand::List => handle_list(driver).await,
        FavouritesCommand::Add(args) => handle_add(args, driver).await,
        FavouritesCommand::Remove(args) => handle_remove(args, driver).await,
    }
}

async fn handle_list(driver: &Driver) -> Result<Report, core_api::CliError> {
    let entries = driver.ctx().state().favourites().list().await;
    let mut report = Report::new(json!({ "favourites": entries }));
    if entries.is_empty() {
        return Ok(report.line("No favourites yet"));
    }
    for entry in &entries {
        report = report.line(format!(
            "{} ({})",
            entry.name,
            entry.muscle.as_deref().unwrap_or("-")
        ));
    }
    Ok(report)
}

async fn handle_add(
    args: FavouriteAddArgs,
    driver: &Driver,
) -> Result<Report, core_api::CliError> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(core_api::CliError::Command(
            "favourite name must not be empty".to_string(),
        ));
    }

    let entry = match resolve_exercise(driver, name).await {
        Some(record) => record,
        None => {
            let record = core_api::ExerciseRecord::named(name);
            match args.muscle {
                Some(muscle) => record.with_muscle(muscle),
                None => record,
            }
        }
    };

    let added = driver.ctx().state().add_favourite(entry.clone()).await;
    let len = driver.ctx().state().favourites().len().await;
    let line = if added {
        format!("Added {} to favourites", entry.name)
    } else {
        format!("{} is already a favourite", entry.name)
    };
    Ok(Report::new(json!({ "added": added, "exercise": entry, "favourites": len })).line(line))
}

async fn handle_remove(
    args: FavouriteRemoveArgs,
    driver: &Driver,
) -> Result<Report, core_api::CliError> {
    let name = args.name.trim();
    let removed = driver.ctx().state().remove_favourite(name).await;
    let len = driver.ctx().state().favourites().len().await;
    let line = if removed > 0 {
        format!("Removed {name} from favourites")
    } else {
        format!("{name} was not a favourite")
    };
    Ok(Report::new(json!({ "removed": removed, "favourites": len })).line(line))
}
