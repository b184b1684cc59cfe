//! Exercise list and details commands
use crate::app::Driver;
use crate::commands::cli::{DetailsArgs, ExercisesArgs};
use crate::commands::Report;
use fitbuddy_core::api as core_api;
use serde_json::json;

/// Look an exercise up by exact name: catalog first, then the built-in list,
/// then the user's favourites. Gateway failures are not fatal here.
pub async fn resolve_exercise(
    driver: &Driver,
    name: &str,
) -> Option<core_api::ExerciseRecord> {
    let catalog = driver.ctx().catalog();
    match catalog.fetch_by_name(name).await {
        Ok(Some(record)) => return Some(record),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                target: "fitbuddy.cli",
                stage = "cli.lookup_failed",
                name = %name,
                error = %e
            );
        }
    }

    if let Some(record) = catalog
        .static_fallback()
        .into_iter()
        .find(|r| r.name == name)
    {
        return Some(record);
    }

    driver.ctx().state().favourites().get(name).await
}

pub async fn handle_exercises(
    args: ExercisesArgs,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Home)?;
    let muscle = args
        .muscle
        .unwrap_or_else(|| driver.ctx().cfg().catalog.default_muscle.clone());

    let state = driver.ctx().state();
    let outcome = state
        .load_exercises(driver.ctx().catalog(), &muscle, args.offset)
        .await;
    let items = state.handle().items().await;
    tracing::debug!(
        target: "fitbuddy.cli",
        stage = "cli.exercises",
        muscle = %muscle,
        count = outcome.count
    );

    let mut rows = Vec::with_capacity(items.items.len());
    let mut lines = Vec::with_capacity(items.items.len() + 1);
    if let Some(notice) = &items.error {
        lines.push(format!("[{notice}]"));
    }
    for item in &items.items {
        let favourite = state.favourites().contains(&item.name).await;
        let marker = if favourite { "*" } else { " " };
        lines.push(format!(
            "{marker} {} ({})",
            item.name,
            item.muscle.as_deref().unwrap_or("-")
        ));
        rows.push(json!({ "exercise": item, "favourite": favourite }));
    }

    let mut report = Report::new(json!({
        "muscle": muscle,
        "offset": args.offset,
        "offline": items.is_offline(),
        "notice": items.error,
        "items": rows,
    }));
    report.lines = lines;
    Ok(report)
}

pub async fn handle_details(
    args: DetailsArgs,
    driver: &mut Driver,
) -> Result<Report, core_api::CliError> {
    driver.enter(core_api::Route::Details)?;
    let result = show_details(&args.name, driver).await;
    driver.leave().await;
    result
}

async fn show_details(name: &str, driver: &Driver) -> Result<Report, core_api::CliError> {
    let record = resolve_exercise(driver, name)
        .await
        .ok_or_else(|| core_api::CliError::Command(format!("exercise not found: {name}")))?;

    let state = driver.ctx().state();
    state.select_item(record.clone()).await;
    let favourite = state.favourites().contains(&record.name).await;

    let mut report = Report::new(json!({ "exercise": record, "favourite": favourite }))
        .line(record.name.clone());
    let fields = [
        ("Type", record.kind.as_deref()),
        ("Muscle", record.muscle.as_deref()),
        ("Equipment", record.equipment.as_deref()),
        ("Difficulty", record.difficulty.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            report = report.line(format!("{label}: {value}"));
        }
    }
    if let Some(instructions) = &record.instructions {
        report = report.line(String::new()).line(instructions.clone());
    }
    Ok(report.line(format!(
        "Favourite: {}",
        if favourite { "yes" } else { "no" }
    )))
}
