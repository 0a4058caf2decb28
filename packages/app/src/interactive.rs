//! Interactive terminal session.
//!
//! A `dialoguer` menu loop standing in for the map page: each menu action is
//! one user interaction, handled synchronously before the next prompt.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use incident_map_incident_models::{CrimeType, Location, Severity};

use crate::{App, AppError, export_geojson, format_frame};

/// Top-level actions in the session menu.
enum Action {
    ShowMap,
    Report,
    FilterType,
    FilterDate,
    ClearFilters,
    MoveCenter,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowMap,
        Self::Report,
        Self::FilterType,
        Self::FilterDate,
        Self::ClearFilters,
        Self::MoveCenter,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ShowMap => "Show map",
            Self::Report => "Report incident",
            Self::FilterType => "Filter by crime type",
            Self::FilterDate => "Filter by date",
            Self::ClearFilters => "Clear filters",
            Self::MoveCenter => "Move map center",
            Self::Export => "Export visible incidents (GeoJSON)",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// Validation failures are printed inline and the loop continues; only
/// prompt and I/O failures end the session.
///
/// # Errors
///
/// Returns [`AppError`] if a prompt or an export write fails.
pub fn run(app: &mut App) -> Result<(), AppError> {
    println!("Incident Map");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ShowMap => handle_show(app),
            Action::Report => handle_report(app)?,
            Action::FilterType => handle_filter_type(app)?,
            Action::FilterDate => handle_filter_date(app)?,
            Action::ClearFilters => {
                app.clear_filters();
                println!("Filters cleared.");
            }
            Action::MoveCenter => handle_move_center(app)?,
            Action::Export => handle_export(app)?,
            Action::Quit => break,
        }

        println!();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_show(app: &mut App) {
    let frame = app.render();
    print!("{}", format_frame(&frame, app.store().len()));
}

/// Walks through the report form fields, pre-filled with the values kept
/// from the previous report.
fn handle_report(app: &mut App) -> Result<(), AppError> {
    let mut type_labels = vec!["Select Crime Type".to_string()];
    type_labels.extend(CrimeType::all().iter().map(ToString::to_string));

    let current_type = CrimeType::parse_label(app.form().crime_type()).ok();
    let type_default = current_type
        .and_then(|t| CrimeType::all().iter().position(|c| *c == t))
        .map_or(0, |i| i + 1);

    let type_idx = Select::new()
        .with_prompt("Crime type")
        .items(&type_labels)
        .default(type_default)
        .interact()?;

    let severity_labels: Vec<String> = Severity::all().iter().map(ToString::to_string).collect();
    let severity_default = Severity::all()
        .iter()
        .position(|s| *s == app.form().severity())
        .unwrap_or(0);

    let severity_idx = Select::new()
        .with_prompt("Severity")
        .items(&severity_labels)
        .default(severity_default)
        .interact()?;

    let date: String = Input::new()
        .with_prompt("Date (YYYY-MM-DD, blank for none)")
        .with_initial_text(app.form().date())
        .allow_empty(true)
        .interact_text()?;

    let location: String = Input::new()
        .with_prompt("Latitude,Longitude")
        .with_initial_text(app.form().location())
        .allow_empty(true)
        .interact_text()?;

    let description: String = Input::new()
        .with_prompt("Description")
        .with_initial_text(app.form().description())
        .allow_empty(true)
        .interact_text()?;

    let form = app.form_mut();
    form.select_crime_type(type_idx.checked_sub(1).map(|i| CrimeType::all()[i]));
    form.set_severity(Severity::all()[severity_idx]);
    form.set_date(date);
    form.set_location(location);
    form.set_description(description);

    match app.submit_report() {
        Ok(id) => println!("Reported incident #{id}."),
        Err(e) => println!("Not reported: {e}"),
    }

    Ok(())
}

fn handle_filter_type(app: &mut App) -> Result<(), AppError> {
    let options = app.filter_panel().type_options();
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let default = options.iter().position(|o| o.selected).unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Crime type")
        .items(&labels)
        .default(default)
        .interact()?;

    if let Err(e) = app.change_type_filter(&options[idx].value) {
        println!("Filter not changed: {e}");
    }

    Ok(())
}

fn handle_filter_date(app: &mut App) -> Result<(), AppError> {
    let value: String = Input::new()
        .with_prompt("Date (YYYY-MM-DD, blank for all dates)")
        .with_initial_text(app.filter_panel().date_value())
        .allow_empty(true)
        .interact_text()?;

    if let Err(e) = app.change_date_filter(&value) {
        println!("Filter not changed: {e}");
    }

    Ok(())
}

fn handle_move_center(app: &mut App) -> Result<(), AppError> {
    let value: String = Input::new()
        .with_prompt("New center (Latitude,Longitude)")
        .with_initial_text(app.map().center().to_string())
        .interact_text()?;

    match value.parse::<Location>() {
        Ok(center) => {
            app.set_center(center);
            println!("Map centered on {center} ({})", app.map().center_tile_url());
        }
        Err(e) => println!("Center not changed: {e}"),
    }

    Ok(())
}

fn handle_export(app: &mut App) -> Result<(), AppError> {
    let path: String = Input::new()
        .with_prompt("Output file")
        .default("incidents.geojson".to_string())
        .interact_text()?;

    let frame = app.render();
    export_geojson(&frame, &PathBuf::from(path))?;
    println!("Exported {} incident(s).", frame.map.markers.len());

    Ok(())
}
