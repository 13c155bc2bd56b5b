//! CLI commands for formbuilder

use anyhow::{bail, Result};

use crate::config::{load_config, save_config, Config, FormbuilderPaths};
use crate::controller::{Action, FormController};
use crate::db::Database;
use crate::models::{Field, FieldType};
use crate::persistence::SnapshotPersistence;
use crate::preview::render_lines;
use crate::tui::TuiApp;
use crate::validation;

/// The controller every command works through
pub type AppController = FormController<SnapshotPersistence<Database>>;

/// Output format for list and preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Initialize formbuilder for first-time setup
pub fn init(paths: &FormbuilderPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Formbuilder is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing formbuilder at {}...", paths.root.display());
    paths.ensure_dirs()?;

    if !paths.config.exists() {
        save_config(paths, &Config::default())?;
        println!("  Created config.toml");
    }

    Database::open(&paths.db_file)?;
    println!("  Created database");

    println!();
    println!("Next steps:");
    println!("  formbuilder add <text|email|number>   Add a field");
    println!("  formbuilder tui                       Open the form builder");

    Ok(())
}

/// Open the persisted form
pub fn open_form(paths: &FormbuilderPaths) -> Result<AppController> {
    paths.ensure_dirs()?;
    let config = load_config(paths)?;
    let db = Database::open(&paths.db_file)?;
    Ok(FormController::new(SnapshotPersistence::new(db, config.storage_key)))
}

/// Launch the interactive builder
pub fn tui(paths: &FormbuilderPaths) -> Result<()> {
    let mut app = TuiApp::new(open_form(paths)?);
    app.run()
}

/// Add a field and print its id
pub fn add(paths: &FormbuilderPaths, field_type: &str) -> Result<String> {
    let field_type = field_type.parse::<FieldType>().map_err(|e| anyhow::anyhow!(e))?;
    let mut form = open_form(paths)?;
    let id = form
        .dispatch(Action::AddField(field_type))
        .ok_or_else(|| anyhow::anyhow!("Field was not added"))?;

    println!("Added {} field: {}", field_type, id);
    Ok(id)
}

/// Set a field's value, reporting the validation result
pub fn set(paths: &FormbuilderPaths, id: &str, value: &str) -> Result<()> {
    let mut form = open_form(paths)?;
    let id = resolve_id(form.fields(), id)?;
    form.dispatch(Action::Edit {
        id: id.clone(),
        value: value.to_string(),
    });

    if let Some(field) = form.store().get(&id) {
        match field.error() {
            None => println!("✓ {} = {:?}", short_id(&field.id), field.value()),
            Some(error) => println!("✗ {} = {:?}: {}", short_id(&field.id), field.value(), error),
        }
    }
    Ok(())
}

/// Remove a field
pub fn remove(paths: &FormbuilderPaths, id: &str) -> Result<()> {
    let mut form = open_form(paths)?;
    let id = resolve_id(form.fields(), id)?;
    form.dispatch(Action::RemoveField(id.clone()));
    println!("Removed field {}", short_id(&id));
    Ok(())
}

/// List fields with their validation state
pub fn list(paths: &FormbuilderPaths, format: OutputFormat) -> Result<()> {
    let form = open_form(paths)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(form.fields())?);
        }
        OutputFormat::Summary => {
            if form.fields().is_empty() {
                println!("No fields.");
                println!("Add one with: formbuilder add <text|email|number>");
                return Ok(());
            }

            println!("{:<10} {:<8} {:<30} {}", "ID", "TYPE", "VALUE", "ERROR");
            println!("{}", "-".repeat(70));
            for field in form.fields() {
                println!(
                    "{:<10} {:<8} {:<30} {}",
                    short_id(&field.id),
                    field.field_type(),
                    truncate(field.value(), 28),
                    field.error().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

/// Submit: show the preview regardless of validation state
pub fn preview(paths: &FormbuilderPaths, format: OutputFormat) -> Result<()> {
    let mut form = open_form(paths)?;
    form.dispatch(Action::Submit);
    let entries = form.preview().unwrap_or_default();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Summary => {
            println!("Form Preview");
            for line in render_lines(form.fields()) {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}

/// Wipe the form and its persisted state
pub fn clear(paths: &FormbuilderPaths) -> Result<()> {
    let mut form = open_form(paths)?;
    let count = form.fields().len();
    form.dispatch(Action::Clear);
    println!("Cleared {} field(s)", count);
    Ok(())
}

/// Run the validator without touching the form
pub fn check(field_type: &str, value: &str) -> Result<()> {
    let field_type = field_type.parse::<FieldType>().map_err(|e| anyhow::anyhow!(e))?;
    match validation::validate(field_type, value) {
        Ok(()) => println!("✓ valid {}", field_type),
        Err(e) => bail!("{}", e),
    }
    Ok(())
}

/// Resolve a full id or a unique id prefix
pub fn resolve_id(fields: &[Field], id: &str) -> Result<String> {
    if let Some(field) = fields.iter().find(|f| f.id == id) {
        return Ok(field.id.clone());
    }

    let matches: Vec<&Field> = fields.iter().filter(|f| f.id.starts_with(id)).collect();
    match matches.as_slice() {
        [field] if !id.is_empty() => Ok(field.id.clone()),
        [] | [_] => bail!("Field not found: {}", id),
        _ => bail!("Ambiguous field id {}: matches {} fields", id, matches.len()),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
