// Unit tests for the TUI form builder
// Tests key handling, selection, live editing and rendering

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formbuilder::controller::FormController;
use formbuilder::db::Database;
use formbuilder::models::FieldType;
use formbuilder::persistence::SnapshotPersistence;
use formbuilder::store::FormStore;
use formbuilder::tui::{QuietPanics, TuiApp};
use formbuilder::validation::ValidationError;
use ratatui::{backend::TestBackend, Terminal};

type App = TuiApp<SnapshotPersistence<Database>>;

fn app() -> App {
    let db = Database::open_in_memory().unwrap();
    TuiApp::new(FormController::new(SnapshotPersistence::new(db, "formFields")))
}

fn ctrl(app: &mut App, c: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn render(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal.draw(|f| app.ui(f)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for row in buffer.content.chunks(buffer.area.width as usize) {
        for cell in row {
            out.push_str(cell.symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_add_keys_create_typed_fields_and_select_newest() {
    let mut app = app();
    ctrl(&mut app, 't');
    ctrl(&mut app, 'e');
    ctrl(&mut app, 'n');

    let types: Vec<FieldType> = app
        .controller()
        .fields()
        .iter()
        .map(|f| f.field_type())
        .collect();
    assert_eq!(types, vec![FieldType::Text, FieldType::Email, FieldType::Number]);
    assert_eq!(app.selected(), Some(2));
}

#[test]
fn test_typing_validates_every_keystroke() {
    let mut app = app();
    ctrl(&mut app, 'n');

    press(&mut app, KeyCode::Char('-'));
    assert_eq!(app.controller().fields()[0].error(), Some("Must be a number"));

    press(&mut app, KeyCode::Char('5'));
    assert_eq!(app.controller().fields()[0].error(), Some("Must be greater than 0"));

    press(&mut app, KeyCode::Home);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.controller().fields()[0].value(), "");
    assert_eq!(app.controller().fields()[0].error(), Some("Required"));

    type_str(&mut app, "3");
    assert_eq!(app.controller().fields()[0].error(), None);
}

#[test]
fn test_navigation_wraps_and_edits_selected_field() {
    let mut app = app();
    ctrl(&mut app, 't');
    ctrl(&mut app, 't');

    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected(), Some(0));
    type_str(&mut app, "first");

    press(&mut app, KeyCode::Up);
    assert_eq!(app.selected(), Some(1));
    type_str(&mut app, "second");

    let values: Vec<&str> = app.controller().fields().iter().map(|f| f.value()).collect();
    assert_eq!(values, vec!["first", "second"]);
}

#[test]
fn test_remove_clamps_selection() {
    let mut app = app();
    ctrl(&mut app, 't');
    ctrl(&mut app, 'e');

    ctrl(&mut app, 'd');
    assert_eq!(app.controller().fields().len(), 1);
    assert_eq!(app.selected(), Some(0));

    ctrl(&mut app, 'd');
    assert!(app.controller().fields().is_empty());
    assert_eq!(app.selected(), None);

    // Nothing selected: remove and typing do nothing
    ctrl(&mut app, 'd');
    type_str(&mut app, "x");
    assert!(app.controller().fields().is_empty());
}

#[test]
fn test_submit_shows_preview_and_clear_hides_it() {
    let mut app = app();
    ctrl(&mut app, 't');
    type_str(&mut app, "hello");
    ctrl(&mut app, 'e');
    type_str(&mut app, "not-an-email");

    let screen = render(&mut app);
    assert!(screen.contains("Invalid email"));
    assert!(!screen.contains("Form Preview"));

    ctrl(&mut app, 's');
    assert!(app.controller().preview_visible());
    let screen = render(&mut app);
    assert!(screen.contains("Form Preview"));
    assert!(screen.contains("text: hello"));
    assert!(screen.contains("email: not-an-email"));

    ctrl(&mut app, 'l');
    assert!(app.controller().fields().is_empty());
    assert!(!app.controller().preview_visible());
    let screen = render(&mut app);
    assert!(!screen.contains("Form Preview"));
    assert!(screen.contains("No fields yet"));
}

#[test]
fn test_preview_shows_placeholder_for_empty_value() {
    let mut app = app();
    ctrl(&mut app, 'n');
    ctrl(&mut app, 's');

    let screen = render(&mut app);
    assert!(screen.contains("number: (empty)"));
}

#[test]
fn test_quit_keys() {
    let mut app = app();
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit());

    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit());

    let mut app = self::app();
    ctrl(&mut app, 'c');
    assert!(app.should_quit());
}

#[test]
fn test_validator_panic_is_shown_inline_under_quiet_hook() {
    fn exploding(_: FieldType, _: &str) -> Result<(), ValidationError> {
        panic!("validator exploded")
    }

    let db = Database::open_in_memory().unwrap();
    let store = FormStore::with_validator(SnapshotPersistence::new(db, "formFields"), exploding);
    let mut app = TuiApp::new(FormController::from_store(store));

    let quiet = QuietPanics::install();
    ctrl(&mut app, 't');
    type_str(&mut app, "x");
    drop(quiet);

    let field = &app.controller().fields()[0];
    assert_eq!(field.value(), "x");
    assert_eq!(field.error(), Some("Validation failed"));
    assert!(render(&mut app).contains("Validation failed"));
}
