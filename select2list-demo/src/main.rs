mod terminal;
mod view;

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use dombind::{Dom, Element, NodeId};
use select2list::{Options, Registry};
use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};

use terminal::Terminal;

fn build_form(dom: &Dom) -> NodeId {
    let form = dom.insert(
        Element::new("form").child(
            Element::select()
                .attr("data-container-class", "select2list fruit")
                .child(Element::option("apple", "Apple").selected())
                .child(Element::option("banana", "Banana").disabled())
                .child(Element::option("cherry", "Cherry"))
                .child(Element::option("durian", "Durian").data("display", "Durian (pungent)")),
        ),
    );
    dom.find(form, "select")[0]
}

fn run(terminal: &mut Terminal) -> io::Result<()> {
    let dom = Dom::new();
    let select = build_form(&dom);
    let matched = [select];
    let status = Rc::new(RefCell::new(String::from("nothing selected yet")));

    let mut registry = Registry::new(dom.clone());
    let status_log = status.clone();
    registry.bind(
        &matched,
        Options::<Dom>::new().on_change(move |_, value, label| {
            log::info!("changed to {} ({})", value, label);
            *status_log.borrow_mut() = format!("selected {label} [{value}]");
        }),
    );

    let mut cursor = 0usize;
    let mut added = 0usize;

    loop {
        let Some(list) = registry.get(&select).cloned() else {
            return Ok(());
        };
        let rows = view::rows(&dom, &list);
        cursor = cursor.min(rows.len().saturating_sub(1));
        terminal.draw(&view::lines(&rows, cursor, &status.borrow()))?;

        let Some(event) = terminal.poll(Duration::from_millis(250))? else {
            continue;
        };

        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Up | KeyCode::Char('k') => cursor = cursor.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => cursor += 1,
                KeyCode::Enter | KeyCode::Char(' ') => activate(&dom, &rows, cursor, &status),
                KeyCode::Char('d') => {
                    if let Some(row) = rows.get(cursor) {
                        registry.invoke(&matched, "disable", &[json!(row.value)]);
                    }
                }
                KeyCode::Char('e') => {
                    if let Some(row) = rows.get(cursor) {
                        registry.invoke(&matched, "enable", &[json!(row.value)]);
                    }
                }
                KeyCode::Char('a') => {
                    added += 1;
                    let value = format!("extra-{added}");
                    registry.invoke(
                        &matched,
                        "add",
                        &[json!(value), json!(format!("Extra fruit #{added}"))],
                    );
                }
                _ => {}
            },
            CrosstermEvent::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) =>
            {
                let row = (mouse.row as usize).checked_sub(view::HEADER_ROWS);
                if let Some(index) = row.filter(|&i| i < rows.len()) {
                    cursor = index;
                    activate(&dom, &rows, index, &status);
                }
            }
            _ => {}
        }
    }
}

fn activate(dom: &Dom, rows: &[view::Row], index: usize, status: &RefCell<String>) {
    let Some(row) = rows.get(index) else {
        return;
    };
    match row.activator {
        Some(anchor) => {
            dom.click(anchor);
        }
        None => {
            log::debug!("row {:?} is not selectable", row.value);
            *status.borrow_mut() = format!("{} is not selectable", row.label);
        }
    }
}

fn main() {
    let log_file = File::create("select2list-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let result = Terminal::new().and_then(|mut terminal| run(&mut terminal));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
}
