//! Interactive numbered menu.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use libris_catalog::{Book, BookStatus, BookUpdate};
use libris_db::Connection;

use crate::CliError;

use super::{books, lookup};

const MENU: [&str; 7] = [
    "Add a new book to the database",
    "Find a book's detail based on BookID",
    "Find a book's reservation status based on BookID, Title, UserID, and ReservationID",
    "Find all the books in the database",
    "Modify/update book details based on BookID",
    "Delete a book based on BookID",
    "Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    Detail,
    Find,
    List,
    Update,
    Delete,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Add),
            "2" => Ok(Self::Detail),
            "3" => Ok(Self::Find),
            "4" => Ok(Self::List),
            "5" => Ok(Self::Update),
            "6" => Ok(Self::Delete),
            "7" => Ok(Self::Exit),
            _ => Err(()),
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Line-oriented prompts. `None` from any `ask*` method means end of input.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_required(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            match self.ask(prompt)? {
                None => return Ok(None),
                Some(value) if value.is_empty() => {
                    self.note("This field is required.")?;
                }
                Some(value) => return Ok(Some(value)),
            }
        }
    }

    fn ask_status(&mut self, prompt: &str) -> io::Result<Option<BookStatus>> {
        loop {
            let Some(value) = self.ask_required(prompt)? else {
                return Ok(None);
            };
            match value.parse() {
                Ok(status) => return Ok(Some(status)),
                Err(e) => self.note(&e.to_string())?,
            }
        }
    }

    /// Blank skips the field: `Some(None)`.
    fn ask_optional(&mut self, prompt: &str) -> io::Result<Option<Option<String>>> {
        Ok(self
            .ask(prompt)?
            .map(|value| Some(value).filter(|v| !v.is_empty())))
    }

    fn ask_optional_status(&mut self, prompt: &str) -> io::Result<Option<Option<BookStatus>>> {
        loop {
            match self.ask_optional(prompt)? {
                None => return Ok(None),
                Some(None) => return Ok(Some(None)),
                Some(Some(value)) => match value.parse() {
                    Ok(status) => return Ok(Some(Some(status))),
                    Err(e) => self.note(&e.to_string())?,
                },
            }
        }
    }

    fn note(&mut self, message: &str) -> io::Result<()> {
        writeln!(
            self.output,
            "  {}",
            message.if_supports_color(Stdout, |t| t.yellow())
        )
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        for (i, entry) in MENU.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, entry)?;
        }
        Ok(())
    }
}

/// Entry point for `menu` (and running with no subcommand).
pub(crate) fn run_menu(conn: &Connection) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    menu_loop(conn, &mut prompter)
}

fn menu_loop<R: BufRead, W: Write>(
    conn: &Connection,
    prompter: &mut Prompter<R, W>,
) -> Result<(), CliError> {
    loop {
        prompter.show_menu()?;
        let Some(input) = prompter.ask("Enter your choice: ")? else {
            return Ok(());
        };
        let Ok(choice) = input.parse::<MenuChoice>() else {
            prompter.note("Invalid choice. Please try again.")?;
            continue;
        };

        match handle_choice(conn, prompter, choice) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e @ CliError::Io(_)) => return Err(e),
            Err(e) => log::error!("{}", e),
        }
    }
}

fn handle_choice<R: BufRead, W: Write>(
    conn: &Connection,
    p: &mut Prompter<R, W>,
    choice: MenuChoice,
) -> Result<Flow, CliError> {
    match choice {
        MenuChoice::Add => {
            let Some(book) = ask_new_book(p)? else {
                return Ok(Flow::Exit);
            };
            books::add_book(conn, &book)?;
        }
        MenuChoice::Detail => {
            let Some(id) = p.ask_required("Enter BookID: ")? else {
                return Ok(Flow::Exit);
            };
            lookup::run_show(conn, &id)?;
        }
        MenuChoice::Find => {
            let Some(text) = p.ask_required("Enter BookID, Title, UserID, or ReservationID: ")?
            else {
                return Ok(Flow::Exit);
            };
            lookup::run_find(conn, &text)?;
        }
        MenuChoice::List => lookup::run_list(conn)?,
        MenuChoice::Update => {
            let Some(id) = p.ask_required("Enter BookID: ")? else {
                return Ok(Flow::Exit);
            };
            if !libris_db::book_exists(conn, &id)? {
                log::info!("Book not found.");
                return Ok(Flow::Continue);
            }
            let Some(update) = ask_book_update(p)? else {
                return Ok(Flow::Exit);
            };
            books::update_book(conn, &id, &update)?;
        }
        MenuChoice::Delete => {
            let Some(id) = p.ask_required("Enter BookID: ")? else {
                return Ok(Flow::Exit);
            };
            books::run_delete(conn, &id)?;
        }
        MenuChoice::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn ask_new_book<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> io::Result<Option<Book>> {
    let Some(id) = p.ask_required("Enter BookID: ")? else {
        return Ok(None);
    };
    let Some(title) = p.ask_required("Enter Title: ")? else {
        return Ok(None);
    };
    let Some(author) = p.ask_required("Enter Author: ")? else {
        return Ok(None);
    };
    let Some(isbn) = p.ask_required("Enter ISBN: ")? else {
        return Ok(None);
    };
    let Some(status) = p.ask_status("Enter Status (Available/Reserved): ")? else {
        return Ok(None);
    };
    Ok(Some(Book {
        id,
        title,
        author,
        isbn,
        status,
    }))
}

fn ask_book_update<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
) -> io::Result<Option<BookUpdate>> {
    let Some(title) = p.ask_optional("Enter new Title (leave blank to skip): ")? else {
        return Ok(None);
    };
    let Some(author) = p.ask_optional("Enter new Author (leave blank to skip): ")? else {
        return Ok(None);
    };
    let Some(isbn) = p.ask_optional("Enter new ISBN (leave blank to skip): ")? else {
        return Ok(None);
    };
    let Some(status) =
        p.ask_optional_status("Enter new Status (Reserved/Available) (leave blank to skip): ")?
    else {
        return Ok(None);
    };
    Ok(Some(BookUpdate {
        title,
        author,
        isbn,
        status,
    }))
}
