//! Interactive menu session.
//!
//! # Responsibility
//! - Prompt for user intent, call the catalog, render typed outcomes.
//! - Choose the recovery policy when the catalog file is corrupt.
//!
//! # Invariants
//! - All catalog access goes through `Catalog` entry points.
//! - End of input ends the session without saving.
//! - A catalog file that was never loaded is only overwritten after the user
//!   confirms it.

use crate::config::Config;
use bookshelf_core::{
    AddOutcome, Book, BookVariant, Catalog, DecodeError, EventSink, IssueOutcome, LoadOutcome,
    ReturnOutcome,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};

/// Whether the menu loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// One interactive run over a catalog.
pub struct Session<R, W, S: EventSink> {
    input: R,
    output: W,
    catalog: Catalog<S>,
    config: Config,
    /// Set when the file at `config.catalog_path` was not loaded into memory.
    disk_unloaded: bool,
}

impl<R: BufRead, W: Write, S: EventSink> Session<R, W, S> {
    pub fn new(input: R, output: W, catalog: Catalog<S>, config: Config) -> Self {
        Self {
            input,
            output,
            catalog,
            config,
            disk_unloaded: false,
        }
    }

    /// Read-only access to the catalog.
    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// Hydrates the catalog, asking the user what to do if it is corrupt.
    pub fn start(&mut self) -> io::Result<()> {
        writeln!(self.output, "############################################")?;
        writeln!(self.output, "## Welcome to Library Inventory Manager!  ##")?;
        writeln!(self.output, "############################################")?;

        match self.catalog.load(&self.config.catalog_path) {
            Ok(LoadOutcome::Loaded(count)) => {
                writeln!(self.output, "Loaded {count} book(s) from catalog.")?;
            }
            Ok(LoadOutcome::Empty) => {
                writeln!(self.output, "Starting with an empty catalog.")?;
            }
            Ok(LoadOutcome::CorruptionDetected(err)) => self.recover(&err)?,
            Err(err) => {
                self.disk_unloaded = true;
                writeln!(self.output, "Unexpected error loading catalog: {err}")?;
                writeln!(self.output, "Continuing with an empty in-memory catalog.")?;
            }
        }
        Ok(())
    }

    /// Runs the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "--- Main Menu ---")?;
            writeln!(self.output, "1. Add Book")?;
            writeln!(self.output, "2. Issue Book")?;
            writeln!(self.output, "3. Return Book")?;
            writeln!(self.output, "4. View All Books")?;
            writeln!(self.output, "5. Search")?;
            writeln!(self.output, "6. Save Catalog")?;
            writeln!(self.output, "7. Exit (save and quit)")?;
            writeln!(self.output, "8. Exit without saving")?;

            let Some(choice) = self.prompt("Enter your choice (1-8): ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_book()?,
                "2" => self.issue_book()?,
                "3" => self.return_book()?,
                "4" => self.view_all()?,
                "5" => self.search()?,
                "6" => {
                    self.save("Catalog saved to disk.")?;
                    Flow::Continue
                }
                "7" => {
                    if !self.save("Catalog saved. Exiting now. Goodbye!")? {
                        writeln!(self.output, "Exiting without saving. Goodbye!")?;
                    }
                    Flow::Exit
                }
                "8" => self.exit_without_saving()?,
                _ => {
                    writeln!(
                        self.output,
                        "Invalid choice. Enter a number between 1 and 8."
                    )?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Program terminated.")?;
        self.output.flush()
    }

    fn recover(&mut self, err: &DecodeError) -> io::Result<()> {
        warn!("event=catalog_recovery module=cli status=start");
        writeln!(self.output)?;
        writeln!(
            self.output,
            "ERROR: Catalog file is corrupted or not valid JSON ({err})."
        )?;
        writeln!(
            self.output,
            "You can choose to (R)eset the catalog (this will overwrite the file), or (B)ackup & start fresh."
        )?;
        let choice = self
            .prompt("Type R to reset, B to backup and start fresh, any other key to abort load: ")?
            .unwrap_or_default()
            .to_lowercase();

        let catalog_path = self.config.catalog_path.clone();
        let backup_path = self.config.backup_path.clone();
        match choice.as_str() {
            "r" => match self.catalog.reset_catalog(&catalog_path) {
                Ok(()) => writeln!(self.output, "Catalog reset. Starting with empty catalog.")?,
                Err(err) => {
                    self.abort_load();
                    writeln!(self.output, "Failed to reset catalog file: {err}")?;
                }
            },
            "b" => match self.catalog.backup_and_reset(&catalog_path, &backup_path) {
                Ok(()) => writeln!(
                    self.output,
                    "Corrupted file backed up to {}. Starting with empty catalog.",
                    backup_path.display()
                )?,
                Err(err) => {
                    self.abort_load();
                    writeln!(self.output, "Failed to backup corrupted catalog: {err}")?;
                }
            },
            _ => {
                self.abort_load();
                writeln!(
                    self.output,
                    "Aborted loading catalog. Program will continue with empty in-memory catalog (not saved)."
                )?;
            }
        }
        Ok(())
    }

    fn abort_load(&mut self) {
        self.catalog.abort_load();
        self.disk_unloaded = true;
    }

    fn add_book(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "---- Add a New Book ----")?;
        let Some(title) = self.prompt_nonempty("Title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(author) = self.prompt_nonempty("Author: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(isbn) = self.prompt_nonempty("ISBN (unique): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(reference) =
            self.prompt("Is this a reference book (cannot be issued)? (y/n): ")?
        else {
            return Ok(Flow::Exit);
        };
        let variant = if reference.eq_ignore_ascii_case("y") {
            BookVariant::NonCirculating
        } else {
            BookVariant::Standard
        };

        let book = match Book::new(&title, &author, &isbn, variant) {
            Ok(book) => book,
            Err(err) => {
                writeln!(self.output, "Invalid book: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.catalog.add(book) {
            AddOutcome::Added => writeln!(self.output, "Book added successfully.")?,
            AddOutcome::DuplicateId => writeln!(
                self.output,
                "A book with that ISBN already exists. Add aborted."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn issue_book(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "---- Issue a Book ----")?;
        let Some(isbn) = self.prompt_nonempty("Enter ISBN of the book to issue: ")? else {
            return Ok(Flow::Exit);
        };

        let message = match self.catalog.issue(&isbn) {
            IssueOutcome::Issued => "Book issued successfully.",
            IssueOutcome::NotFound => "No book found with that ISBN.",
            IssueOutcome::NotCirculating => "This is a reference book and cannot be issued.",
            IssueOutcome::AlreadyIssued => {
                "Book is not available for issue (may already be issued)."
            }
        };
        writeln!(self.output, "{message}")?;
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "---- Return a Book ----")?;
        let Some(isbn) = self.prompt_nonempty("Enter ISBN of the book to return: ")? else {
            return Ok(Flow::Exit);
        };

        let message = match self.catalog.return_item(&isbn) {
            ReturnOutcome::Returned => "Book returned successfully.",
            ReturnOutcome::NotFound => "No book found with that ISBN.",
            ReturnOutcome::AlreadyAvailable => {
                "Book was already available in the library (not issued)."
            }
        };
        writeln!(self.output, "{message}")?;
        Ok(Flow::Continue)
    }

    fn view_all(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "---- All Books in Catalog ----")?;
        let lines = self.catalog.list_all();
        if lines.is_empty() {
            writeln!(self.output, "Catalog is empty.")?;
        }
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "---- Search ----")?;
        writeln!(self.output, "1. Search by title")?;
        writeln!(self.output, "2. Search by ISBN")?;
        let Some(choice) = self.prompt("Choice (1/2): ")? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                let Some(query) = self.prompt_nonempty("Enter title keyword: ")? else {
                    return Ok(Flow::Exit);
                };
                let hits = self.catalog.find_by_title(&query);
                if hits.is_empty() {
                    writeln!(self.output, "No books found with that title keyword.")?;
                } else {
                    writeln!(self.output, "Found {} result(s):", hits.len())?;
                    for book in hits {
                        writeln!(self.output, "{book}")?;
                    }
                }
            }
            "2" => {
                let Some(query) = self.prompt_nonempty("Enter ISBN: ")? else {
                    return Ok(Flow::Exit);
                };
                match self.catalog.find_by_id(&query) {
                    Some(book) => {
                        writeln!(self.output, "Found:")?;
                        writeln!(self.output, "{book}")?;
                    }
                    None => writeln!(self.output, "No book found with that ISBN.")?,
                }
            }
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    /// Saves and prints `success` or the failure; returns whether it saved.
    ///
    /// An unloaded catalog file is kept unless the user confirms the overwrite.
    fn save(&mut self, success: &str) -> io::Result<bool> {
        if self.disk_unloaded && !self.confirm_overwrite()? {
            writeln!(self.output, "Save cancelled. Catalog file left unchanged.")?;
            return Ok(false);
        }

        match self.catalog.save(&self.config.catalog_path) {
            Ok(()) => {
                self.disk_unloaded = false;
                writeln!(self.output, "{success}")?;
                Ok(true)
            }
            Err(err) => {
                writeln!(self.output, "Failed to save catalog: {err}")?;
                Ok(false)
            }
        }
    }

    fn confirm_overwrite(&mut self) -> io::Result<bool> {
        warn!("event=save_guard module=cli status=start reason=catalog_not_loaded");
        writeln!(
            self.output,
            "WARNING: {} was not loaded. Saving will replace its contents.",
            self.config.catalog_path.display()
        )?;
        let answer = self
            .prompt("Overwrite the catalog file? (y/n): ")?
            .unwrap_or_default();
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    fn exit_without_saving(&mut self) -> io::Result<Flow> {
        let answer = self
            .prompt("Are you sure you want to exit WITHOUT saving? (y/n): ")?
            .unwrap_or_else(|| "y".to_string());
        if answer.eq_ignore_ascii_case("y") {
            info!("event=session_exit module=cli status=ok saved=false");
            writeln!(self.output, "Exiting without saving. Goodbye!")?;
            Ok(Flow::Exit)
        } else {
            writeln!(self.output, "Exit aborted. Returning to menu.")?;
            Ok(Flow::Continue)
        }
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompts until the user types something.
    fn prompt_nonempty(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            match self.prompt(label)? {
                Some(value) if value.is_empty() => {
                    writeln!(self.output, "Input cannot be empty. Try again.")?;
                }
                other => return Ok(other),
            }
        }
    }
}
