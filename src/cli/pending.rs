//! `docket pending`: inspect or reset the ledger.

use super::Project;
use crate::error::Error;
use crate::ledger;
use crate::reminder;

/// Show the ledger without draining it, or clear it.
pub fn run(project: &Project, clear: bool) -> Result<(), Error> {
    if clear {
        let drained = project.ledger.snapshot_and_clear();
        println!("Cleared {} pending file(s).", drained.len());
        return Ok(());
    }

    let entries = project.ledger.load();
    let existing = ledger::filter_existing(&project.root, &entries);
    let missing = entries.len() - existing.len();

    match reminder::render(&existing, usize::MAX) {
        Some(text) => println!("{}", text),
        None => println!("No files pending documentation."),
    }
    if missing > 0 {
        println!("({} pending file(s) no longer exist)", missing);
    }
    Ok(())
}
