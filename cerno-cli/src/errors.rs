//! Helpful top-level error reporting: a colored message plus a short list of
//! likely fixes, keyed off [`cerno_core::error::Error`]'s variants.

use colored::Colorize;

use cerno_core::error::Error;

/// Print `err` with a suggestion list suited to its kind, then return — the
/// caller is responsible for the process exit code.
pub fn report(err: &anyhow::Error) {
    eprintln!("{} {err}", "error:".red().bold());

    let help = err
        .downcast_ref::<Error>()
        .map_or(GENERIC_HELP, |core_err| match core_err {
            Error::Parse { .. } | Error::InputValidation(_) => INPUT_HELP,
            Error::Storage(_) => STORAGE_HELP,
            Error::Io(_) => IO_HELP,
            Error::Conflict(_) | Error::RowError(_) => CONFLICT_HELP,
            Error::Provider(_) | Error::DimensionMismatch { .. } | Error::Serialization(_) | Error::Fatal(_) => GENERIC_HELP,
        });

    eprintln!("\n{}", "Possible solutions:".yellow().bold());
    for (i, line) in help.iter().enumerate() {
        eprintln!("  {}. {line}", i + 1);
    }
}

const INPUT_HELP: &[&str] = &[
    "Check the file path and format are correct",
    "Markdown files over the size cap are rejected; split them up",
];

const STORAGE_HELP: &[&str] = &[
    "Check the database file path is writable",
    "Run 'cerno init <path>' before scanning or resolving",
];

const IO_HELP: &[&str] = &["Verify the path exists and is readable", "Check file permissions"];

const CONFLICT_HELP: &[&str] = &[
    "Run 'cerno reconcile' to resolve pending contradictions",
    "Inspect 'cerno insights' for the referenced row",
];

const GENERIC_HELP: &[&str] = &["Re-run with --verbose for more detail", "Check 'cerno status' for pipeline health"];
