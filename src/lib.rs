// Library root
// -----------
// This crate exposes the pieces the interactive record client is built
// from. The binary (`main.rs`) wires them together.
//
// Module responsibilities:
// - `types`: records, upload outcomes and the batch report.
// - `parser`: turns delimited rows into records, reporting skipped rows.
// - `source`: bulk sources (data directory files, built-in sample list).
// - `api`: the `RecordService` seam and its HTTP implementation.
// - `upload`: sequential, paced batch upload with per-record outcomes.
// - `summary`: folds outcomes into a `BatchReport`.
// - `ui`: terminal menu flows on top of `api` and `upload`.
// - `config`, `logging`, `errors`: ambient setup shared by all of the above.
pub mod api;
pub mod config;
pub mod errors;
pub mod logging;
pub mod parser;
pub mod source;
pub mod summary;
pub mod types;
pub mod ui;
pub mod upload;
