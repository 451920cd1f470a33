//! Core pipeline for sheetcal.
//!
//! sheetcal turns a published spreadsheet's CSV export into one subscribable
//! iCalendar feed per named calendar, plus a `calendars.json` manifest and a
//! static subscribe page. The pipeline is a single pass:
//!
//! fetch → parse rows → map rows to events → group into feeds → serialize →
//! write atomically.
//!
//! Everything is rebuilt from scratch on every run; output files are the only
//! state.

pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod fetch;
pub mod ics;
pub mod manifest;
pub mod mapper;
pub mod pipeline;
pub mod record;
pub mod site;
pub mod write;

pub use error::{SheetCalError, SheetCalResult};
