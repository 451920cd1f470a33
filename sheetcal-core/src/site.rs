//! The static subscribe page shipped with every deploy.
//!
//! The page is self-contained: it loads `calendars.json` at view time and
//! builds webcal/Google/Outlook subscription links client-side, so the core
//! never has to know the final hosting URL.

pub const SUBSCRIBE_PAGE: &str = include_str!("../assets/index.html");
