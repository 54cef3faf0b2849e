//! Orbe Tácticos "coming soon" landing page, software-rendered into a native window.
//!
//! The particle field in [`particles`] is the animated background; [`app::Landing`]
//! layers translated text, the launch countdown and the notify form on top of it.

pub mod app;
pub mod chrome;
pub mod config;
pub mod countdown;
pub mod debounce;
pub mod draw;
pub mod error;
pub mod form;
pub mod gamma;
pub mod i18n;
pub mod page;
pub mod particles;
pub mod snapshot;
pub mod storage;
pub mod types;
