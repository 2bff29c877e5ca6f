// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Optional bridge that prints this library's tracing events to stdout or
//! stderr. Until it is configured, no subscriber is installed and events are
//! discarded.

use crate::string::into_error_string;
use std::ffi::c_char;
use std::sync::Mutex;
use tracing::subscriber::set_global_default;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{fmt, reload, Layer, Registry};

/// Log level for filtering log events.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogEventLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace = 0,
    /// Designates lower priority information.
    Debug = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates very serious errors.
    Error = 4,
}

impl From<LogEventLevel> for LevelFilter {
    fn from(level: LogEventLevel) -> Self {
        match level {
            LogEventLevel::Trace => LevelFilter::TRACE,
            LogEventLevel::Debug => LevelFilter::DEBUG,
            LogEventLevel::Info => LevelFilter::INFO,
            LogEventLevel::Warn => LevelFilter::WARN,
            LogEventLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Target for standard stream output.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StdTarget {
    /// Write to standard output (stdout).
    Out,
    /// Write to standard error (stderr).
    Err,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to set global default subscriber")]
    GlobalDefault,
    #[error("logger state is poisoned")]
    Poisoned,
    #[error("failed to reload log layer: {0}")]
    Reload(#[from] reload::Error),
}

type FilteredRegistry = Layered<reload::Layer<LevelFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Reload handles for the installed global subscriber. The level filter and
/// the output layer are reloaded separately, since a layer carrying its own
/// filter cannot be swapped in through a reload handle.
struct Logger {
    filter_handle: reload::Handle<LevelFilter, Registry>,
    layer_handle: reload::Handle<Option<BoxedLayer>, FilteredRegistry>,
}

impl Logger {
    fn install() -> Result<Self, LoggerError> {
        let (filter_layer, filter_handle) = reload::Layer::new(LevelFilter::OFF);
        let (std_layer, layer_handle) = reload::Layer::new(None);
        let subscriber = tracing_subscriber::registry()
            .with(filter_layer)
            .with(std_layer);
        set_global_default(subscriber).map_err(|_| LoggerError::GlobalDefault)?;
        Ok(Self {
            filter_handle,
            layer_handle,
        })
    }

    fn configure(&self, layer: Option<BoxedLayer>, level: LevelFilter) -> Result<(), LoggerError> {
        self.layer_handle.reload(layer)?;
        self.filter_handle.reload(level)?;
        Ok(())
    }
}

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

/// Installs the global subscriber on first use.
fn configure(layer: Option<BoxedLayer>, level: LevelFilter) -> Result<(), LoggerError> {
    let mut guard = LOGGER.lock().map_err(|_| LoggerError::Poisoned)?;
    if guard.is_none() {
        *guard = Some(Logger::install()?);
    }
    match guard.as_ref() {
        Some(logger) => logger.configure(layer, level),
        None => Err(LoggerError::GlobalDefault),
    }
}

fn std_layer(target: StdTarget) -> BoxedLayer {
    match target {
        StdTarget::Out => fmt::layer().with_writer(std::io::stdout).boxed(),
        StdTarget::Err => fmt::layer().with_writer(std::io::stderr).boxed(),
    }
}

/// Routes events at `level` or above to `target`, replacing any previous
/// standard stream configuration.
pub fn logger_configure_std(target: StdTarget, level: LogEventLevel) -> Result<(), LoggerError> {
    configure(Some(std_layer(target)), level.into())
}

/// Stops printing events. The subscriber stays installed.
pub fn logger_disable_std() -> Result<(), LoggerError> {
    configure(None, LevelFilter::OFF)
}

/// Configures the logger to write to stdout or stderr.
///
/// Returns null on success, or an error message which must be released with
/// [`crate::FreeString`]. Fails if another global tracing subscriber was
/// installed in this process before the first call.
#[no_mangle]
#[must_use]
pub extern "C" fn ddog_pprof_logger_configure_std(
    target: StdTarget,
    level: LogEventLevel,
) -> *mut c_char {
    into_error_string(logger_configure_std(target, level))
}

/// Disables standard stream logging.
///
/// Returns null on success, or an error message which must be released with
/// [`crate::FreeString`].
#[no_mangle]
#[must_use]
pub extern "C" fn ddog_pprof_logger_disable_std() -> *mut c_char {
    into_error_string(logger_disable_std())
}
