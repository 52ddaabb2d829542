//! # asselect-core
//!
//! Core library for the Automation Studio selector.
//!
//! This library provides the functionality for switching a project between
//! installed Automation Studio versions and for mirroring library changes made
//! in the shared working copy (`Logical/Libraries`) back to the
//! version-specific source of truth (`Logical/Libraries_<suffix>`), triggered
//! by the studio process closing, a periodic timer, or an explicit request.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the asselect library
pub mod error;

/// Directory tree scanning
pub mod scanner;

/// Change detection between the source-of-truth and working-copy trees
pub mod comparison;

/// Timestamped backups of the source-of-truth tree
pub mod backup;

/// Applying detected changes to the source-of-truth tree
pub mod sync;

/// Studio process lifecycle monitoring
pub mod process;

/// Auto-sync orchestration across triggers and sessions
pub mod auto_sync;

/// Settings and application configuration persistence
pub mod config;

/// Studio registry and project path conventions
pub mod studio;

/// One-shot project setup for a selected studio version
pub mod project;

/// Human-readable session audit log
pub mod session_log;
