// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::UnexpectedErrorReporting;
use std::sync::{Arc, Mutex, PoisonError};

/// Logs unexpected errors and keeps them around, shared between clones
#[derive(Clone, Default)]
pub struct ErrorRecorder {
    reported: Arc<Mutex<Vec<String>>>,
}

impl ErrorRecorder {
    pub fn reported(&self) -> Vec<String> {
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.reported().is_empty()
    }
}

impl UnexpectedErrorReporting for ErrorRecorder {
    fn report(&self, error: anyhow::Error) {
        log::error!("[janitor.errors] unexpected error : {:#}", error);
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{:#}", error));
    }
}
