//! Logs error source chains at the points where errors stop being typed: the Vulkan backend and
//! the demo binary.

use log::error;
use std::error::Error;

/// Returns the value or logs the error chain and panics
#[track_caller]
pub fn unwrap_or_report<T>(result: anyhow::Result<T>, failed_to: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            report_anyhow(&e, failed_to);
            panic!("failed to {}: {:?}", failed_to, e);
        }
    }
}

pub fn report_anyhow(error: &anyhow::Error, failed_to: &str) {
    error!("failed to {}: {}", failed_to, error);
    log_sources(error.chain().skip(1));
}

/// Same as [`report_anyhow`] for the crate's typed errors
pub fn report_error(error: &dyn Error, failed_to: &str) {
    error!("failed to {}: {}", failed_to, error);
    log_sources(std::iter::successors(error.source(), |e| (*e).source()));
}

fn log_sources<'a>(sources: impl Iterator<Item = &'a (dyn Error + 'static)>) {
    for (depth, source) in sources.enumerate() {
        if depth == 0 {
            error!("caused by:");
        }
        error!("\t{}: {}", depth, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::more_errors::IoError;
    use anyhow::Context;
    use std::io;

    #[test]
    fn unwrap_passes_values_through() {
        let result: anyhow::Result<u32> = Ok(3);
        assert_eq!(unwrap_or_report(result, "count"), 3);
    }

    #[test]
    fn typed_error_sources_are_walked() {
        let error = IoError::WriteFileFailed(
            "camera.hsave".to_string(),
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        let sources: Vec<String> = std::iter::successors(error.source(), |e| (*e).source())
            .map(|e| e.to_string())
            .collect();
        assert_eq!(sources, vec!["disk full"]);
        report_error(&error, "save camera");
    }

    #[test]
    #[should_panic(expected = "failed to load kernel")]
    fn unwrap_panics_with_context() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("missing file")).context("reading");
        unwrap_or_report(result, "load kernel");
    }
}
