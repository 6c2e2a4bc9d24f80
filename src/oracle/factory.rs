//! Builds the configured oracle backend

use super::{CadicalOracle, InMemoryOracle, Oracle, ProcessOracle};
use crate::config::{OracleBackend, OracleConfig};
use log::debug;
use std::sync::Arc;

/// Create a shareable oracle for the configured backend
pub fn build_oracle(config: &OracleConfig) -> Arc<dyn Oracle> {
    debug!("using {:?} oracle backend", config.backend);

    match config.backend {
        OracleBackend::Cadical => Arc::new(CadicalOracle::new()),
        OracleBackend::InMemory => Arc::new(InMemoryOracle::new()),
        OracleBackend::Process => Arc::new(ProcessOracle::new(
            config.prover_binary.clone(),
            config.model_finder_binary.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_backend_selection() {
        let mut settings = Settings::default();
        assert_eq!(build_oracle(&settings.oracle).name(), "cadical");

        settings.oracle.backend = OracleBackend::InMemory;
        assert_eq!(build_oracle(&settings.oracle).name(), "in_memory");

        settings.oracle.backend = OracleBackend::Process;
        assert_eq!(build_oracle(&settings.oracle).name(), "process");
    }
}
