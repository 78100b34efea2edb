//! Environment variable key constants.

/// Layout of the bootstrapped directory
pub mod layout {
    pub const VENVBOOT_ROOT: &str = "VENVBOOT_ROOT";
    pub const VENVBOOT_VENV_DIR: &str = "VENVBOOT_VENV_DIR";
    pub const VENVBOOT_REQUIREMENTS: &str = "VENVBOOT_REQUIREMENTS";
}

/// Interpreter and venv creation
pub mod python {
    pub const VENVBOOT_PYTHON: &str = "VENVBOOT_PYTHON";
    pub const VENVBOOT_CLEAR: &str = "VENVBOOT_CLEAR";
}

/// Interactive behaviour
pub mod interaction {
    /// Skip the final "press any key" prompt (CI, scripted use).
    pub const VENVBOOT_NO_PAUSE: &str = "VENVBOOT_NO_PAUSE";
}

/// Observability and logging
pub mod observability {
    pub const VENVBOOT_QUIET: &str = "VENVBOOT_QUIET";
    pub const VENVBOOT_LOG_LEVEL: &str = "VENVBOOT_LOG_LEVEL";
    pub const VENVBOOT_LOG_JSON: &str = "VENVBOOT_LOG_JSON";
    pub const VENVBOOT_AUDIT_LOG: &str = "VENVBOOT_AUDIT_LOG";
}

/// Variables touched by activation. Not read as configuration.
pub mod activation {
    pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
    pub const PATH: &str = "PATH";
    pub const PYTHONHOME: &str = "PYTHONHOME";
}
