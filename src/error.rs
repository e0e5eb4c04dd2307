// Crash screen error types
// Only setup entry points report errors; the render path never fails outward

use core::fmt;

/// Errors reported by the crash screen setup API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashScreenError {
    /// `init` already ran in this process
    AlreadyInitialized,
    /// An entry point that needs `init` was called before it
    NotInitialized,
    /// The pixel memory cannot hold `width * height` pixels
    SurfaceTooSmall { needed: usize, available: usize },
    /// A null surface pointer was registered
    NullSurface,
    /// A global logger is already installed
    LoggerAlreadySet,
}

impl fmt::Display for CrashScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrashScreenError::AlreadyInitialized => write!(f, "crash screen already initialized"),
            CrashScreenError::NotInitialized => write!(f, "crash screen not initialized"),
            CrashScreenError::SurfaceTooSmall { needed, available } => write!(
                f,
                "surface too small: {} pixels needed, {} available",
                needed, available
            ),
            CrashScreenError::NullSurface => write!(f, "null surface pointer"),
            CrashScreenError::LoggerAlreadySet => write!(f, "logger already set"),
        }
    }
}

/// Result type for crash screen setup operations
pub type Result<T> = core::result::Result<T, CrashScreenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrashScreenError::SurfaceTooSmall { needed: 76800, available: 100 };
        assert_eq!(err.to_string(), "surface too small: 76800 pixels needed, 100 available");
        assert_eq!(CrashScreenError::NullSurface.to_string(), "null surface pointer");
    }
}
