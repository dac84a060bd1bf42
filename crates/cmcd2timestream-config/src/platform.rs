// Platform detection based on environment variables
//
// - AWS Lambda: AWS_LAMBDA_FUNCTION_NAME env var present
// - Local: anything else (replay CLI, tests)

use std::env;

use crate::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Lambda,
    Local,
}

impl Platform {
    /// Auto-detect the current platform based on environment variables
    pub fn detect() -> Self {
        if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            Platform::Lambda
        } else {
            Platform::Local
        }
    }

    /// Get platform-specific defaults
    pub fn defaults(&self) -> PlatformDefaults {
        match self {
            // CloudWatch ingests one JSON object per line
            Platform::Lambda => PlatformDefaults {
                log_format: LogFormat::Json,
            },
            Platform::Local => PlatformDefaults {
                log_format: LogFormat::Text,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformDefaults {
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_defaults() {
        assert_eq!(Platform::Lambda.defaults().log_format, LogFormat::Json);
        assert_eq!(Platform::Local.defaults().log_format, LogFormat::Text);
    }
}
