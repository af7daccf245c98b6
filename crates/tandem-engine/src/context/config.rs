/// Environment variable read by [`HandlerConfig::from_env`].
pub const HARDWARE_INFO_ENV: &str = "TANDEM_HARDWARE_INFO";

/// Context handler configuration.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct HandlerConfig {
    /// Log adapter details at info level once the GPU context is created.
    pub hardware_info: bool,
}

impl HandlerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Only the exact value `"true"` enables hardware info logging.
    pub fn from_env() -> Self {
        Self {
            hardware_info: parse_flag(std::env::var(HARDWARE_INFO_ENV).ok().as_deref()),
        }
    }

    pub fn with_hardware_info(mut self, enabled: bool) -> Self {
        self.hardware_info = enabled;
        self
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_requires_exact_true() {
        assert!(parse_flag(Some("true")));
        assert!(!parse_flag(Some("TRUE")));
        assert!(!parse_flag(Some("1")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn hardware_info_is_off_by_default() {
        assert!(!HandlerConfig::default().hardware_info);
        assert!(HandlerConfig::default().with_hardware_info(true).hardware_info);
    }
}
