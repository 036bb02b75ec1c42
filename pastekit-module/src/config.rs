//! Module configuration

use pastekit_spec::MemoryConfig;

use crate::error::Result;

/// Byte written over released arena memory when poisoning is enabled
pub const POISON_BYTE: u8 = 0xAA;

/// Compute module configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Linear memory sizing
    pub memory: MemoryConfig,

    /// Seed for cosmetic randomness until `init` is called
    pub seed: u64,

    /// Overwrite the arena with [`POISON_BYTE`] on reset
    ///
    /// Makes any read through a stale pointer obvious; meant for tests.
    pub poison_on_reset: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::DEFAULT,
            seed: 0,
            poison_on_reset: false,
        }
    }
}

impl ModuleConfig {
    /// Default configuration with reset poisoning turned on
    pub fn poisoned() -> Self {
        Self {
            poison_on_reset: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.memory.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_config_default() {
        let config = ModuleConfig::default();
        assert_eq!(config.memory, MemoryConfig::DEFAULT);
        assert_eq!(config.seed, 0);
        assert!(!config.poison_on_reset);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_module_config_invalid_memory() {
        let config = ModuleConfig {
            memory: MemoryConfig {
                initial_pages: 0,
                max_pages: 1,
            },
            ..ModuleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poisoned() {
        assert!(ModuleConfig::poisoned().poison_on_reset);
    }
}
