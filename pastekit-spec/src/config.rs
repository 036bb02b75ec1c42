//! # Configuration
//!
//! Linear-memory sizing for the compute module and the image addressing
//! style selected by the caller.

use std::fmt;

/// Size of one linear-memory page in bytes (64 KiB)
pub const PAGE_SIZE: u32 = 1 << 16;

/// Largest page count whose byte size still fits a 32-bit address
pub const MAX_ADDRESSABLE_PAGES: u32 = (1 << 16) - 1;

/// Linear memory configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryConfig {
    /// Pages allocated when the module is instantiated (>= 1)
    pub initial_pages: u32,
    /// Upper bound the memory may grow to
    pub max_pages: u32,
}

impl MemoryConfig {
    /// Default configuration: 1 page initially, growable to 256 pages (16 MiB)
    pub const DEFAULT: Self = Self {
        initial_pages: 1,
        max_pages: 256,
    };

    /// Create a new configuration with validation
    pub const fn new(initial_pages: u32, max_pages: u32) -> Result<Self, ConfigError> {
        let config = Self {
            initial_pages,
            max_pages,
        };

        if initial_pages == 0 {
            return Err(ConfigError::ZeroInitialPages);
        }
        if max_pages > MAX_ADDRESSABLE_PAGES {
            return Err(ConfigError::MaxPagesTooLarge);
        }
        if initial_pages > max_pages {
            return Err(ConfigError::InitialExceedsMax);
        }

        Ok(config)
    }

    /// Initial memory size in bytes
    #[inline]
    pub const fn initial_bytes(&self) -> usize {
        self.initial_pages as usize * PAGE_SIZE as usize
    }

    /// Maximum memory size in bytes
    #[inline]
    pub const fn max_bytes(&self) -> usize {
        self.max_pages as usize * PAGE_SIZE as usize
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.initial_pages, self.max_pages).map(|_| ())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MemoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryConfig {{ pages: {}..={}, bytes: {} KiB..={} KiB }}",
            self.initial_pages,
            self.max_pages,
            self.initial_bytes() / 1024,
            self.max_bytes() / 1024,
        )
    }
}

/// How sprite descriptors are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageStyle {
    /// 3-D home renders, addressed by dex id
    #[default]
    Home,
    /// 2-D sprites, addressed by species key
    Flat,
}

impl ImageStyle {
    /// Map the boundary's `two_d_images` flag to a style
    pub const fn from_two_d(two_d_images: bool) -> Self {
        if two_d_images {
            ImageStyle::Flat
        } else {
            ImageStyle::Home
        }
    }

    /// Root directory of the style's assets
    pub const fn root(self) -> &'static str {
        match self {
            ImageStyle::Home => "home",
            ImageStyle::Flat => "sprites",
        }
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// initial_pages must be at least 1
    ZeroInitialPages,
    /// initial_pages must not exceed max_pages
    InitialExceedsMax,
    /// max_pages must keep the memory inside a 32-bit address space
    MaxPagesTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroInitialPages => {
                write!(f, "initial_pages must be at least 1")
            }
            ConfigError::InitialExceedsMax => {
                write!(f, "initial_pages must not exceed max_pages")
            }
            ConfigError::MaxPagesTooLarge => {
                write!(f, "max_pages must be at most {}", MAX_ADDRESSABLE_PAGES)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
