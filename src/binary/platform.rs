//! Release targets published for the vacuum binary.

use crate::error::VacuumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    Arm64,
    X86_64,
    I386,
}

impl Platform {
    /// Name used in release asset file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// The platform this process runs on.
    pub fn host() -> Result<Self, VacuumError> {
        std::env::consts::OS.parse()
    }
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
            Self::I386 => "i386",
        }
    }

    pub fn host() -> Result<Self, VacuumError> {
        std::env::consts::ARCH.parse()
    }
}

impl FromStr for Platform {
    type Err = VacuumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            "windows" | "win32" | "win64" => Ok(Self::Windows),
            other => Err(VacuumError::UnsupportedTarget(format!("platform '{}'", other))),
        }
    }
}

impl FromStr for Arch {
    type Err = VacuumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "i386" | "i686" | "x86" => Ok(Self::I386),
            other => Err(VacuumError::UnsupportedTarget(format!("architecture '{}'", other))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A platform/architecture pair vacuum publishes a release tarball for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub platform: Platform,
    pub arch: Arch,
}

/// Every target vacuum ships prebuilt binaries for.
pub const SUPPORTED_TARGETS: [Target; 8] = [
    Target::new(Platform::Darwin, Arch::Arm64),
    Target::new(Platform::Darwin, Arch::X86_64),
    Target::new(Platform::Linux, Arch::Arm64),
    Target::new(Platform::Linux, Arch::I386),
    Target::new(Platform::Linux, Arch::X86_64),
    Target::new(Platform::Windows, Arch::Arm64),
    Target::new(Platform::Windows, Arch::I386),
    Target::new(Platform::Windows, Arch::X86_64),
];

impl Target {
    pub const fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    pub fn host() -> Result<Self, VacuumError> {
        Ok(Self::new(Platform::host()?, Arch::host()?))
    }

    /// File name of the executable inside the release tarball.
    pub fn binary_name(&self) -> &'static str {
        match self.platform {
            Platform::Windows => "vacuum.exe",
            _ => "vacuum",
        }
    }

    /// e.g. `linux_x86_64`
    pub fn slug(&self) -> String {
        format!("{}_{}", self.platform, self.arch)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_aliases() {
        assert_eq!("Darwin".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert!("freebsd".parse::<Platform>().is_err());
    }

    #[test]
    fn test_arch_aliases() {
        assert_eq!("aarch64".parse::<Arch>().unwrap(), Arch::Arm64);
        assert_eq!("amd64".parse::<Arch>().unwrap(), Arch::X86_64);
        assert_eq!("x86".parse::<Arch>().unwrap(), Arch::I386);
        assert!(matches!(
            "riscv64".parse::<Arch>(),
            Err(VacuumError::UnsupportedTarget(_))
        ));
    }

    #[test]
    fn test_binary_name_per_platform() {
        assert_eq!(Target::new(Platform::Windows, Arch::X86_64).binary_name(), "vacuum.exe");
        assert_eq!(Target::new(Platform::Darwin, Arch::Arm64).binary_name(), "vacuum");
    }

    #[test]
    fn test_supported_targets_are_unique() {
        let unique: std::collections::HashSet<_> = SUPPORTED_TARGETS.iter().collect();
        assert_eq!(unique.len(), SUPPORTED_TARGETS.len());
        assert!(SUPPORTED_TARGETS.contains(&Target::new(Platform::Linux, Arch::I386)));
    }

    #[test]
    fn test_slug() {
        assert_eq!(Target::new(Platform::Linux, Arch::X86_64).slug(), "linux_x86_64");
    }
}
