// src/settings/mod.rs

//! Build settings supplied by the invoking environment
//!
//! Settings are the axes a binary varies over: operating system, compiler,
//! build type and architecture. The recipe only reads them; they come from a
//! [`Profile`] file or the command line and are never computed by a phase,
//! except for the libc marker pinned by the option mutator.

mod profile;

pub use profile::{Profile, SKIP_TEST_CONF};

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

fn invalid(name: &str, reason: String) -> ConfigurationError {
    ConfigurationError::InvalidSetting {
        name: name.to_string(),
        reason,
    }
}

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBSD,
    Android,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::FreeBSD => "FreeBSD",
            Os::Android => "Android",
        }
    }

    /// The operating system this binary was compiled for
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::Macos
        } else if cfg!(target_os = "freebsd") {
            Os::FreeBSD
        } else if cfg!(target_os = "android") {
            Os::Android
        } else {
            Os::Linux
        }
    }
}

impl FromStr for Os {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Macos),
            "freebsd" => Ok(Os::FreeBSD),
            "android" => Ok(Os::Android),
            _ => Err(invalid("os", format!("unknown operating system '{s}'"))),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "armv7")]
    Armv7,
    #[serde(rename = "armv8")]
    Armv8,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }
}

impl FromStr for Arch {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i686" => Ok(Arch::X86),
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "armv7" => Ok(Arch::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            _ => Err(invalid("arch", format!("unknown architecture '{s}'"))),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CMake build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(invalid("build_type", format!("unknown build type '{s}'"))),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// C++ language standard, e.g. `17`, `20`, `gnu20`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CppStd {
    /// Four-digit year of the standard (1998, 2011, ..., 2023)
    year: u16,
    /// GNU extensions enabled
    gnu: bool,
}

impl CppStd {
    pub const CXX98: CppStd = CppStd::new(1998);
    pub const CXX11: CppStd = CppStd::new(2011);
    pub const CXX14: CppStd = CppStd::new(2014);
    pub const CXX17: CppStd = CppStd::new(2017);
    pub const CXX20: CppStd = CppStd::new(2020);
    pub const CXX23: CppStd = CppStd::new(2023);

    const fn new(year: u16) -> Self {
        Self { year, gnu: false }
    }

    /// Two-digit value as used by `CMAKE_CXX_STANDARD`
    pub fn cmake_value(&self) -> u16 {
        self.year % 100
    }

    pub fn is_gnu(&self) -> bool {
        self.gnu
    }

    /// Four-digit year, ignoring GNU extensions
    pub fn year(&self) -> u16 {
        self.year
    }
}

// Year first, then plain before GNU, so ordering agrees with equality
impl Ord for CppStd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.gnu.cmp(&other.gnu))
    }
}

impl PartialOrd for CppStd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for CppStd {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (gnu, digits) = match trimmed.strip_prefix("gnu") {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let year = match digits {
            "98" => 1998,
            "11" => 2011,
            "14" => 2014,
            "17" => 2017,
            "20" => 2020,
            "23" => 2023,
            _ => {
                return Err(invalid(
                    "compiler.cppstd",
                    format!("unknown C++ standard '{s}'"),
                ));
            }
        };
        Ok(Self { year, gnu })
    }
}

impl fmt::Display for CppStd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gnu {
            write!(f, "gnu{:02}", self.cmake_value())
        } else {
            write!(f, "{:02}", self.cmake_value())
        }
    }
}

/// Compiler family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompilerKind {
    #[serde(rename = "gcc")]
    Gcc,
    #[serde(rename = "clang")]
    Clang,
    #[serde(rename = "apple-clang")]
    AppleClang,
    #[serde(rename = "msvc")]
    Msvc,
}

impl CompilerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Gcc => "gcc",
            CompilerKind::Clang => "clang",
            CompilerKind::AppleClang => "apple-clang",
            CompilerKind::Msvc => "msvc",
        }
    }
}

impl FromStr for CompilerKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" => Ok(CompilerKind::Gcc),
            "clang" => Ok(CompilerKind::Clang),
            "apple-clang" => Ok(CompilerKind::AppleClang),
            "msvc" | "visual studio" => Ok(CompilerKind::Msvc),
            _ => Err(invalid("compiler", format!("unknown compiler '{s}'"))),
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler setting with its sub-settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compiler {
    pub kind: CompilerKind,
    /// Version as given, e.g. `13`, `13.2`, `193`
    pub version: String,
    /// Explicit language standard; `None` means the compiler default
    pub cppstd: Option<CppStd>,
    pub libcxx: Option<String>,
}

impl Compiler {
    pub fn new(kind: CompilerKind, version: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
            cppstd: None,
            libcxx: None,
        }
    }

    /// Default compiler for an operating system
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Self::new(CompilerKind::Msvc, "193"),
            Os::Macos => Self::new(CompilerKind::AppleClang, "15"),
            Os::Android => Self::new(CompilerKind::Clang, "17"),
            Os::Linux | Os::FreeBSD => {
                let mut compiler = Self::new(CompilerKind::Gcc, "13");
                compiler.libcxx = Some("libstdc++11".to_string());
                compiler
            }
        }
    }

    /// Parse the version into (major, minor)
    fn version_parts(&self) -> Option<(u32, u32)> {
        let mut parts = self.version.split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = parts.next().and_then(|m| m.trim().parse().ok()).unwrap_or(0);
        Some((major, minor))
    }

    /// Highest language standard this compiler version can build
    pub fn max_cppstd(&self) -> Option<CppStd> {
        let (major, minor) = self.version_parts()?;
        let std = match self.kind {
            CompilerKind::Gcc => match (major, minor) {
                (11.., _) => CppStd::CXX23,
                (8.., _) => CppStd::CXX20,
                (5.., _) => CppStd::CXX17,
                (4, 9..) => CppStd::CXX14,
                _ => CppStd::CXX11,
            },
            CompilerKind::Clang => match major {
                12.. => CppStd::CXX23,
                6.. => CppStd::CXX20,
                5 => CppStd::CXX17,
                4 => CppStd::CXX14,
                _ => CppStd::CXX11,
            },
            CompilerKind::AppleClang => match major {
                13.. => CppStd::CXX23,
                10.. => CppStd::CXX20,
                9.. => CppStd::CXX17,
                _ => CppStd::CXX14,
            },
            CompilerKind::Msvc => match major {
                193.. => CppStd::CXX23,
                192 => CppStd::CXX20,
                191 => CppStd::CXX17,
                _ => CppStd::CXX14,
            },
        };
        Some(std)
    }
}

/// Platform C library variant pinned for non-Windows builds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Libc {
    pub name: String,
    pub version: String,
}

impl fmt::Display for Libc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Full settings snapshot for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
    /// Set by the option mutator on non-Windows targets
    pub libc: Option<Libc>,
}

impl Settings {
    /// Settings for the given OS with that platform's default compiler
    ///
    /// The architecture defaults to `x86_64`; profiles override it with `arch`.
    pub fn for_os(os: Os) -> Self {
        Self {
            os,
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
            arch: Arch::X86_64,
            libc: None,
        }
    }

    /// Set an explicit language standard
    pub fn with_cppstd(mut self, cppstd: CppStd) -> Self {
        self.compiler.cppstd = Some(cppstd);
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Apply a single `key=value` setting, e.g. `compiler.cppstd=20`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError> {
        match key {
            "os" => self.os = value.parse()?,
            "arch" => self.arch = value.parse()?,
            "build_type" => self.build_type = value.parse()?,
            "compiler" => {
                let kind: CompilerKind = value.parse()?;
                if kind != self.compiler.kind {
                    self.compiler = Compiler::new(kind, self.compiler.version.clone());
                }
            }
            "compiler.version" => self.compiler.version = value.to_string(),
            "compiler.cppstd" => self.compiler.cppstd = Some(value.parse()?),
            "compiler.libcxx" => self.compiler.libcxx = Some(value.to_string()),
            "os.libc" => {
                let version = self.libc.as_ref().map(|l| l.version.clone()).unwrap_or_default();
                self.libc = Some(Libc {
                    name: value.to_string(),
                    version,
                });
            }
            "os.libc.version" => {
                let name = self.libc.as_ref().map(|l| l.name.clone()).unwrap_or_default();
                self.libc = Some(Libc {
                    name,
                    version: value.to_string(),
                });
            }
            _ => return Err(invalid(key, "unknown setting".to_string())),
        }
        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} arch={} build_type={} compiler={} {}",
            self.os, self.arch, self.build_type, self.compiler.kind, self.compiler.version
        )?;
        if let Some(std) = &self.compiler.cppstd {
            write!(f, " cppstd={}", std)?;
        }
        if let Some(libc) = &self.libc {
            write!(f, " libc={}", libc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_parse_case_insensitive() {
        assert_eq!("linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("macOS".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("Windows".parse::<Os>().unwrap(), Os::Windows);
        assert!("plan9".parse::<Os>().is_err());
    }

    #[test]
    fn test_cppstd_ordering() {
        assert!(CppStd::CXX98 < CppStd::CXX11);
        assert!(CppStd::CXX17 < CppStd::CXX20);
        let gnu20: CppStd = "gnu20".parse().unwrap();
        assert_eq!(gnu20.cmp(&CppStd::CXX20), Ordering::Greater);
        assert_ne!(gnu20, CppStd::CXX20);
        assert_eq!(gnu20.year(), CppStd::CXX20.year());
        assert!(gnu20 < CppStd::CXX23);
        assert!(gnu20.is_gnu());
        assert_eq!(gnu20.to_string(), "gnu20");
        assert_eq!(CppStd::CXX98.cmake_value(), 98);
    }

    #[test]
    fn test_compiler_max_cppstd() {
        assert_eq!(
            Compiler::new(CompilerKind::Gcc, "7.5").max_cppstd(),
            Some(CppStd::CXX17)
        );
        assert_eq!(
            Compiler::new(CompilerKind::Gcc, "13").max_cppstd(),
            Some(CppStd::CXX23)
        );
        assert_eq!(
            Compiler::new(CompilerKind::Msvc, "192").max_cppstd(),
            Some(CppStd::CXX20)
        );
        assert_eq!(Compiler::new(CompilerKind::Clang, "abc").max_cppstd(), None);
    }

    #[test]
    fn test_settings_set() {
        let mut settings = Settings::for_os(Os::Linux);
        settings.set("compiler.cppstd", "20").unwrap();
        settings.set("build_type", "Debug").unwrap();
        settings.set("os.libc", "glibc").unwrap();
        settings.set("os.libc.version", "2.35").unwrap();
        assert_eq!(settings.compiler.cppstd, Some(CppStd::CXX20));
        assert_eq!(settings.build_type, BuildType::Debug);
        assert_eq!(
            settings.libc,
            Some(Libc {
                name: "glibc".to_string(),
                version: "2.35".to_string()
            })
        );
        assert!(settings.set("nonsense", "1").is_err());
    }
}
