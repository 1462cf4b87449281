//! Target files and their desired metadata.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest permission value accepted (setuid + setgid + sticky + rwxrwxrwx).
const MAX_MODE: u32 = 0o7777;

/// Error type for parsing a [`FileMode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("file mode {0:?} is not an octal number")]
    NotOctal(String),
    #[error("file mode {0:o} exceeds 7777")]
    OutOfRange(u32),
}

/// Unix permission bits, written in octal (`"644"`, `"0755"`).
///
/// Serialized as an octal string so TOML files read the way `chmod` is typed:
///
/// ```toml
/// mode = "644"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileMode(u32);

impl FileMode {
    /// `rw-r--r--`
    pub const RW_R_R: FileMode = FileMode(0o644);
    /// `rwxr-xr-x`
    pub const RWX_RX_RX: FileMode = FileMode(0o755);

    /// Creates a mode from raw permission bits.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::OutOfRange`] if `bits` exceeds `0o7777`.
    pub fn new(bits: u32) -> Result<Self, ModeError> {
        if bits > MAX_MODE {
            return Err(ModeError::OutOfRange(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl FromStr for FileMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix("0o").unwrap_or(digits);
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(ModeError::NotOctal(s.to_string()));
        }
        let bits =
            u32::from_str_radix(digits, 8).map_err(|_| ModeError::NotOctal(s.to_string()))?;
        Self::new(bits)
    }
}

impl TryFrom<String> for FileMode {
    type Error = ModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FileMode> for String {
    fn from(mode: FileMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

/// A configuration file to edit, plus the ownership it must end up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// User name, or a numeric uid.
    pub owner: String,
    /// Group name, or a numeric gid.
    pub group: String,
    pub mode: FileMode,
}

impl TargetFile {
    pub fn new(
        path: impl Into<PathBuf>,
        owner: impl Into<String>,
        group: impl Into<String>,
        mode: FileMode,
    ) -> Self {
        Self {
            path: path.into(),
            owner: owner.into(),
            group: group.into(),
            mode,
        }
    }

    /// Returns a copy whose path is re-anchored under `root`.
    ///
    /// `/boot/config.txt` rebased on `/mnt/sdcard` becomes
    /// `/mnt/sdcard/boot/config.txt`.  Ownership and mode are unchanged.
    pub fn rebased(&self, root: &Path) -> Self {
        let relative: PathBuf = self
            .path
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        Self {
            path: root.join(relative),
            ..self.clone()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_mode_parses_three_digit_octal() {
        let mode: FileMode = "755".parse().unwrap();
        assert_eq!(mode.bits(), 0o755);
    }

    #[test]
    fn test_file_mode_parses_leading_zero_and_prefix() {
        assert_eq!("0644".parse::<FileMode>().unwrap().bits(), 0o644);
        assert_eq!("0o600".parse::<FileMode>().unwrap().bits(), 0o600);
    }

    #[test]
    fn test_file_mode_rejects_non_octal_digits() {
        let result = "789".parse::<FileMode>();
        assert_eq!(result, Err(ModeError::NotOctal("789".to_string())));
    }

    #[test]
    fn test_file_mode_rejects_empty_string() {
        assert!("".parse::<FileMode>().is_err());
        assert!("0o".parse::<FileMode>().is_err());
    }

    #[test]
    fn test_file_mode_rejects_values_above_7777() {
        assert_eq!("17777".parse::<FileMode>(), Err(ModeError::OutOfRange(0o17777)));
    }

    #[test]
    fn test_file_mode_displays_as_padded_octal() {
        assert_eq!(FileMode::new(0o644).unwrap().to_string(), "644");
        assert_eq!(FileMode::new(0o7).unwrap().to_string(), "007");
        assert_eq!(FileMode::new(0o4755).unwrap().to_string(), "4755");
    }

    #[test]
    fn test_file_mode_toml_uses_octal_string() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: FileMode,
        }

        // Arrange
        let wrapper: Wrapper = toml::from_str(r#"mode = "755""#).expect("deserialize");

        // Act
        let text = toml::to_string(&wrapper).expect("serialize");

        // Assert
        assert_eq!(wrapper.mode.bits(), 0o755);
        assert!(text.contains(r#"mode = "755""#), "got {text}");
    }

    #[test]
    fn test_rebased_joins_absolute_path_under_root() {
        // Arrange
        let target = TargetFile::new("/boot/config.txt", "root", "root", FileMode::new(0o755).unwrap());

        // Act
        let rebased = target.rebased(Path::new("/mnt/sdcard"));

        // Assert
        assert_eq!(rebased.path, PathBuf::from("/mnt/sdcard/boot/config.txt"));
        assert_eq!(rebased.owner, "root");
        assert_eq!(rebased.mode, target.mode);
    }
}
