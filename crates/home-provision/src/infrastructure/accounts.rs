//! User and group name resolution.
//!
//! Targets name their owner and group the way `chown` does (`root:root`).
//! Names are looked up in `etc/passwd` and `etc/group` under the provisioning
//! root, which is `/` on a live system and the mount point when editing an
//! SD-card image from another machine.  Reading the files of the *target*
//! root matters in the second case: uids on the workstation mean nothing on
//! the Pi.
//!
//! Numeric ids (`"0"`, `"1000"`) are accepted as-is and never looked up.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::application::ensure_line::EditError;

/// Name-to-id tables for users and groups.
#[derive(Debug, Default, Clone)]
pub struct AccountDatabase {
    users: HashMap<String, u32>,
    groups: HashMap<String, u32>,
}

impl AccountDatabase {
    /// Loads `<root>/etc/passwd` and `<root>/etc/group`.
    ///
    /// A missing file yields an empty table, so numeric ids keep working in
    /// minimal images.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Read`] for I/O failures other than "not found".
    pub fn load(root: &Path) -> Result<Self, EditError> {
        let passwd = read_table(&root.join("etc/passwd"))?;
        let group = read_table(&root.join("etc/group"))?;
        Ok(Self::from_tables(&passwd, &group))
    }

    /// Builds the database from the text of a passwd file and a group file.
    pub fn from_tables(passwd: &str, group: &str) -> Self {
        Self {
            users: parse_table(passwd),
            groups: parse_table(group),
        }
    }

    /// Resolves a user name or numeric uid.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownUser`] if the name is not in the table.
    pub fn resolve_user(&self, name: &str) -> Result<u32, EditError> {
        resolve(&self.users, name).ok_or_else(|| EditError::UnknownUser(name.to_string()))
    }

    /// Resolves a group name or numeric gid.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownGroup`] if the name is not in the table.
    pub fn resolve_group(&self, name: &str) -> Result<u32, EditError> {
        resolve(&self.groups, name).ok_or_else(|| EditError::UnknownGroup(name.to_string()))
    }
}

fn resolve(table: &HashMap<String, u32>, name: &str) -> Option<u32> {
    name.parse().ok().or_else(|| table.get(name).copied())
}

fn read_table(path: &Path) -> Result<String, EditError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found; only numeric ids will resolve", path.display());
            Ok(String::new())
        }
        Err(source) => Err(EditError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parses `name:password:id:...` lines.  Both passwd and group files keep the
/// numeric id in the third field.
fn parse_table(text: &str) -> HashMap<String, u32> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split(':');
            let name = fields.next()?;
            let id = fields.nth(1)?.parse().ok()?;
            Some((name.to_string(), id))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
# comment line
pi:x:1000:1000:,,,:/home/pi:/bin/bash
broken-line
";

    const GROUP: &str = "\
root:x:0:
i2c:x:998:pi
pi:x:1000:
";

    fn db() -> AccountDatabase {
        AccountDatabase::from_tables(PASSWD, GROUP)
    }

    #[test]
    fn test_resolve_user_by_name() {
        assert_eq!(db().resolve_user("root").unwrap(), 0);
        assert_eq!(db().resolve_user("pi").unwrap(), 1000);
    }

    #[test]
    fn test_resolve_group_by_name() {
        assert_eq!(db().resolve_group("i2c").unwrap(), 998);
    }

    #[test]
    fn test_numeric_ids_bypass_lookup() {
        let empty = AccountDatabase::default();
        assert_eq!(empty.resolve_user("1234").unwrap(), 1234);
        assert_eq!(empty.resolve_group("42").unwrap(), 42);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        assert!(matches!(db().resolve_user("nobody"), Err(EditError::UnknownUser(n)) if n == "nobody"));
        assert!(matches!(db().resolve_group("wheel"), Err(EditError::UnknownGroup(n)) if n == "wheel"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let db = db();
        assert!(db.resolve_user("broken-line").is_err());
        assert!(db.resolve_user("# comment line").is_err());
    }

    #[test]
    fn test_load_from_root_without_etc_yields_empty_tables() {
        // Arrange: a root directory that does not contain etc/passwd.
        let root = std::env::temp_dir().join(format!("home_accounts_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();

        // Act
        let db = AccountDatabase::load(&root).expect("missing tables are not an error");

        // Assert
        assert!(db.resolve_user("root").is_err());
        assert_eq!(db.resolve_user("0").unwrap(), 0);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_load_reads_tables_under_root() {
        // Arrange
        let root = std::env::temp_dir().join(format!("home_accounts_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("etc")).unwrap();
        std::fs::write(root.join("etc/passwd"), PASSWD).unwrap();
        std::fs::write(root.join("etc/group"), GROUP).unwrap();

        // Act
        let db = AccountDatabase::load(&root).unwrap();

        // Assert
        assert_eq!(db.resolve_user("pi").unwrap(), 1000);
        assert_eq!(db.resolve_group("i2c").unwrap(), 998);

        std::fs::remove_dir_all(&root).ok();
    }
}
