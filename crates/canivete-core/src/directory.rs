//! Access directory: identities, roles, and the flat credentials file.
//!
//! The pipeline only ever reads `(username, role)` from here; account
//! management is a collaborator concern with a small, explicit contract.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::DirectoryError;
use crate::models::config::CookieConfig;

/// Role attached to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses and downloads every client's reports; manages accounts.
    Accountant,
    /// Uploads invoices into an exclusive report namespace.
    Client,
}

/// A directory entry as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login username, also the storage namespace for clients.
    pub username: String,

    /// Person or company display name.
    pub display_name: String,

    /// Role deciding what the identity may do.
    pub role: Role,
}

/// Directory of identities backing authentication and authorization.
pub trait AccessDirectory {
    /// Look up an identity by username.
    fn lookup(&self, username: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Create a new identity. Fails with [`DirectoryError::DuplicateIdentity`]
    /// when the username is taken; the existing entry is left untouched.
    fn create(&self, identity: &Identity, password: &str) -> Result<(), DirectoryError>;

    /// Remove an identity.
    fn delete(&self, username: &str) -> Result<(), DirectoryError>;

    /// Check a password against the stored digest. Unknown usernames
    /// verify as false.
    fn verify(&self, username: &str, password: &str) -> Result<bool, DirectoryError>;

    /// Usernames of all client-role identities, sorted.
    fn list_clients(&self) -> Result<Vec<Identity>, DirectoryError>;

    /// Whether any accountant identity exists yet.
    fn has_accountant(&self) -> Result<bool, DirectoryError>;
}

/// On-disk entry in the credentials file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    name: String,
    password: String,
    role: Role,
}

/// Shape of the credentials file: users plus the session-cookie parameters
/// consumed by the web front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CredentialsFile {
    usernames: BTreeMap<String, StoredUser>,
    cookie: CookieConfig,
}

/// Access directory persisted as a JSON credentials file.
///
/// The file is reloaded on every operation and rewritten atomically on
/// every change.
#[derive(Debug, Clone)]
pub struct FileAccessDirectory {
    path: PathBuf,
}

impl FileAccessDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Session cookie parameters stored alongside the credentials.
    pub fn cookie(&self) -> Result<CookieConfig, DirectoryError> {
        Ok(self.load()?.cookie)
    }

    fn load(&self) -> Result<CredentialsFile, DirectoryError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CredentialsFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, file: &CredentialsFile) -> Result<(), DirectoryError> {
        let content = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Hex SHA-256 digest of a password.
fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

impl AccessDirectory for FileAccessDirectory {
    fn lookup(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        let file = self.load()?;
        Ok(file.usernames.get(username).map(|user| Identity {
            username: username.to_string(),
            display_name: user.name.clone(),
            role: user.role,
        }))
    }

    fn create(&self, identity: &Identity, password: &str) -> Result<(), DirectoryError> {
        let mut file = self.load()?;

        if file.usernames.contains_key(&identity.username) {
            return Err(DirectoryError::DuplicateIdentity {
                username: identity.username.clone(),
            });
        }

        file.usernames.insert(
            identity.username.clone(),
            StoredUser {
                name: identity.display_name.clone(),
                password: password_digest(password),
                role: identity.role,
            },
        );
        self.save(&file)?;

        info!(username = %identity.username, role = ?identity.role, "created identity");
        Ok(())
    }

    fn delete(&self, username: &str) -> Result<(), DirectoryError> {
        let mut file = self.load()?;

        if file.usernames.remove(username).is_none() {
            return Err(DirectoryError::UnknownIdentity {
                username: username.to_string(),
            });
        }
        self.save(&file)?;

        info!(username, "deleted identity");
        Ok(())
    }

    fn verify(&self, username: &str, password: &str) -> Result<bool, DirectoryError> {
        let file = self.load()?;
        Ok(file
            .usernames
            .get(username)
            .map(|user| user.password == password_digest(password))
            .unwrap_or(false))
    }

    fn list_clients(&self) -> Result<Vec<Identity>, DirectoryError> {
        let file = self.load()?;
        // BTreeMap iteration keeps the list sorted by username
        Ok(file
            .usernames
            .iter()
            .filter(|(_, user)| user.role == Role::Client)
            .map(|(username, user)| Identity {
                username: username.clone(),
                display_name: user.name.clone(),
                role: user.role,
            })
            .collect())
    }

    fn has_accountant(&self) -> Result<bool, DirectoryError> {
        let file = self.load()?;
        Ok(file
            .usernames
            .values()
            .any(|user| user.role == Role::Accountant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory() -> (tempfile::TempDir, FileAccessDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let directory = FileAccessDirectory::new(dir.path().join("users.json"));
        (dir, directory)
    }

    fn client(username: &str) -> Identity {
        Identity {
            username: username.to_string(),
            display_name: format!("{username} LTDA"),
            role: Role::Client,
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let (_tmp, directory) = directory();

        directory.create(&client("joao_silva"), "senha123").unwrap();

        let found = directory.lookup("joao_silva").unwrap().unwrap();
        assert_eq!(found.display_name, "joao_silva LTDA");
        assert_eq!(found.role, Role::Client);
        assert_eq!(directory.lookup("desconhecido").unwrap(), None);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_tmp, directory) = directory();

        directory.create(&client("joao_silva"), "senha123").unwrap();
        let err = directory
            .create(&client("joao_silva"), "outra")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateIdentity { .. }));

        // The original password still verifies
        assert!(directory.verify("joao_silva", "senha123").unwrap());
    }

    #[test]
    fn test_verify_password() {
        let (_tmp, directory) = directory();
        directory.create(&client("joao_silva"), "senha123").unwrap();

        assert!(directory.verify("joao_silva", "senha123").unwrap());
        assert!(!directory.verify("joao_silva", "errada").unwrap());
        assert!(!directory.verify("desconhecido", "senha123").unwrap());
    }

    #[test]
    fn test_delete() {
        let (_tmp, directory) = directory();
        directory.create(&client("joao_silva"), "senha123").unwrap();

        directory.delete("joao_silva").unwrap();
        assert_eq!(directory.lookup("joao_silva").unwrap(), None);

        let err = directory.delete("joao_silva").unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownIdentity { .. }));
    }

    #[test]
    fn test_roles_and_listing() {
        let (_tmp, directory) = directory();
        assert!(!directory.has_accountant().unwrap());

        directory
            .create(
                &Identity {
                    username: "escritorio".to_string(),
                    display_name: "Escritório Contábil".to_string(),
                    role: Role::Accountant,
                },
                "senha",
            )
            .unwrap();
        directory.create(&client("bruna"), "s1").unwrap();
        directory.create(&client("alice"), "s2").unwrap();

        assert!(directory.has_accountant().unwrap());

        let clients: Vec<String> = directory
            .list_clients()
            .unwrap()
            .into_iter()
            .map(|i| i.username)
            .collect();
        assert_eq!(clients, vec!["alice", "bruna"]);
    }
}
