//! Encrypted file-based key-value storage
//!
//! Values are kept as a JSON map encrypted with AES-256-GCM in a single file
//! (~/.config/campusfeed/session.enc by default). The encryption key is
//! derived from machine-specific identifiers.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Context, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::paths;

const NONCE_SIZE: usize = 12;

/// Get machine ID for key derivation (cross-platform)
fn get_machine_id() -> String {
    // Linux: /etc/machine-id or /var/lib/dbus/machine-id
    #[cfg(target_os = "linux")]
    {
        if let Ok(id) = fs::read_to_string("/etc/machine-id") {
            return id.trim().to_string();
        }
        if let Ok(id) = fs::read_to_string("/var/lib/dbus/machine-id") {
            return id.trim().to_string();
        }
    }

    // macOS: IOPlatformUUID via ioreg
    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(uuid) = stdout
                .lines()
                .find(|line| line.contains("IOPlatformUUID"))
                .and_then(|line| line.split('"').nth(3))
            {
                return uuid.to_string();
            }
        }
    }

    dirs::home_dir().map_or_else(
        || "campusfeed-fallback-key".to_string(),
        |p| p.to_string_lossy().to_string(),
    )
}

/// Derive the encryption key from machine-specific data
pub fn derive_key() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(get_machine_id().as_bytes());

    if let Some(home) = dirs::home_dir() {
        hasher.update(home.to_string_lossy().as_bytes());
    }

    hasher.update(b"campusfeed-session-v1");
    hasher.finalize().into()
}

/// Key-value store persisted as one encrypted file
pub struct EncryptedFileStore {
    path: PathBuf,
    key: [u8; 32],
}

impl EncryptedFileStore {
    /// Open the store at the default session path
    pub fn open() -> Result<Self> {
        Ok(Self::open_path(paths::session_path()?))
    }

    /// Open the store at a specific path with the machine-derived key
    pub fn open_path(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, derive_key())
    }

    /// Open the store at a specific path with an explicit key
    pub fn with_key(path: impl Into<PathBuf>, key: [u8; 32]) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|_| anyhow::anyhow!("Invalid key length"))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let encrypted = fs::read(&self.path).context("Failed to read session file")?;

        if encrypted.len() < NONCE_SIZE {
            return Ok(HashMap::new());
        }

        let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher()?
            .decrypt(nonce, ciphertext)
            .map_err(|_| anyhow::anyhow!("Failed to decrypt session file"))?;

        let json = String::from_utf8(plaintext).context("Invalid UTF-8 in session file")?;
        serde_json::from_str(&json).context("Invalid session file contents")
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        let json = serde_json::to_string(values)?;

        let mut rng = rand::rng();
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rng.fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()?
            .encrypt(nonce, json.as_bytes())
            .map_err(|_| anyhow::anyhow!("Failed to encrypt session"))?;

        let mut output = nonce_bytes.to_vec();
        output.extend(ciphertext);

        fs::write(&self.path, output).context("Failed to write session file")?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl KeyValueStore for EncryptedFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.load().unwrap_or_default();
        if values.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&values)
    }
}
