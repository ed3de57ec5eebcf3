//! Client-side cookie persistence for the session token.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cookie name the session token is stored under
pub const AUTH_COOKIE: &str = "auth";

/// Cookie jar file name in cache directory
const COOKIE_FILE: &str = "cookies.json";

/// Key/value cookie storage. Reads skip expired cookies.
pub trait CookieJar: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Store a session cookie (no expiry date)
    fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Clear a cookie by giving it an empty value and an expiry in the past
    fn expire(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    #[serde(default)]
    expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn session(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expires: None,
        }
    }

    fn expired() -> Self {
        Self {
            value: String::new(),
            expires: Some(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    fn is_live(&self) -> bool {
        self.expires.map(|at| at > Utc::now()).unwrap_or(true)
    }
}

/// Cookie jar persisted as JSON in the cache directory.
pub struct FileCookieJar {
    cache_dir: PathBuf,
}

impl FileCookieJar {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn jar_path(&self) -> PathBuf {
        self.cache_dir.join(COOKIE_FILE)
    }

    fn read_contents(&self) -> Result<Option<String>> {
        let path = self.jar_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read cookie jar")?;
        Ok(Some(contents))
    }

    fn read_all(&self) -> Result<HashMap<String, StoredCookie>> {
        match self.read_contents()? {
            Some(contents) => serde_json::from_str(&contents).context("Failed to parse cookie jar"),
            None => Ok(HashMap::new()),
        }
    }

    fn write_all(&self, cookies: &HashMap<String, StoredCookie>) -> Result<()> {
        let path = self.jar_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(cookies)?;
        std::fs::write(path, contents).context("Failed to write cookie jar")?;
        Ok(())
    }

    fn put(&self, name: &str, cookie: StoredCookie) -> Result<()> {
        // A corrupt jar is replaced; I/O failures are not
        let mut cookies = match self.read_contents()? {
            Some(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(error = %e, "Replacing corrupt cookie jar");
                HashMap::new()
            }),
            None => HashMap::new(),
        };
        cookies.insert(name.to_string(), cookie);
        self.write_all(&cookies)
    }
}

impl CookieJar for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .read_all()?
            .remove(name)
            .filter(StoredCookie::is_live)
            .map(|c| c.value))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.put(name, StoredCookie::session(value))
    }

    fn expire(&self, name: &str) -> Result<()> {
        self.put(name, StoredCookie::expired())
    }
}

/// In-process cookie jar.
#[derive(Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar that starts with one live cookie
    pub fn with_cookie(name: &str, value: &str) -> Self {
        let jar = Self::default();
        jar.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), StoredCookie::session(value));
        jar
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cookies
            .get(name)
            .filter(|c| c.is_live())
            .map(|c| c.value.clone()))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), StoredCookie::session(value));
        Ok(())
    }

    fn expire(&self, name: &str) -> Result<()> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), StoredCookie::expired());
        Ok(())
    }
}
