//! Login credentials read from a plaintext YAML file.
//!
//! Every top-level key starting with `user_` is posted verbatim as a login
//! form field, e.g.
//!
//! ```yaml
//! user_name: alice@example.org
//! user_password: hunter2
//! ```

use crate::error::ReportError;
use crate::token::CSRF_FIELD;
use log::{debug, warn};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::Path;

const FIELD_PREFIX: &str = "user_";
const CAPTCHA_FIELD: &str = "captcha";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    fields: Vec<(String, String)>,
}

impl Credentials {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ReportError> {
        let mapping = match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err(ReportError::MissingCredentials),
            _ => return Err(ReportError::InvalidConfig("top level must be a mapping")),
        };

        let mut fields = Vec::new();
        for (key, value) in mapping {
            let Value::String(key) = key else { continue };
            if !key.starts_with(FIELD_PREFIX) {
                continue;
            }
            match value {
                Value::String(s) => fields.push((key, s)),
                Value::Number(n) => fields.push((key, n.to_string())),
                // Capitalised, as Django renders booleans.
                Value::Bool(b) => {
                    let value = if b { "True" } else { "False" };
                    fields.push((key, value.to_string()))
                }
                Value::Null => {
                    warn!("Config key {} has no value; leaving it out of the login form", key)
                }
                _ => return Err(ReportError::InvalidConfigValue { key }),
            }
        }

        if fields.is_empty() {
            return Err(ReportError::MissingCredentials);
        }
        Ok(Self { fields })
    }

    /// Names of the credential fields, in file order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Body of the login POST: token, empty captcha, then the credential fields.
    pub fn login_form(&self, csrf_token: &str) -> Vec<(String, String)> {
        let mut form = Vec::with_capacity(self.fields.len() + 2);
        form.push((CSRF_FIELD.to_string(), csrf_token.to_string()));
        form.push((CAPTCHA_FIELD.to_string(), String::new()));
        form.extend(self.fields.iter().cloned());
        form
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}
