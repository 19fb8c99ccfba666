use crate::config::Config;

/// Decides whether a submitted username/password pair grants admin access.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single admin account configured from the environment.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.admin_username, &config.admin_password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_pair_is_accepted() {
        let credentials = StaticCredentials::new("admin", "1234");
        assert!(credentials.verify("admin", "1234"));
        assert!(!credentials.verify("admin", "12345"));
        assert!(!credentials.verify("Admin", "1234"));
        assert!(!credentials.verify("", ""));
    }
}
