/// Value object representing a hashed password
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// Plaintext password as submitted by the client.
///
/// Lives only until it is hashed; `Debug` never prints the value.
#[derive(Clone)]
pub struct RawPassword(String);

impl RawPassword {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_password_debug_is_redacted() {
        let password = RawPassword::new("Str0ngP@ss".to_string());
        let printed = format!("{:?}", password);
        assert!(!printed.contains("Str0ngP@ss"));
        assert_eq!(password.expose(), "Str0ngP@ss");
    }
}
