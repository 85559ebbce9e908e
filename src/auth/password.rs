use thiserror::Error;

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Salted one-way digests for passwords and security answers
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(plain, self.cost)?)
    }

    /// Compare a candidate against a stored digest; a malformed digest is an error, not a mismatch
    pub fn verify(&self, plain: &str, digest: &str) -> Result<bool, HashError> {
        Ok(bcrypt::verify(plain, digest)?)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_verifies_only_the_original() {
        let hasher = CredentialHasher::new(4);
        let digest = hasher.hash("correct horse").unwrap();

        assert_ne!(digest, "correct horse");
        assert!(hasher.verify("correct horse", &digest).unwrap());
        assert!(!hasher.verify("battery staple", &digest).unwrap());
    }

    #[test]
    fn digests_are_salted() {
        let hasher = CredentialHasher::new(4);
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        assert!(CredentialHasher::new(4).verify("x", "not-a-digest").is_err());
    }
}
