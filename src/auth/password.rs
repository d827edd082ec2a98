use base64::{engine::general_purpose, Engine as _};
use constant_time_eq::constant_time_eq;
use pbkdf2::hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;

const ALGORITHM: &str = "pbkdf2_sha256";
const HASH_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 hashes in `pbkdf2_sha256$iterations$salt$hash` form.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = derive(password, &salt, self.iterations)?;

        Ok(format!("{ALGORITHM}${}${salt}${digest}", self.iterations))
    }

    /// Checks against the iteration count stored in the hash, so changing
    /// the configured count does not invalidate existing passwords.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let parts: Vec<&str> = encoded.split('$').collect();
        if parts.len() != 4 || parts[0] != ALGORITHM {
            return false;
        }

        let iterations: u32 = match parts[1].parse() {
            Ok(iterations) if iterations > 0 => iterations,
            _ => return false,
        };

        match derive(password, parts[2], iterations) {
            Ok(computed) => constant_time_eq(computed.as_bytes(), parts[3].as_bytes()),
            Err(_) => false,
        }
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> Result<String, AppError> {
    let mut output = [0u8; HASH_LEN];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt.as_bytes(), iterations, &mut output)
        .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))?;

    Ok(general_purpose::STANDARD.encode(output))
}
