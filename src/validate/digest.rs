use super::{Payload, PayloadError, ValidationError, Validator};
use sha2::{Digest, Sha256};

/// Matches candidates against a SHA-256 digest stored in the target file.
#[derive(Debug, Clone)]
pub struct DigestValidator {
    expected: [u8; 32],
}

impl DigestValidator {
    /// Parse a hex digest; surrounding whitespace and letter case are ignored.
    pub fn from_hex(digest: &str) -> Result<Self, PayloadError> {
        let decoded = hex::decode(digest.trim())
            .map_err(|e| PayloadError::InvalidDigest(e.to_string()))?;
        let expected: [u8; 32] = decoded.try_into().map_err(|bytes: Vec<u8>| {
            PayloadError::InvalidDigest(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self { expected })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(payload.bytes())
            .map_err(|_| PayloadError::InvalidDigest("file is not UTF-8 text".to_string()))?;
        Self::from_hex(text)
    }

    /// Hex digest of `candidate`, handy for preparing targets.
    pub fn digest_of(candidate: &str) -> String {
        hex::encode(Sha256::digest(candidate.as_bytes()))
    }
}

impl Validator for DigestValidator {
    fn validate(&self, candidate: &str) -> Result<bool, ValidationError> {
        Ok(Sha256::digest(candidate.as_bytes()).as_slice() == self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("abc")
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_matches_known_digest() {
        let validator = DigestValidator::from_hex(ABC).unwrap();
        assert_eq!(validator.validate("abc"), Ok(true));
        assert_eq!(validator.validate("abd"), Ok(false));
        assert_eq!(DigestValidator::digest_of("abc"), ABC);
    }

    #[test]
    fn test_accepts_uppercase_and_whitespace() {
        let contents = format!("  {}\n", ABC.to_uppercase());
        let payload = Payload::from_bytes("target.sha256", contents.into_bytes());
        let validator = DigestValidator::from_payload(&payload).unwrap();
        assert_eq!(validator.validate("abc"), Ok(true));
    }

    #[test]
    fn test_rejects_malformed_digest() {
        assert!(matches!(
            DigestValidator::from_hex("not hex"),
            Err(PayloadError::InvalidDigest(_))
        ));
        assert!(matches!(
            DigestValidator::from_hex("abcd"),
            Err(PayloadError::InvalidDigest(_))
        ));
    }
}
