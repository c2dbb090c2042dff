use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};

// The digest covers the base64 token as sent on the wire, not the decoded
// credentials, so a stored digest file stays client-compatible.
pub fn encode_auth(login: &str, password: &str) -> String {
    let token = general_purpose::STANDARD.encode(format!("{login}:{password}"));
    sha256_hex(token.as_bytes())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

pub struct AuthGate {
    digest: Option<String>,
    realm: String,
}

impl AuthGate {
    pub fn open(realm: &str) -> Self {
        Self {
            digest: None,
            realm: realm.to_string(),
        }
    }

    pub fn from_credentials(realm: &str, login: &str, password: &str) -> Self {
        Self {
            digest: Some(encode_auth(login, password)),
            realm: realm.to_string(),
        }
    }

    pub fn from_digest(realm: &str, digest: &str) -> Self {
        Self {
            digest: Some(digest.trim_matches([' ', '\r', '\n']).to_string()),
            realm: realm.to_string(),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn authorize(&self, header: Option<&str>) -> bool {
        let Some(expected) = self.digest.as_deref() else {
            return true;
        };
        if expected.is_empty() {
            return true;
        }
        let Some(header) = header else {
            return false;
        };
        let Some(token) = header.strip_prefix("Basic ") else {
            return false;
        };

        sha256_hex(token.as_bytes()) == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_DIGEST: &str = "cbd3e42053102d75d628072b749cfd642a14028fc671f54a5f9a3d561bd9b5e4";

    #[test]
    fn digest_covers_the_wire_token() {
        assert_eq!(encode_auth("admin", "p@ssw0rd"), ADMIN_DIGEST);
        assert_eq!(
            encode_auth("webgpio", "raspberry"),
            "4bb8a9c5ec59d1bd50b24df25e03b20cead1da2bf8e6a190ce97e32db6f0d8e8"
        );
    }

    #[test]
    fn credentials_and_stored_digest_agree() {
        let header = Some("Basic YWRtaW46cEBzc3cwcmQ=");

        let gate = AuthGate::from_credentials("webgpio", "admin", "p@ssw0rd");
        assert!(gate.authorize(header));

        let gate = AuthGate::from_digest("webgpio", ADMIN_DIGEST);
        assert!(gate.authorize(header));
    }

    #[test]
    fn rejects_wrong_or_malformed_headers() {
        let gate = AuthGate::from_credentials("webgpio", "admin", "p@ssw0rd");
        assert!(!gate.authorize(None));
        assert!(!gate.authorize(Some("Basic YWRtaW46d3Jvbmc=")));
        assert!(!gate.authorize(Some("Bearer YWRtaW46cEBzc3cwcmQ=")));
        assert!(!gate.authorize(Some("YWRtaW46cEBzc3cwcmQ=")));
    }

    #[test]
    fn missing_or_empty_digest_admits_everyone() {
        assert!(AuthGate::open("webgpio").authorize(None));
        assert!(AuthGate::from_digest("webgpio", "  \r\n").authorize(None));
    }

    #[test]
    fn stored_digest_is_trimmed() {
        let gate = AuthGate::from_digest("webgpio", &format!(" {ADMIN_DIGEST}\r\n"));
        assert!(gate.authorize(Some("Basic YWRtaW46cEBzc3cwcmQ=")));
    }
}
