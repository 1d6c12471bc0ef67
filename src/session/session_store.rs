use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::session::{SESSION_COOKIE_NAME, SessionState, SetCookie, find_cookie};
use crate::theme::Theme;

const SESSION_FORMAT_VERSION: u8 = 1;
const MAC_LEN: usize = blake3::OUT_LEN;
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;
const COMPRESSION_LEVEL: i32 = 3;
const KEY_DERIVATION_CONTEXT: &str = "boron-files session cookie v1";

/// Browsers commonly drop cookies above this size.
const MAX_COOKIE_BYTES: usize = 4096;

/// Cookie-backed session storage.
///
/// The cookie value is `mac || version || zstd(bincode(state))`, in
/// unpadded URL-safe base64. The MAC is a BLAKE3 keyed hash. The first secret signs;
/// every secret is accepted when verifying, so secrets can be rotated by
/// prepending a new one.
#[derive(Clone)]
pub struct SessionStore {
    signing_key: [u8; 32],
    verification_keys: Vec<[u8; 32]>,
    default_theme: Theme,
}

impl SessionStore {
    pub fn new(
        secrets: &[String],
        default_theme: Theme,
    ) -> Result<Self, SessionStoreCreationError> {
        let verification_keys = secrets
            .iter()
            .filter(|secret| !secret.is_empty())
            .map(|secret| blake3::derive_key(KEY_DERIVATION_CONTEXT, secret.as_bytes()))
            .collect::<Vec<_>>();
        let signing_key = *verification_keys.first().context(NoSecretsSnafu)?;
        debug!(
            "Session store created with {} verification key(s)",
            verification_keys.len()
        );

        Ok(Self {
            signing_key,
            verification_keys,
            default_theme,
        })
    }

    pub fn default_theme(&self) -> &Theme {
        &self.default_theme
    }

    /// Reads the session from a `Cookie` request header. Missing, tampered or
    /// otherwise unreadable cookies yield a fresh session.
    pub fn load(&self, cookie_header: Option<&str>) -> SessionState {
        let Some(value) = cookie_header.and_then(|header| find_cookie(header, SESSION_COOKIE_NAME))
        else {
            debug!("No session cookie present, starting a fresh session");
            return SessionState::fresh(&self.default_theme);
        };

        match self.decode(value) {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding unreadable session cookie: {}", e);
                SessionState::fresh(&self.default_theme)
            }
        }
    }

    /// Serialises the session into a complete `Set-Cookie` header value.
    pub fn save(&self, state: &SessionState) -> Result<String, SessionEncodeError> {
        let payload =
            bincode::encode_to_vec(state, bincode::config::standard()).context(EncodeSnafu)?;
        let compressed =
            zstd::bulk::compress(&payload, COMPRESSION_LEVEL).context(CompressSnafu)?;

        let mut blob = Vec::with_capacity(compressed.len() + 1);
        blob.push(SESSION_FORMAT_VERSION);
        blob.extend_from_slice(&compressed);

        let header = SetCookie::session(self.seal(&blob)).to_string();
        if header.len() > MAX_COOKIE_BYTES {
            warn!(
                "Session cookie is {} bytes, browsers may refuse to store it",
                header.len()
            );
        }
        Ok(header)
    }

    fn seal(&self, blob: &[u8]) -> String {
        let mac = blake3::keyed_hash(&self.signing_key, blob);
        let mut bytes = Vec::with_capacity(MAC_LEN + blob.len());
        bytes.extend_from_slice(mac.as_bytes());
        bytes.extend_from_slice(blob);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn decode(&self, value: &str) -> Result<SessionState, SessionDecodeError> {
        let bytes = URL_SAFE_NO_PAD.decode(value).context(NotBase64Snafu)?;
        ensure!(bytes.len() > MAC_LEN + 1, TooShortSnafu { length: bytes.len() });

        let (mac, blob) = bytes.split_at(MAC_LEN);
        let mut mac_bytes = [0u8; MAC_LEN];
        mac_bytes.copy_from_slice(mac);
        let mac = blake3::Hash::from_bytes(mac_bytes);
        ensure!(
            self.verification_keys
                .iter()
                .any(|key| blake3::keyed_hash(key, blob) == mac),
            SignatureMismatchSnafu
        );

        let version = blob[0];
        ensure!(
            version == SESSION_FORMAT_VERSION,
            UnsupportedVersionSnafu { version }
        );

        let payload =
            zstd::bulk::decompress(&blob[1..], MAX_PAYLOAD_BYTES).context(DecompressSnafu)?;
        let (state, _): (SessionState, usize) =
            bincode::decode_from_slice(&payload, bincode::config::standard())
                .context(DecodeSnafu)?;
        Ok(state)
    }
}

#[derive(Debug, Snafu)]
pub enum SessionStoreCreationError {
    #[snafu(display("At least one non-empty session secret is required"))]
    NoSecrets,
}

#[derive(Debug, Snafu)]
pub enum SessionEncodeError {
    #[snafu(display("Failed to serialise the session"))]
    EncodeError { source: bincode::error::EncodeError },
    #[snafu(display("Failed to compress the session"))]
    CompressError { source: std::io::Error },
}

#[derive(Debug, Snafu)]
pub enum SessionDecodeError {
    #[snafu(display("Session cookie is not valid base64"))]
    NotBase64 { source: base64::DecodeError },
    #[snafu(display("Session cookie is too short ({} bytes)", length))]
    TooShort { length: usize },
    #[snafu(display("Session cookie signature does not match any secret"))]
    SignatureMismatch,
    #[snafu(display("Unsupported session format version {}", version))]
    UnsupportedVersion { version: u8 },
    #[snafu(display("Failed to decompress the session"))]
    DecompressError { source: std::io::Error },
    #[snafu(display("Failed to deserialise the session"))]
    DecodeError { source: bincode::error::DecodeError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Color;

    fn store(secrets: &[&str]) -> SessionStore {
        let secrets = secrets.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        SessionStore::new(&secrets, Theme::default()).expect("Failed to create store")
    }

    fn custom_state() -> SessionState {
        SessionState {
            files: "src/main.rs\nREADME.md".to_string(),
            theme: Theme {
                background: Color::new("#000000"),
                foreground: Color::new("#ffffff"),
                lines: Color::new("#ff0000"),
            },
        }
    }

    /// Turns a `Set-Cookie` value into the `Cookie` header a browser would send back.
    fn cookie_header(set_cookie: &str) -> String {
        set_cookie
            .split(';')
            .next()
            .expect("Set-Cookie has a name=value pair")
            .to_string()
    }

    #[test]
    fn test_new_requires_a_secret() {
        assert!(matches!(
            SessionStore::new(&[], Theme::default()),
            Err(SessionStoreCreationError::NoSecrets)
        ));
        assert!(matches!(
            SessionStore::new(&[String::new()], Theme::default()),
            Err(SessionStoreCreationError::NoSecrets)
        ));
    }

    #[test]
    fn test_missing_cookie_yields_fresh_session() {
        let store = store(&["secret"]);

        assert_eq!(store.load(None), SessionState::fresh(&Theme::default()));
        assert_eq!(
            store.load(Some("other=1")),
            SessionState::fresh(&Theme::default())
        );
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = store(&["secret"]);
        let state = custom_state();

        let set_cookie = store.save(&state).expect("Failed to save session");
        let loaded = store.load(Some(&format!("a=b; {}; c=d", cookie_header(&set_cookie))));

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_emits_cookie_attributes() {
        let set_cookie = store(&["secret"])
            .save(&custom_state())
            .expect("Failed to save session");

        assert!(set_cookie.starts_with("__session="));
        assert!(set_cookie.ends_with("; Max-Age=31536000; Path=/; HttpOnly; SameSite=Lax"));
    }

    #[test]
    fn test_cookie_from_other_secret_is_rejected() {
        let set_cookie = store(&["first"])
            .save(&custom_state())
            .expect("Failed to save session");

        let loaded = store(&["second"]).load(Some(&cookie_header(&set_cookie)));

        assert_eq!(loaded, SessionState::fresh(&Theme::default()));
    }

    #[test]
    fn test_rotated_secret_still_verifies() {
        let set_cookie = store(&["old"])
            .save(&custom_state())
            .expect("Failed to save session");

        let rotated = store(&["new", "old"]);
        let loaded = rotated.load(Some(&cookie_header(&set_cookie)));
        assert_eq!(loaded, custom_state());

        // Re-saving signs with the newest secret only.
        let resaved = rotated.save(&loaded).expect("Failed to save session");
        assert_eq!(store(&["new"]).load(Some(&cookie_header(&resaved))), loaded);
        assert_eq!(
            store(&["old"]).load(Some(&cookie_header(&resaved))),
            SessionState::fresh(&Theme::default())
        );
    }

    #[test]
    fn test_tampered_cookie_is_rejected() {
        let store = store(&["secret"]);
        let set_cookie = store.save(&custom_state()).expect("Failed to save session");
        let header = cookie_header(&set_cookie);
        let value = header.trim_start_matches("__session=");

        let mut bytes = URL_SAFE_NO_PAD.decode(value).expect("Cookie is base64");
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(&bytes);

        assert!(matches!(
            store.decode(&tampered),
            Err(SessionDecodeError::SignatureMismatch)
        ));
        assert_eq!(
            store.load(Some(&format!("__session={tampered}"))),
            SessionState::fresh(&Theme::default())
        );
    }

    #[test]
    fn test_short_and_garbage_cookies_are_rejected() {
        let store = store(&["secret"]);

        assert!(matches!(
            store.decode("abc"),
            Err(SessionDecodeError::TooShort { length: 2 })
        ));
        assert!(matches!(
            store.decode("not base64!"),
            Err(SessionDecodeError::NotBase64 { .. })
        ));
        assert!(matches!(
            store.decode(&"x".repeat(100)),
            Err(SessionDecodeError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let store = store(&["secret"]);
        let sealed = store.seal(&[9, 1, 2, 3]);

        assert!(matches!(
            store.decode(&sealed),
            Err(SessionDecodeError::UnsupportedVersion { version: 9 })
        ));
    }

    #[test]
    fn test_signed_but_corrupt_payload_is_rejected() {
        let store = store(&["secret"]);
        let sealed = store.seal(&[SESSION_FORMAT_VERSION, 0xde, 0xad, 0xbe, 0xef]);

        assert!(matches!(
            store.decode(&sealed),
            Err(SessionDecodeError::DecompressError { .. })
        ));
    }

    #[test]
    fn test_large_listing_still_round_trips() {
        let store = store(&["secret"]);
        let files = (0..500)
            .map(|i| format!("src/module_{i}/mod.rs"))
            .collect::<Vec<_>>()
            .join("\n");
        let state = SessionState {
            files,
            theme: Theme::default(),
        };

        let set_cookie = store.save(&state).expect("Failed to save session");
        assert_eq!(store.load(Some(&cookie_header(&set_cookie))), state);
    }

    #[test]
    fn test_cookie_value_is_compact_and_cookie_safe() {
        let store = store(&["secret"]);
        let files = (0..120)
            .map(|i| format!("packages/service_{i}/src/handlers/request_{i}.rs"))
            .collect::<Vec<_>>()
            .join("\n");
        let state = SessionState {
            files,
            theme: Theme::default(),
        };

        let set_cookie = store.save(&state).expect("Failed to save session");
        let header = cookie_header(&set_cookie);
        let value = header.trim_start_matches("__session=");
        let raw_len = URL_SAFE_NO_PAD.decode(value).expect("Cookie is base64").len();

        assert!(value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert!(value.len() <= raw_len.div_ceil(3) * 4);
        assert!(set_cookie.len() < MAX_COOKIE_BYTES);
    }
}
