//! QR payload decryption
//!
//! Certificates arrive as an opaque `encryptedData` string produced by the
//! wipe tool. [`PayloadDecryptor`] is the seam where the real scheme plugs
//! in; [`PlaceholderDecryptor`] fabricates plausible details meanwhile.

use rand::Rng;

use crate::models::CertificateDetails;

pub const DEFAULT_DEVICE_NAME: &str = "Decrypted Device from QR";
pub const DEFAULT_SERIAL_PREFIX: &str = "SN-";
pub const PLACEHOLDER_WIPE_METHOD: &str = "NIST SP 800-88 Purge";
pub const PLACEHOLDER_STATUS: &str = "Completed";

/// Random characters appended to the serial prefix
const SERIAL_SUFFIX_LEN: usize = 9;

const BASE36_UPPER: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Payload could not be turned into certificate details
#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("payload could not be decrypted: {0}")]
    Invalid(String),
}

/// Turns an encrypted QR payload into certificate details.
pub trait PayloadDecryptor: Send + Sync {
    fn decrypt(&self, user_id: &str, payload: &str) -> Result<CertificateDetails, DecryptError>;
}

/// Ignores the payload and synthesizes a record with a random serial.
#[derive(Debug, Clone)]
pub struct PlaceholderDecryptor {
    device_name: String,
    serial_prefix: String,
}

impl PlaceholderDecryptor {
    pub fn new(device_name: impl Into<String>, serial_prefix: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            serial_prefix: serial_prefix.into(),
        }
    }

    fn serial_number(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SERIAL_SUFFIX_LEN)
            .map(|_| BASE36_UPPER[rng.gen_range(0..BASE36_UPPER.len())] as char)
            .collect();
        format!("{}{}", self.serial_prefix, suffix)
    }
}

impl Default for PlaceholderDecryptor {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_NAME, DEFAULT_SERIAL_PREFIX)
    }
}

impl PayloadDecryptor for PlaceholderDecryptor {
    fn decrypt(&self, _user_id: &str, _payload: &str) -> Result<CertificateDetails, DecryptError> {
        Ok(CertificateDetails {
            device_name: self.device_name.clone(),
            serial_number: self.serial_number(),
            wipe_method: PLACEHOLDER_WIPE_METHOD.to_string(),
            status: PLACEHOLDER_STATUS.to_string(),
        })
    }
}
