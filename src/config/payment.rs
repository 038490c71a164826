//! Payment gateway configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::payment::{MerchantKey, SignType};

use super::error::ValidationError;

/// Length of a merchant API key issued by the gateway console.
const API_KEY_LEN: usize = 32;

/// Merchant credentials and gateway endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Mini-program app ID (`appid`)
    pub app_id: String,

    /// Merchant number (`mch_id`)
    pub mch_id: String,

    /// Merchant API key used for every signature
    pub api_key: SecretString,

    /// Signature algorithm for submitted orders
    #[serde(default)]
    pub sign_type: SignType,

    /// Gateway base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Callback URL registered on every order
    pub notify_url: String,

    /// Gateway request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Reject callbacks whose `sign` does not match the merchant key
    #[serde(default = "default_true")]
    pub verify_notification_signature: bool,

    /// Check `sign` on unified-order replies
    #[serde(default)]
    pub verify_response_signature: bool,
}

impl PaymentConfig {
    /// Merchant key paired with the configured algorithm
    pub fn merchant_key(&self) -> MerchantKey {
        MerchantKey::new(self.api_key.expose_secret().as_str(), self.sign_type)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__APP_ID"));
        }
        if self.mch_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MCH_ID"));
        }

        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__API_KEY"));
        }
        if key.chars().count() != API_KEY_LEN {
            return Err(ValidationError::InvalidApiKey);
        }

        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if !is_http_url(&self.notify_url) || self.notify_url.contains('?') {
            return Err(ValidationError::InvalidNotifyUrl);
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_base_url() -> String {
    "https://api.mch.weixin.qq.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig {
            app_id: "wx2421b1c4370ec43b".to_string(),
            mch_id: "10000100".to_string(),
            api_key: SecretString::new("192006250b4c09247ec02edce69f6a2d".to_string()),
            sign_type: SignType::Md5,
            base_url: default_base_url(),
            notify_url: "https://merchant.example.com/notify/paid".to_string(),
            request_timeout_secs: default_request_timeout(),
            verify_notification_signature: true,
            verify_response_signature: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_app_id() {
        let config = PaymentConfig {
            app_id: String::new(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYMENT__APP_ID"))
        );
    }

    #[test]
    fn test_short_api_key_is_rejected() {
        let config = PaymentConfig {
            api_key: SecretString::new("short".to_string()),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidApiKey));
    }

    #[test]
    fn test_empty_api_key_is_missing() {
        let config = PaymentConfig {
            api_key: SecretString::new(String::new()),
            ..valid_config()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYMENT__API_KEY"))
        );
    }

    #[test]
    fn test_base_url_must_be_http() {
        let config = PaymentConfig {
            base_url: "api.mch.weixin.qq.com".to_string(),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_notify_url_rejects_query_string() {
        let config = PaymentConfig {
            notify_url: "https://merchant.example.com/notify?id=1".to_string(),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidNotifyUrl));
    }

    #[test]
    fn test_timeout_bounds() {
        let config = PaymentConfig {
            request_timeout_secs: 0,
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_merchant_key_carries_sign_type() {
        let config = PaymentConfig {
            sign_type: SignType::HmacSha256,
            ..valid_config()
        };
        let key = config.merchant_key();
        assert_eq!(key.sign_type(), SignType::HmacSha256);
        assert_eq!(key.expose(), "192006250b4c09247ec02edce69f6a2d");
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let debug = format!("{:?}", valid_config());
        assert!(!debug.contains("192006250b4c09247ec02edce69f6a2d"));
    }
}
