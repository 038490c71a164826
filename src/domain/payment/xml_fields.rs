//! Generic name → text view of a gateway XML document.
//!
//! Structural deserialization cannot express "N dynamically named siblings"
//! (`coupon_id_0`, `coupon_id_1`, ...) and cannot tell which fields were
//! present on the wire. This second pass reads the direct children of the
//! `<xml>` root into an ordered map so both can be answered.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::errors::PaymentError;
use super::signer::{self, CanonicalFieldSet, SignType};

const ROOT_ELEMENT: &[u8] = b"xml";

/// Direct children of the `<xml>` root, keyed by element name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlFields {
    fields: BTreeMap<String, String>,
}

impl XmlFields {
    /// Parses a document, collecting the text of every root child.
    ///
    /// Nested elements below the first level are ignored. Text and CDATA
    /// sections are concatenated.
    ///
    /// # Errors
    ///
    /// Returns `MalformedNotification` if the document is not UTF-8, is not
    /// well-formed, or its root element is not `<xml>`.
    pub fn parse(raw: &[u8]) -> Result<Self, PaymentError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| PaymentError::MalformedNotification(format!("body is not UTF-8: {}", e)))?;

        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut fields = BTreeMap::new();
        let mut depth = 0usize;
        let mut current: Option<(String, String)> = None;
        let mut saw_root = false;

        loop {
            match reader.read_event().map_err(malformed)? {
                Event::Start(start) => {
                    depth += 1;
                    if depth == 1 {
                        check_root(start.name().as_ref())?;
                        saw_root = true;
                    } else if depth == 2 {
                        current = Some((element_name(start.name().as_ref())?, String::new()));
                    }
                }
                Event::Empty(empty) => {
                    if depth == 0 {
                        check_root(empty.name().as_ref())?;
                        saw_root = true;
                    } else if depth == 1 {
                        fields.insert(element_name(empty.name().as_ref())?, String::new());
                    }
                }
                Event::Text(content) => {
                    if let (2, Some((_, value))) = (depth, current.as_mut()) {
                        value.push_str(&content.unescape().map_err(malformed)?);
                    }
                }
                Event::CData(content) => {
                    if let (2, Some((_, value))) = (depth, current.as_mut()) {
                        let cdata = std::str::from_utf8(&content).map_err(|e| {
                            PaymentError::MalformedNotification(format!("CDATA is not UTF-8: {}", e))
                        })?;
                        value.push_str(cdata);
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some((name, value)) = current.take() {
                            fields.insert(name, value);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(PaymentError::MalformedNotification(
                "missing <xml> root element".to_string(),
            ));
        }

        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Looks up a field that must be present.
    pub fn require(&self, name: &str) -> Result<&str, PaymentError> {
        self.get(name)
            .ok_or_else(|| PaymentError::MalformedNotification(format!("missing field {}", name)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every non-empty field except `sign`, ready for signature verification.
    pub fn canonical_fields(&self) -> CanonicalFieldSet {
        self.fields
            .iter()
            .filter(|(name, _)| name.as_str() != "sign")
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    /// Verifies the document's own `sign` against the merchant key, using the
    /// algorithm declared in its `sign_type` (MD5 when absent).
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - `sign` missing or not matching
    /// - `Signing` - unsupported `sign_type`
    pub fn verify_signature(&self, key: &str) -> Result<(), PaymentError> {
        let signature = self.get("sign").ok_or(PaymentError::InvalidSignature)?;
        let sign_type = SignType::from_declared(self.get("sign_type").unwrap_or_default())?;
        signer::verify(&self.canonical_fields(), key, sign_type, signature)
    }
}

/// Parses a gateway document and verifies its signature in one step.
pub fn verify_xml_signature(raw: &[u8], key: &str) -> Result<(), PaymentError> {
    XmlFields::parse(raw)?.verify_signature(key)
}

fn check_root(name: &[u8]) -> Result<(), PaymentError> {
    if name != ROOT_ELEMENT {
        return Err(PaymentError::MalformedNotification(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

fn element_name(name: &[u8]) -> Result<String, PaymentError> {
    String::from_utf8(name.to_vec())
        .map_err(|e| PaymentError::MalformedNotification(format!("element name: {}", e)))
}

fn malformed(err: quick_xml::Error) -> PaymentError {
    PaymentError::MalformedNotification(err.to_string())
}
