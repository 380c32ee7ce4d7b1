use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::intake::IntakeError;

/// The payload a wallet signs to claim a completed quest.
///
/// Field order is part of the signing contract: the canonical form is the
/// compact JSON encoding of this struct, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMessage {
    pub wallet: String,
    pub quest_id: String,
    pub quest_type: String,
    /// Milliseconds since the unix epoch, as reported by the client.
    pub timestamp: i64,
}

impl ClaimMessage {
    /// Bytes fed to EIP-191 `personal_sign` by the client and to recovery by the service.
    pub fn canonical(&self) -> Result<String, IntakeError> {
        serde_json::to_string(self).map_err(|e| IntakeError::SchemaValidation(format!("unserializable message: {}", e)))
    }

    /// Parses `wallet`, checking the shape the HTTP boundary promises.
    pub fn wallet_address(&self) -> Result<Address, IntakeError> {
        parse_wallet(&self.wallet, "message.wallet")
    }
}

/// Parses a wallet given as exactly `0x` followed by 40 hex digits.
///
/// `field` names the input in the error detail.
pub fn parse_wallet(raw: &str, field: &str) -> Result<Address, IntakeError> {
    if !raw.starts_with("0x") || raw.len() != 42 {
        return Err(IntakeError::SchemaValidation(format!("{} must be a 0x-prefixed 20-byte hex address", field)));
    }
    Address::from_str(raw).map_err(|e| IntakeError::SchemaValidation(format!("{} is not valid hex: {}", field, e)))
}

/// A claim as it arrives at intake. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    pub signature: String,
    pub message: ClaimMessage,
}

impl SignedClaim {
    /// Structural checks that do not need any cryptography.
    pub fn validate_shape(&self) -> Result<(), IntakeError> {
        if !self.signature.starts_with("0x") {
            return Err(IntakeError::SchemaValidation("signature must be 0x-prefixed hex".to_string()));
        }
        self.message.wallet_address().map(|_| ())
    }
}
