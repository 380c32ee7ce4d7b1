use alloy::hex;
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::error::intake::IntakeError;
use crate::types::claim::ClaimMessage;

/// Recovers the address that produced `signature` over the canonical form of `message`.
///
/// `signature` is the 65-byte `r || s || v` hex string returned by `personal_sign`.
pub fn recover(message: &ClaimMessage, signature: &str) -> Result<Address, IntakeError> {
    let bytes = hex::decode(signature).map_err(|e| IntakeError::MalformedSignature(e.to_string()))?;
    let signature =
        Signature::try_from(bytes.as_slice()).map_err(|e| IntakeError::MalformedSignature(e.to_string()))?;
    let canonical = message.canonical()?;

    signature
        .recover_address_from_msg(canonical.as_bytes())
        .map_err(|e| IntakeError::MalformedSignature(e.to_string()))
}

/// Signs `message` the way a wallet's `personal_sign` would and returns the 0x-prefixed signature.
pub fn sign(signer: &PrivateKeySigner, message: &ClaimMessage) -> Result<String, IntakeError> {
    let canonical = message.canonical()?;
    let signature = signer
        .sign_message_sync(canonical.as_bytes())
        .map_err(|e| IntakeError::MalformedSignature(e.to_string()))?;
    Ok(hex::encode_prefixed(signature.as_bytes()))
}
