use bech32::{FromBase32, ToBase32};

pub(crate) fn vec_to_bech32m(vec: &[u8], hrp: &str) -> Result<String, bech32::Error> {
    let data = vec.to_base32();
    let bech32_addr = bech32::encode(hrp, data, bech32::Variant::Bech32m)?;
    Ok(bech32_addr)
}

pub(crate) fn bech32m_to_decoded_vec(
    bech32_addr: &str,
) -> Result<(String, Vec<u8>), Bech32ParseError> {
    let (hrp, data, variant) = bech32::decode(bech32_addr)?;
    if variant != bech32::Variant::Bech32m {
        return Err(Bech32ParseError::WrongVariant);
    }
    let vec = Vec::<u8>::from_base32(&data)?;
    Ok((hrp, vec))
}

/// Errors that can occur while parsing an [`crate::Address`] from a string.
#[derive(Debug, thiserror::Error)]
pub enum Bech32ParseError {
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    #[error("Expected a bech32m string, found bech32")]
    WrongVariant,
    #[error("Wrong HRP: {0}")]
    WrongHrp(String),
    #[error("Invalid length {0}, should be 32")]
    InvalidLength(usize),
}
