//! Default gateway URL derivation

/// Derive the default decryption gateway URL for a chain.
///
/// Pure function of the chain id: the host embeds the decimal chain id so
/// two chains can never resolve to the same gateway by accident. Callers
/// that run their own gateway override this via configuration.
pub fn default_gateway_url(chain_id: u64) -> String {
    format!("https://gateway.chain-{chain_id}.cloak.network")
}
