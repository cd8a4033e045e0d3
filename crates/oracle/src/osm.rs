//! OSM (oracle security module) price feed reads.
//!
//! Each ilk's pip contract exposes `peek()` for the current price round and
//! `peep()` for the queued next round. Both return a Wad-scaled price word
//! plus a validity flag. This tool is advisory, so an unset flag is logged
//! and the value reported anyway rather than dropping the ilk.

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::sol;

use vaults_common::error::AppError;
use vaults_common::numeric::Wad;

// Solidity interface for the price feed.
// Only the two read functions are defined.
sol! {
    #[sol(rpc)]
    interface IOsm {
        /// Current price round: (wad-scaled price, validity flag).
        function peek() external view returns (bytes32 value, bool has);

        /// Next price round: (wad-scaled price, validity flag).
        function peep() external view returns (bytes32 value, bool has);
    }
}

/// Current and next price quotes from one OSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsmQuote {
    pub current: f64,
    pub next: f64,
}

/// Read both price rounds from the pip contract at `pip`.
///
/// RPC failures are surfaced as errors: a run with a partial price set must
/// not be evaluated.
pub async fn read_quote(
    provider: &(impl Provider + Clone),
    ilk: &str,
    pip: Address,
) -> Result<OsmQuote, AppError> {
    let contract = IOsm::new(pip, provider.clone());

    let peek = contract
        .peek()
        .call()
        .await
        .map_err(|e| AppError::Rpc(format!("peek() on {pip} failed: {e}")))?;
    let peep = contract
        .peep()
        .call()
        .await
        .map_err(|e| AppError::Rpc(format!("peep() on {pip} failed: {e}")))?;

    if !peek.has {
        tracing::warn!(ilk = %ilk, pip = %pip, "Current OSM round not valid yet");
    }
    if !peep.has {
        tracing::warn!(ilk = %ilk, pip = %pip, "Next OSM round not valid yet");
    }

    let quote = OsmQuote {
        current: price_word_to_f64(peek.value),
        next: price_word_to_f64(peep.value),
    };

    tracing::debug!(
        ilk = %ilk,
        current = quote.current,
        next = quote.next,
        "Read OSM quote"
    );

    Ok(quote)
}

/// Decode a Wad-scaled big-endian price word into a float for reporting.
fn price_word_to_f64(word: B256) -> f64 {
    Wad::from_raw(U256::from_be_bytes(word.0)).to_f64()
}
