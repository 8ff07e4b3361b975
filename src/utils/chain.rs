//! Chain label formatting for output records.

/// Normalize a logical chain name into its display label.
///
/// Known aliases map to their canonical names (`bsc` -> `Binance`,
/// `avax` -> `Avalanche`). Anything else gets its first letter capitalized.
pub fn format_chain(chain: &str) -> String {
    match chain.to_lowercase().as_str() {
        "xdai" => return "xDai".to_string(),
        "kcc" => return "KCC".to_string(),
        "okexchain" => return "OKExChain".to_string(),
        "bsc" => return "Binance".to_string(),
        "avax" => return "Avalanche".to_string(),
        "milkomeda" => return "Milkomeda C1".to_string(),
        "zksync_era" => return "zkSync Era".to_string(),
        "polygon_zkevm" => return "Polygon zkEVM".to_string(),
        _ => {}
    }

    let mut chars = chain.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
