//! Currency and network enumerations.

text_enum! {
    /// Currency an invoice is issued in.
    pub enum Currency {
        /// US dollar.
        Usd => "USD",
        /// Swiss franc.
        Chf => "CHF",
    }
}

text_enum! {
    /// Token received as settlement or withdrawn through the off-ramp.
    pub enum CryptoCurrency {
        /// USD Coin.
        Usdc => "USDC",
        /// Starknet token.
        Strk => "STRK",
        /// Monerium EUR e-money token.
        Eure => "EURe",
    }
}

impl CryptoCurrency {
    /// Returns true for tokens pegged 1:1 to the US dollar.
    #[must_use]
    pub const fn is_usd_pegged(self) -> bool {
        matches!(self, Self::Usdc)
    }
}

text_enum! {
    /// Blockchain a token moved on.
    pub enum BlockchainNetwork {
        /// Starknet.
        Starknet => "starknet",
        /// Gnosis chain.
        Gnosis => "gnosis",
    }
}

text_enum! {
    /// Currency an expense was paid in.
    pub enum ExpenseCurrency {
        /// US dollar.
        Usd => "USD",
        /// Euro, the reporting currency.
        Eur => "EUR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("USD", Currency::Usd)]
    #[case("chf", Currency::Chf)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let err = Currency::from_str("EUR").unwrap_err();
        assert_eq!(err.kind, "Currency");
        assert_eq!(err.value, "EUR");
    }

    #[test]
    fn test_crypto_currency_keeps_mixed_case_symbol() {
        assert_eq!(CryptoCurrency::Eure.as_str(), "EURe");
        assert_eq!(
            serde_json::to_string(&CryptoCurrency::Eure).unwrap(),
            "\"EURe\""
        );
        assert_eq!(CryptoCurrency::from_str("eure").unwrap(), CryptoCurrency::Eure);
    }

    #[test]
    fn test_only_usdc_is_usd_pegged() {
        let pegged: Vec<_> = CryptoCurrency::ALL
            .iter()
            .filter(|c| c.is_usd_pegged())
            .collect();
        assert_eq!(pegged, vec![&CryptoCurrency::Usdc]);
    }

    #[test]
    fn test_network_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BlockchainNetwork::Gnosis).unwrap(),
            "\"gnosis\""
        );
    }
}
