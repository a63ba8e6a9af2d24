//! Price Curve
//!
//! `price = initial_supply / total_supply` in 18-decimal fixed point.
//! Supply only shrinks, so the price is monotonic non-decreasing. The price
//! is a pure read over [`TokenContract`] state and is never stored.

use lib_types::{checked_sub, wad_div, Amount};

use crate::contract::TokenContract;
use crate::errors::TokenResult;

/// Current exchange price (USD per token, WAD-scaled)
pub fn current_price(contract: &TokenContract) -> TokenResult<Amount> {
    Ok(wad_div(contract.initial_supply(), contract.total_supply())?)
}

/// Tokens bought by `usd_amount` at `price`, rounded toward zero
pub fn tokens_for_usd(usd_amount: Amount, price: Amount) -> TokenResult<Amount> {
    Ok(wad_div(usd_amount, price)?)
}

/// Price once `burned` more tokens have left the supply
pub fn price_after_burn(contract: &TokenContract, burned: Amount) -> TokenResult<Amount> {
    let total_supply = checked_sub(contract.total_supply(), burned)?;
    Ok(wad_div(contract.initial_supply(), total_supply)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PoolSet;
    use lib_types::{whole, Address, WAD};

    fn contract() -> TokenContract {
        let pools = PoolSet::new(Address::new([1u8; 32]), Address::new([2u8; 32])).unwrap();
        TokenContract::landc(pools, whole(1_000_000_000_000)).unwrap()
    }

    #[test]
    fn test_initial_price_is_one() {
        assert_eq!(current_price(&contract()).unwrap(), WAD);
    }

    #[test]
    fn test_price_after_burn() {
        let mut contract = contract();
        contract.record_burn(whole(4)).unwrap();
        // 1e12 / (1e12 - 4) truncated to 18 decimals
        assert_eq!(current_price(&contract).unwrap(), 1_000_000_000_004_000_000);
    }

    #[test]
    fn test_tokens_for_usd_rounds_down() {
        let price = 1_000_000_000_004_000_000;
        assert_eq!(tokens_for_usd(whole(90), price).unwrap(), 89_999_999_999_640_000_000);
        assert_eq!(tokens_for_usd(whole(100), WAD).unwrap(), whole(100));
    }

    #[test]
    fn test_price_after_burn_matches_recorded_burn() {
        let mut contract = contract();
        let projected = price_after_burn(&contract, whole(4)).unwrap();
        assert_eq!(price_after_burn(&contract, 0).unwrap(), WAD);

        contract.record_burn(whole(4)).unwrap();
        assert_eq!(current_price(&contract).unwrap(), projected);
        assert!(price_after_burn(&contract, contract.total_supply()).is_err());
    }
}
