//! Exchange Engine
//!
//! Oracle-gated conversion between attested USD amounts and LANDC.
//!
//! | Operation                | Oracle kind      | Token flow                 | Burn |
//! |--------------------------|------------------|----------------------------|------|
//! | `buy`                    | `Buy`            | reserve -> buyer           | 4%   |
//! | `sell`                   | `Sell`           | seller -> reserve          | no   |
//! | `convert_rent_to_token`  | `RentConversion` | reserve -> rent pool       | no   |
//! | `pay_rent`               | none             | payer -> rent pool         | no   |
//!
//! Every operation runs in two phases. The check phase prices the operation
//! and verifies balances without writing anything. The apply phase consumes
//! the oracle record and moves tokens; nothing in it can fail once the
//! checks passed.

use tracing::{debug, info};

use lib_oracle::{OracleFeed, OracleKind};
use lib_tokens::{current_price, price_after_burn, tokens_for_usd, AccountLedger, TokenError};
use lib_types::{bps_of, checked_sub, Address, Amount, Bps, ExternalId, PropertyId, Timestamp};

use crate::errors::{EconomyError, EconomyResult};
use crate::events::LedgerEvent;

/// Share of every purchase that is burned instead of credited (4%)
pub const BUY_BURN_BPS: Bps = 400;

/// Token amounts for a buy, priced before its own burn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    pub price_before: Amount,
    pub token_amount: Amount,
    pub burned: Amount,
    pub credited: Amount,
}

impl BuyQuote {
    pub fn for_usd(ledger: &AccountLedger, usd_amount: Amount) -> EconomyResult<Self> {
        let price_before = current_price(ledger.contract())?;
        let token_amount = tokens_for_usd(usd_amount, price_before)?;
        let burned = bps_of(token_amount, BUY_BURN_BPS)?;
        let credited = checked_sub(token_amount, burned)?;
        Ok(Self {
            price_before,
            token_amount,
            burned,
            credited,
        })
    }
}

pub struct ExchangeEngine<'a, F: OracleFeed + ?Sized> {
    ledger: &'a mut AccountLedger,
    oracle: &'a mut F,
}

impl<'a, F: OracleFeed + ?Sized> ExchangeEngine<'a, F> {
    pub fn new(ledger: &'a mut AccountLedger, oracle: &'a mut F) -> Self {
        Self { ledger, oracle }
    }

    fn ensure_holder(&self, account: &Address) -> EconomyResult<()> {
        if self.ledger.contract().is_pool(account) {
            return Err(TokenError::PoolAccount(*account).into());
        }
        Ok(())
    }

    fn ensure_reserve_covers(&self, amount: Amount) -> EconomyResult<()> {
        let have = self.ledger.balance_of(&self.ledger.reserve_pool());
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount }.into());
        }
        Ok(())
    }

    /// Price an attested USD amount at the current price, rejecting dust
    fn tokens_at_current_price(&self, usd_amount: Amount) -> EconomyResult<(Amount, Amount)> {
        if usd_amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        let price = current_price(self.ledger.contract())?;
        let token_amount = tokens_for_usd(usd_amount, price)?;
        if token_amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        Ok((price, token_amount))
    }

    /// Buy tokens for an attested USD amount
    ///
    /// # Errors
    /// - `ZeroAmount` if the amount is zero or prices to zero tokens
    /// - `Token(PoolAccount)` if `buyer` is a pool
    /// - `Token(InsufficientBalance)` if the reserve cannot cover the purchase
    /// - `Oracle(..)` if no matching `Buy` record is pending
    pub fn buy(
        &mut self,
        buyer: Address,
        usd_amount: Amount,
        external_id: ExternalId,
        now: Timestamp,
    ) -> EconomyResult<LedgerEvent> {
        // ========================================================================
        // CHECK PHASE
        // ========================================================================
        if usd_amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        self.ensure_holder(&buyer)?;

        let quote = BuyQuote::for_usd(self.ledger, usd_amount)?;
        if quote.token_amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        self.ensure_reserve_covers(quote.token_amount)?;
        let price_after = price_after_burn(self.ledger.contract(), quote.burned)?;
        debug!(?quote, price_after, "buy priced");

        // ========================================================================
        // APPLY PHASE
        // ========================================================================
        self.oracle
            .consume(OracleKind::Buy, &external_id, usd_amount, now)?;

        let reserve = self.ledger.reserve_pool();
        self.ledger.transfer(reserve, buyer, quote.credited)?;
        if quote.burned > 0 {
            self.ledger.burn(quote.burned)?;
        }
        let new_buyer = self.ledger.register_buyer(buyer);

        info!(
            ?buyer,
            usd_amount,
            credited = quote.credited,
            burned = quote.burned,
            price_after,
            "buy settled"
        );

        Ok(LedgerEvent::Bought {
            buyer,
            external_id,
            usd_amount,
            token_amount: quote.token_amount,
            burned: quote.burned,
            credited: quote.credited,
            price_before: quote.price_before,
            price_after,
            new_buyer,
        })
    }

    /// Sell tokens back to the reserve for an attested USD amount
    ///
    /// The seller's reserve allowance is its balance, so the balance check is
    /// the allowance check.
    pub fn sell(
        &mut self,
        seller: Address,
        usd_amount: Amount,
        external_id: ExternalId,
        now: Timestamp,
    ) -> EconomyResult<LedgerEvent> {
        self.ensure_holder(&seller)?;
        let (price, token_amount) = self.tokens_at_current_price(usd_amount)?;

        let have = self.ledger.allowance_to_pool(&seller);
        if have < token_amount {
            return Err(TokenError::InsufficientBalance {
                have,
                need: token_amount,
            }
            .into());
        }

        self.oracle
            .consume(OracleKind::Sell, &external_id, usd_amount, now)?;

        let reserve = self.ledger.reserve_pool();
        self.ledger.transfer(seller, reserve, token_amount)?;

        info!(?seller, usd_amount, token_amount, "sell settled");

        Ok(LedgerEvent::Sold {
            seller,
            external_id,
            usd_amount,
            token_amount,
            price,
        })
    }

    /// Move the token equivalent of attested rent revenue into the rent pool
    pub fn convert_rent_to_token(
        &mut self,
        usd_amount: Amount,
        external_id: ExternalId,
        now: Timestamp,
    ) -> EconomyResult<LedgerEvent> {
        let (price, token_amount) = self.tokens_at_current_price(usd_amount)?;
        self.ensure_reserve_covers(token_amount)?;

        self.oracle
            .consume(OracleKind::RentConversion, &external_id, usd_amount, now)?;

        let reserve = self.ledger.reserve_pool();
        let rent = self.ledger.rent_pool();
        self.ledger.transfer(reserve, rent, token_amount)?;

        info!(usd_amount, token_amount, "rent converted");

        Ok(LedgerEvent::RentConverted {
            external_id,
            usd_amount,
            token_amount,
            price,
        })
    }

    /// Pay rent in tokens straight into the rent pool
    ///
    /// `month` and `property_id` are bookkeeping tags only.
    pub fn pay_rent(
        &mut self,
        payer: Address,
        amount: Amount,
        month: Timestamp,
        property_id: PropertyId,
    ) -> EconomyResult<LedgerEvent> {
        if amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        self.ensure_holder(&payer)?;

        let rent = self.ledger.rent_pool();
        self.ledger.transfer(payer, rent, amount)?;

        info!(?payer, amount, month, ?property_id, "rent paid");

        Ok(LedgerEvent::RentPaid {
            payer,
            amount,
            month,
            property_id,
        })
    }
}
