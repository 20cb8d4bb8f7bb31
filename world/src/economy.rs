//! Currency balance shared by purchases, refunds and bounties.

/// Player wallet. The balance is unsigned and only changes through
/// [`Wallet::spend`] and [`Wallet::add`], so it can never go negative.
#[derive(Clone, Debug, Default)]
pub(crate) struct Wallet {
    balance: u32,
    infinite_funds: bool,
}

impl Wallet {
    pub(crate) fn new(balance: u32) -> Self {
        Self {
            balance,
            infinite_funds: false,
        }
    }

    pub(crate) fn balance(&self) -> u32 {
        self.balance
    }

    pub(crate) fn set_infinite_funds(&mut self, enabled: bool) {
        self.infinite_funds = enabled;
    }

    /// Reports whether `amount` can be paid.
    pub(crate) fn can_afford(&self, amount: u32) -> bool {
        self.infinite_funds || self.balance >= amount
    }

    /// Deducts `amount` when affordable and returns the new balance.
    ///
    /// With infinite funds the balance bottoms out at zero instead of
    /// refusing the purchase.
    pub(crate) fn spend(&mut self, amount: u32) -> Option<u32> {
        if !self.can_afford(amount) {
            return None;
        }
        self.balance = self.balance.saturating_sub(amount);
        Some(self.balance)
    }

    /// Credits `amount` and returns the new balance.
    pub(crate) fn add(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::Wallet;

    #[test]
    fn overspending_leaves_balance_untouched() {
        let mut wallet = Wallet::new(500);
        assert!(!wallet.can_afford(600));
        assert_eq!(wallet.spend(600), None);
        assert_eq!(wallet.balance(), 500);
    }

    #[test]
    fn spending_exact_balance_reaches_zero() {
        let mut wallet = Wallet::new(250);
        assert_eq!(wallet.spend(250), Some(0));
        assert!(!wallet.can_afford(1));
    }

    #[test]
    fn infinite_funds_never_underflow() {
        let mut wallet = Wallet::new(50);
        wallet.set_infinite_funds(true);
        assert!(wallet.can_afford(10_000));
        assert_eq!(wallet.spend(10_000), Some(0));
    }

    #[test]
    fn credits_saturate() {
        let mut wallet = Wallet::new(u32::MAX - 1);
        assert_eq!(wallet.add(10), u32::MAX);
    }
}
