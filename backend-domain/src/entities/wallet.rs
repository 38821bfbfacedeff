// Admin wallet entity
// One wallet per (organizer, event) pair. The ledger invariant
// `available + withdrawn == total_earnings` must hold after every
// committed operation; reservations for in-flight withdrawals live only
// in `available_balance_minor`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: i64, requested: i64 },
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminWallet {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub event_id: Uuid,
    pub total_earnings_minor: i64,
    pub available_balance_minor: i64,
    pub withdrawn_minor: i64,
    pub last_payout_at: Option<DateTime<Utc>>,
}

impl AdminWallet {
    pub fn new(organizer_id: Uuid, event_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            organizer_id,
            event_id,
            total_earnings_minor: 0,
            available_balance_minor: 0,
            withdrawn_minor: 0,
            last_payout_at: None,
        }
    }

    /// A confirmed successful charge credits earnings and the spendable
    /// balance together.
    pub fn credit(&mut self, amount_minor: i64) -> Result<(), WalletError> {
        if amount_minor <= 0 {
            return Err(WalletError::NonPositiveAmount(amount_minor));
        }
        self.total_earnings_minor += amount_minor;
        self.available_balance_minor += amount_minor;
        Ok(())
    }

    /// Removes funds from the spendable balance while a withdrawal is in
    /// flight. `withdrawn_minor` is untouched until the gateway confirms.
    pub fn reserve(&mut self, amount_minor: i64) -> Result<(), WalletError> {
        if amount_minor <= 0 {
            return Err(WalletError::NonPositiveAmount(amount_minor));
        }
        if self.available_balance_minor < amount_minor {
            return Err(WalletError::InsufficientBalance {
                available: self.available_balance_minor,
                requested: amount_minor,
            });
        }
        self.available_balance_minor -= amount_minor;
        Ok(())
    }

    /// Finalizes a gateway-confirmed transfer: the reservation already left
    /// `available_balance_minor`, this books it as withdrawn.
    pub fn confirm_withdrawal(&mut self, amount_minor: i64, at: DateTime<Utc>) {
        self.withdrawn_minor += amount_minor;
        self.last_payout_at = Some(at);
    }

    /// Reverses a reservation after a gateway-confirmed failure. The funds
    /// never left, so they return to the spendable balance.
    pub fn refund_reservation(&mut self, amount_minor: i64) {
        self.available_balance_minor += amount_minor;
    }

    /// The sum of reservations currently in flight.
    pub fn reserved_minor(&self) -> i64 {
        self.total_earnings_minor - self.available_balance_minor - self.withdrawn_minor
    }

    /// Holds whenever no withdrawal is in flight.
    pub fn is_balanced(&self) -> bool {
        self.available_balance_minor + self.withdrawn_minor == self.total_earnings_minor
    }

    /// The ledger invariant, reservation-aware: earnings are fully accounted
    /// for by the spendable balance, settled withdrawals, and in-flight
    /// reservations, and no component is negative.
    pub fn is_consistent(&self, reserved_minor: i64) -> bool {
        self.available_balance_minor >= 0
            && self.withdrawn_minor >= 0
            && reserved_minor >= 0
            && self.available_balance_minor + self.withdrawn_minor + reserved_minor
                == self.total_earnings_minor
    }
}

#[derive(Debug)]
pub enum ReserveOutcome {
    Reserved(AdminWallet),
    InsufficientBalance { available: i64 },
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wallet() -> AdminWallet {
        AdminWallet::new(Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn credit_grows_earnings_and_available_together() {
        let mut w = wallet();
        w.credit(50_000).expect("credit");
        assert_eq!(w.total_earnings_minor, 50_000);
        assert_eq!(w.available_balance_minor, 50_000);
        assert_eq!(w.withdrawn_minor, 0);
        assert!(w.is_balanced());
    }

    #[test]
    fn reserve_rejects_overdraw_without_side_effects() {
        let mut w = wallet();
        w.credit(10_000).expect("credit");
        let err = w.reserve(10_001).expect_err("overdraw");
        match err {
            WalletError::InsufficientBalance {
                available,
                requested,
            } => {
                assert_eq!(available, 10_000);
                assert_eq!(requested, 10_001);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(w.available_balance_minor, 10_000);
        assert!(w.is_balanced());
    }

    #[test]
    fn failed_transfer_restores_pre_withdrawal_balance() {
        let mut w = wallet();
        w.credit(50_000).expect("credit");
        w.reserve(30_000).expect("reserve");
        assert_eq!(w.available_balance_minor, 20_000);
        assert_eq!(w.reserved_minor(), 30_000);
        w.refund_reservation(30_000);
        assert_eq!(w.available_balance_minor, 50_000);
        assert_eq!(w.withdrawn_minor, 0);
        assert!(w.is_balanced());
    }

    #[test]
    fn confirmed_transfer_moves_reservation_to_withdrawn() {
        let mut w = wallet();
        w.credit(50_000).expect("credit");
        w.reserve(30_000).expect("reserve");
        w.confirm_withdrawal(30_000, Utc::now());
        assert_eq!(w.available_balance_minor, 20_000);
        assert_eq!(w.withdrawn_minor, 30_000);
        assert_eq!(w.total_earnings_minor, 50_000);
        assert!(w.is_balanced());
        assert!(w.last_payout_at.is_some());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Credit(i64),
        Withdraw(i64, bool),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..100_000).prop_map(Op::Credit),
            ((1i64..100_000), any::<bool>()).prop_map(|(a, ok)| Op::Withdraw(a, ok)),
        ]
    }

    proptest! {
        /// For any sequence of credits and settled withdrawal round trips
        /// (reserve then confirm-or-refund), the balance equation holds
        /// after every operation.
        #[test]
        fn ledger_stays_balanced(ops in proptest::collection::vec(op_strategy(), 1..60)) {
            let mut w = wallet();
            for op in ops {
                match op {
                    Op::Credit(amount) => {
                        w.credit(amount).expect("credit");
                    }
                    Op::Withdraw(amount, succeeds) => {
                        if w.reserve(amount).is_ok() {
                            // In flight: only the reservation accounts for
                            // the missing funds.
                            prop_assert!(w.is_consistent(amount));
                            if succeeds {
                                w.confirm_withdrawal(amount, Utc::now());
                            } else {
                                w.refund_reservation(amount);
                            }
                        }
                    }
                }
                prop_assert!(w.is_balanced());
                prop_assert!(w.available_balance_minor >= 0);
                prop_assert!(w.withdrawn_minor >= 0);
            }
        }
    }
}
