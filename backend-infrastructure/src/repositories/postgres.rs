use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use backend_domain::ports::{
    SettlementRepository, TicketRepository, WalletRepository, WithdrawalRepository,
};
use backend_domain::value_objects::{PaymentStatus, WithdrawalStatus};
use backend_domain::{
    AdminWallet, CheckInOutcome, CheckInRequest, IssueBatch, IssueOutcome, NewWithdrawal,
    Payment, ReserveOutcome, Ticket, TicketLookup, TicketType, WebhookOutcome,
    WithdrawalRequest, CHARGE_SUCCESS, TRANSFER_FAILED, TRANSFER_SUCCESS,
};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Records one webhook delivery in the idempotency ledger. Returns false
    /// when the (event type, reference) pair was already recorded, in which
    /// case the state change must not be applied again.
    async fn record_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_type: &str,
        reference: &str,
        payload: &serde_json::Value,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO payment_events (id, event_type, reference, payload) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (event_type, reference) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(event_type)
        .bind(reference)
        .bind(payload)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Sum of withdrawal amounts currently reserved against a wallet
    /// (pending or processing requests).
    async fn reserved_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
    ) -> Result<i64> {
        let reserved: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_minor), 0)::BIGINT FROM withdrawal_requests \
             WHERE wallet_id = $1 AND status IN ('pending', 'processing')",
        )
        .bind(wallet_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(reserved)
    }

    async fn lock_withdrawal_by_transfer_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transfer_code: &str,
    ) -> Result<Option<WithdrawalRequest>> {
        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE transfer_code = $1 FOR UPDATE",
        )
        .bind(transfer_code)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(withdrawal)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl TicketRepository for PostgresStore {
    async fn ensure_schema(&self) -> Result<()> {
        let statements = [
            r#"
CREATE TABLE IF NOT EXISTS ticket_types (
    id UUID PRIMARY KEY,
    event_id UUID NOT NULL,
    name TEXT NOT NULL,
    price_minor BIGINT NOT NULL DEFAULT 0,
    total_quantity INTEGER NOT NULL,
    available_quantity INTEGER NOT NULL CHECK (available_quantity >= 0),
    per_user_limit INTEGER,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS tickets (
    id UUID PRIMARY KEY,
    ticket_number TEXT NOT NULL UNIQUE,
    qr_payload TEXT NOT NULL UNIQUE,
    event_id UUID NOT NULL,
    ticket_type_id UUID NOT NULL REFERENCES ticket_types(id),
    owner_user_id UUID,
    guest_name TEXT,
    guest_email TEXT,
    price_paid_minor BIGINT NOT NULL,
    payment_reference TEXT,
    checked_in BOOLEAN NOT NULL DEFAULT FALSE,
    checked_in_at TIMESTAMPTZ,
    checked_in_by UUID,
    check_in_method TEXT,
    purchased_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS check_ins (
    id UUID PRIMARY KEY,
    ticket_id UUID NOT NULL UNIQUE REFERENCES tickets(id),
    operator_id UUID NOT NULL,
    method TEXT NOT NULL,
    notes TEXT,
    checked_in_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS ticket_form_responses (
    ticket_id UUID PRIMARY KEY REFERENCES tickets(id),
    responses JSONB NOT NULL
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS payments (
    id UUID PRIMARY KEY,
    reference TEXT NOT NULL UNIQUE,
    event_id UUID NOT NULL,
    organizer_id UUID NOT NULL,
    amount_minor BIGINT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS admin_wallets (
    id UUID PRIMARY KEY,
    organizer_id UUID NOT NULL,
    event_id UUID NOT NULL,
    total_earnings_minor BIGINT NOT NULL DEFAULT 0,
    available_balance_minor BIGINT NOT NULL DEFAULT 0 CHECK (available_balance_minor >= 0),
    withdrawn_minor BIGINT NOT NULL DEFAULT 0,
    last_payout_at TIMESTAMPTZ,
    UNIQUE (organizer_id, event_id)
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS withdrawal_requests (
    id UUID PRIMARY KEY,
    wallet_id UUID NOT NULL REFERENCES admin_wallets(id),
    amount_minor BIGINT NOT NULL,
    bank_name TEXT NOT NULL,
    bank_code TEXT NOT NULL,
    account_number TEXT NOT NULL,
    account_name TEXT NOT NULL,
    transfer_code TEXT UNIQUE,
    status TEXT NOT NULL DEFAULT 'pending',
    failure_reason TEXT,
    processed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS payment_events (
    id UUID PRIMARY KEY,
    event_type TEXT NOT NULL,
    reference TEXT NOT NULL,
    payload JSONB NOT NULL,
    received_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (event_type, reference)
)
"#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn issue_batch(&self, batch: &IssueBatch) -> Result<IssueOutcome> {
        let mut counts: HashMap<Uuid, i32> = HashMap::new();
        let mut user_counts: HashMap<(Uuid, Uuid), i64> = HashMap::new();
        for draft in &batch.tickets {
            *counts.entry(draft.ticket_type_id).or_default() += 1;
            if let Some(user_id) = draft.owner_user_id {
                *user_counts.entry((draft.ticket_type_id, user_id)).or_default() += 1;
            }
        }

        let mut tx = self.pool.begin().await?;

        // Conditional decrement: the WHERE clause is the inventory guard, so
        // concurrent batches cannot drive availability below zero.
        let mut locked_types: HashMap<Uuid, TicketType> = HashMap::new();
        for (ticket_type_id, requested) in &counts {
            let updated = sqlx::query_as::<_, TicketType>(
                "UPDATE ticket_types \
                 SET available_quantity = available_quantity - $2 \
                 WHERE id = $1 AND is_active AND available_quantity >= $2 \
                 RETURNING *",
            )
            .bind(ticket_type_id)
            .bind(requested)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(ticket_type) = updated else {
                let existing = sqlx::query_as::<_, TicketType>(
                    "SELECT * FROM ticket_types WHERE id = $1",
                )
                .bind(ticket_type_id)
                .fetch_optional(&mut *tx)
                .await?;
                // The transaction is dropped on return: nothing committed.
                return Ok(match existing {
                    None => IssueOutcome::UnknownType(*ticket_type_id),
                    Some(t) if t.event_id != batch.event_id => {
                        IssueOutcome::WrongEvent(*ticket_type_id)
                    }
                    Some(t) if !t.is_active => IssueOutcome::InactiveType(*ticket_type_id),
                    Some(t) => IssueOutcome::SoldOut {
                        ticket_type_id: *ticket_type_id,
                        requested: *requested,
                        available: t.available_quantity,
                    },
                });
            };
            if ticket_type.event_id != batch.event_id {
                return Ok(IssueOutcome::WrongEvent(*ticket_type_id));
            }
            locked_types.insert(*ticket_type_id, ticket_type);
        }

        for ((ticket_type_id, user_id), batch_count) in &user_counts {
            let Some(limit) = locked_types
                .get(ticket_type_id)
                .and_then(|t| t.per_user_limit)
            else {
                continue;
            };
            let owned: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1 AND owner_user_id = $2",
            )
            .bind(ticket_type_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            if owned + batch_count > i64::from(limit) {
                return Ok(IssueOutcome::PerUserLimitExceeded {
                    ticket_type_id: *ticket_type_id,
                    limit,
                });
            }
        }

        let payment = &batch.payment;
        let paid_at = match payment.status {
            PaymentStatus::Successful => Some(chrono::Utc::now()),
            PaymentStatus::Pending => None,
        };
        let inserted = sqlx::query(
            "INSERT INTO payments (id, reference, event_id, organizer_id, amount_minor, status, paid_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (reference) DO NOTHING",
        )
        .bind(payment.id)
        .bind(&payment.reference)
        .bind(payment.event_id)
        .bind(payment.organizer_id)
        .bind(payment.amount_minor)
        .bind(payment.status.as_str())
        .bind(paid_at)
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            return Ok(IssueOutcome::DuplicateReference(payment.reference.clone()));
        }

        let mut issued = Vec::with_capacity(batch.tickets.len());
        for draft in &batch.tickets {
            let result = sqlx::query_as::<_, Ticket>(
                "INSERT INTO tickets \
                 (id, ticket_number, qr_payload, event_id, ticket_type_id, owner_user_id, \
                  guest_name, guest_email, price_paid_minor, payment_reference) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 RETURNING *",
            )
            .bind(draft.id)
            .bind(&draft.ticket_number)
            .bind(&draft.qr_payload)
            .bind(draft.event_id)
            .bind(draft.ticket_type_id)
            .bind(draft.owner_user_id)
            .bind(&draft.guest_name)
            .bind(&draft.guest_email)
            .bind(draft.price_minor)
            .bind(&payment.reference)
            .fetch_one(&mut *tx)
            .await;
            let ticket = match result {
                Ok(ticket) => ticket,
                Err(err) if is_unique_violation(&err) => {
                    return Ok(IssueOutcome::DuplicateCode);
                }
                Err(err) => return Err(err.into()),
            };
            if let Some(responses) = &draft.form_responses {
                sqlx::query(
                    "INSERT INTO ticket_form_responses (ticket_id, responses) VALUES ($1, $2)",
                )
                .bind(draft.id)
                .bind(responses)
                .execute(&mut *tx)
                .await?;
            }
            issued.push(ticket);
        }

        tx.commit().await?;
        Ok(IssueOutcome::Issued(issued))
    }

    async fn check_in(
        &self,
        lookup: &TicketLookup,
        request: &CheckInRequest,
    ) -> Result<CheckInOutcome> {
        let (query, key) = match lookup {
            TicketLookup::ByPayload(payload) => (
                "SELECT * FROM tickets WHERE qr_payload = $1 FOR UPDATE",
                payload,
            ),
            TicketLookup::ByNumber(number) => (
                "SELECT * FROM tickets WHERE ticket_number = $1 FOR UPDATE",
                number,
            ),
        };

        let mut tx = self.pool.begin().await?;

        let Some(ticket) = sqlx::query_as::<_, Ticket>(query)
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(CheckInOutcome::NotFound);
        };
        if ticket.checked_in {
            return Ok(CheckInOutcome::AlreadyCheckedIn(ticket));
        }

        // The conditional update is the actual gate: even without the row
        // lock above, exactly one concurrent attempt matches checked_in =
        // FALSE.
        let updated = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets \
             SET checked_in = TRUE, checked_in_at = NOW(), checked_in_by = $2, check_in_method = $3 \
             WHERE id = $1 AND checked_in = FALSE \
             RETURNING *",
        )
        .bind(ticket.id)
        .bind(request.operator_id)
        .bind(request.method.as_str())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(updated) = updated else {
            return Ok(CheckInOutcome::AlreadyCheckedIn(ticket));
        };

        sqlx::query(
            "INSERT INTO check_ins (id, ticket_id, operator_id, method, notes, checked_in_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(updated.id)
        .bind(request.operator_id)
        .bind(request.method.as_str())
        .bind(&request.notes)
        .bind(updated.checked_in_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CheckInOutcome::CheckedIn(updated))
    }

    async fn find_by_number(&self, ticket_number: &str) -> Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE ticket_number = $1",
        )
        .bind(ticket_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn ping(&self) -> Result<()> {
        let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl WalletRepository for PostgresStore {
    async fn find(&self, organizer_id: Uuid, event_id: Uuid) -> Result<Option<AdminWallet>> {
        let wallet = sqlx::query_as::<_, AdminWallet>(
            "SELECT * FROM admin_wallets WHERE organizer_id = $1 AND event_id = $2",
        )
        .bind(organizer_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(wallet)
    }

    async fn reserve(&self, wallet_id: Uuid, amount_minor: i64) -> Result<ReserveOutcome> {
        let updated = sqlx::query_as::<_, AdminWallet>(
            "UPDATE admin_wallets \
             SET available_balance_minor = available_balance_minor - $2 \
             WHERE id = $1 AND available_balance_minor >= $2 \
             RETURNING *",
        )
        .bind(wallet_id)
        .bind(amount_minor)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(wallet) = updated {
            return Ok(ReserveOutcome::Reserved(wallet));
        }
        let existing = sqlx::query_as::<_, AdminWallet>(
            "SELECT * FROM admin_wallets WHERE id = $1",
        )
        .bind(wallet_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(match existing {
            Some(wallet) => ReserveOutcome::InsufficientBalance {
                available: wallet.available_balance_minor,
            },
            None => ReserveOutcome::NotFound,
        })
    }

    async fn refund_reservation(&self, wallet_id: Uuid, amount_minor: i64) -> Result<AdminWallet> {
        sqlx::query_as::<_, AdminWallet>(
            "UPDATE admin_wallets \
             SET available_balance_minor = available_balance_minor + $2 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(wallet_id)
        .bind(amount_minor)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("wallet {} not found", wallet_id))
    }
}

#[async_trait]
impl WithdrawalRepository for PostgresStore {
    async fn create(&self, withdrawal: &NewWithdrawal) -> Result<WithdrawalRequest> {
        let created = sqlx::query_as::<_, WithdrawalRequest>(
            "INSERT INTO withdrawal_requests \
             (id, wallet_id, amount_minor, bank_name, bank_code, account_number, account_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending') \
             RETURNING *",
        )
        .bind(withdrawal.id)
        .bind(withdrawal.wallet_id)
        .bind(withdrawal.amount_minor)
        .bind(&withdrawal.destination.bank_name)
        .bind(&withdrawal.destination.bank_code)
        .bind(&withdrawal.destination.account_number)
        .bind(&withdrawal.destination.account_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn mark_processing(&self, id: Uuid, transfer_code: &str) -> Result<()> {
        // Conditional on 'pending' so a webhook that already settled the
        // request is never clobbered back to processing.
        sqlx::query(
            "UPDATE withdrawal_requests SET status = 'processing', transfer_code = $2 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(transfer_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, reason: &str) -> Result<()> {
        sqlx::query(
            "UPDATE withdrawal_requests \
             SET status = 'failed', failure_reason = $2, processed_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'processing')",
        )
        .bind(id)
        .bind(reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<WithdrawalRequest>> {
        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(withdrawal)
    }
}

#[async_trait]
impl SettlementRepository for PostgresStore {
    async fn apply_charge_success(
        &self,
        reference: &str,
        reported_amount_minor: Option<i64>,
        payload: &serde_json::Value,
    ) -> Result<WebhookOutcome> {
        let mut tx = self.pool.begin().await?;

        if !self
            .record_event(&mut tx, CHARGE_SUCCESS, reference, payload)
            .await?
        {
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        let Some(payment) = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE reference = $1 FOR UPDATE",
        )
        .bind(reference)
        .fetch_optional(&mut *tx)
        .await?
        else {
            // Rolled back: the ledger row is not kept, so a later retry can
            // apply once the payment row exists.
            return Ok(WebhookOutcome::UnknownReference(reference.to_string()));
        };

        if PaymentStatus::from(payment.status.as_str()) == PaymentStatus::Successful {
            tx.commit().await?;
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        if let Some(reported) = reported_amount_minor {
            if reported != payment.amount_minor {
                warn!(
                    "charge {} reports amount {} but {} was recorded; crediting recorded amount",
                    reference, reported, payment.amount_minor
                );
            }
        }

        sqlx::query("UPDATE payments SET status = 'successful', paid_at = NOW() WHERE id = $1")
            .bind(payment.id)
            .execute(&mut *tx)
            .await?;

        // Race-safe first credit: concurrent webhook deliveries for a brand
        // new (organizer, event) pair converge on one row.
        let wallet = sqlx::query_as::<_, AdminWallet>(
            "INSERT INTO admin_wallets \
             (id, organizer_id, event_id, total_earnings_minor, available_balance_minor, withdrawn_minor) \
             VALUES ($1, $2, $3, $4, $4, 0) \
             ON CONFLICT (organizer_id, event_id) DO UPDATE SET \
                 total_earnings_minor = admin_wallets.total_earnings_minor + EXCLUDED.total_earnings_minor, \
                 available_balance_minor = admin_wallets.available_balance_minor + EXCLUDED.available_balance_minor \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(payment.organizer_id)
        .bind(payment.event_id)
        .bind(payment.amount_minor)
        .fetch_one(&mut *tx)
        .await?;

        let reserved_minor = self.reserved_for(&mut tx, wallet.id).await?;
        tx.commit().await?;
        Ok(WebhookOutcome::Applied {
            wallet,
            reserved_minor,
        })
    }

    async fn apply_transfer_success(
        &self,
        transfer_code: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookOutcome> {
        let mut tx = self.pool.begin().await?;

        if !self
            .record_event(&mut tx, TRANSFER_SUCCESS, transfer_code, payload)
            .await?
        {
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        let Some(withdrawal) = self
            .lock_withdrawal_by_transfer_code(&mut tx, transfer_code)
            .await?
        else {
            return Ok(WebhookOutcome::UnknownReference(transfer_code.to_string()));
        };
        if WithdrawalStatus::from(withdrawal.status.as_str()).is_terminal() {
            tx.commit().await?;
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        let wallet = sqlx::query_as::<_, AdminWallet>(
            "UPDATE admin_wallets \
             SET withdrawn_minor = withdrawn_minor + $2, last_payout_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(withdrawal.wallet_id)
        .bind(withdrawal.amount_minor)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE withdrawal_requests SET status = 'completed', processed_at = NOW() \
             WHERE id = $1",
        )
        .bind(withdrawal.id)
        .execute(&mut *tx)
        .await?;

        let reserved_minor = self.reserved_for(&mut tx, wallet.id).await?;
        tx.commit().await?;
        Ok(WebhookOutcome::Applied {
            wallet,
            reserved_minor,
        })
    }

    async fn apply_transfer_failure(
        &self,
        transfer_code: &str,
        reason: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<WebhookOutcome> {
        let mut tx = self.pool.begin().await?;

        if !self
            .record_event(&mut tx, TRANSFER_FAILED, transfer_code, payload)
            .await?
        {
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        let Some(withdrawal) = self
            .lock_withdrawal_by_transfer_code(&mut tx, transfer_code)
            .await?
        else {
            return Ok(WebhookOutcome::UnknownReference(transfer_code.to_string()));
        };
        if WithdrawalStatus::from(withdrawal.status.as_str()).is_terminal() {
            tx.commit().await?;
            return Ok(WebhookOutcome::AlreadyApplied);
        }

        // The funds never left: the reservation returns to the spendable
        // balance and withdrawn_minor stays untouched.
        let wallet = sqlx::query_as::<_, AdminWallet>(
            "UPDATE admin_wallets \
             SET available_balance_minor = available_balance_minor + $2 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(withdrawal.wallet_id)
        .bind(withdrawal.amount_minor)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE withdrawal_requests \
             SET status = 'failed', failure_reason = $2, processed_at = NOW() \
             WHERE id = $1",
        )
        .bind(withdrawal.id)
        .bind(reason.unwrap_or("transfer failed"))
        .execute(&mut *tx)
        .await?;

        let reserved_minor = self.reserved_for(&mut tx, wallet.id).await?;
        tx.commit().await?;
        Ok(WebhookOutcome::Applied {
            wallet,
            reserved_minor,
        })
    }
}
