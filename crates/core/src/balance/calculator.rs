//! Net balance calculation.
//!
//! CRITICAL: Accumulation is exact decimal arithmetic. Each participant's
//! balance is rounded to cents exactly once, after every expense and payment
//! has been posted.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use tripsplit_shared::UnknownParticipantPolicy;
use tripsplit_shared::config::SettlementConfig;
use tripsplit_shared::types::{ExpenseId, ParticipantId, PaymentId};

use super::policy::SharePolicy;
use super::types::{BalanceLine, NetBalances, ParticipantSummary};
use crate::money::MoneyConverter;
use crate::trip::{SnapshotError, TripSnapshot};

/// Computes net balances from a trip snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator {
    policy: UnknownParticipantPolicy,
}

impl BalanceCalculator {
    /// Creates a calculator with the given unknown-participant policy.
    #[must_use]
    pub const fn new(policy: UnknownParticipantPolicy) -> Self {
        Self { policy }
    }

    /// Creates a calculator from settlement configuration.
    #[must_use]
    pub const fn from_config(config: &SettlementConfig) -> Self {
        Self::new(config.unknown_participant)
    }

    /// The configured unknown-participant policy.
    #[must_use]
    pub const fn policy(&self) -> UnknownParticipantPolicy {
        self.policy
    }

    /// Computes one net balance per participant, rounded to cents.
    ///
    /// Lines follow the order of `snapshot.participants`. Values are taken as
    /// given: a negative amount (a refund) credits the payer negatively and a
    /// zero exchange rate contributes nothing. Structural checks live in
    /// [`SnapshotValidator`](crate::trip::SnapshotValidator).
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot refers to an unknown
    /// participant under `UnknownParticipantPolicy::Reject`.
    pub fn compute(&self, snapshot: &TripSnapshot) -> Result<NetBalances, SnapshotError> {
        let tally = self.tally(snapshot)?;
        Ok(Self::balances(tally, snapshot))
    }

    /// Computes the per-participant totals behind each net balance.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceCalculator::compute`].
    pub fn summarize(
        &self,
        snapshot: &TripSnapshot,
    ) -> Result<Vec<ParticipantSummary>, SnapshotError> {
        let tally = self.tally(snapshot)?;
        Ok(Self::summaries(&tally, snapshot))
    }

    /// Computes balances and summaries from a single pass over the snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceCalculator::compute`].
    pub fn compute_with_summaries(
        &self,
        snapshot: &TripSnapshot,
    ) -> Result<(NetBalances, Vec<ParticipantSummary>), SnapshotError> {
        let tally = self.tally(snapshot)?;
        let summaries = Self::summaries(&tally, snapshot);
        Ok((Self::balances(tally, snapshot), summaries))
    }

    fn balances(tally: Tally, snapshot: &TripSnapshot) -> NetBalances {
        let lines: Vec<BalanceLine> = tally
            .accounts
            .iter()
            .map(|(participant_id, account)| BalanceLine {
                participant_id: *participant_id,
                net_amount: MoneyConverter::round_to_cents(account.net()),
            })
            .collect();

        let unrounded_total = tally
            .accounts
            .iter()
            .fold(tally.unattributed, |acc, (_, account)| {
                acc.saturating_add(account.net())
            });

        let unattributed = MoneyConverter::round_to_cents(tally.unattributed);
        if !tally.unattributed_participants.is_empty() {
            warn!(
                trip_id = %snapshot.trip_id,
                %unattributed,
                participants = tally.unattributed_participants.len(),
                "Value attributed to participants no longer on the trip"
            );
        }

        debug!(
            trip_id = %snapshot.trip_id,
            participants = lines.len(),
            expenses = snapshot.expenses.len(),
            payments = snapshot.payments.len(),
            "Computed net balances"
        );

        NetBalances::new(
            lines,
            unattributed,
            tally.unattributed_participants,
            unrounded_total,
        )
    }

    fn summaries(tally: &Tally, snapshot: &TripSnapshot) -> Vec<ParticipantSummary> {
        let names: HashMap<ParticipantId, &str> = snapshot
            .participants
            .iter()
            .map(|p| (p.id, p.display_name.as_str()))
            .collect();

        tally
            .accounts
            .iter()
            .map(|(participant_id, account)| ParticipantSummary {
                participant_id: *participant_id,
                display_name: names
                    .get(participant_id)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                total_paid: MoneyConverter::round_to_cents(account.paid),
                total_share: MoneyConverter::round_to_cents(account.share),
                payments_sent: MoneyConverter::round_to_cents(account.sent),
                payments_received: MoneyConverter::round_to_cents(account.received),
                net: MoneyConverter::round_to_cents(account.net()),
            })
            .collect()
    }

    /// Posts every expense and completed payment, unrounded.
    fn tally(&self, snapshot: &TripSnapshot) -> Result<Tally, SnapshotError> {
        let mut tally = Tally::new(self.policy, snapshot);

        for expense in &snapshot.expenses {
            if expense.splits.is_empty() && snapshot.participants.is_empty() {
                warn!(
                    trip_id = %snapshot.trip_id,
                    expense_id = %expense.id,
                    "Skipping expense with no splits on a trip without participants"
                );
                continue;
            }

            let origin = Origin::Expense(expense.id);
            let total = expense.total_home();
            tally.post(expense.payer_id, Entry::Paid, total, origin)?;

            let shares = SharePolicy::resolve(&expense.splits).shares(
                total,
                &expense.splits,
                &snapshot.participants,
            );
            for (participant_id, share) in shares {
                tally.post(participant_id, Entry::Share, share, origin)?;
            }
        }

        for payment in snapshot.payments.iter().filter(|p| p.is_completed()) {
            let origin = Origin::Payment(payment.id);
            let amount = payment.total_home();
            tally.post(payment.from_participant_id, Entry::Sent, amount, origin)?;
            tally.post(payment.to_participant_id, Entry::Received, amount, origin)?;
        }

        Ok(tally)
    }
}

/// Running totals of one participant, unrounded.
#[derive(Debug, Clone, Copy, Default)]
struct Account {
    paid: Decimal,
    share: Decimal,
    sent: Decimal,
    received: Decimal,
}

impl Account {
    fn net(&self) -> Decimal {
        self.paid
            .saturating_sub(self.share)
            .saturating_add(self.sent)
            .saturating_sub(self.received)
    }
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Paid,
    Share,
    Sent,
    Received,
}

impl Entry {
    /// Effect of the entry on a net balance.
    fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Paid | Self::Sent => amount,
            Self::Share | Self::Received => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    Expense(ExpenseId),
    Payment(PaymentId),
}

impl Origin {
    fn unknown(self, participant_id: ParticipantId) -> SnapshotError {
        match self {
            Self::Expense(expense_id) => SnapshotError::UnknownParticipant {
                expense_id,
                participant_id,
            },
            Self::Payment(payment_id) => SnapshotError::UnknownPaymentParticipant {
                payment_id,
                participant_id,
            },
        }
    }
}

struct Tally {
    policy: UnknownParticipantPolicy,
    index: HashMap<ParticipantId, usize>,
    accounts: Vec<(ParticipantId, Account)>,
    unattributed: Decimal,
    unattributed_participants: Vec<ParticipantId>,
}

impl Tally {
    fn new(policy: UnknownParticipantPolicy, snapshot: &TripSnapshot) -> Self {
        let mut index = HashMap::with_capacity(snapshot.participants.len());
        let mut accounts = Vec::with_capacity(snapshot.participants.len());
        for participant in &snapshot.participants {
            index.entry(participant.id).or_insert_with(|| {
                accounts.push((participant.id, Account::default()));
                accounts.len() - 1
            });
        }
        Self {
            policy,
            index,
            accounts,
            unattributed: Decimal::ZERO,
            unattributed_participants: Vec::new(),
        }
    }

    fn post(
        &mut self,
        participant_id: ParticipantId,
        entry: Entry,
        amount: Decimal,
        origin: Origin,
    ) -> Result<(), SnapshotError> {
        if let Some(&idx) = self.index.get(&participant_id) {
            let account = &mut self.accounts[idx].1;
            let slot = match entry {
                Entry::Paid => &mut account.paid,
                Entry::Share => &mut account.share,
                Entry::Sent => &mut account.sent,
                Entry::Received => &mut account.received,
            };
            *slot = slot.saturating_add(amount);
            return Ok(());
        }

        match self.policy {
            UnknownParticipantPolicy::Reject => Err(origin.unknown(participant_id)),
            UnknownParticipantPolicy::Unattributed => {
                self.unattributed = self.unattributed.saturating_add(entry.signed(amount));
                if !self.unattributed_participants.contains(&participant_id) {
                    self.unattributed_participants.push(participant_id);
                }
                Ok(())
            }
        }
    }
}
