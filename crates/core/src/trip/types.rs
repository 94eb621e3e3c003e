//! Trip domain types consumed by the balance calculator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ExpenseId, Money, ParticipantId, PaymentId, TripId};

use crate::currency::conversion::to_home;

fn default_weight() -> Decimal {
    Decimal::ONE
}

/// A person taking part in a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID (unique within the trip).
    pub id: ParticipantId,
    /// Name shown in summaries.
    pub display_name: String,
    /// Relative weight used only by weight splits. Defaults to 1.
    #[serde(default = "default_weight")]
    pub weight: Decimal,
}

impl Participant {
    /// Creates a participant with a fresh ID and weight 1.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            display_name: display_name.into(),
            weight: Decimal::ONE,
        }
    }

    /// Sets the weight used for weight splits.
    #[must_use]
    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }
}

/// How a split divides an expense.
///
/// Unknown strings deserialize to [`ShareType::Unrecognized`] and are treated
/// like `equal` by the share policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    /// Equal share among listed participants.
    Equal,
    /// Share proportional to the participant's stored weight.
    Weight,
    /// Share proportional to the split's own `share_value`.
    Custom,
    /// Any other value found in stored data.
    #[serde(other)]
    Unrecognized,
}

impl From<&str> for ShareType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "equal" => Self::Equal,
            "weight" => Self::Weight,
            "custom" => Self::Custom,
            _ => Self::Unrecognized,
        }
    }
}

/// One participant's part in an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The participant bearing (part of) the cost.
    pub participant_id: ParticipantId,
    /// Split rule; absent is treated like `equal`.
    #[serde(default)]
    pub share_type: Option<ShareType>,
    /// Relative share, read from every split once any split is `custom`.
    #[serde(default)]
    pub share_value: Option<Decimal>,
}

impl Split {
    /// Equal split for a participant.
    #[must_use]
    pub const fn equal(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            share_type: Some(ShareType::Equal),
            share_value: None,
        }
    }

    /// Weight split for a participant.
    #[must_use]
    pub const fn weight(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            share_type: Some(ShareType::Weight),
            share_value: None,
        }
    }

    /// Custom split with an explicit relative share.
    #[must_use]
    pub const fn custom(participant_id: ParticipantId, share_value: Decimal) -> Self {
        Self {
            participant_id,
            share_type: Some(ShareType::Custom),
            share_value: Some(share_value),
        }
    }

    /// Returns true if this split carries the given type.
    #[must_use]
    pub fn is(&self, share_type: ShareType) -> bool {
        self.share_type == Some(share_type)
    }
}

/// A shared expense paid by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// The participant who paid up front.
    pub payer_id: ParticipantId,
    /// Amount in the currency it was paid in.
    pub amount: Money,
    /// Multiplicative factor to the trip's home currency. Absent means the
    /// amount is already in home currency.
    #[serde(default)]
    pub fx_rate_to_home: Option<Decimal>,
    /// Date of the expense, used to look up a missing exchange rate.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Split rules; empty means "everyone on the trip, equally".
    #[serde(default)]
    pub splits: Vec<Split>,
}

impl Expense {
    /// Creates an expense with no splits and no exchange rate.
    #[must_use]
    pub fn new(payer_id: ParticipantId, amount: Money) -> Self {
        Self {
            id: ExpenseId::new(),
            payer_id,
            amount,
            fx_rate_to_home: None,
            date: None,
            splits: Vec::new(),
        }
    }

    /// Sets the rate to the home currency.
    #[must_use]
    pub fn with_fx_rate(mut self, rate: Decimal) -> Self {
        self.fx_rate_to_home = Some(rate);
        self
    }

    /// Sets the expense date.
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Replaces the split list.
    #[must_use]
    pub fn with_splits(mut self, splits: Vec<Split>) -> Self {
        self.splits = splits;
        self
    }

    /// Full value of the expense in home currency, unrounded.
    #[must_use]
    pub fn total_home(&self) -> Decimal {
        to_home(self.amount.amount, self.fx_rate_to_home)
    }
}

/// Lifecycle of a recorded payment between participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Agreed but not yet paid.
    #[default]
    Pending,
    /// Paid; reduces the outstanding balances.
    Completed,
    /// Abandoned.
    Cancelled,
}

/// A payment one participant made (or plans to make) to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedPayment {
    /// Payment ID.
    pub id: PaymentId,
    /// Paying participant.
    pub from_participant_id: ParticipantId,
    /// Receiving participant.
    pub to_participant_id: ParticipantId,
    /// Amount paid.
    pub amount: Money,
    /// Multiplicative factor to the home currency, if paid in another currency.
    #[serde(default)]
    pub fx_rate_to_home: Option<Decimal>,
    /// Date of the payment, used to look up a missing exchange rate.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Current status; only completed payments count.
    #[serde(default)]
    pub status: PaymentStatus,
}

impl RecordedPayment {
    /// Creates a completed payment.
    #[must_use]
    pub fn completed(from: ParticipantId, to: ParticipantId, amount: Money) -> Self {
        Self {
            id: PaymentId::new(),
            from_participant_id: from,
            to_participant_id: to,
            amount,
            fx_rate_to_home: None,
            date: None,
            status: PaymentStatus::Completed,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the payment affects balances.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Value of the payment in home currency, unrounded.
    #[must_use]
    pub fn total_home(&self) -> Decimal {
        to_home(self.amount.amount, self.fx_rate_to_home)
    }
}

/// Immutable snapshot of everything the engine needs for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSnapshot {
    /// Trip ID.
    #[serde(default)]
    pub trip_id: TripId,
    /// Currency all balances are reported in.
    pub home_currency: Currency,
    /// Current participants, in display order.
    pub participants: Vec<Participant>,
    /// All expenses of the trip.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Payments recorded between participants.
    #[serde(default)]
    pub payments: Vec<RecordedPayment>,
}

impl TripSnapshot {
    /// Creates a snapshot with a fresh trip ID and no recorded payments.
    #[must_use]
    pub fn new(
        home_currency: Currency,
        participants: Vec<Participant>,
        expenses: Vec<Expense>,
    ) -> Self {
        Self {
            trip_id: TripId::new(),
            home_currency,
            participants,
            expenses,
            payments: Vec::new(),
        }
    }

    /// Replaces the recorded payments.
    #[must_use]
    pub fn with_payments(mut self, payments: Vec<RecordedPayment>) -> Self {
        self.payments = payments;
        self
    }

    /// Looks up a current participant.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}
