use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::movement::Movement;
use crate::errors::{LedgerError, Result};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// A points account: dated credits that expire, and the debits drawn against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsAccount {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    movements: Vec<Movement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "PointsAccount::schema_version_default")]
    pub schema_version: u8,
}

/// What is left of a credit at a given moment once earlier debits are cancelled against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditAvailability {
    pub credit_id: Uuid,
    pub earned_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub original: i64,
    pub remaining: i64,
}

impl PointsAccount {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            movements: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn credits(&self) -> impl Iterator<Item = &Movement> {
        self.movements.iter().filter(|m| m.is_credit())
    }

    pub fn debits(&self) -> impl Iterator<Item = &Movement> {
        self.movements.iter().filter(|m| m.is_debit())
    }

    /// Sum of every movement whose validity window contains `moment`.
    pub fn balance(&self, moment: NaiveDate) -> i64 {
        self.movements
            .iter()
            .filter(|m| m.is_current(moment))
            .map(Movement::amount)
            .sum()
    }

    /// Records `points` earned on `from` that expire on `to`, returning the balance at `from`.
    pub fn add_points(&mut self, from: NaiveDate, to: NaiveDate, points: i64) -> Result<i64> {
        let credit = Movement::credit(from, to, points)?;
        self.movements.push(credit);
        self.touch();
        let balance = self.balance(from);
        info!(account = %self.name, %from, %to, points, balance, "points added");
        Ok(balance)
    }

    /// Redeems `points` at `moment`, drawing from the oldest available credits first.
    ///
    /// Each credit drawn produces one debit that expires together with that credit.
    pub fn use_points(&mut self, moment: NaiveDate, points: i64) -> Result<i64> {
        if points < 0 {
            return Err(LedgerError::InvalidAmount(points));
        }
        let available = self.balance(moment);
        if available < points {
            return Err(LedgerError::InsufficientPoints {
                requested: points,
                available,
            });
        }
        if points == 0 {
            return Ok(available);
        }

        let mut remaining = points;
        let mut new_debits = Vec::new();
        for credit in self.available_credits(moment)? {
            if remaining == 0 {
                break;
            }
            if credit.remaining == 0 {
                continue;
            }
            let drawn = credit.remaining.min(remaining);
            debug!(credit = %credit.credit_id, drawn, "drawing from credit");
            new_debits.push(Movement::debit(moment, credit.expires_on, drawn)?);
            remaining -= drawn;
        }
        if remaining > 0 {
            warn!(account = %self.name, %moment, remaining, "credits exhausted before request was covered");
            return Err(LedgerError::InconsistentMovements(format!(
                "no credit left to cover {remaining} points"
            )));
        }

        self.ensure_never_overdrawn(&new_debits)?;

        self.movements.extend(new_debits);
        self.touch();
        let balance = self.balance(moment);
        info!(account = %self.name, %moment, points, balance, "points used");
        Ok(balance)
    }

    /// Rejects `pending` debits that would push the balance below zero on any
    /// date they cover, such as a back-dated redemption spending points a later
    /// redemption already used.
    fn ensure_never_overdrawn(&self, pending: &[Movement]) -> Result<()> {
        let all: Vec<&Movement> = self.movements.iter().chain(pending).collect();
        // The balance only changes where some movement starts or ends.
        let mut checkpoints: Vec<NaiveDate> = all
            .iter()
            .flat_map(|m| [m.from(), m.to()])
            .filter(|date| pending.iter().any(|debit| debit.is_current(*date)))
            .collect();
        checkpoints.sort();
        checkpoints.dedup();

        for date in checkpoints {
            let balance: i64 = all
                .iter()
                .filter(|m| m.is_current(date))
                .map(|m| m.amount())
                .sum();
            if balance < 0 {
                warn!(account = %self.name, %date, balance, "redemption conflicts with later debits");
                return Err(LedgerError::WouldOverdraw { date, balance });
            }
        }
        Ok(())
    }

    /// Credits current at `moment`, oldest first, with the amount still undebited.
    pub fn available_credits(&self, moment: NaiveDate) -> Result<Vec<CreditAvailability>> {
        let mut credits: Vec<&Movement> = self
            .credits()
            .filter(|m| m.is_current(moment))
            .collect();
        credits.sort_by_key(|m| m.from());

        let mut debits: Vec<&Movement> = self
            .debits()
            .filter(|m| m.is_current(moment))
            .collect();
        debits.sort_by_key(|m| m.from());

        let credited: i64 = credits.iter().map(|m| m.amount()).sum();
        let debited: i64 = debits.iter().map(|m| -m.amount()).sum();
        if credited < debited {
            warn!(account = %self.name, %moment, credited, debited, "debits exceed credits");
            return Err(LedgerError::InconsistentMovements(
                "debits sum more than credits".into(),
            ));
        }

        let mut remaining: Vec<i64> = credits.iter().map(|m| m.amount()).collect();
        let mut cursor = 0;
        for debit in &debits {
            let mut pending = -debit.amount();
            while pending > 0 {
                while cursor < remaining.len() && remaining[cursor] == 0 {
                    cursor += 1;
                }
                let Some(slot) = remaining.get_mut(cursor) else {
                    return Err(LedgerError::InconsistentMovements(
                        "debit could not be matched to a credit".into(),
                    ));
                };
                let cancelled = (*slot).min(pending);
                *slot -= cancelled;
                pending -= cancelled;
            }
        }

        Ok(credits
            .into_iter()
            .zip(remaining)
            .map(|(credit, remaining)| CreditAvailability {
                credit_id: credit.id,
                earned_on: credit.from(),
                expires_on: credit.to(),
                original: credit.amount(),
                remaining,
            })
            .collect())
    }

    /// Points still available at `moment` grouped by the date they lapse.
    pub fn expiry_schedule(&self, moment: NaiveDate) -> Result<Vec<(NaiveDate, i64)>> {
        let mut schedule: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for credit in self.available_credits(moment)? {
            if credit.remaining > 0 {
                *schedule.entry(credit.expires_on).or_default() += credit.remaining;
            }
        }
        Ok(schedule.into_iter().collect())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for PointsAccount {
    fn default() -> Self {
        Self::new("Points")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::parse_date;

    fn d(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn empty_account_has_no_balance() {
        let account = PointsAccount::new("Empty");
        assert_eq!(account.balance(d("01/01/2001")), 0);
        assert_eq!(account.balance(d("01/01/2100")), 0);
    }

    #[test]
    fn uses_oldest_credit_first() {
        let mut account = PointsAccount::new("Fifo");
        assert_eq!(account.add_points(d("01/01/2001"), d("30/06/2001"), 25).unwrap(), 25);
        assert_eq!(account.add_points(d("10/01/2001"), d("09/07/2001"), 25).unwrap(), 50);
        assert_eq!(account.use_points(d("03/04/2001"), 25).unwrap(), 25);

        let debit = account.debits().next().unwrap();
        assert_eq!(debit.amount(), -25);
        assert_eq!(debit.from(), d("03/04/2001"));
        assert_eq!(debit.to(), d("30/06/2001"));

        let credits = account.available_credits(d("03/04/2001")).unwrap();
        assert_eq!(credits[0].remaining, 0);
        assert_eq!(credits[1].remaining, 25);
    }

    #[test]
    fn partial_draw_splits_across_credits() {
        let mut account = PointsAccount::new("Split");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 25).unwrap();
        account.add_points(d("10/01/2001"), d("09/07/2001"), 25).unwrap();
        assert_eq!(account.use_points(d("03/04/2001"), 30).unwrap(), 20);

        let drawn: Vec<(i64, NaiveDate)> = account.debits().map(|m| (m.amount(), m.to())).collect();
        assert_eq!(drawn, vec![(-25, d("30/06/2001")), (-5, d("09/07/2001"))]);
    }

    #[test]
    fn rejects_overdraw() {
        let mut account = PointsAccount::new("Overdraw");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 10).unwrap();
        let err = account.use_points(d("01/02/2001"), 11).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientPoints {
                requested: 11,
                available: 10
            }
        ));
        assert_eq!(account.debits().count(), 0);
    }

    #[test]
    fn back_dated_use_cannot_spend_points_already_redeemed() {
        let mut account = PointsAccount::new("Backdated");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 10).unwrap();
        assert_eq!(account.use_points(d("01/03/2001"), 10).unwrap(), 0);

        let err = account.use_points(d("01/02/2001"), 10).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::WouldOverdraw { date, balance: -10 } if date == d("01/03/2001")
        ));
        assert_eq!(account.debits().count(), 1);
        assert_eq!(account.balance(d("01/03/2001")), 0);
        assert!(account.available_credits(d("01/03/2001")).is_ok());
        assert!(account.expiry_schedule(d("01/03/2001")).unwrap().is_empty());
    }

    #[test]
    fn back_dated_use_within_spare_points_is_allowed() {
        let mut account = PointsAccount::new("Backdated");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 10).unwrap();
        account.use_points(d("01/03/2001"), 6).unwrap();

        assert_eq!(account.use_points(d("01/02/2001"), 4).unwrap(), 6);
        assert_eq!(account.balance(d("01/03/2001")), 0);
        assert!(account.use_points(d("01/02/2001"), 1).is_err());
    }

    #[test]
    fn zero_use_is_a_no_op() {
        let mut account = PointsAccount::new("Noop");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 10).unwrap();
        assert_eq!(account.use_points(d("01/02/2001"), 0).unwrap(), 10);
        assert_eq!(account.movements().len(), 1);
    }

    #[test]
    fn negative_use_is_rejected() {
        let mut account = PointsAccount::new("Negative");
        assert!(matches!(
            account.use_points(d("01/02/2001"), -1),
            Err(LedgerError::InvalidAmount(-1))
        ));
    }

    #[test]
    fn expiry_schedule_groups_remaining_points() {
        let mut account = PointsAccount::new("Schedule");
        account.add_points(d("01/01/2001"), d("30/06/2001"), 25).unwrap();
        account.add_points(d("05/01/2001"), d("30/06/2001"), 5).unwrap();
        account.add_points(d("10/01/2001"), d("09/07/2001"), 25).unwrap();
        account.use_points(d("03/04/2001"), 20).unwrap();

        let schedule = account.expiry_schedule(d("04/04/2001")).unwrap();
        assert_eq!(schedule, vec![(d("30/06/2001"), 10), (d("09/07/2001"), 25)]);
    }
}
