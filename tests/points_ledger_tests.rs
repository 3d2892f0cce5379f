mod common;

use common::d;
use money_calculator::{errors::LedgerError, points::PointsAccount};

fn seeded_account() -> PointsAccount {
    let mut account = PointsAccount::new("Miles");
    assert_eq!(account.add_points(d("01/01/2001"), d("30/06/2001"), 25).unwrap(), 25);
    assert_eq!(account.add_points(d("10/01/2001"), d("09/07/2001"), 25).unwrap(), 50);
    assert_eq!(account.add_points(d("20/01/2001"), d("19/07/2001"), 100).unwrap(), 150);
    assert_eq!(account.add_points(d("31/01/2001"), d("30/07/2001"), 25).unwrap(), 175);
    assert_eq!(account.add_points(d("10/03/2001"), d("06/09/2001"), 25).unwrap(), 200);
    account
}

fn assert_expiry_timeline(account: &PointsAccount) {
    // The 25 points lapsing on 30/06 were already used, so the balance holds.
    assert_eq!(account.balance(d("29/06/2001")), 150);
    assert_eq!(account.balance(d("01/07/2001")), 150);
    assert_eq!(account.balance(d("01/09/2001")), 25);
    assert_eq!(account.balance(d("07/09/2001")), 0);
}

#[test]
fn empty_account_has_no_balance_anywhere() {
    let account = PointsAccount::new("Empty");
    assert_eq!(account.balance(d("01/01/2001")), 0);
    assert_eq!(account.balance(d("01/01/2010")), 0);
    assert_eq!(account.balance(d("01/01/2100")), 0);
}

#[test]
fn redeems_whole_credits_in_earn_order() {
    let mut account = seeded_account();
    assert_eq!(account.use_points(d("03/04/2001"), 25).unwrap(), 175);
    assert_eq!(account.use_points(d("04/04/2001"), 25).unwrap(), 150);
    assert_expiry_timeline(&account);
}

#[test]
fn small_draw_then_larger_remainder() {
    let mut account = seeded_account();
    assert_eq!(account.use_points(d("03/04/2001"), 13).unwrap(), 187);
    assert_eq!(account.use_points(d("04/04/2001"), 37).unwrap(), 150);
    assert_expiry_timeline(&account);
}

#[test]
fn large_draw_spans_two_credits() {
    let mut account = seeded_account();
    assert_eq!(account.use_points(d("03/04/2001"), 37).unwrap(), 163);

    let debits: Vec<_> = account.debits().collect();
    assert_eq!(debits.len(), 2);
    assert_eq!(debits[0].amount(), -25);
    assert_eq!(debits[0].to(), d("30/06/2001"));
    assert_eq!(debits[1].amount(), -12);
    assert_eq!(debits[1].to(), d("09/07/2001"));

    assert_eq!(account.use_points(d("04/04/2001"), 13).unwrap(), 150);
    assert_expiry_timeline(&account);
}

#[test]
fn credits_lapse_one_by_one() {
    let mut account = PointsAccount::new("Trickle");
    account.add_points(d("01/01/2001"), d("30/06/2001"), 1).unwrap();
    account.add_points(d("10/01/2001"), d("09/07/2001"), 1).unwrap();
    account.add_points(d("13/01/2001"), d("12/07/2001"), 1).unwrap();
    account.add_points(d("16/01/2001"), d("15/07/2001"), 1).unwrap();
    account.add_points(d("20/01/2001"), d("19/07/2001"), 1).unwrap();

    assert_eq!(account.balance(d("31/12/2000")), 0);
    assert_eq!(account.balance(d("29/06/2001")), 5);
    assert_eq!(account.balance(d("08/07/2001")), 4);
    assert_eq!(account.balance(d("11/07/2001")), 3);
    assert_eq!(account.balance(d("14/07/2001")), 2);
    assert_eq!(account.balance(d("16/07/2001")), 1);

    assert_eq!(account.use_points(d("16/07/2001"), 1).unwrap(), 0);
    assert_eq!(account.balance(d("18/07/2001")), 0);
    assert_eq!(account.balance(d("19/07/2001")), 0);
    assert_eq!(account.balance(d("21/12/2001")), 0);
}

#[test]
fn consume_everything_in_small_steps() {
    let mut account = PointsAccount::new("Drain");
    assert_eq!(account.add_points(d("01/01/2001"), d("30/06/2001"), 50).unwrap(), 50);
    assert_eq!(account.add_points(d("01/01/2001"), d("30/06/2001"), 50).unwrap(), 100);

    for expected in [90, 80, 70, 60] {
        assert_eq!(account.use_points(d("01/06/2001"), 10).unwrap(), expected);
    }
    assert_eq!(account.use_points(d("01/06/2001"), 60).unwrap(), 0);
    assert_eq!(account.balance(d("02/06/2001")), 0);
}

#[test]
fn overdraw_is_rejected_without_side_effects() {
    let mut account = seeded_account();
    let before = account.movements().len();
    let err = account.use_points(d("03/04/2001"), 201).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientPoints {
            requested: 201,
            available: 200
        }
    ));
    assert_eq!(account.movements().len(), before);
}

#[test]
fn redemption_on_expiry_day_only_sees_live_credits() {
    let mut account = seeded_account();
    // The first credit lapses on 30/06.
    assert_eq!(account.balance(d("30/06/2001")), 175);
    assert!(account.use_points(d("30/06/2001"), 176).is_err());
    assert_eq!(account.use_points(d("30/06/2001"), 175).unwrap(), 0);
}

#[test]
fn invalid_credits_are_rejected() {
    let mut account = PointsAccount::new("Broken");
    let err = account
        .add_points(d("30/06/2001"), d("30/06/2001"), 10)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidWindow { .. }));
    assert!(matches!(
        account.add_points(d("01/01/2001"), d("30/06/2001"), 0),
        Err(LedgerError::InvalidAmount(0))
    ));
    assert!(account.movements().is_empty());
}

#[test]
fn availability_reflects_fifo_draws() {
    let mut account = seeded_account();
    account.use_points(d("03/04/2001"), 30).unwrap();

    let credits = account.available_credits(d("03/04/2001")).unwrap();
    let remaining: Vec<i64> = credits.iter().map(|c| c.remaining).collect();
    assert_eq!(remaining, vec![0, 20, 100, 25, 25]);

    let schedule = account.expiry_schedule(d("03/04/2001")).unwrap();
    assert_eq!(schedule.first(), Some(&(d("09/07/2001"), 20)));
    assert_eq!(schedule.iter().map(|(_, p)| p).sum::<i64>(), 170);
}
