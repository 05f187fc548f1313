#![cfg(test)]

use crate::test::Setup;
use crate::{FundError, FundType};
use soroban_sdk::{testutils::Address as _, Address};

#[test]
fn test_payback_is_split_by_shares() {
    let s = Setup::new();
    let fund_id = s.create_fund(1_000, FundType::Raise(false));
    let alice = s.funded_user(300);
    let bob = s.funded_user(100);
    s.client.deposit(&fund_id, &alice, &300);
    s.client.deposit(&fund_id, &bob, &100);
    s.client.close(&fund_id, &s.owner);

    s.asset.mint(&s.owner, &200);
    s.client.register_payback(&fund_id, &s.owner, &200);
    assert_eq!(s.client.get_fund(&fund_id).payback_total, 200);

    assert_eq!(s.client.payback_owed(&fund_id, &alice), 150);
    assert_eq!(s.client.payback_owed(&fund_id, &bob), 50);

    s.client.payback_withdraw(&fund_id, &alice, &100);
    assert_eq!(s.token.balance(&alice), 100);
    assert_eq!(s.client.payback_owed(&fund_id, &alice), 50);

    assert_eq!(
        s.client.try_payback_withdraw(&fund_id, &alice, &51),
        Err(Ok(FundError::WithdrawalSizeOverflow))
    );
    s.client.payback_withdraw(&fund_id, &alice, &50);
    s.client.payback_withdraw(&fund_id, &bob, &50);
    assert_eq!(s.client.payback_owed(&fund_id, &alice), 0);
    assert_eq!(s.client.payback_owed(&fund_id, &bob), 0);
}

#[test]
fn test_later_payback_adds_to_what_is_owed() {
    let s = Setup::new();
    let fund_id = s.create_fund(1_000, FundType::Raise(false));
    let alice = s.funded_user(100);
    s.client.deposit(&fund_id, &alice, &100);
    s.client.close(&fund_id, &s.owner);

    s.asset.mint(&s.owner, &80);
    s.client.register_payback(&fund_id, &s.owner, &30);
    s.client.payback_withdraw(&fund_id, &alice, &30);
    s.client.register_payback(&fund_id, &s.owner, &50);

    assert_eq!(s.client.payback_owed(&fund_id, &alice), 50);
}

#[test]
fn test_payback_needs_a_raise_with_shares() {
    let s = Setup::new();
    s.asset.mint(&s.owner, &100);

    let donations = s.create_fund(1_000, FundType::FundMe);
    assert_eq!(
        s.client.try_register_payback(&donations, &s.owner, &10),
        Err(Ok(FundError::InvalidFund))
    );

    let empty_raise = s.create_fund(1_000, FundType::Raise(false));
    assert_eq!(
        s.client.try_register_payback(&empty_raise, &s.owner, &10),
        Err(Ok(FundError::InvalidFund))
    );
}

#[test]
fn test_non_holder_is_owed_nothing() {
    let s = Setup::new();
    let fund_id = s.create_fund(1_000, FundType::Raise(false));
    let alice = s.funded_user(100);
    let mallory = Address::generate(&s.env);
    s.client.deposit(&fund_id, &alice, &100);
    s.client.close(&fund_id, &s.owner);
    s.asset.mint(&s.owner, &40);
    s.client.register_payback(&fund_id, &s.owner, &40);

    assert_eq!(s.client.payback_owed(&fund_id, &mallory), 0);
    assert_eq!(
        s.client.try_payback_withdraw(&fund_id, &mallory, &1),
        Err(Ok(FundError::WithdrawalSizeOverflow))
    );
}

#[test]
fn test_payback_waits_for_close() {
    let s = Setup::new();
    let fund_id = s.create_fund(1_000, FundType::Raise(false));
    let alice = s.funded_user(100);
    let bob = s.funded_user(100);
    s.client.deposit(&fund_id, &alice, &100);
    s.asset.mint(&s.owner, &100);

    assert_eq!(
        s.client.try_register_payback(&fund_id, &s.owner, &100),
        Err(Ok(FundError::FundOpen))
    );
    assert_eq!(s.client.get_fund(&fund_id).payback_total, 0);

    s.client.close(&fund_id, &s.owner);
    s.client.register_payback(&fund_id, &s.owner, &100);
    s.client.payback_withdraw(&fund_id, &alice, &100);

    // shares are frozen, so no one can join after the payback
    assert_eq!(
        s.client.try_deposit(&fund_id, &bob, &100),
        Err(Ok(FundError::FundClosed))
    );
    assert_eq!(s.client.payback_owed(&fund_id, &alice), 0);
    assert_eq!(s.client.payback_owed(&fund_id, &bob), 0);

    let fund = s.client.get_fund(&fund_id);
    s.client.withdraw(&fund_id, &s.owner, &fund.balance);
    assert_eq!(s.token.balance(&s.client.address), 0);
}

#[test]
fn test_payback_at_large_amounts() {
    const UNIT: i128 = 10_000_000_000_000_000_000; // 1e19

    let s = Setup::new();
    let fund_id = s.create_fund(10 * UNIT, FundType::Raise(false));
    let alice = s.funded_user(6 * UNIT);
    let bob = s.funded_user(4 * UNIT);
    s.client.deposit(&fund_id, &alice, &(6 * UNIT));
    s.client.deposit(&fund_id, &bob, &(4 * UNIT));
    s.client.close(&fund_id, &s.owner);

    s.asset.mint(&s.owner, &UNIT);
    s.client.register_payback(&fund_id, &s.owner, &UNIT);

    assert_eq!(s.client.payback_owed(&fund_id, &alice), 6 * UNIT / 10);
    assert_eq!(s.client.payback_owed(&fund_id, &bob), 4 * UNIT / 10);

    s.client.payback_withdraw(&fund_id, &alice, &(6 * UNIT / 10));
    s.client.payback_withdraw(&fund_id, &bob, &(4 * UNIT / 10));
    assert_eq!(s.token.balance(&alice), 6 * UNIT / 10);
    assert_eq!(s.client.payback_owed(&fund_id, &bob), 0);
}
